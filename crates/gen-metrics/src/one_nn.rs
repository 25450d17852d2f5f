//! Leave-one-out k-nearest-neighbor two-sample test.
//!
//! The reference and generated clouds are pooled, labelled 1 and 0
//! respectively, and every cloud is classified by a vote of its `k` nearest
//! neighbors among the others. An accuracy near 0.5 means the two sets are
//! hard to tell apart.

use ndarray::{s, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::{DistanceError, DistanceMatrix, MetricReport};

/// Added to the denominators of the rates so that empty classes give 0.
const EPSILON: f32 = 1e-10;

/// Confusion counts and rates of the k-NN classifier.
///
/// References are the positive class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OneNnStats {
    /// References classified as references.
    pub tp: usize,
    /// Samples classified as references.
    pub fp: usize,
    /// References classified as samples.
    #[serde(rename = "fn")]
    pub fn_: usize,
    /// Samples classified as samples.
    pub tn: usize,
    /// `tp / (tp + fp)`.
    pub precision: f32,
    /// `tp / (tp + fn)`.
    pub recall: f32,
    /// Accuracy on the references; equal to `recall`.
    pub acc_t: f32,
    /// Accuracy on the samples.
    pub acc_f: f32,
    /// Accuracy over all clouds.
    pub acc: f32,
}

impl OneNnStats {
    /// Derives the rates from the confusion counts.
    #[allow(clippy::cast_precision_loss)]
    fn from_counts(tp: usize, fp: usize, fn_: usize, tn: usize) -> Self {
        let [tp_f, fp_f, fn_f, tn_f] = [tp, fp, fn_, tn].map(|c| c as f32);
        let recall = tp_f / (tp_f + fn_f + EPSILON);
        Self {
            tp,
            fp,
            fn_,
            tn,
            precision: tp_f / (tp_f + fp_f + EPSILON),
            recall,
            acc_t: recall,
            acc_f: tn_f / (tn_f + fp_f + EPSILON),
            acc: (tp_f + tn_f) / (tp_f + fp_f + fn_f + tn_f),
        }
    }

    /// The accuracy entries for a distance named by `suffix`, e.g. `CD`.
    #[must_use]
    pub fn accuracy_report(&self, suffix: &str) -> MetricReport {
        [("acc_t", self.acc_t), ("acc_f", self.acc_f), ("acc", self.acc)]
            .into_iter()
            .map(|(name, v)| (format!("1-NN-{suffix}-{name}"), f64::from(v)))
            .collect()
    }

    /// Every count and rate for a distance named by `suffix`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn report(&self, suffix: &str) -> MetricReport {
        let mut report = self.accuracy_report(suffix);
        let counts = [("tp", self.tp), ("fp", self.fp), ("fn", self.fn_), ("tn", self.tn)];
        for (name, c) in counts {
            report.insert(format!("1-NN-{suffix}-{name}"), c as f64);
        }
        report.insert(format!("1-NN-{suffix}-precision"), f64::from(self.precision));
        report.insert(format!("1-NN-{suffix}-recall"), f64::from(self.recall));
        report
    }
}

/// The 1-NN test on raw distances with a `k`-neighbor vote.
///
/// `rr` holds reference-vs-reference distances, `rs` reference-vs-sample and
/// `ss` sample-vs-sample.
///
/// # Errors
///
/// See [`one_nn_with`].
pub fn one_nn(
    rr: &DistanceMatrix,
    rs: &DistanceMatrix,
    ss: &DistanceMatrix,
    k: usize,
) -> Result<OneNnStats, DistanceError> {
    one_nn_with(rr, rs, ss, k, false)
}

/// The 1-NN test, optionally on `sqrt(|d|)` instead of the raw distances.
///
/// Neighbors at equal distance are taken in order of their index in the
/// pooled set, references first. A cloud is predicted to be a reference when
/// at least half of its `k` neighbors are references.
///
/// # Errors
///
/// - If `rr` or `ss` is not square or either is empty.
/// - If `rs` is not `rr.nrows() x ss.nrows()`.
/// - If `k` is zero or not smaller than the number of pooled clouds.
pub fn one_nn_with(
    rr: &DistanceMatrix,
    rs: &DistanceMatrix,
    ss: &DistanceMatrix,
    k: usize,
    sqrt: bool,
) -> Result<OneNnStats, DistanceError> {
    let (n0, n1) = (rr.nrows(), ss.nrows());
    if n0 == 0 || n1 == 0 || rr.ncols() != n0 || ss.ncols() != n1 || rs.nrows() != n0 || rs.ncols() != n1 {
        return Err(DistanceError::usage(format!(
            "1-NN needs square, non-empty within-set matrices and a matching cross matrix, got {}x{}, {}x{} and {}x{}",
            rr.nrows(),
            rr.ncols(),
            rs.nrows(),
            rs.ncols(),
            ss.nrows(),
            ss.ncols()
        )));
    }
    let n = n0 + n1;
    if k == 0 || k >= n {
        return Err(DistanceError::usage(format!("k must be in 1..{n}, got {k}")));
    }

    let mut pooled = Array2::zeros((n, n));
    pooled.slice_mut(s![..n0, ..n0]).assign(&rr.view());
    pooled.slice_mut(s![..n0, n0..]).assign(&rs.view());
    pooled.slice_mut(s![n0.., ..n0]).assign(&rs.view().t());
    pooled.slice_mut(s![n0.., n0..]).assign(&ss.view());
    if sqrt {
        pooled.mapv_inplace(|d: f32| d.abs().sqrt());
    }
    pooled.diag_mut().fill(f32::INFINITY);

    let is_reference = |i: usize| i < n0;
    let (mut tp, mut fp, mut fn_, mut tn) = (0, 0, 0, 0);
    for (j, column) in pooled.axis_iter(Axis(1)).enumerate() {
        let mut neighbors = column.iter().copied().enumerate().collect::<Vec<_>>();
        neighbors.select_nth_unstable_by(k - 1, |&(i, a), &(l, b)| a.total_cmp(&b).then(i.cmp(&l)));
        let votes = neighbors[..k].iter().filter(|&&(i, _)| is_reference(i)).count();

        match (is_reference(j), 2 * votes >= k) {
            (true, true) => tp += 1,
            (false, true) => fp += 1,
            (true, false) => fn_ += 1,
            (false, false) => tn += 1,
        }
    }

    let stats = OneNnStats::from_counts(tp, fp, fn_, tn);
    ftlog::debug!("1-NN with k = {k} over {n0} references and {n1} samples: {stats:?}");
    Ok(stats)
}
