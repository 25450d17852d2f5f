//! Runs every metric on a reference and a generated collection.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use cloud_distances::select_backend;

use crate::{
    mmd_cov::mmd_coverage, one_nn::one_nn_with, BackendKind, DistanceBackend, DistanceError, DistanceMatrix, EvalConfig,
    MetricReport, PairwiseMatrices, PairwiseMatrixBuilder, PointCloud,
};

/// The distances between point clouds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistanceKind {
    /// Chamfer distance.
    Chamfer,
    /// Earth Mover's distance.
    Emd,
}

impl DistanceKind {
    /// The suffix of the metric names computed with this distance.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Chamfer => "CD",
            Self::Emd => "EMD",
        }
    }
}

/// Computes the MMD, coverage and 1-NN metrics of a generated collection.
pub struct Evaluator {
    /// Which backend to use.
    backend_kind: BackendKind,
    /// The backend, selected on first use.
    backend: OnceLock<Box<dyn DistanceBackend>>,
    /// The number of clouds per backend call.
    batch_size: usize,
    /// The number of neighbors voting in the 1-NN test.
    k: usize,
    /// Whether to also compute EMD-based metrics.
    compute_emd: bool,
    /// Whether the 1-NN test uses the square roots of the distances.
    sqrt: bool,
    /// Optional budget, in bytes, for one chunk's distance buffer.
    memory_limit: Option<usize>,
    /// Whether to also report the mean distance between paired clouds.
    paired: bool,
}

impl Evaluator {
    /// An evaluator with the best available backend that computes only the
    /// Chamfer metrics with a 1-NN vote.
    #[must_use]
    pub fn new(batch_size: usize) -> Self {
        Self {
            backend_kind: BackendKind::Auto,
            backend: OnceLock::new(),
            batch_size,
            k: 1,
            compute_emd: false,
            sqrt: false,
            memory_limit: None,
            paired: false,
        }
    }

    /// An evaluator with the given settings.
    ///
    /// # Errors
    ///
    /// See [`EvalConfig::validate`].
    pub fn from_config(config: &EvalConfig) -> Result<Self, DistanceError> {
        config.validate()?;
        Ok(Self::new(config.batch_size)
            .with_backend(config.backend_kind()?)
            .with_k(config.k)
            .with_emd(config.compute_emd)
            .with_sqrt(config.sqrt)
            .with_memory_limit(config.memory_limit)
            .with_paired(config.paired))
    }

    /// Sets which distance backend to use.
    #[must_use]
    pub fn with_backend(mut self, kind: BackendKind) -> Self {
        self.backend_kind = kind;
        self.backend = OnceLock::new();
        self
    }

    /// The requested backend.
    #[must_use]
    pub const fn backend_kind(&self) -> BackendKind {
        self.backend_kind
    }

    /// The backend that computes the distances, selected once by
    /// availability.
    pub fn backend(&self) -> &dyn DistanceBackend {
        self.backend.get_or_init(|| select_backend(self.backend_kind)).as_ref()
    }

    /// Sets the number of neighbors voting in the 1-NN test.
    #[must_use]
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Sets whether EMD-based metrics are computed.
    #[must_use]
    pub fn with_emd(mut self, compute_emd: bool) -> Self {
        self.compute_emd = compute_emd;
        self
    }

    /// Sets whether the 1-NN test uses the square roots of the distances.
    #[must_use]
    pub fn with_sqrt(mut self, sqrt: bool) -> Self {
        self.sqrt = sqrt;
        self
    }

    /// Sets the memory budget of one chunk.
    #[must_use]
    pub fn with_memory_limit(mut self, memory_limit: Option<usize>) -> Self {
        self.memory_limit = memory_limit;
        self
    }

    /// Sets whether the mean distances between the `i`-th sample and the
    /// `i`-th reference are reported as `MMD-CD` and `MMD-EMD`.
    #[must_use]
    pub fn with_paired(mut self, paired: bool) -> Self {
        self.paired = paired;
        self
    }

    /// The distances whose metrics are computed.
    fn kinds(&self) -> Vec<DistanceKind> {
        if self.compute_emd {
            vec![DistanceKind::Chamfer, DistanceKind::Emd]
        } else {
            vec![DistanceKind::Chamfer]
        }
    }

    /// Computes the report for a reference and a generated collection of the
    /// same size.
    ///
    /// The reference-vs-sample matrices feed MMD and coverage (with one row
    /// per sample) and, together with the within-set matrices, the 1-NN test.
    ///
    /// # Errors
    ///
    /// - If the collections are empty or differ in size.
    /// - If any distance matrix or metric cannot be computed.
    pub fn evaluate(&self, reference: &[PointCloud], sample: &[PointCloud]) -> Result<MetricReport, DistanceError> {
        if reference.is_empty() || reference.len() != sample.len() {
            let err = DistanceError::usage(format!(
                "the number of generated clouds ({}) must match the number of reference clouds ({}) and be positive",
                sample.len(),
                reference.len()
            ));
            ftlog::error!("{err}");
            return Err(err);
        }

        let start = std::time::Instant::now();
        ftlog::info!(
            "Evaluating {} generated clouds against {} references with metrics {:?}.",
            sample.len(),
            reference.len(),
            self.kinds()
        );

        let builder = PairwiseMatrixBuilder::new(self.backend(), self.batch_size)?
            .with_emd(self.compute_emd)
            .with_memory_limit(self.memory_limit);

        let mut report = MetricReport::default();

        let rs = builder.build(reference, sample)?;
        for kind in self.kinds() {
            let coverage = mmd_coverage(&matrix(&rs, kind)?.transpose())?;
            ftlog::info!("MMD-COV with {}: {coverage:?}", kind.suffix());
            report.merge(coverage.report(kind.suffix()));
        }

        let rr = builder.build_within(reference)?;
        let ss = builder.build_within(sample)?;
        for kind in self.kinds() {
            let (within_ref, cross, within_smp) = (matrix(&rr, kind)?, matrix(&rs, kind)?, matrix(&ss, kind)?);
            let stats = one_nn_with(within_ref, cross, within_smp, self.k, self.sqrt)?;
            ftlog::info!("1-NN with {}: {stats:?}", kind.suffix());
            report.merge(stats.accuracy_report(kind.suffix()));
        }

        if self.paired {
            report.merge(builder.build_paired(sample, reference)?.report());
        }

        ftlog::info!("Computed {} metrics in {:.2e} seconds.", report.len(), start.elapsed().as_secs_f32());
        Ok(report)
    }
}

/// The matrix of the given kind, which the builder was asked to compute.
fn matrix(matrices: &PairwiseMatrices, kind: DistanceKind) -> Result<&DistanceMatrix, DistanceError> {
    matrices
        .get(kind)
        .ok_or_else(|| DistanceError::usage(format!("no {} matrix was computed", kind.suffix())))
}

/// The Chamfer-based MMD, coverage and 1-NN accuracies of `sample` against
/// `reference`, with the best available backend.
///
/// # Errors
///
/// See [`Evaluator::evaluate`].
pub fn evaluate(
    reference: &[PointCloud],
    sample: &[PointCloud],
    batch_size: usize,
) -> Result<MetricReport, DistanceError> {
    Evaluator::new(batch_size).evaluate(reference, sample)
}
