//! Minimum Matching Distance and Coverage.
//!
//! Given a matrix with one row per generated sample and one column per
//! reference cloud:
//!
//! - `mmd` is the mean, over references, of the distance to the closest
//!   sample.
//! - `mmd_smp` is the mean, over samples, of the distance to the closest
//!   reference.
//! - `cov` is the fraction of references that are the nearest reference of at
//!   least one sample.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{utils, DistanceError, DistanceMatrix, MetricReport};

/// The MMD and coverage of a set of samples with respect to a reference set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MmdCoverage {
    /// Mean distance from each reference to its closest sample.
    pub mmd: f32,
    /// Mean distance from each sample to its closest reference.
    pub mmd_smp: f32,
    /// Fraction of references matched by at least one sample.
    pub cov: f32,
}

impl MmdCoverage {
    /// The report entries for a distance named by `suffix`, e.g. `CD`.
    #[must_use]
    pub fn report(&self, suffix: &str) -> MetricReport {
        [
            (format!("lgan_mmd-{suffix}"), self.mmd),
            (format!("lgan_cov-{suffix}"), self.cov),
            (format!("lgan_mmd_smp-{suffix}"), self.mmd_smp),
        ]
        .into_iter()
        .map(|(k, v)| (k, f64::from(v)))
        .collect()
    }
}

/// MMD and coverage from a `samples x references` distance matrix.
///
/// A sample whose row has several minimal entries is matched to the lowest
/// column index among them.
///
/// # Errors
///
/// - If the matrix has no rows or no columns.
#[allow(clippy::cast_precision_loss)]
pub fn mmd_coverage(matrix: &DistanceMatrix) -> Result<MmdCoverage, DistanceError> {
    if matrix.nrows() == 0 || matrix.ncols() == 0 {
        return Err(DistanceError::usage(format!(
            "MMD-COV needs a non-empty matrix, got {} x {}",
            matrix.nrows(),
            matrix.ncols()
        )));
    }

    let row_minima = matrix.row_minima();
    let matched = row_minima.iter().map(|&(j, _)| j).collect::<HashSet<_>>();

    let mmd = utils::mean(matrix.col_minima()).unwrap_or(0.);
    let mmd_smp = utils::mean(row_minima.iter().map(|&(_, v)| v)).unwrap_or(0.);
    let cov = matched.len() as f32 / matrix.ncols() as f32;

    ftlog::debug!("MMD-COV over {} samples and {} references: {mmd:.6e}, {cov:.4}", matrix.nrows(), matrix.ncols());
    Ok(MmdCoverage { mmd, mmd_smp, cov })
}
