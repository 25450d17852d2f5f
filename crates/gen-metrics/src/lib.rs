#![deny(clippy::correctness)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::pedantic,
    clippy::nursery,
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::cast_lossless
)]
#![doc = include_str!("../README.md")]

pub mod config;
mod evaluate;
mod matrix;
pub mod mmd_cov;
pub mod one_nn;
pub mod pairwise;
mod report;
pub mod sampling;
pub mod utils;

pub use cloud_distances::{BackendKind, DistanceBackend, DistanceError, PointCloud};
pub use config::EvalConfig;
pub use evaluate::{evaluate, DistanceKind, Evaluator};
pub use matrix::DistanceMatrix;
pub use mmd_cov::{mmd_coverage, MmdCoverage};
pub use one_nn::{one_nn, OneNnStats};
pub use pairwise::{pairwise_matrix, PairedDistances, PairwiseMatrices, PairwiseMatrixBuilder};
pub use report::MetricReport;
pub use sampling::RandomSource;

/// The current version of the crate.
pub const VERSION: &str = "0.1.0";
