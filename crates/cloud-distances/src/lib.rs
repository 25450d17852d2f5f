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

pub mod backend;
pub mod chamfer;
mod cloud;
pub mod emd;
mod error;
pub mod kernel;

pub use backend::{select_backend, BackendKind, DistanceBackend, ParallelBackend, ReferenceBackend};
pub use chamfer::{chamfer, chamfer_score};
pub use cloud::{stack, PointCloud, DIM};
pub use emd::emd;
pub use error::DistanceError;

/// The version of the crate.
pub const VERSION: &str = "0.1.0";
