//! Backends that compute batched distances.
//!
//! A `DistanceBackend` is chosen once, at startup, by [`select_backend`]. The
//! reference backend is always available; the parallel backend spreads batch
//! elements and matrix rows over the rayon thread pool. Both honor the same
//! contract and agree up to floating-point tolerance.

mod parallel;
mod reference;

use ndarray::{Array1, Array2, Array3, ArrayView3};

pub use parallel::ParallelBackend;
pub use reference::ReferenceBackend;

use crate::DistanceError;

/// A capability for computing distances between batches of point clouds.
pub trait DistanceBackend: Send + Sync {
    /// A human-readable name, used in logs.
    fn name(&self) -> &'static str;

    /// For each batch element, the `N x M` squared-euclidean distances between
    /// the points of `a` (`B x N x 3`) and `b` (`B x M x 3`).
    ///
    /// # Errors
    ///
    /// - If the batch sizes differ.
    /// - If the points are not 3-dimensional.
    fn sq_distances(&self, a: ArrayView3<f32>, b: ArrayView3<f32>) -> Result<Array3<f32>, DistanceError>;

    /// The per-point nearest-neighbor squared distances in both directions,
    /// `(B x N, B x M)`.
    ///
    /// # Errors
    ///
    /// See [`DistanceBackend::sq_distances`].
    fn chamfer(&self, a: ArrayView3<f32>, b: ArrayView3<f32>) -> Result<(Array2<f32>, Array2<f32>), DistanceError> {
        let sq = self.sq_distances(a, b)?;
        Ok(crate::chamfer::reduce(sq.view()))
    }

    /// The mean matched euclidean distance of the optimal assignment between
    /// the points of `a` and `b`, for each batch element.
    ///
    /// # Errors
    ///
    /// - If the batch sizes differ.
    /// - If the points are not 3-dimensional.
    /// - If the clouds in `a` and `b` have different point counts.
    /// - If any coordinate is not finite.
    fn emd(&self, a: ArrayView3<f32>, b: ArrayView3<f32>) -> Result<Array1<f32>, DistanceError>;
}

/// Which backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// The parallel backend when it can be used, the reference backend
    /// otherwise.
    #[default]
    Auto,
    /// Always the single-threaded reference backend.
    Reference,
    /// The parallel backend when it can be used.
    Parallel,
}

impl BackendKind {
    /// Parses the name used on the command line.
    ///
    /// # Errors
    ///
    /// - If the name is not one of `auto`, `reference` or `parallel`.
    pub fn from_name(name: &str) -> Result<Self, DistanceError> {
        match name.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "reference" | "cpu" => Ok(Self::Reference),
            "parallel" => Ok(Self::Parallel),
            _ => Err(DistanceError::usage(format!("unknown backend: {name}"))),
        }
    }
}

/// Probes whether the parallel backend can do useful work here.
fn parallel_available() -> bool {
    let cores = std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);
    cores > 1 && rayon::current_num_threads() > 1
}

/// Selects a backend by availability.
///
/// Falling back to the reference backend is not an error; it is logged and
/// the results are unchanged beyond floating-point tolerance.
#[must_use]
pub fn select_backend(kind: BackendKind) -> Box<dyn DistanceBackend> {
    let backend: Box<dyn DistanceBackend> = match kind {
        BackendKind::Reference => Box::new(ReferenceBackend),
        BackendKind::Auto | BackendKind::Parallel => {
            if parallel_available() {
                Box::new(ParallelBackend)
            } else {
                ftlog::warn!("Parallel distance backend not available; falling back to the reference backend.");
                Box::new(ReferenceBackend)
            }
        }
    };
    ftlog::info!("Using the {} distance backend.", backend.name());
    backend
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_names() {
        assert_eq!(BackendKind::from_name("Auto").unwrap(), BackendKind::Auto);
        assert_eq!(BackendKind::from_name("reference").unwrap(), BackendKind::Reference);
        assert_eq!(BackendKind::from_name("parallel").unwrap(), BackendKind::Parallel);
        assert!(BackendKind::from_name("cuda").is_err());
    }

    #[test]
    fn reference_is_always_selectable() {
        assert_eq!(select_backend(BackendKind::Reference).name(), "reference");
    }
}
