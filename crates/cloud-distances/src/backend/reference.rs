//! The single-threaded reference backend.

use ndarray::{Array1, Array3, ArrayView3};

use crate::{emd, kernel, DistanceError};

use super::DistanceBackend;

/// Computes everything on the calling thread. Always available.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceBackend;

impl DistanceBackend for ReferenceBackend {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn sq_distances(&self, a: ArrayView3<f32>, b: ArrayView3<f32>) -> Result<Array3<f32>, DistanceError> {
        kernel::sq_distances(a, b)
    }

    fn emd(&self, a: ArrayView3<f32>, b: ArrayView3<f32>) -> Result<Array1<f32>, DistanceError> {
        emd::check_equal_sizes(&a, &b)?;
        a.outer_iter()
            .zip(b.outer_iter())
            .map(|(x, y)| emd::emd_single(x, y))
            .collect()
    }
}
