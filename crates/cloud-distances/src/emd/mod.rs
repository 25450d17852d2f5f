//! Earth Mover's Distance between equal-sized point clouds.
//!
//! The EMD of two clouds of `P` points is the mean euclidean distance between
//! matched points under the optimal one-to-one matching. The matching is
//! solved exactly, independently for every batch element.

mod assignment;

use ndarray::{Array2, ArrayView2, ArrayView3, Axis};

pub use assignment::{assignment_cost, min_cost_assignment};

use crate::{chamfer::single, cloud, DistanceBackend, DistanceError, PointCloud, ReferenceBackend};

/// The `P x Q` euclidean distances between the points of two clouds.
///
/// Uses coordinate differences rather than the norm expansion so that the
/// distance from a point to itself is exactly zero.
#[must_use]
pub fn cost_matrix(x: ArrayView2<f32>, y: ArrayView2<f32>) -> Array2<f64> {
    Array2::from_shape_fn((x.nrows(), y.nrows()), |(i, j)| {
        x.row(i)
            .iter()
            .zip(y.row(j).iter())
            .map(|(&a, &b)| (f64::from(a) - f64::from(b)).powi(2))
            .sum::<f64>()
            .sqrt()
    })
}

/// The EMD between two `P x 3` clouds.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub(crate) fn emd_single(x: ArrayView2<f32>, y: ArrayView2<f32>) -> Result<f32, DistanceError> {
    let cost = cost_matrix(x, y);
    let col_of = min_cost_assignment(cost.view())?;
    Ok((assignment_cost(cost.view(), &col_of) / col_of.len() as f64) as f32)
}

/// Checks the operands of a batched EMD.
pub(crate) fn check_equal_sizes(a: &ArrayView3<f32>, b: &ArrayView3<f32>) -> Result<(), DistanceError> {
    cloud::check_pair(a, b)?;
    let (p, q) = (a.len_of(Axis(1)), b.len_of(Axis(1)));
    if p == q {
        Ok(())
    } else {
        Err(DistanceError::usage(format!(
            "EMD needs clouds of equal size, got {p} and {q} points"
        )))
    }
}

/// The EMD between two clouds with the same number of points.
///
/// # Errors
///
/// See [`DistanceBackend::emd`].
pub fn emd(a: &PointCloud, b: &PointCloud) -> Result<f32, DistanceError> {
    ReferenceBackend.emd(single(a), single(b)).map(|d| d[0])
}
