//! Chamfer distance between point clouds.
//!
//! For clouds `A` and `B`, the per-point reductions are the squared distance
//! from every point of `A` to its nearest neighbor in `B`, and vice versa. The
//! Chamfer score of a pair is `mean(d_a_to_b) + mean(d_b_to_a)`.

use ndarray::{Array1, Array2, ArrayView2, ArrayView3, Axis};

use crate::{DistanceBackend, DistanceError, PointCloud, ReferenceBackend};

/// Reduces a `B x N x M` squared-distance tensor to the per-point minima in
/// both directions: `(B x N, B x M)`.
#[must_use]
pub fn reduce(sq: ArrayView3<f32>) -> (Array2<f32>, Array2<f32>) {
    let min = |&acc: &f32, &x: &f32| acc.min(x);
    let a_to_b = sq.fold_axis(Axis(2), f32::INFINITY, min);
    let b_to_a = sq.fold_axis(Axis(1), f32::INFINITY, min);
    (a_to_b, b_to_a)
}

/// The Chamfer score of every batch element given its per-point minima.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn scores(a_to_b: ArrayView2<f32>, b_to_a: ArrayView2<f32>) -> Array1<f32> {
    let left = a_to_b.sum_axis(Axis(1)) / a_to_b.ncols() as f32;
    let right = b_to_a.sum_axis(Axis(1)) / b_to_a.ncols() as f32;
    left + right
}

/// The per-point nearest-neighbor squared distances between two clouds.
///
/// Returns `(d_a_to_b, d_b_to_a)` of lengths `a.len()` and `b.len()`.
///
/// # Errors
///
/// See [`DistanceBackend::chamfer`].
pub fn chamfer(a: &PointCloud, b: &PointCloud) -> Result<(Array1<f32>, Array1<f32>), DistanceError> {
    let (a_to_b, b_to_a) = ReferenceBackend.chamfer(single(a), single(b))?;
    Ok((a_to_b.index_axis_move(Axis(0), 0), b_to_a.index_axis_move(Axis(0), 0)))
}

/// The symmetric Chamfer score between two clouds.
///
/// # Errors
///
/// See [`DistanceBackend::chamfer`].
pub fn chamfer_score(a: &PointCloud, b: &PointCloud) -> Result<f32, DistanceError> {
    let (a_to_b, b_to_a) = ReferenceBackend.chamfer(single(a), single(b))?;
    Ok(scores(a_to_b.view(), b_to_a.view())[0])
}

/// A batch of one.
pub(crate) fn single(cloud: &PointCloud) -> ArrayView3<'_, f32> {
    cloud.view().insert_axis(Axis(0))
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn reduce_takes_minima_in_both_directions() {
        // one batch element, 2 points in `a`, 3 points in `b`
        let sq = array![[[4., 1., 9.], [0.5, 2., 3.]]];
        let (a_to_b, b_to_a) = reduce(sq.view());
        assert_eq!(a_to_b, array![[1., 0.5]]);
        assert_eq!(b_to_a, array![[0.5, 1., 3.]]);

        let s = scores(a_to_b.view(), b_to_a.view());
        assert!(float_cmp::approx_eq!(f32, s[0], 0.75 + 1.5, ulps = 2));
    }

    #[test]
    fn unequal_point_counts() {
        let a = PointCloud::from_points(&[[0., 0., 0.]]).unwrap();
        let b = PointCloud::from_points(&[[0., 0., 1.], [0., 0., 2.]]).unwrap();
        let (a_to_b, b_to_a) = chamfer(&a, &b).unwrap();
        assert_eq!(a_to_b, array![1.]);
        assert_eq!(b_to_a, array![1., 4.]);
        assert!(float_cmp::approx_eq!(f32, chamfer_score(&a, &b).unwrap(), 3.5, ulps = 2));
    }
}
