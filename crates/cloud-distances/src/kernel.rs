//! Squared-euclidean distance matrices between batches of point clouds.
//!
//! Every entry is computed as `‖x‖² + ‖y‖² − 2·x·y` and clamped to be
//! non-negative, so that cancellation error never produces a negative squared
//! distance. The norm and the cross term share the same three-term expression,
//! which makes `d(x, x)` exactly zero.

use ndarray::{Array1, Array2, Array3, ArrayView1, ArrayView2, ArrayView3, ArrayViewMut1, ArrayViewMut2, Axis};

use crate::{cloud, DistanceError};

/// The inner product of two 3D points.
#[inline]
pub(crate) fn dot(x: &ArrayView1<f32>, y: &ArrayView1<f32>) -> f32 {
    x[0] * y[0] + x[1] * y[1] + x[2] * y[2]
}

/// The squared norm of every point in a `P x 3` array.
#[must_use]
pub fn sq_norms(points: ArrayView2<f32>) -> Array1<f32> {
    points.rows().into_iter().map(|p| dot(&p, &p)).collect()
}

/// Fills one row of a distance matrix: the squared distances from `x` to every
/// point of `y`.
#[inline]
#[allow(clippy::suboptimal_flops)]
pub(crate) fn fill_row(
    x: &ArrayView1<f32>,
    xx: f32,
    y: &ArrayView2<f32>,
    yy: &Array1<f32>,
    mut out: ArrayViewMut1<f32>,
) {
    for ((o, yj), &yyj) in out.iter_mut().zip(y.rows()).zip(yy) {
        *o = (xx + yyj - 2. * dot(x, &yj)).max(0.);
    }
}

/// Fills a `N x M` matrix with the squared distances between the points of
/// `x` and `y`.
pub(crate) fn fill(x: ArrayView2<f32>, y: ArrayView2<f32>, mut out: ArrayViewMut2<f32>) {
    let (xx, yy) = (sq_norms(x), sq_norms(y));
    for ((xi, &xxi), o) in x.rows().into_iter().zip(&xx).zip(out.rows_mut()) {
        fill_row(&xi, xxi, &y, &yy, o);
    }
}

/// The `N x M` squared distances between the points of two clouds.
#[must_use]
pub fn sq_distances_single(x: ArrayView2<f32>, y: ArrayView2<f32>) -> Array2<f32> {
    let mut out = Array2::zeros((x.nrows(), y.nrows()));
    fill(x, y, out.view_mut());
    out
}

/// For each batch element, the `N x M` squared distances between every point
/// of `a` (`B x N x 3`) and every point of `b` (`B x M x 3`).
///
/// # Errors
///
/// - If the batch sizes differ.
/// - If the points are not 3-dimensional.
pub fn sq_distances(a: ArrayView3<f32>, b: ArrayView3<f32>) -> Result<Array3<f32>, DistanceError> {
    cloud::check_pair(&a, &b)?;
    let (bs, n, _) = a.dim();
    let m = b.len_of(Axis(1));

    let mut out = Array3::zeros((bs, n, m));
    for ((x, y), o) in a.outer_iter().zip(b.outer_iter()).zip(out.outer_iter_mut()) {
        fill(x, y, o);
    }
    Ok(out)
}
