//! Point clouds and batches of point clouds.

use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis};

use crate::DistanceError;

/// The dimensionality of every point.
pub const DIM: usize = 3;

/// An ordered set of `P` points in 3D, stored as a dense `P x 3` array.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud(Array2<f32>);

impl PointCloud {
    /// Wraps a `P x 3` array.
    ///
    /// # Errors
    ///
    /// - If the array does not have exactly 3 columns.
    /// - If the array has no rows.
    /// - If any coordinate is NaN or infinite.
    pub fn new(points: Array2<f32>) -> Result<Self, DistanceError> {
        if points.ncols() != DIM {
            return Err(DistanceError::usage(format!(
                "points must be {DIM}-dimensional, got {} columns",
                points.ncols()
            )));
        }
        if points.nrows() == 0 {
            return Err(DistanceError::usage("a point cloud needs at least one point"));
        }
        check_finite(points.iter(), "the cloud")?;
        Ok(Self(points))
    }

    /// Builds a cloud from a slice of points.
    ///
    /// # Errors
    ///
    /// - If `points` is empty.
    /// - If any coordinate is NaN or infinite.
    pub fn from_points(points: &[[f32; DIM]]) -> Result<Self, DistanceError> {
        let flat = points.iter().flatten().copied().collect::<Vec<_>>();
        let array = Array2::from_shape_vec((points.len(), DIM), flat)
            .map_err(|e| DistanceError::usage(e.to_string()))?;
        Self::new(array)
    }

    /// The number of points in the cloud.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.nrows()
    }

    /// Always false; an empty cloud cannot be constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.nrows() == 0
    }

    /// A view of the `P x 3` points.
    #[must_use]
    pub fn view(&self) -> ArrayView2<'_, f32> {
        self.0.view()
    }

    /// Consumes the cloud and returns its points.
    #[must_use]
    pub fn into_inner(self) -> Array2<f32> {
        self.0
    }

    /// Returns the same shape translated by `offset`.
    #[must_use]
    pub fn translated(&self, offset: [f32; DIM]) -> Self {
        let mut points = self.0.clone();
        for mut row in points.axis_iter_mut(Axis(0)) {
            for (x, o) in row.iter_mut().zip(offset) {
                *x += o;
            }
        }
        Self(points)
    }

    /// An `n x P x 3` batch view of this cloud repeated `n` times without
    /// copying.
    #[must_use]
    pub fn broadcast(&self, n: usize) -> Option<ArrayView3<'_, f32>> {
        self.0.broadcast((n, self.len(), DIM))
    }
}

impl AsRef<Array2<f32>> for PointCloud {
    fn as_ref(&self) -> &Array2<f32> {
        &self.0
    }
}

/// Stacks clouds that share a point count into a `B x P x 3` batch.
///
/// # Errors
///
/// - If `clouds` is empty.
/// - If the clouds do not all have the same number of points.
pub fn stack(clouds: &[PointCloud]) -> Result<Array3<f32>, DistanceError> {
    let views = clouds.iter().map(PointCloud::view).collect::<Vec<_>>();
    if views.is_empty() {
        return Err(DistanceError::usage("cannot stack an empty set of clouds"));
    }
    ndarray::stack(Axis(0), &views).map_err(|e| {
        DistanceError::usage(format!("clouds in a batch must share a point count: {e}"))
    })
}

/// Checks that every coordinate is finite.
fn check_finite<'a, I: IntoIterator<Item = &'a f32>>(coordinates: I, name: &str) -> Result<(), DistanceError> {
    match coordinates.into_iter().find(|x| !x.is_finite()) {
        Some(x) => Err(DistanceError::usage(format!("coordinates in {name} must be finite, found {x}"))),
        None => Ok(()),
    }
}

/// Checks that a batch has the `B x P x 3` layout and finite coordinates.
pub(crate) fn check_batch(batch: &ArrayView3<f32>, name: &str) -> Result<(), DistanceError> {
    let (_, p, d) = batch.dim();
    if d != DIM {
        return Err(DistanceError::usage(format!(
            "points in `{name}` must be {DIM}-dimensional, got {d}"
        )));
    }
    if p == 0 {
        return Err(DistanceError::usage(format!("clouds in `{name}` have no points")));
    }
    check_finite(batch.iter(), &format!("`{name}`"))
}

/// Checks that two batches hold the same number of clouds.
pub(crate) fn check_pair(a: &ArrayView3<f32>, b: &ArrayView3<f32>) -> Result<(), DistanceError> {
    check_batch(a, "a")?;
    check_batch(b, "b")?;
    if a.len_of(Axis(0)) != b.len_of(Axis(0)) {
        return Err(DistanceError::usage(format!(
            "batch sizes differ: {} vs {}",
            a.len_of(Axis(0)),
            b.len_of(Axis(0))
        )));
    }
    Ok(())
}
