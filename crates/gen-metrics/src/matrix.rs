//! A dense matrix of distances between two collections of point clouds.

use ndarray::{Array2, ArrayView2, Axis};

use crate::{utils, DistanceError};

/// An `N x M` matrix of non-negative distances, where entry `(i, j)` is the
/// distance between cloud `i` of the first collection and cloud `j` of the
/// second.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix(Array2<f32>);

impl DistanceMatrix {
    /// Wraps an array of distances.
    #[must_use]
    pub const fn new(distances: Array2<f32>) -> Self {
        Self(distances)
    }

    /// The number of rows, i.e. the size of the first collection.
    #[must_use]
    pub fn nrows(&self) -> usize {
        self.0.nrows()
    }

    /// The number of columns, i.e. the size of the second collection.
    #[must_use]
    pub fn ncols(&self) -> usize {
        self.0.ncols()
    }

    /// Whether the matrix has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The entry at `(i, j)`, if in bounds.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        self.0.get((i, j)).copied()
    }

    /// A view of the distances.
    #[must_use]
    pub fn view(&self) -> ArrayView2<'_, f32> {
        self.0.view()
    }

    /// Consumes the matrix and returns its distances.
    #[must_use]
    pub fn into_inner(self) -> Array2<f32> {
        self.0
    }

    /// The same distances with the roles of the two collections swapped.
    #[must_use]
    pub fn transpose(&self) -> Self {
        Self(self.0.t().to_owned())
    }

    /// For each row, the index and value of its smallest entry. Ties resolve
    /// to the lowest column index.
    #[must_use]
    pub fn row_minima(&self) -> Vec<(usize, f32)> {
        self.0
            .axis_iter(Axis(0))
            .filter_map(|row| utils::arg_min(row.iter().copied()))
            .collect()
    }

    /// For each column, the value of its smallest entry.
    #[must_use]
    pub fn col_minima(&self) -> Vec<f32> {
        self.0
            .axis_iter(Axis(1))
            .filter_map(|col| utils::arg_min(col.iter().copied()).map(|(_, v)| v))
            .collect()
    }

    /// The largest disagreement between `(i, j)` and `(j, i)`, measured as in
    /// [`utils::approx_eq_rel`]. `None` for non-square matrices.
    #[must_use]
    pub fn max_asymmetry(&self) -> Option<f32> {
        if self.nrows() != self.ncols() {
            return None;
        }
        let n = self.nrows();
        let worst = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .map(|(i, j)| {
                let (a, b) = (self.0[[i, j]], self.0[[j, i]]);
                (a - b).abs() / (1. + a.abs().max(b.abs()))
            })
            .fold(0_f32, f32::max);
        Some(worst)
    }

    /// Checks that the matrix is square and symmetric within `rel_tol`.
    ///
    /// # Errors
    ///
    /// - If the matrix is not square.
    /// - If any pair of mirrored entries disagrees by more than `rel_tol`.
    pub fn check_symmetric(&self, rel_tol: f32) -> Result<(), DistanceError> {
        match self.max_asymmetry() {
            None => Err(DistanceError::usage(format!(
                "expected a square matrix, got {} x {}",
                self.nrows(),
                self.ncols()
            ))),
            Some(worst) if worst > rel_tol => Err(DistanceError::usage(format!(
                "distance matrix is not symmetric: relative disagreement {worst:.3e} exceeds {rel_tol:.1e}"
            ))),
            Some(_) => Ok(()),
        }
    }
}

impl From<Array2<f32>> for DistanceMatrix {
    fn from(distances: Array2<f32>) -> Self {
        Self(distances)
    }
}
