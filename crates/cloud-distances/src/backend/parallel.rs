//! A backend that uses the rayon thread pool.

use ndarray::{parallel::prelude::*, Array1, Array3, ArrayView2, ArrayView3, ArrayViewMut2, Axis, Zip};

use crate::{cloud, emd, kernel, DistanceError};

use super::DistanceBackend;

/// Spreads batch elements, and the rows within each element, over the rayon
/// thread pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelBackend;

/// Parallel counterpart of `kernel::fill`, computing rows concurrently.
fn par_fill(x: ArrayView2<f32>, y: ArrayView2<f32>, mut out: ArrayViewMut2<f32>) {
    let (xx, yy) = (kernel::sq_norms(x), kernel::sq_norms(y));
    Zip::from(out.rows_mut())
        .and(x.rows())
        .and(&xx)
        .par_for_each(|o, xi, &xxi| kernel::fill_row(&xi, xxi, &y, &yy, o));
}

impl DistanceBackend for ParallelBackend {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn sq_distances(&self, a: ArrayView3<f32>, b: ArrayView3<f32>) -> Result<Array3<f32>, DistanceError> {
        cloud::check_pair(&a, &b)?;
        let (bs, n, _) = a.dim();
        let m = b.len_of(Axis(1));

        let mut out = Array3::zeros((bs, n, m));
        out.axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(i, o)| par_fill(a.index_axis(Axis(0), i), b.index_axis(Axis(0), i), o));
        Ok(out)
    }

    fn emd(&self, a: ArrayView3<f32>, b: ArrayView3<f32>) -> Result<Array1<f32>, DistanceError> {
        emd::check_equal_sizes(&a, &b)?;
        let values = (0..a.len_of(Axis(0)))
            .into_par_iter()
            .map(|i| emd::emd_single(a.index_axis(Axis(0), i), b.index_axis(Axis(0), i)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Array1::from(values))
    }
}
