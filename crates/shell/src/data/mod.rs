//! Reading point clouds from, and writing distance matrices to, npy files.

mod npy;

use std::path::Path;

use gen_metrics::{sampling::subsample_batch, DistanceMatrix, PointCloud, RandomSource};

/// Reads an `n x P x 3` npy array and subsamples every cloud to `n_points`.
pub fn read_clouds<P: AsRef<Path>>(
    path: P,
    n_points: usize,
    source: &mut RandomSource,
) -> Result<Vec<PointCloud>, String> {
    let path = path.as_ref();
    let batch = npy::NpyType::read(path)?;
    let (n, p, d) = batch.dim();
    ftlog::info!("Read {n} clouds of {p} points in {d} dimensions from {}.", path.display());

    let clouds = subsample_batch(batch.view(), n_points, source)?;
    ftlog::info!("Subsampled {n} clouds to {n_points} points (seed: {:?}).", source.seed());
    Ok(clouds)
}

/// Writes a distance matrix as an `f32` npy array.
pub fn write_matrix<P: AsRef<Path>>(path: P, matrix: &DistanceMatrix) -> Result<(), String> {
    let path = path.as_ref();
    ndarray_npy::write_npy(path, &matrix.view()).map_err(|e| e.to_string())?;
    ftlog::info!("Wrote {} x {} matrix to {}.", matrix.nrows(), matrix.ncols(), path.display());
    Ok(())
}
