//! Seeded subsampling of point clouds.

use ndarray::{ArrayView2, ArrayView3, Axis};
use rand::prelude::*;

use crate::{DistanceError, PointCloud};

/// An explicit source of randomness, seeded or not.
///
/// There is no process-wide generator; every random choice draws from a
/// `RandomSource` handed in by the caller.
#[derive(Debug, Clone)]
pub struct RandomSource {
    /// The generator.
    rng: StdRng,
    /// The seed, if the source is reproducible.
    seed: Option<u64>,
}

impl RandomSource {
    /// A reproducible source.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// A source seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// A reproducible source for a non-negative seed and an unseeded one
    /// otherwise.
    #[must_use]
    pub fn from_seed_i64(seed: i64) -> Self {
        u64::try_from(seed).map_or_else(|_| Self::from_entropy(), Self::seeded)
    }

    /// The seed, if any.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// The underlying generator.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

/// A random subset of `n_points` of the given `P x 3` points, in random order.
///
/// # Errors
///
/// - If there are fewer than `n_points` points.
/// - If the points are not 3-dimensional or `n_points` is zero.
pub fn subsample(
    points: ArrayView2<f32>,
    n_points: usize,
    source: &mut RandomSource,
) -> Result<PointCloud, DistanceError> {
    if points.nrows() < n_points {
        return Err(DistanceError::usage(format!(
            "not enough points: asked for {n_points}, got {}",
            points.nrows()
        )));
    }
    let indices = rand::seq::index::sample(source.rng(), points.nrows(), n_points).into_vec();
    PointCloud::new(points.select(Axis(0), &indices))
}

/// Subsamples every cloud of an `n x P x 3` batch.
///
/// # Errors
///
/// See [`subsample`].
pub fn subsample_batch(
    batch: ArrayView3<f32>,
    n_points: usize,
    source: &mut RandomSource,
) -> Result<Vec<PointCloud>, DistanceError> {
    batch
        .axis_iter(Axis(0))
        .map(|points| subsample(points, n_points, source))
        .collect()
}
