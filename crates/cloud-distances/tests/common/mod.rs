//! Shapes for testing.

#![allow(dead_code)]

use cloud_distances::PointCloud;
use ndarray::Array2;
use rand::prelude::*;

/// The 8 corners of the unit cube.
pub fn cube_corners() -> PointCloud {
    let points = (0..8)
        .map(|i| [(i & 1) as f32, ((i >> 1) & 1) as f32, ((i >> 2) & 1) as f32])
        .collect::<Vec<_>>();
    PointCloud::from_points(&points).unwrap()
}

/// A cloud of `n` points drawn uniformly from `[-1, 1]^3`.
pub fn random_cloud<R: Rng>(n: usize, rng: &mut R) -> PointCloud {
    PointCloud::new(Array2::from_shape_fn((n, 3), |_| rng.gen_range(-1.0..1.0))).unwrap()
}

/// The same cloud with its points in a random order.
pub fn shuffled<R: Rng>(cloud: &PointCloud, rng: &mut R) -> PointCloud {
    let mut order = (0..cloud.len()).collect::<Vec<_>>();
    order.shuffle(rng);
    PointCloud::new(cloud.view().select(ndarray::Axis(0), &order)).unwrap()
}
