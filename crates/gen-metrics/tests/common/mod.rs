//! Collections of clouds for testing.

#![allow(dead_code)]

use gen_metrics::PointCloud;
use ndarray::Array2;
use rand::prelude::*;

/// The 8 corners of the unit cube.
pub fn cube_corners() -> PointCloud {
    let points = (0..8)
        .map(|i| [(i & 1) as f32, ((i >> 1) & 1) as f32, ((i >> 2) & 1) as f32])
        .collect::<Vec<_>>();
    PointCloud::from_points(&points).unwrap()
}

/// Four distinct faces of the unit cube, each given by its 4 corners.
pub fn cube_faces() -> Vec<PointCloud> {
    let corners = cube_corners();
    let face = |axis: usize, value: f32| {
        let rows = corners
            .view()
            .rows()
            .into_iter()
            .filter(|p| p[axis] == value)
            .map(|p| [p[0], p[1], p[2]])
            .collect::<Vec<_>>();
        PointCloud::from_points(&rows).unwrap()
    };
    vec![face(2, 0.), face(2, 1.), face(0, 0.), face(0, 1.)]
}

/// A cloud of `n` points drawn uniformly from `[-1, 1]^3`.
pub fn random_cloud<R: Rng>(n: usize, rng: &mut R) -> PointCloud {
    PointCloud::new(Array2::from_shape_fn((n, 3), |_| rng.gen_range(-1.0..1.0))).unwrap()
}

/// `count` random clouds of `n` points each.
pub fn random_clouds<R: Rng>(count: usize, n: usize, rng: &mut R) -> Vec<PointCloud> {
    (0..count).map(|_| random_cloud(n, rng)).collect()
}

/// The same cloud with its points in a random order.
pub fn shuffled<R: Rng>(cloud: &PointCloud, rng: &mut R) -> PointCloud {
    let mut order = (0..cloud.len()).collect::<Vec<_>>();
    order.shuffle(rng);
    PointCloud::new(cloud.view().select(ndarray::Axis(0), &order)).unwrap()
}
