//! Tests for the Earth Mover's Distance.

mod common;

use cloud_distances::{emd, stack, DistanceBackend, ParallelBackend, PointCloud, ReferenceBackend};
use rand::prelude::*;
use test_case::test_case;

#[test_case(1)]
#[test_case(5)]
#[test_case(64)]
fn self_distance_is_zero(n: usize) {
    let mut rng = StdRng::seed_from_u64(42);
    let a = common::random_cloud(n, &mut rng);
    assert_eq!(emd(&a, &a).unwrap(), 0.);

    // a permutation of the points is matched back to the identity
    let b = common::shuffled(&a, &mut rng);
    assert_eq!(emd(&a, &b).unwrap(), 0.);
}

#[test]
fn non_negative_and_symmetric() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..10 {
        let a = common::random_cloud(24, &mut rng);
        let b = common::random_cloud(24, &mut rng);
        let ab = emd(&a, &b).unwrap();
        let ba = emd(&b, &a).unwrap();
        assert!(ab > 0.);
        assert!(float_cmp::approx_eq!(f32, ab, ba, epsilon = 1e-5));
    }
}

#[test]
fn translation_is_matched_by_identity() {
    // for a pure translation, the identity matching is optimal and every
    // matched pair is exactly the translation length apart
    let cube = common::cube_corners();
    let moved = cube.translated([1., 1., 1.]);
    let d = emd(&cube, &moved).unwrap();
    assert!(float_cmp::approx_eq!(f32, d, 3_f32.sqrt(), epsilon = 1e-6));

    let mut rng = StdRng::seed_from_u64(3);
    let a = common::random_cloud(50, &mut rng);
    let b = a.translated([0.5, -0.25, 0.]);
    let d = emd(&a, &b).unwrap();
    assert!(float_cmp::approx_eq!(f32, d, 0.3125_f32.sqrt(), epsilon = 1e-5));
}

#[test]
fn emd_is_at_least_mean_nearest_distance() {
    let mut rng = StdRng::seed_from_u64(11);
    let a = common::random_cloud(30, &mut rng);
    let b = common::random_cloud(30, &mut rng);
    let (a_to_b, _) = cloud_distances::chamfer(&a, &b).unwrap();
    let nearest = a_to_b.mapv(f32::sqrt).mean().unwrap();
    assert!(emd(&a, &b).unwrap() + 1e-6 >= nearest);
}

#[test]
fn batch_elements_are_independent() {
    let mut rng = StdRng::seed_from_u64(5);
    let a = (0..4).map(|_| common::random_cloud(16, &mut rng)).collect::<Vec<_>>();
    let b = (0..4).map(|_| common::random_cloud(16, &mut rng)).collect::<Vec<_>>();

    let batched = ReferenceBackend.emd(stack(&a).unwrap().view(), stack(&b).unwrap().view()).unwrap();
    let parallel = ParallelBackend.emd(stack(&a).unwrap().view(), stack(&b).unwrap().view()).unwrap();
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let single = emd(x, y).unwrap();
        assert_eq!(batched[i], single);
        assert_eq!(parallel[i], single);
    }
}

#[test]
fn unequal_point_counts_fail_fast() {
    let a = PointCloud::from_points(&[[0., 0., 0.], [1., 0., 0.]]).unwrap();
    let b = PointCloud::from_points(&[[0., 0., 0.]]).unwrap();
    let err = emd(&a, &b).unwrap_err();
    assert!(err.is_usage());
    assert!(err.to_string().contains("equal size"));
}

#[test]
fn non_finite_points_are_rejected() {
    assert!(PointCloud::from_points(&[[0., 0., 0.], [f32::NAN, 0., 0.]]).is_err());

    let mut a = ndarray::Array3::<f32>::zeros((1, 2, 3));
    a[[0, 1, 0]] = f32::NAN;
    let b = ndarray::Array3::<f32>::ones((1, 2, 3));
    assert!(ReferenceBackend.emd(a.view(), b.view()).unwrap_err().is_usage());
    assert!(ParallelBackend.emd(a.view(), b.view()).unwrap_err().is_usage());
}
