//! Tests for building distance matrices in batches.

mod common;

use cloud_distances::{chamfer_score, emd, ParallelBackend, ReferenceBackend};
use gen_metrics::{pairwise_matrix, utils::approx_eq_rel, DistanceBackend, PairwiseMatrixBuilder};
use rand::prelude::*;
use test_case::test_case;

#[test_case(1)]
#[test_case(3)]
#[test_case(7)]
#[test_case(64)]
fn independent_of_batch_size(batch_size: usize) {
    let mut rng = StdRng::seed_from_u64(42);
    let first = common::random_clouds(9, 20, &mut rng);
    let second = common::random_clouds(7, 20, &mut rng);

    let expected = PairwiseMatrixBuilder::new(&ReferenceBackend, second.len())
        .unwrap()
        .with_emd(true)
        .build(&first, &second)
        .unwrap();
    let actual = PairwiseMatrixBuilder::new(&ReferenceBackend, batch_size)
        .unwrap()
        .with_emd(true)
        .build(&first, &second)
        .unwrap();

    for (e, a) in [
        (expected.chamfer.view(), actual.chamfer.view()),
        (expected.emd.as_ref().unwrap().view(), actual.emd.as_ref().unwrap().view()),
    ] {
        assert_eq!(e.dim(), (9, 7));
        for (&x, &y) in e.iter().zip(a.iter()) {
            assert!(approx_eq_rel(x, y, 1e-5), "{x} vs {y}");
        }
    }
}

#[test]
fn entries_match_single_pair_distances() {
    let mut rng = StdRng::seed_from_u64(7);
    let first = common::random_clouds(3, 12, &mut rng);
    let second = common::random_clouds(4, 12, &mut rng);

    let matrices = pairwise_matrix(&first, &second, 2, true).unwrap();
    let emd_matrix = matrices.emd.unwrap();
    for (i, a) in first.iter().enumerate() {
        for (j, b) in second.iter().enumerate() {
            let cd = matrices.chamfer.get(i, j).unwrap();
            assert!(approx_eq_rel(cd, chamfer_score(a, b).unwrap(), 1e-5));
            assert!(approx_eq_rel(emd_matrix.get(i, j).unwrap(), emd(a, b).unwrap(), 1e-5));
        }
    }
}

#[test]
fn backends_agree() {
    let mut rng = StdRng::seed_from_u64(3);
    let clouds = common::random_clouds(10, 16, &mut rng);

    let backends: [&dyn DistanceBackend; 2] = [&ReferenceBackend, &ParallelBackend];
    let [reference, parallel] = backends.map(|backend| {
        PairwiseMatrixBuilder::new(backend, 4)
            .unwrap()
            .with_emd(true)
            .build_within(&clouds)
            .unwrap()
    });

    assert_eq!(reference.chamfer, parallel.chamfer);
    let (e, a) = (reference.emd.unwrap(), parallel.emd.unwrap());
    for (&x, &y) in e.view().iter().zip(a.view().iter()) {
        assert!(approx_eq_rel(x, y, 1e-5));
    }
}

#[test]
fn within_set_matrices_are_symmetric_with_zero_diagonal() {
    let mut rng = StdRng::seed_from_u64(5);
    let clouds = common::random_clouds(6, 10, &mut rng);
    let matrices = PairwiseMatrixBuilder::new(&ReferenceBackend, 4)
        .unwrap()
        .with_emd(true)
        .build_within(&clouds)
        .unwrap();

    for m in [&matrices.chamfer, matrices.emd.as_ref().unwrap()] {
        assert!(m.check_symmetric(1e-5).is_ok());
        for i in 0..clouds.len() {
            assert_eq!(m.get(i, i), Some(0.));
        }
    }
}

#[test]
fn chamfer_allows_unequal_point_counts_but_emd_does_not() {
    let mut rng = StdRng::seed_from_u64(9);
    let first = common::random_clouds(2, 10, &mut rng);
    let second = common::random_clouds(3, 14, &mut rng);

    let builder = PairwiseMatrixBuilder::new(&ReferenceBackend, 2).unwrap();
    assert_eq!(builder.build(&first, &second).unwrap().chamfer.view().dim(), (2, 3));

    let err = builder.with_emd(true).build(&first, &second).unwrap_err();
    assert!(err.is_usage());
}

#[test]
fn mixed_point_counts_in_a_collection_fail() {
    let mut rng = StdRng::seed_from_u64(9);
    let first = common::random_clouds(2, 10, &mut rng);
    let mut second = common::random_clouds(2, 10, &mut rng);
    second.push(common::random_cloud(11, &mut rng));

    let builder = PairwiseMatrixBuilder::new(&ReferenceBackend, 8).unwrap();
    assert!(builder.build(&first, &second).unwrap_err().is_usage());
}

#[test]
fn memory_budget_is_checked_per_chunk() {
    let mut rng = StdRng::seed_from_u64(1);
    let clouds = common::random_clouds(4, 32, &mut rng);

    // a chunk of 4 clouds needs 4 * 32 * 32 * 4 = 16384 bytes, one of 2 needs half
    let tight = Some(10_000);
    let err = PairwiseMatrixBuilder::new(&ReferenceBackend, 4)
        .unwrap()
        .with_memory_limit(tight)
        .build_within(&clouds)
        .unwrap_err();
    assert!(err.is_resource());

    let smaller = PairwiseMatrixBuilder::new(&ReferenceBackend, 2)
        .unwrap()
        .with_memory_limit(tight)
        .build_within(&clouds);
    assert!(smaller.is_ok());
}

#[test]
fn zero_batch_size_is_a_usage_error() {
    let clouds = common::cube_faces();
    assert!(pairwise_matrix(&clouds, &clouds, 0, false).unwrap_err().is_usage());
}
