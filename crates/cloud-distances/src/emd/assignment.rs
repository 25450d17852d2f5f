//! Minimum-cost perfect matching on a square cost matrix.
//!
//! This is the shortest-augmenting-path form of the Hungarian algorithm (the
//! same family as Jonker-Volgenant). Rows are inserted one at a time; each
//! insertion runs a Dijkstra-like search over reduced costs, maintained by the
//! dual potentials `u` (rows) and `v` (columns). Runs in `O(n³)`.

use ndarray::ArrayView2;

use crate::DistanceError;

/// Sentinel for "no row" / "no column" in the 1-based bookkeeping below.
const NONE: usize = 0;

/// Solves the assignment problem on a square matrix of finite costs.
///
/// Returns, for each row, the column it is matched to.
///
/// # Errors
///
/// - If the matrix is not square.
/// - If any cost is not finite.
pub fn min_cost_assignment(cost: ArrayView2<f64>) -> Result<Vec<usize>, DistanceError> {
    let (n, m) = cost.dim();
    if n != m {
        return Err(DistanceError::usage(format!("assignment needs a square cost matrix, got {n} x {m}")));
    }
    if cost.iter().any(|c| !c.is_finite()) {
        return Err(DistanceError::usage("assignment costs must be finite"));
    }

    // Index 0 is a virtual column used as the root of every search, so real
    // rows and columns are 1-based.
    let mut u = vec![0_f64; n + 1];
    let mut v = vec![0_f64; n + 1];
    let mut row_of = vec![NONE; n + 1];
    let mut way = vec![NONE; n + 1];

    for i in 1..=n {
        row_of[0] = i;
        let mut j0 = 0;
        let mut min_v = vec![f64::INFINITY; n + 1];
        let mut used = vec![false; n + 1];

        loop {
            used[j0] = true;
            let i0 = row_of[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = NONE;

            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let reduced = cost[[i0 - 1, j - 1]] - u[i0] - v[j];
                if reduced < min_v[j] {
                    min_v[j] = reduced;
                    way[j] = j0;
                }
                if min_v[j] < delta {
                    delta = min_v[j];
                    j1 = j;
                }
            }

            if j1 == NONE {
                return Err(DistanceError::usage("assignment search found no augmenting path"));
            }

            for j in 0..=n {
                if used[j] {
                    u[row_of[j]] += delta;
                    v[j] -= delta;
                } else {
                    min_v[j] -= delta;
                }
            }

            j0 = j1;
            if row_of[j0] == NONE {
                break;
            }
        }

        // Flip the augmenting path back to the root.
        loop {
            let j1 = way[j0];
            row_of[j0] = row_of[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut col_of = vec![0; n];
    for (j, &i) in row_of.iter().enumerate().skip(1) {
        if i != NONE {
            col_of[i - 1] = j - 1;
        }
    }
    Ok(col_of)
}

/// The total cost of an assignment.
#[must_use]
pub fn assignment_cost(cost: ArrayView2<f64>, col_of: &[usize]) -> f64 {
    col_of.iter().enumerate().map(|(i, &j)| cost[[i, j]]).sum()
}

#[cfg(test)]
mod tests {
    use ndarray::{array, Array2};

    use super::*;

    /// Tries every permutation; only for tiny matrices.
    fn brute_force(cost: &Array2<f64>) -> f64 {
        fn permute(k: usize, cols: &mut Vec<usize>, cost: &Array2<f64>, best: &mut f64) {
            if k == cols.len() {
                *best = best.min(assignment_cost(cost.view(), cols));
                return;
            }
            for i in k..cols.len() {
                cols.swap(k, i);
                permute(k + 1, cols, cost, best);
                cols.swap(k, i);
            }
        }
        let mut cols = (0..cost.nrows()).collect::<Vec<_>>();
        let mut best = f64::INFINITY;
        permute(0, &mut cols, cost, &mut best);
        best
    }

    #[test]
    fn classic_example() {
        let cost = array![[4., 1., 3.], [2., 0., 5.], [3., 2., 2.]];
        let col_of = min_cost_assignment(cost.view()).unwrap();
        assert_eq!(col_of, vec![1, 0, 2]);
        assert!(float_cmp::approx_eq!(f64, assignment_cost(cost.view(), &col_of), 5., ulps = 2));
    }

    #[test]
    fn result_is_a_permutation() {
        let cost = Array2::from_shape_fn((7, 7), |(i, j)| ((i * 7 + j * 3) % 11) as f64);
        let mut col_of = min_cost_assignment(cost.view()).unwrap();
        col_of.sort_unstable();
        assert_eq!(col_of, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn matches_brute_force() {
        let cost = Array2::from_shape_fn((6, 6), |(i, j)| {
            (((i + 1) * (j + 3)) % 7) as f64 + 0.25 * (i as f64 - j as f64).abs()
        });
        let col_of = min_cost_assignment(cost.view()).unwrap();
        let expected = brute_force(&cost);
        assert!(float_cmp::approx_eq!(f64, assignment_cost(cost.view(), &col_of), expected, epsilon = 1e-9));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(min_cost_assignment(Array2::<f64>::zeros((2, 3)).view()).is_err());
        let cost = array![[1., f64::NAN], [0., 1.]];
        assert!(min_cost_assignment(cost.view()).is_err());
    }

    #[test]
    fn empty_matrix() {
        assert!(min_cost_assignment(Array2::<f64>::zeros((0, 0)).view()).unwrap().is_empty());
    }
}
