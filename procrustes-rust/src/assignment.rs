//! Dense linear sum assignment (Hungarian algorithm)
//!
//! Shortest augmenting path variant with row and column potentials, O(n^3).
//! Rows are inserted one at a time; each insertion runs a Dijkstra-like scan
//! over the reduced costs and augments along the cheapest path found.

use nalgebra::DMatrix;
use procrustes_linalg::{all_finite, LinalgError};

use crate::error::{ProcrustesError, Result};

/// Solve the square linear sum assignment problem
///
/// Returns `assignment` with `assignment[i]` the column given to row `i`,
/// minimising (or, with `maximize`, maximising) `sum_i cost[i, assignment[i]]`.
/// Comparisons are strict, so a constant cost yields the identity.
pub fn linear_sum_assignment(cost: &DMatrix<f64>, maximize: bool) -> Result<Vec<usize>> {
    let (rows, cols) = cost.shape();
    if rows != cols {
        return Err(LinalgError::NotSquare { rows, cols }.into());
    }
    if !all_finite(cost) {
        return Err(ProcrustesError::NonFinite);
    }

    let n = rows;
    let sign = if maximize { -1.0 } else { 1.0 };

    // 1-based; index 0 is the virtual source column
    let mut u = vec![0.0; n + 1];
    let mut v = vec![0.0; n + 1];
    let mut row_of = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for i in 1..=n {
        row_of[0] = i;
        let mut j0 = 0;
        let mut minv = vec![f64::INFINITY; n + 1];
        let mut used = vec![false; n + 1];

        loop {
            used[j0] = true;
            let i0 = row_of[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0;

            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let reduced = sign * cost[(i0 - 1, j - 1)] - u[i0] - v[j];
                if reduced < minv[j] {
                    minv[j] = reduced;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }

            for j in 0..=n {
                if used[j] {
                    u[row_of[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }

            j0 = j1;
            if row_of[j0] == 0 {
                break;
            }
        }

        // augment along the alternating path back to the source
        loop {
            let j1 = way[j0];
            row_of[j0] = row_of[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut assignment = vec![0usize; n];
    for j in 1..=n {
        assignment[row_of[j] - 1] = j - 1;
    }
    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn total(cost: &DMatrix<f64>, assignment: &[usize]) -> f64 {
        assignment
            .iter()
            .enumerate()
            .map(|(i, &j)| cost[(i, j)])
            .sum()
    }

    fn all_permutations(n: usize) -> Vec<Vec<usize>> {
        if n == 0 {
            return vec![vec![]];
        }
        let mut out = Vec::new();
        for perm in all_permutations(n - 1) {
            for pos in 0..=perm.len() {
                let mut p = perm.clone();
                p.insert(pos, n - 1);
                out.push(p);
            }
        }
        out
    }

    #[test]
    fn test_small_known_problem() {
        let cost = DMatrix::from_row_slice(3, 3, &[4.0, 1.0, 3.0, 2.0, 0.0, 5.0, 3.0, 2.0, 2.0]);
        let assignment = linear_sum_assignment(&cost, false).unwrap();
        assert_eq!(assignment, vec![1, 0, 2]);
        assert_abs_diff_eq!(total(&cost, &assignment), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in 1..=6 {
            let cost = DMatrix::from_fn(n, n, |_, _| rng.gen_range(-10.0..10.0));
            let perms = all_permutations(n);

            for maximize in [false, true] {
                let assignment = linear_sum_assignment(&cost, maximize).unwrap();
                let got = total(&cost, &assignment);
                let best = perms
                    .iter()
                    .map(|p| total(&cost, p))
                    .fold(if maximize { f64::MIN } else { f64::MAX }, |acc, x| {
                        if maximize {
                            acc.max(x)
                        } else {
                            acc.min(x)
                        }
                    });
                assert_abs_diff_eq!(got, best, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_constant_cost_gives_identity() {
        let cost = DMatrix::from_element(4, 4, 3.5);
        assert_eq!(linear_sum_assignment(&cost, false).unwrap(), vec![0, 1, 2, 3]);
        assert_eq!(linear_sum_assignment(&cost, true).unwrap(), vec![0, 1, 2, 3]);

        let zero = DMatrix::<f64>::zeros(3, 3);
        assert_eq!(linear_sum_assignment(&zero, true).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_and_invalid() {
        let empty = DMatrix::<f64>::zeros(0, 0);
        assert!(linear_sum_assignment(&empty, false).unwrap().is_empty());

        let rect = DMatrix::<f64>::zeros(2, 3);
        assert!(matches!(
            linear_sum_assignment(&rect, false),
            Err(ProcrustesError::Linalg(LinalgError::NotSquare { rows: 2, cols: 3 }))
        ));

        let nan = DMatrix::from_row_slice(1, 1, &[f64::NAN]);
        assert_eq!(
            linear_sum_assignment(&nan, false).unwrap_err(),
            ProcrustesError::NonFinite
        );
    }
}
