//! Permutation vector utilities

use nalgebra::DMatrix;

/// Create permutation matrix from permutation vector
///
/// Given a permutation vector `p`, creates the corresponding
/// permutation matrix P such that P[i, p[i]] = 1.
pub fn permutation_matrix(permutation: &[usize]) -> DMatrix<f64> {
    let n = permutation.len();
    let mut p = DMatrix::zeros(n, n);

    for (i, &j) in permutation.iter().enumerate() {
        p[(i, j)] = 1.0;
    }

    p
}

/// Recover the permutation vector of a permutation matrix
///
/// Returns `None` unless `matrix` is square, every entry is within `tol` of
/// 0 or 1, and each row and column holds exactly one 1.
pub fn permutation_from_matrix(matrix: &DMatrix<f64>, tol: f64) -> Option<Vec<usize>> {
    let (n, m) = matrix.shape();
    if n != m {
        return None;
    }

    let mut permutation = vec![usize::MAX; n];
    let mut column_taken = vec![false; n];

    for i in 0..n {
        for j in 0..n {
            let val = matrix[(i, j)];
            if !val.is_finite() {
                return None;
            }
            if (val - 1.0).abs() <= tol {
                if permutation[i] != usize::MAX || column_taken[j] {
                    return None;
                }
                permutation[i] = j;
                column_taken[j] = true;
            } else if val.abs() > tol {
                return None;
            }
        }
        if permutation[i] == usize::MAX {
            return None;
        }
    }

    Some(permutation)
}
