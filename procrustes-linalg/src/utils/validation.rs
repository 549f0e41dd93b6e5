//! Structural checks on matrices

use nalgebra::DMatrix;

use super::pivoting::permutation_from_matrix;

/// Check whether every entry is finite
pub fn all_finite(matrix: &DMatrix<f64>) -> bool {
    matrix.iter().all(|v| v.is_finite())
}

/// Check if a matrix is square and `|A - A^T| <= tol` elementwise
pub fn is_symmetric(matrix: &DMatrix<f64>, tol: f64) -> bool {
    let (n, m) = matrix.shape();
    if n != m {
        return false;
    }

    for i in 0..n {
        for j in (i + 1)..n {
            // written so that NaN fails the check
            if !((matrix[(i, j)] - matrix[(j, i)]).abs() <= tol) {
                return false;
            }
        }
    }

    true
}

/// Check if a matrix has orthonormal columns (U^T * U = I)
pub fn is_orthogonal(matrix: &DMatrix<f64>, tolerance: f64) -> bool {
    let (rows, k) = matrix.shape();

    for i in 0..k {
        for j in 0..k {
            let mut sum = 0.0;
            for row in 0..rows {
                sum += matrix[(row, i)] * matrix[(row, j)];
            }
            let expected = if i == j { 1.0 } else { 0.0 };
            if !((sum - expected).abs() <= tolerance) {
                return false;
            }
        }
    }

    true
}

/// Check if a matrix is a permutation matrix within `tol`
pub fn is_permutation_matrix(matrix: &DMatrix<f64>, tol: f64) -> bool {
    permutation_from_matrix(matrix, tol).is_some()
}
