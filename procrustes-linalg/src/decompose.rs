//! SVD and symmetric eigendecomposition using nalgebra
//!
//! Both decompositions return their spectra sorted from largest to smallest,
//! with the singular/eigen vectors permuted consistently.

use std::cmp::Ordering;

use nalgebra::linalg::{SymmetricEigen, SVD};
use nalgebra::{DMatrix, DVector};

use crate::error::LinalgError;
use crate::utils::{hide_zero_padding, ZERO_PADDING_TOL};

/// Iteration budget handed to nalgebra's implicit-shift solvers
const MAX_ITERATIONS: usize = 10_000;

/// Result of SVD decomposition
#[derive(Debug, Clone)]
pub struct SVDResult {
    /// Left singular vectors (m × k)
    pub u: DMatrix<f64>,
    /// Singular values (k), descending
    pub s: DVector<f64>,
    /// Right singular vectors (n × k)
    pub v: DMatrix<f64>,
    /// Numerical rank
    pub rank: usize,
}

/// How eigenvectors are reordered after sorting the eigenvalues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EigenvectorOrder {
    /// Permute columns, so column `i` belongs to eigenvalue `i`
    #[default]
    Columns,
    /// Permute rows by the sorting index (two-sided single-transformation layout)
    Rows,
}

/// Result of a symmetric eigendecomposition
#[derive(Debug, Clone)]
pub struct EigenResult {
    /// Eigenvalues sorted from greatest to least
    pub eigenvalues: DVector<f64>,
    /// Eigenvectors permuted according to [`EigenvectorOrder`]
    pub eigenvectors: DMatrix<f64>,
}

/// Compute the SVD `A = U * diag(S) * V^T`
///
/// # Arguments
/// * `matrix` - Input matrix (m × n)
///
/// # Returns
/// * `SVDResult` - thin SVD with singular values in descending order
pub fn svd_decompose(matrix: &DMatrix<f64>) -> Result<SVDResult, LinalgError> {
    let (m, n) = matrix.shape();
    if m == 0 || n == 0 {
        return Err(LinalgError::EmptyMatrix);
    }

    let svd = SVD::try_new(matrix.clone(), true, true, f64::EPSILON, MAX_ITERATIONS).ok_or_else(
        || LinalgError::DecompositionFailed {
            message: format!("SVD of {}x{} matrix did not converge", m, n),
        },
    )?;

    let (u, v_t) = match (svd.u, svd.v_t) {
        (Some(u), Some(v_t)) => (u, v_t),
        _ => {
            return Err(LinalgError::DecompositionFailed {
                message: "singular vectors were not computed".to_string(),
            })
        }
    };
    let s = svd.singular_values;

    let indices = descending_order(s.as_slice());
    let k = indices.len();

    let s_sorted = DVector::from_iterator(k, indices.iter().map(|&i| s[i]));
    let u_sorted = DMatrix::from_fn(m, k, |row, col| u[(row, indices[col])]);
    let v_sorted = DMatrix::from_fn(n, k, |row, col| v_t[(indices[col], row)]);

    let rank = rank_from_singular_values(s_sorted.as_slice(), m, n);

    Ok(SVDResult {
        u: u_sorted,
        s: s_sorted,
        v: v_sorted,
        rank,
    })
}

/// Numerical rank of a matrix
///
/// Uses the same threshold as LAPACK-based tools: `σ_max * max(m, n) * ε`.
/// An empty matrix has rank zero.
pub fn matrix_rank(matrix: &DMatrix<f64>) -> Result<usize, LinalgError> {
    if matrix.is_empty() {
        return Ok(0);
    }
    Ok(svd_decompose(matrix)?.rank)
}

/// Check whether a square matrix is diagonalizable
///
/// Trailing zero rows and columns are stripped first. The matrix is taken as
/// diagonalizable when the rank of its left singular vectors equals its own
/// rank; otherwise the eigenvectors cannot span the space.
pub fn is_diagonalizable(matrix: &DMatrix<f64>) -> Result<bool, LinalgError> {
    let stripped = hide_zero_padding(matrix, true, true, ZERO_PADDING_TOL);
    let (rows, cols) = stripped.shape();
    if rows != cols {
        return Err(LinalgError::NotSquare { rows, cols });
    }
    if rows == 0 {
        return Ok(true);
    }

    let svd = svd_decompose(&stripped)?;
    let rank_u = matrix_rank(&svd.u)?;
    Ok(rank_u == svd.rank)
}

/// Eigendecomposition of a symmetric matrix
///
/// Eigenvalues come back sorted from greatest to least. With
/// [`EigenvectorOrder::Columns`] column `i` of the eigenvector matrix belongs to
/// eigenvalue `i`; with [`EigenvectorOrder::Rows`] the rows are permuted by the
/// same sorting index instead.
///
/// # Errors
/// - `EmptyMatrix` / `NotSquare` for malformed input
/// - `NotDiagonalizable` when [`is_diagonalizable`] rejects the matrix
pub fn eigen_decompose(
    matrix: &DMatrix<f64>,
    order: EigenvectorOrder,
) -> Result<EigenResult, LinalgError> {
    let (rows, cols) = matrix.shape();
    if rows == 0 || cols == 0 {
        return Err(LinalgError::EmptyMatrix);
    }
    if rows != cols {
        return Err(LinalgError::NotSquare { rows, cols });
    }
    if !is_diagonalizable(matrix)? {
        return Err(LinalgError::NotDiagonalizable);
    }

    let eigen = SymmetricEigen::try_new(matrix.clone(), f64::EPSILON, MAX_ITERATIONS)
        .ok_or_else(|| LinalgError::DecompositionFailed {
            message: format!("eigendecomposition of {}x{} matrix did not converge", rows, cols),
        })?;

    let indices = descending_order(eigen.eigenvalues.as_slice());
    let n = indices.len();

    let eigenvalues = DVector::from_iterator(n, indices.iter().map(|&i| eigen.eigenvalues[i]));
    let v = &eigen.eigenvectors;
    let eigenvectors = match order {
        EigenvectorOrder::Columns => DMatrix::from_fn(n, n, |row, col| v[(row, indices[col])]),
        EigenvectorOrder::Rows => DMatrix::from_fn(n, n, |row, col| v[(indices[row], col)]),
    };

    Ok(EigenResult {
        eigenvalues,
        eigenvectors,
    })
}

/// Indices that sort `values` from greatest to least (stable)
fn descending_order(values: &[f64]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..values.len()).collect();
    indices.sort_by(|&a, &b| values[b].partial_cmp(&values[a]).unwrap_or(Ordering::Equal));
    indices
}

/// Count singular values above `σ_max * max(m, n) * ε`
fn rank_from_singular_values(singular_values: &[f64], m: usize, n: usize) -> usize {
    let max_sv = singular_values.iter().cloned().fold(0.0_f64, f64::max);
    let threshold = max_sv * (m.max(n) as f64) * f64::EPSILON;
    singular_values.iter().filter(|&&sv| sv > threshold).count()
}

#[cfg(test)]
#[path = "decompose_tests.rs"]
mod tests;
