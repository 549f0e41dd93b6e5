//! Matrix norm computations

use nalgebra::DMatrix;

/// Compute the Frobenius norm of a matrix
pub fn frobenius_norm(mat: &DMatrix<f64>) -> f64 {
    let mut sum = 0.0;
    for val in mat.iter() {
        sum += val * val;
    }
    sum.sqrt()
}

/// Compute the maximum absolute value in a matrix
pub fn norm_max(mat: &DMatrix<f64>) -> f64 {
    mat.iter().fold(0.0_f64, |acc, &val| acc.max(val.abs()))
}
