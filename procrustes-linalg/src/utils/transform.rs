//! Centroid translation and Frobenius-norm scaling

use nalgebra::{DMatrix, DVector};

use super::norms::frobenius_norm;
use crate::error::LinalgError;

/// Return the mean of each column of `array`
pub fn compute_centroid(array: &DMatrix<f64>) -> Result<DVector<f64>, LinalgError> {
    let (n, m) = array.shape();
    if n == 0 {
        return Err(LinalgError::EmptyMatrix);
    }
    Ok(DVector::from_fn(m, |j, _| {
        array.column(j).iter().sum::<f64>() / n as f64
    }))
}

/// Return translated `array_a` and the translation vector
///
/// Without `array_b`, `array_a` is moved so its centroid is at the origin.
/// With `array_b`, it is moved onto the centroid of `array_b` instead.
pub fn translate_array(
    array_a: &DMatrix<f64>,
    array_b: Option<&DMatrix<f64>>,
) -> Result<(DMatrix<f64>, DVector<f64>), LinalgError> {
    let mut centroid = compute_centroid(array_a)?;
    if let Some(b) = array_b {
        if b.ncols() != array_a.ncols() {
            return Err(LinalgError::InvalidInput(format!(
                "cannot translate onto a centroid of length {}, expected {}",
                b.ncols(),
                array_a.ncols()
            )));
        }
        centroid -= compute_centroid(b)?;
    }

    let translated = DMatrix::from_fn(array_a.nrows(), array_a.ncols(), |i, j| {
        array_a[(i, j)] - centroid[j]
    });
    Ok((translated, -centroid))
}

/// Return scaled `array_a` and the scaling factor
///
/// Without `array_b`, `array_a` is scaled to unit Frobenius norm. With
/// `array_b`, it is scaled to the Frobenius norm of `array_b`.
pub fn scale_array(
    array_a: &DMatrix<f64>,
    array_b: Option<&DMatrix<f64>>,
) -> Result<(DMatrix<f64>, f64), LinalgError> {
    let norm_a = frobenius_norm(array_a);
    if norm_a == 0.0 || !norm_a.is_finite() {
        return Err(LinalgError::InvalidInput(format!(
            "cannot scale an array with Frobenius norm {}",
            norm_a
        )));
    }

    let mut scale = 1.0 / norm_a;
    if let Some(b) = array_b {
        scale *= frobenius_norm(b);
    }
    Ok((array_a * scale, scale))
}
