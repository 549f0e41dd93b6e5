//! Procrustes residual error

use nalgebra::DMatrix;

use crate::error::{ProcrustesError, Result};

/// Return the single- or double-sided Procrustes error
///
/// Without `v` this is `Tr[(AU - B)^T (AU - B)]`; with `v` it is
/// `Tr[(U^T A V - B)^T (U^T A V - B)]`. Both equal the squared Frobenius
/// norm of the residual.
pub fn compute_error(
    a: &DMatrix<f64>,
    b: &DMatrix<f64>,
    u: &DMatrix<f64>,
    v: Option<&DMatrix<f64>>,
) -> Result<f64> {
    let transformed = match v {
        None => {
            check_product(a.shape(), u.shape())?;
            a * u
        }
        Some(v) => {
            check_product((u.ncols(), u.nrows()), a.shape())?;
            check_product((u.ncols(), a.ncols()), v.shape())?;
            u.transpose() * a * v
        }
    };
    if transformed.shape() != b.shape() {
        return Err(ProcrustesError::ShapeMismatch {
            left: transformed.shape(),
            right: b.shape(),
        });
    }

    let residual = transformed - b;
    Ok(residual.norm_squared())
}

fn check_product(left: (usize, usize), right: (usize, usize)) -> Result<()> {
    if left.1 != right.0 {
        return Err(ProcrustesError::ShapeMismatch { left, right });
    }
    Ok(())
}
