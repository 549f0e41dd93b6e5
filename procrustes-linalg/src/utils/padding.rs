//! Zero padding and unpadding of matrices
//!
//! Procrustes methods need `A` and `B` to share a shape. Padding appends zero
//! rows at the bottom and zero columns on the right; unpadding removes them
//! again.

use nalgebra::DMatrix;

/// Entries with magnitude at or below this count as zero when unpadding
pub const ZERO_PADDING_TOL: f64 = 1.0e-8;

/// How [`zero_padding`] reconciles two shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingMode {
    /// The array with fewer rows gets zero rows
    Row,
    /// The array with fewer columns gets zero columns
    Col,
    /// Both of the above; the results need not be square
    RowCol,
    /// Both arrays become square with side `max(n_a, m_a, n_b, m_b)`
    Square,
}

/// Return copies of `a` and `b` padded with zero rows and/or columns
///
/// Arrays that already share a shape are returned unchanged, whatever the mode.
pub fn zero_padding(
    a: &DMatrix<f64>,
    b: &DMatrix<f64>,
    mode: PaddingMode,
) -> (DMatrix<f64>, DMatrix<f64>) {
    if a.shape() == b.shape() {
        return (a.clone(), b.clone());
    }

    let (n_a, m_a) = a.shape();
    let (n_b, m_b) = b.shape();

    let (shape_a, shape_b) = match mode {
        PaddingMode::Square => {
            let dim = n_a.max(m_a).max(n_b).max(m_b);
            ((dim, dim), (dim, dim))
        }
        PaddingMode::Row => {
            let rows = n_a.max(n_b);
            ((rows, m_a), (rows, m_b))
        }
        PaddingMode::Col => {
            let cols = m_a.max(m_b);
            ((n_a, cols), (n_b, cols))
        }
        PaddingMode::RowCol => {
            let rows = n_a.max(n_b);
            let cols = m_a.max(m_b);
            ((rows, cols), (rows, cols))
        }
    };

    (
        a.clone().resize(shape_a.0, shape_a.1, 0.0),
        b.clone().resize(shape_b.0, shape_b.1, 0.0),
    )
}

/// Return `matrix` with trailing zero rows (bottom) and columns (right) removed
///
/// Rows are stripped before columns. An all-zero matrix collapses to 0×0
/// when both flags are set.
pub fn hide_zero_padding(
    matrix: &DMatrix<f64>,
    remove_zero_col: bool,
    remove_zero_row: bool,
    tol: f64,
) -> DMatrix<f64> {
    let (mut n, mut m) = matrix.shape();

    if remove_zero_row {
        while n > 0 && (0..m).all(|j| matrix[(n - 1, j)].abs() <= tol) {
            n -= 1;
        }
    }

    if remove_zero_col {
        while m > 0 && (0..n).all(|i| matrix[(i, m - 1)].abs() <= tol) {
            m -= 1;
        }
    }

    matrix.view((0, 0), (n, m)).into_owned()
}
