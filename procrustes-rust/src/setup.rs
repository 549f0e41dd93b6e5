//! Input preparation shared by the Procrustes methods
//!
//! Every method runs its two input arrays through [`setup_input_arrays`]
//! before solving: optional unpadding, centroid translation, row weighting,
//! Frobenius scaling and zero padding, in that order.

use nalgebra::{DMatrix, DVector};
use procrustes_linalg::{
    all_finite, hide_zero_padding, is_symmetric, norm_max, scale_array, translate_array,
    zero_padding, LinalgError, PaddingMode, ZERO_PADDING_TOL,
};

use crate::error::{ProcrustesError, Result};

/// Options controlling [`setup_input_arrays`]
#[derive(Debug, Clone, PartialEq)]
pub struct SetupOptions {
    /// Zero-pad the arrays to a common shape
    pub pad: bool,
    /// Padding layout used when `pad` is set
    pub pad_mode: PaddingMode,
    /// Move each array's centroid to the origin
    pub translate: bool,
    /// Scale each array to unit Frobenius norm
    pub scale: bool,
    /// Strip trailing zero columns before anything else
    pub unpad_col: bool,
    /// Strip trailing zero rows before anything else
    pub unpad_row: bool,
    /// Reject arrays holding NaN or infinite entries
    pub check_finite: bool,
    /// Per-row weights applied as `diag(w) * A`
    pub weight: Option<DVector<f64>>,
}

impl Default for SetupOptions {
    fn default() -> Self {
        Self {
            pad: true,
            pad_mode: PaddingMode::RowCol,
            translate: false,
            scale: false,
            unpad_col: false,
            unpad_row: false,
            check_finite: true,
            weight: None,
        }
    }
}

impl SetupOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pad(mut self, pad: bool) -> Self {
        self.pad = pad;
        self
    }

    pub fn with_pad_mode(mut self, mode: PaddingMode) -> Self {
        self.pad_mode = mode;
        self
    }

    pub fn with_translate(mut self, translate: bool) -> Self {
        self.translate = translate;
        self
    }

    pub fn with_scale(mut self, scale: bool) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_unpad(mut self, unpad_col: bool, unpad_row: bool) -> Self {
        self.unpad_col = unpad_col;
        self.unpad_row = unpad_row;
        self
    }

    pub fn with_check_finite(mut self, check_finite: bool) -> Self {
        self.check_finite = check_finite;
        self
    }

    pub fn with_weight(mut self, weight: DVector<f64>) -> Self {
        self.weight = Some(weight);
        self
    }
}

/// What preparation did to the inputs
///
/// `None` means the corresponding step was not requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformMeta {
    /// Vector added to every row of `A`
    pub translation_a: Option<DVector<f64>>,
    /// Vector added to every row of `B`
    pub translation_b: Option<DVector<f64>>,
    /// Factor `A` was multiplied by
    pub scale_a: Option<f64>,
    /// Factor `B` was multiplied by
    pub scale_b: Option<f64>,
}

/// Prepared arrays together with the preparation metadata
#[derive(Debug, Clone)]
pub struct PreparedArrays {
    pub a: DMatrix<f64>,
    pub b: DMatrix<f64>,
    pub meta: TransformMeta,
}

/// Check and prepare `a` and `b` for a Procrustes method
///
/// Steps run in a fixed order: finiteness check, unpad, translate, weight,
/// scale, pad. Translation and scaling act on each array independently.
pub fn setup_input_arrays(
    a: &DMatrix<f64>,
    b: &DMatrix<f64>,
    options: &SetupOptions,
) -> Result<PreparedArrays> {
    if a.is_empty() || b.is_empty() {
        return Err(ProcrustesError::EmptyMatrix);
    }
    if options.check_finite && !(all_finite(a) && all_finite(b)) {
        return Err(ProcrustesError::NonFinite);
    }

    let mut new_a = hide_zero_padding(a, options.unpad_col, options.unpad_row, ZERO_PADDING_TOL);
    let mut new_b = hide_zero_padding(b, options.unpad_col, options.unpad_row, ZERO_PADDING_TOL);

    let mut meta = TransformMeta::default();

    if options.translate {
        let (ta, offset_a) = translate_array(&new_a, None)?;
        let (tb, offset_b) = translate_array(&new_b, None)?;
        new_a = ta;
        new_b = tb;
        meta.translation_a = Some(offset_a);
        meta.translation_b = Some(offset_b);
    }

    if let Some(weight) = &options.weight {
        new_a = apply_row_weight(&new_a, weight)?;
        new_b = apply_row_weight(&new_b, weight)?;
    }

    if options.scale {
        let (sa, factor_a) = scale_array(&new_a, None)?;
        let (sb, factor_b) = scale_array(&new_b, None)?;
        new_a = sa;
        new_b = sb;
        meta.scale_a = Some(factor_a);
        meta.scale_b = Some(factor_b);
    }

    if options.pad {
        let (pa, pb) = zero_padding(&new_a, &new_b, options.pad_mode);
        new_a = pa;
        new_b = pb;
    }

    Ok(PreparedArrays {
        a: new_a,
        b: new_b,
        meta,
    })
}

/// Fail unless `a` and `b` have the same shape
pub(crate) fn ensure_same_shape(a: &DMatrix<f64>, b: &DMatrix<f64>) -> Result<()> {
    if a.shape() != b.shape() {
        return Err(ProcrustesError::ShapeMismatch {
            left: a.shape(),
            right: b.shape(),
        });
    }
    Ok(())
}

/// Fail unless `matrix` is square with `|M - M^T| <= tol` elementwise
pub(crate) fn ensure_symmetric(matrix: &DMatrix<f64>, tol: f64) -> Result<()> {
    let (rows, cols) = matrix.shape();
    if rows != cols {
        return Err(LinalgError::NotSquare { rows, cols }.into());
    }
    if !is_symmetric(matrix, tol) {
        let max_asymmetry = norm_max(&(matrix - matrix.transpose()));
        return Err(ProcrustesError::NotSymmetric { max_asymmetry });
    }
    Ok(())
}

fn apply_row_weight(array: &DMatrix<f64>, weight: &DVector<f64>) -> Result<DMatrix<f64>> {
    if weight.len() != array.nrows() {
        return Err(ProcrustesError::InvalidParameter(format!(
            "weight has {} entries but the array has {} rows",
            weight.len(),
            array.nrows()
        )));
    }
    Ok(DMatrix::from_fn(array.nrows(), array.ncols(), |i, j| {
        weight[i] * array[(i, j)]
    }))
}
