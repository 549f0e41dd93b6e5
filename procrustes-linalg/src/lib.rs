//! # procrustes-linalg: dense building blocks for Procrustes analysis
//!
//! Decompositions (SVD, symmetric eigendecomposition, rank and
//! diagonalizability checks) and the array preparation steps shared by the
//! Procrustes methods: zero padding, unpadding, centroid translation and
//! Frobenius scaling.
//!
//! All routines work on `nalgebra::DMatrix<f64>`.

pub mod decompose;
pub mod error;
pub mod utils;

pub use decompose::{
    eigen_decompose, is_diagonalizable, matrix_rank, svd_decompose, EigenResult,
    EigenvectorOrder, SVDResult,
};
pub use error::LinalgError;
pub use utils::{
    all_finite, compute_centroid, frobenius_norm, hide_zero_padding, is_orthogonal,
    is_permutation_matrix, is_symmetric, norm_max, permutation_from_matrix, permutation_matrix,
    scale_array, translate_array, zero_padding, PaddingMode, ZERO_PADDING_TOL,
};

// Re-export nalgebra types
pub use nalgebra::{DMatrix, DVector};

// Type aliases for convenience
pub type Matrix = DMatrix<f64>;
pub type Vector = DVector<f64>;
