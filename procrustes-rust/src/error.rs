//! Error type for the Procrustes methods

use procrustes_linalg::LinalgError;

/// Errors raised by the Procrustes solvers
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProcrustesError {
    #[error("Argument array is not symmetric (max |A - A^T| = {max_asymmetry:e})")]
    NotSymmetric { max_asymmetry: f64 },

    #[error("Shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("Argument array contains NaN or infinite values")]
    NonFinite,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Argument array is empty")]
    EmptyMatrix,

    #[error("No candidate permutation survived refinement")]
    NoValidCandidate,

    #[error(transparent)]
    Linalg(#[from] LinalgError),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ProcrustesError>;
