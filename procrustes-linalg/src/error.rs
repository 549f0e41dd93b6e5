//! Error type for decomposition and preparation routines

/// Errors raised by the linear-algebra helpers
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LinalgError {
    #[error("Matrix is empty")]
    EmptyMatrix,

    #[error("Argument array should be a square array! shape=({rows}, {cols})")]
    NotSquare { rows: usize, cols: usize },

    #[error("The input array is not diagonalizable")]
    NotDiagonalizable,

    #[error("Decomposition failed: {message}")]
    DecompositionFailed { message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
