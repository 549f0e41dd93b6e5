//! # procrustes-rust: Procrustes analysis on dense matrices
//!
//! Procrustes methods find the transformation that brings one matrix as
//! close as possible to another in the Frobenius norm. This crate provides
//! the one-sided orthogonal and permutation methods, the two-sided
//! orthogonal method, and a heuristic solver for the two-sided permutation
//! problem with a single transformation.
//!
//! ```ignore
//! use procrustes_rust::{permutation_2sided_single, PermutationConfig};
//!
//! let result = permutation_2sided_single(&a, &b, &PermutationConfig::default())?;
//! println!("error = {}", result.error);
//! ```

pub mod assignment;
pub mod error;
pub mod orthogonal;
pub mod permutation;
pub mod residual;
pub mod setup;
pub mod two_sided_permutation;

pub use assignment::linear_sum_assignment;
pub use error::{ProcrustesError, Result};
pub use orthogonal::{
    orthogonal, orthogonal_2sided, orthogonal_2sided_single, OrthogonalSingleResult,
    ProcrustesResult,
};
pub use permutation::{match_permutation, permutation, PermutationResult};
pub use residual::compute_error;
pub use setup::{setup_input_arrays, PreparedArrays, SetupOptions, TransformMeta};
pub use two_sided_permutation::{
    permutation_2sided_single, refine, sorted_profile, BranchReport, BranchStatus, Candidate,
    GuessStrategy, PermutationConfig, PermutationSolveResult, RefineOutcome, Refinement,
};

// Re-export the linear-algebra layer
pub use procrustes_linalg::{self as linalg, DMatrix, DVector, PaddingMode};
