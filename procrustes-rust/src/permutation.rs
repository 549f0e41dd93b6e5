//! One-sided permutation Procrustes
//!
//! Finds the permutation `P` minimising `||A P - B||_F^2`, which is the same
//! as maximising `Tr[P^T A^T B]`. The maximisation is a linear assignment
//! over the entries of `A^T B`.

use nalgebra::DMatrix;
use procrustes_linalg::permutation_matrix;

use crate::assignment::linear_sum_assignment;
use crate::error::Result;
use crate::residual::compute_error;
use crate::setup::{ensure_same_shape, setup_input_arrays, SetupOptions, TransformMeta};

/// Result of a one-sided permutation match
#[derive(Debug, Clone)]
pub struct PermutationResult {
    /// Optimal permutation matrix (m × m)
    pub permutation: DMatrix<f64>,
    /// `assignment[i]` is the column holding the 1 in row `i` of `permutation`
    pub assignment: Vec<usize>,
    /// `A P`
    pub transformed: DMatrix<f64>,
    /// `Tr[P^T A^T B]`
    pub objective: f64,
    /// `||A P - B||_F^2`
    pub error: f64,
    pub meta: TransformMeta,
}

/// Match the columns of `x` onto those of `y` with a permutation
///
/// Inputs are used as given: no padding, translation or scaling. With
/// `x = I` the result is the permutation matrix nearest to `y`.
pub fn match_permutation(x: &DMatrix<f64>, y: &DMatrix<f64>) -> Result<PermutationResult> {
    permutation(x, y, &SetupOptions::new().with_pad(false))
}

/// One-sided permutation Procrustes with input preparation
pub fn permutation(
    a: &DMatrix<f64>,
    b: &DMatrix<f64>,
    options: &SetupOptions,
) -> Result<PermutationResult> {
    let prepared = setup_input_arrays(a, b, options)?;
    let (new_a, new_b) = (prepared.a, prepared.b);
    ensure_same_shape(&new_a, &new_b)?;

    let profit = new_a.transpose() * &new_b;
    let assignment = linear_sum_assignment(&profit, true)?;
    let objective = assignment
        .iter()
        .enumerate()
        .map(|(i, &j)| profit[(i, j)])
        .sum::<f64>();

    let perm = permutation_matrix(&assignment);
    let error = compute_error(&new_a, &new_b, &perm, None)?;
    let transformed = &new_a * &perm;

    Ok(PermutationResult {
        permutation: perm,
        assignment,
        transformed,
        objective,
        error,
        meta: prepared.meta,
    })
}
