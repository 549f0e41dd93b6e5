//! Orthogonal Procrustes methods
//!
//! - [`orthogonal`]: one-sided, `min ||A Q - B||` over orthogonal `Q`
//! - [`orthogonal_2sided`]: two-sided, with one shared or two independent transforms
//! - [`orthogonal_2sided_single`]: the shared-transform problem for symmetric
//!   inputs, returning both the exact and Umeyama's approximate solution

use nalgebra::DMatrix;
use procrustes_linalg::{eigen_decompose, svd_decompose, EigenvectorOrder};

use crate::error::Result;
use crate::residual::compute_error;
use crate::setup::{
    ensure_same_shape, ensure_symmetric, setup_input_arrays, SetupOptions, TransformMeta,
};

/// Symmetry tolerance of [`orthogonal_2sided`] in single-transform mode
pub const SYMMETRY_TOL: f64 = 1.0e-8;

/// Result of a Procrustes method
///
/// The error is `||S^T A T - B||_F^2`, or `||A T - B||_F^2` when `s` is `None`.
#[derive(Debug, Clone)]
pub struct ProcrustesResult {
    pub error: f64,
    /// `A` after preparation
    pub new_a: DMatrix<f64>,
    /// `B` after preparation
    pub new_b: DMatrix<f64>,
    /// Right-hand transformation
    pub t: DMatrix<f64>,
    /// Left-hand transformation, for two-sided methods
    pub s: Option<DMatrix<f64>>,
    pub meta: TransformMeta,
}

/// Exact and approximate solutions of the shared-transform orthogonal problem
#[derive(Debug, Clone)]
pub struct OrthogonalSingleResult {
    /// Closest orthogonal matrix to `|U_A| |U_B|^T`
    pub u_approx: DMatrix<f64>,
    /// `U_A U_B^T`
    pub u_best: DMatrix<f64>,
    /// `u_approx^T A u_approx`
    pub transformed_approx: DMatrix<f64>,
    /// `u_best^T A u_best`
    pub transformed_best: DMatrix<f64>,
    pub error_approx: f64,
    pub error_best: f64,
    pub meta: TransformMeta,
}

/// One-sided orthogonal Procrustes
///
/// With `A^T B = U S V^T`, the optimal transformation is `Q = U V^T`.
pub fn orthogonal(
    a: &DMatrix<f64>,
    b: &DMatrix<f64>,
    options: &SetupOptions,
) -> Result<ProcrustesResult> {
    let prepared = setup_input_arrays(a, b, options)?;
    let (new_a, new_b) = (prepared.a, prepared.b);
    ensure_same_shape(&new_a, &new_b)?;

    let svd = svd_decompose(&(new_a.transpose() * &new_b))?;
    let q = &svd.u * svd.v.transpose();
    let error = compute_error(&new_a, &new_b, &q, None)?;

    Ok(ProcrustesResult {
        error,
        new_a,
        new_b,
        t: q,
        s: None,
        meta: prepared.meta,
    })
}

/// Two-sided orthogonal Procrustes
///
/// With `single_transform`, both inputs must be symmetric and the shared
/// transformation is `Q = U_A U_B^T` from their eigendecompositions.
/// Otherwise `Q1 = U_A U_B^T` and `Q2 = V_A V_B^T` come from the SVDs and the
/// error is `||Q1^T A Q2 - B||_F^2`.
pub fn orthogonal_2sided(
    a: &DMatrix<f64>,
    b: &DMatrix<f64>,
    single_transform: bool,
    options: &SetupOptions,
) -> Result<ProcrustesResult> {
    let prepared = setup_input_arrays(a, b, options)?;
    let (new_a, new_b) = (prepared.a, prepared.b);
    ensure_same_shape(&new_a, &new_b)?;

    if single_transform {
        ensure_symmetric(&new_a, SYMMETRY_TOL)?;
        ensure_symmetric(&new_b, SYMMETRY_TOL)?;

        let ua = eigen_decompose(&new_a, EigenvectorOrder::Columns)?.eigenvectors;
        let ub = eigen_decompose(&new_b, EigenvectorOrder::Columns)?.eigenvectors;
        let q = &ua * ub.transpose();
        let error = compute_error(&new_a, &new_b, &q, Some(&q))?;

        return Ok(ProcrustesResult {
            error,
            new_a,
            new_b,
            s: Some(q.clone()),
            t: q,
            meta: prepared.meta,
        });
    }

    let svd_a = svd_decompose(&new_a)?;
    let svd_b = svd_decompose(&new_b)?;
    let q1 = &svd_a.u * svd_b.u.transpose();
    let q2 = &svd_a.v * svd_b.v.transpose();
    let error = compute_error(&new_a, &new_b, &q1, Some(&q2))?;

    Ok(ProcrustesResult {
        error,
        new_a,
        new_b,
        t: q2,
        s: Some(q1),
        meta: prepared.meta,
    })
}

/// Shared-transform orthogonal Procrustes for symmetric `a` and `b`
///
/// Inputs are used as given, and must satisfy `|M - M^T| <= symmetry_tol`
/// elementwise. Fails with `NotDiagonalizable` when either
/// eigendecomposition is rejected.
pub fn orthogonal_2sided_single(
    a: &DMatrix<f64>,
    b: &DMatrix<f64>,
    symmetry_tol: f64,
) -> Result<OrthogonalSingleResult> {
    ensure_same_shape(a, b)?;
    ensure_symmetric(a, symmetry_tol)?;
    ensure_symmetric(b, symmetry_tol)?;

    let ua = eigen_decompose(a, EigenvectorOrder::Columns)?.eigenvectors;
    let ub = eigen_decompose(b, EigenvectorOrder::Columns)?.eigenvectors;

    let u_best = &ua * ub.transpose();

    // Umeyama: drop eigenvector signs, then snap back to the orthogonal group
    let umeyama = ua.abs() * ub.abs().transpose();
    let svd = svd_decompose(&umeyama)?;
    let u_approx = &svd.u * svd.v.transpose();

    let transformed_best = u_best.transpose() * a * &u_best;
    let transformed_approx = u_approx.transpose() * a * &u_approx;
    let error_best = compute_error(a, b, &u_best, Some(&u_best))?;
    let error_approx = compute_error(a, b, &u_approx, Some(&u_approx))?;

    Ok(OrthogonalSingleResult {
        u_approx,
        u_best,
        transformed_approx,
        transformed_best,
        error_approx,
        error_best,
        meta: TransformMeta::default(),
    })
}

#[cfg(test)]
#[path = "orthogonal_tests.rs"]
mod tests;
