//! Two-sided permutation Procrustes with a single transformation
//!
//! For symmetric `A` and `B` of equal shape, look for one permutation `P`
//! minimising `||P^T A P - B||_F^2`. The problem is NP-hard, so the solver
//! works heuristically:
//!
//! 1. Build three initial guesses: the permutations nearest to Umeyama's
//!    approximate and to the exact two-sided orthogonal solution, and a
//!    match of the "sorted profiles" of the two matrices.
//! 2. Relax each guess with the multiplicative update
//!    `P[i,j] <- P[i,j] * sqrt(|2 T[i,j] / D[i,j]|)`, where `T = A P0 B` and
//!    `D = P (P^T T + (P^T T)^T)`.
//! 3. Project every surviving relaxation back onto the permutations and keep
//!    the one with the smallest double-sided error.

use std::fmt;

use log::{debug, warn};
use nalgebra::DMatrix;
use procrustes_linalg::{all_finite, PaddingMode};

use crate::error::{ProcrustesError, Result};
use crate::orthogonal::orthogonal_2sided_single;
use crate::permutation::match_permutation;
use crate::residual::compute_error;
use crate::setup::{
    ensure_same_shape, ensure_symmetric, setup_input_arrays, SetupOptions, TransformMeta,
};

/// Default convergence threshold on `||P_new - P_old||_F^2`
pub const DEFAULT_TOL: f64 = 1.0e-5;

/// Default cap on refinement sweeps per branch
pub const DEFAULT_MAX_SWEEPS: usize = 1000;

/// Default elementwise tolerance for the symmetry check
pub const DEFAULT_SYMMETRY_TOL: f64 = 1.0e-10;

/// Configuration for [`permutation_2sided_single`]
#[derive(Debug, Clone, PartialEq)]
pub struct PermutationConfig {
    /// Refinement stops once the squared change of a sweep drops below this
    pub tol: f64,
    /// Row weighting factor of the sorted profile, in (0, 1)
    pub p: f64,
    /// Sweeps allowed before a branch is reported as diverged
    pub max_sweeps: usize,
    /// Largest tolerated `|A[i,j] - A[j,i]|`
    pub symmetry_tol: f64,
    /// Input preparation; no translation or scaling, square padding
    pub setup: SetupOptions,
}

impl Default for PermutationConfig {
    fn default() -> Self {
        Self {
            tol: DEFAULT_TOL,
            p: std::f64::consts::FRAC_1_SQRT_2,
            max_sweeps: DEFAULT_MAX_SWEEPS,
            symmetry_tol: DEFAULT_SYMMETRY_TOL,
            setup: SetupOptions::new().with_pad_mode(PaddingMode::Square),
        }
    }
}

impl PermutationConfig {
    pub fn new(tol: f64, p: f64) -> Self {
        Self {
            tol,
            p,
            ..Self::default()
        }
    }

    pub fn with_max_sweeps(mut self, max_sweeps: usize) -> Self {
        self.max_sweeps = max_sweeps;
        self
    }

    pub fn with_symmetry_tol(mut self, symmetry_tol: f64) -> Self {
        self.symmetry_tol = symmetry_tol;
        self
    }

    pub fn with_setup(mut self, setup: SetupOptions) -> Self {
        self.setup = setup;
        self
    }

    /// Reject parameters the solver cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(self.p > 0.0 && self.p < 1.0) {
            return Err(ProcrustesError::InvalidParameter(format!(
                "p must lie in (0, 1), got {}",
                self.p
            )));
        }
        if !(self.tol.is_finite() && self.tol >= 0.0) {
            return Err(ProcrustesError::InvalidParameter(format!(
                "tol must be finite and non-negative, got {}",
                self.tol
            )));
        }
        if self.max_sweeps == 0 {
            return Err(ProcrustesError::InvalidParameter(
                "max_sweeps must be at least 1".to_string(),
            ));
        }
        if !(self.symmetry_tol.is_finite() && self.symmetry_tol >= 0.0) {
            return Err(ProcrustesError::InvalidParameter(format!(
                "symmetry_tol must be finite and non-negative, got {}",
                self.symmetry_tol
            )));
        }
        Ok(())
    }

    /// Number of profile rows kept: `ceil(-2 ln 10 / ln p + 1)`
    ///
    /// Beyond this row the weight `p^k` has fallen below `10^-2`.
    pub fn profile_rows(&self) -> usize {
        (-2.0 * std::f64::consts::LN_10 / self.p.ln() + 1.0).ceil() as usize
    }
}

/// Source of an initial guess, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuessStrategy {
    /// Nearest permutation to Umeyama's approximate orthogonal solution
    OrthogonalApprox,
    /// Nearest permutation to the exact orthogonal solution `U_A U_B^T`
    OrthogonalBest,
    /// Match of the sorted, geometrically weighted matrix profiles
    SortedProfile,
}

impl GuessStrategy {
    pub const ALL: [GuessStrategy; 3] = [
        GuessStrategy::OrthogonalApprox,
        GuessStrategy::OrthogonalBest,
        GuessStrategy::SortedProfile,
    ];
}

impl fmt::Display for GuessStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GuessStrategy::OrthogonalApprox => "orthogonal-approx",
            GuessStrategy::OrthogonalBest => "orthogonal-best",
            GuessStrategy::SortedProfile => "sorted-profile",
        };
        f.write_str(name)
    }
}

/// How a refinement run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefineOutcome {
    /// The squared change of a sweep fell below `tol`
    Converged,
    /// `max_sweeps` ran out first; the last iterate is still usable
    Diverged,
    /// A NaN, infinity or `x / 0` with `x != 0` showed up; the branch is dropped
    NumericalBreakdown,
}

/// Output of [`refine`]
#[derive(Debug, Clone)]
pub struct Refinement {
    pub outcome: RefineOutcome,
    /// Last finite iterate (the input guess if the first sweep broke down)
    pub matrix: DMatrix<f64>,
    /// Completed sweeps
    pub sweeps: usize,
}

/// What happened to one strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchStatus {
    /// No guess could be built for this strategy
    Skipped,
    Refined(RefineOutcome),
}

/// Per-strategy diagnostics of a solve
#[derive(Debug, Clone, PartialEq)]
pub struct BranchReport {
    pub strategy: GuessStrategy,
    pub status: BranchStatus,
    pub sweeps: usize,
    /// Double-sided error of the projected permutation, if the branch was scored
    pub error: Option<f64>,
}

/// A scored permutation
#[derive(Debug, Clone)]
pub struct Candidate {
    pub strategy: GuessStrategy,
    pub permutation: DMatrix<f64>,
    /// `P^T A P`
    pub transformed: DMatrix<f64>,
    pub error: f64,
}

/// Result of [`permutation_2sided_single`]
#[derive(Debug, Clone)]
pub struct PermutationSolveResult {
    pub permutation: DMatrix<f64>,
    /// `P^T A P`, with `A` after preparation
    pub transformed: DMatrix<f64>,
    /// `||P^T A P - B||_F^2`
    pub error: f64,
    /// Strategy whose branch produced `permutation`
    pub strategy: GuessStrategy,
    pub meta: TransformMeta,
    /// One report per strategy, in evaluation order
    pub branches: Vec<BranchReport>,
}

/// Solve the two-sided permutation Procrustes problem with one transformation
///
/// # Errors
/// - `InvalidParameter` for a rejected `config`
/// - `EmptyMatrix`, `NonFinite`, `ShapeMismatch`, `NotSymmetric` for bad inputs
/// - `NoValidCandidate` when every branch was skipped or broke down
pub fn permutation_2sided_single(
    a: &DMatrix<f64>,
    b: &DMatrix<f64>,
    config: &PermutationConfig,
) -> Result<PermutationSolveResult> {
    config.validate()?;

    let prepared = setup_input_arrays(a, b, &config.setup)?;
    let (a, b) = (prepared.a, prepared.b);
    if !(all_finite(&a) && all_finite(&b)) {
        return Err(ProcrustesError::NonFinite);
    }
    ensure_same_shape(&a, &b)?;
    ensure_symmetric(&a, config.symmetry_tol)?;
    ensure_symmetric(&b, config.symmetry_tol)?;

    let guesses = initial_guesses(&a, &b, config);

    let mut branches = Vec::with_capacity(guesses.len());
    let mut candidates = Vec::with_capacity(guesses.len());
    for (strategy, guess) in guesses {
        let (report, candidate) = run_branch(&a, &b, strategy, guess.as_ref(), config)?;
        branches.push(report);
        candidates.extend(candidate);
    }

    let best = select_best(candidates).ok_or(ProcrustesError::NoValidCandidate)?;
    debug!(
        "selected {} branch with error {:e}",
        best.strategy, best.error
    );

    Ok(PermutationSolveResult {
        permutation: best.permutation,
        transformed: best.transformed,
        error: best.error,
        strategy: best.strategy,
        meta: prepared.meta,
        branches,
    })
}

/// Initial guesses for every strategy, `None` where one could not be built
pub fn initial_guesses(
    a: &DMatrix<f64>,
    b: &DMatrix<f64>,
    config: &PermutationConfig,
) -> Vec<(GuessStrategy, Option<DMatrix<f64>>)> {
    let (approx, best) = match orthogonal_2sided_single(a, b, config.symmetry_tol) {
        Ok(ortho) => (
            nearest_transposed(a, &ortho.u_approx, GuessStrategy::OrthogonalApprox),
            nearest_transposed(a, &ortho.u_best, GuessStrategy::OrthogonalBest),
        ),
        Err(err) => {
            warn!("skipping orthogonal guesses: {}", err);
            (None, None)
        }
    };

    let rows = config.profile_rows();
    let profile_a = sorted_profile(a, config.p, rows);
    let profile_b = sorted_profile(b, config.p, rows);
    let profile = match match_permutation(&profile_a, &profile_b) {
        Ok(matched) => Some(matched.permutation),
        Err(err) => {
            warn!("skipping {} guess: {}", GuessStrategy::SortedProfile, err);
            None
        }
    };

    vec![
        (GuessStrategy::OrthogonalApprox, approx),
        (GuessStrategy::OrthogonalBest, best),
        (GuessStrategy::SortedProfile, profile),
    ]
}

fn nearest_transposed(
    a: &DMatrix<f64>,
    u: &DMatrix<f64>,
    strategy: GuessStrategy,
) -> Option<DMatrix<f64>> {
    match match_permutation(a, u) {
        Ok(matched) => Some(matched.permutation.transpose()),
        Err(err) => {
            warn!("skipping {} guess: {}", strategy, err);
            None
        }
    }
}

/// Sorted profile of a square matrix
///
/// Column `j` describes vertex `j` of `m`: row 0 holds `m[j,j]` and rows
/// `1..n` hold the off-diagonal entries of row `j` from greatest to least,
/// row `k` weighted by `p^k`. Only the first `min(n, rows)` rows are kept.
/// Rows index sorted rank, not vertices.
pub fn sorted_profile(m: &DMatrix<f64>, p: f64, rows: usize) -> DMatrix<f64> {
    let n = m.nrows();
    let kept = n.min(rows);
    let mut profile = DMatrix::zeros(kept, n);

    for j in 0..n {
        if kept > 0 {
            profile[(0, j)] = m[(j, j)];
        }
        let mut off_diagonal: Vec<f64> = (0..n).filter(|&k| k != j).map(|k| m[(j, k)]).collect();
        off_diagonal.sort_by(|x, y| y.total_cmp(x));

        for (k, value) in off_diagonal.into_iter().enumerate().take(kept.saturating_sub(1)) {
            profile[(k + 1, j)] = value * p.powi(k as i32 + 1);
        }
    }

    profile
}

/// Multiplicative refinement of a guess
///
/// `T = A P0 B` stays fixed. Each sweep builds `D = P (P^T T + (P^T T)^T)`
/// from the sweep-start iterate and replaces every entry by
/// `P[i,j] * sqrt(|2 T[i,j] / D[i,j]|)`. An entry with `2 T[i,j] = D[i,j] = 0`
/// is left as it is.
pub fn refine(
    a: &DMatrix<f64>,
    b: &DMatrix<f64>,
    guess: &DMatrix<f64>,
    config: &PermutationConfig,
) -> Refinement {
    let t = a * guess * b;
    let (n, m) = guess.shape();
    let mut current = guess.clone();

    for sweep in 0..config.max_sweeps {
        let pt_t = current.transpose() * &t;
        let d = &current * (&pt_t + pt_t.transpose());

        let mut next = DMatrix::zeros(n, m);
        for j in 0..m {
            for i in 0..n {
                match update_entry(current[(i, j)], 2.0 * t[(i, j)], d[(i, j)]) {
                    Some(value) => next[(i, j)] = value,
                    None => {
                        return Refinement {
                            outcome: RefineOutcome::NumericalBreakdown,
                            matrix: current,
                            sweeps: sweep,
                        }
                    }
                }
            }
        }

        let change = (&next - &current).norm_squared();
        current = next;
        if change < config.tol {
            return Refinement {
                outcome: RefineOutcome::Converged,
                matrix: current,
                sweeps: sweep + 1,
            };
        }
    }

    Refinement {
        outcome: RefineOutcome::Diverged,
        matrix: current,
        sweeps: config.max_sweeps,
    }
}

/// One entry of a sweep, `None` on breakdown
fn update_entry(value: f64, num: f64, den: f64) -> Option<f64> {
    if !num.is_finite() || !den.is_finite() {
        return None;
    }
    if den == 0.0 {
        return if num == 0.0 { Some(value) } else { None };
    }
    let updated = value * (num / den).abs().sqrt();
    updated.is_finite().then_some(updated)
}

fn run_branch(
    a: &DMatrix<f64>,
    b: &DMatrix<f64>,
    strategy: GuessStrategy,
    guess: Option<&DMatrix<f64>>,
    config: &PermutationConfig,
) -> Result<(BranchReport, Option<Candidate>)> {
    let Some(guess) = guess else {
        return Ok((
            BranchReport {
                strategy,
                status: BranchStatus::Skipped,
                sweeps: 0,
                error: None,
            },
            None,
        ));
    };

    let refinement = refine(a, b, guess, config);
    let mut report = BranchReport {
        strategy,
        status: BranchStatus::Refined(refinement.outcome),
        sweeps: refinement.sweeps,
        error: None,
    };

    match refinement.outcome {
        RefineOutcome::NumericalBreakdown => {
            warn!(
                "{} branch broke down after {} sweeps",
                strategy, refinement.sweeps
            );
            return Ok((report, None));
        }
        RefineOutcome::Diverged => {
            warn!(
                "{} branch hit the sweep cap ({}) without converging",
                strategy, refinement.sweeps
            );
        }
        RefineOutcome::Converged => {}
    }

    let identity = DMatrix::identity(guess.nrows(), guess.nrows());
    let permutation = match_permutation(&identity, &refinement.matrix)?.permutation;
    let transformed = permutation.transpose() * a * &permutation;
    let error = compute_error(a, b, &permutation, Some(&permutation))?;
    report.error = Some(error);

    debug!(
        "{} branch: {:?} after {} sweeps, error {:e}",
        strategy, refinement.outcome, refinement.sweeps, error
    );

    Ok((
        report,
        Some(Candidate {
            strategy,
            permutation,
            transformed,
            error,
        }),
    ))
}

/// First candidate with the strictly smallest error
pub fn select_best(candidates: Vec<Candidate>) -> Option<Candidate> {
    candidates.into_iter().fold(None, |best, candidate| match best {
        Some(current) if current.error <= candidate.error => Some(current),
        _ => Some(candidate),
    })
}

#[cfg(test)]
#[path = "two_sided_permutation_tests.rs"]
mod tests;
