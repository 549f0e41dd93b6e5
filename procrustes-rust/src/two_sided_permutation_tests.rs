use super::*;
use approx::assert_abs_diff_eq;
use procrustes_linalg::{is_permutation_matrix, permutation_matrix};

fn sample() -> DMatrix<f64> {
    DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0])
}

#[test]
fn test_default_config() {
    let config = PermutationConfig::default();
    assert_eq!(config.tol, 1e-5);
    assert_abs_diff_eq!(config.p, 2.0_f64.powf(-0.5), epsilon = 1e-15);
    assert_eq!(config.max_sweeps, 1000);
    assert_eq!(config.symmetry_tol, 1e-10);
    assert!(!config.setup.translate);
    assert!(!config.setup.scale);
    assert_eq!(config.setup.pad_mode, PaddingMode::Square);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation() {
    for p in [0.0, 1.0, -0.5, f64::NAN] {
        assert!(matches!(
            PermutationConfig::new(1e-5, p).validate(),
            Err(ProcrustesError::InvalidParameter(_))
        ));
    }
    assert!(PermutationConfig::new(-1.0, 0.5).validate().is_err());
    assert!(PermutationConfig::new(f64::INFINITY, 0.5).validate().is_err());
    assert!(PermutationConfig::default()
        .with_max_sweeps(0)
        .validate()
        .is_err());
    assert!(PermutationConfig::new(0.0, 0.5).validate().is_ok());
}

#[test]
fn test_profile_rows() {
    assert_eq!(PermutationConfig::default().profile_rows(), 15);
    // -2 ln 10 / ln 0.5 + 1 = 7.64...
    assert_eq!(PermutationConfig::new(1e-5, 0.5).profile_rows(), 8);
}

#[test]
fn test_sorted_profile_layout() {
    let m = DMatrix::from_row_slice(3, 3, &[1.0, 5.0, 2.0, 5.0, 3.0, 4.0, 2.0, 4.0, 6.0]);
    let profile = sorted_profile(&m, 0.5, 15);
    let expected = DMatrix::from_row_slice(
        3,
        3,
        &[1.0, 3.0, 6.0, 2.5, 2.5, 2.0, 0.5, 1.0, 0.5],
    );
    assert_eq!(profile, expected);

    let truncated = sorted_profile(&m, 0.5, 2);
    assert_eq!(truncated, expected.rows(0, 2).into_owned());
}

#[test]
fn test_update_entry() {
    assert_eq!(update_entry(0.5, 0.0, 0.0), Some(0.5));
    assert_eq!(update_entry(1.0, 1.0, 0.0), None);
    assert_eq!(update_entry(1.0, 4.0, 1.0), Some(2.0));
    assert_eq!(update_entry(3.0, -4.0, 1.0), Some(6.0));
    assert_eq!(update_entry(1.0, f64::NAN, 1.0), None);
    assert_eq!(update_entry(1.0, 1.0, f64::INFINITY), None);
}

#[test]
fn test_refine_converges_at_fixed_point() {
    let a = sample();
    let identity = DMatrix::<f64>::identity(2, 2);
    let refinement = refine(&a, &a, &identity, &PermutationConfig::default());

    assert_eq!(refinement.outcome, RefineOutcome::Converged);
    assert_eq!(refinement.sweeps, 1);
    assert_eq!(refinement.matrix, identity);
}

#[test]
fn test_refine_hits_sweep_cap() {
    let a = sample();
    let identity = DMatrix::<f64>::identity(2, 2);
    let config = PermutationConfig::new(0.0, 0.5).with_max_sweeps(1);
    let refinement = refine(&a, &a, &identity, &config);

    assert_eq!(refinement.outcome, RefineOutcome::Diverged);
    assert_eq!(refinement.sweeps, 1);
}

#[test]
fn test_refine_zero_denominator_breaks_down() {
    // second row of D vanishes while T[1, 0] = 2
    let a = sample();
    let guess = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 0.0]);
    let refinement = refine(&a, &a, &guess, &PermutationConfig::default());

    assert_eq!(refinement.outcome, RefineOutcome::NumericalBreakdown);
    assert_eq!(refinement.sweeps, 0);
    assert_eq!(refinement.matrix, guess);
}

#[test]
fn test_refine_nan_guess_breaks_down() {
    let a = sample();
    let guess = DMatrix::from_row_slice(2, 2, &[f64::NAN, 0.0, 0.0, 1.0]);
    let refinement = refine(&a, &a, &guess, &PermutationConfig::default());
    assert_eq!(refinement.outcome, RefineOutcome::NumericalBreakdown);
}

#[test]
fn test_select_best_keeps_first_strict_minimum() {
    let candidate = |strategy, error| Candidate {
        strategy,
        permutation: DMatrix::identity(2, 2),
        transformed: DMatrix::zeros(2, 2),
        error,
    };
    let best = select_best(vec![
        candidate(GuessStrategy::OrthogonalApprox, 1.0),
        candidate(GuessStrategy::OrthogonalBest, 0.5),
        candidate(GuessStrategy::SortedProfile, 0.5),
    ])
    .unwrap();
    assert_eq!(best.strategy, GuessStrategy::OrthogonalBest);

    assert!(select_best(Vec::new()).is_none());
}

#[test]
fn test_zero_matrix() {
    let zero = DMatrix::<f64>::zeros(2, 2);
    let result = permutation_2sided_single(&zero, &zero, &PermutationConfig::default()).unwrap();

    assert_eq!(result.permutation, DMatrix::<f64>::identity(2, 2));
    assert_eq!(result.error, 0.0);
    assert_eq!(result.branches.len(), 3);
}

#[test]
fn test_swap_matrix() {
    let a = DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 1.0, 0.0]);
    let result = permutation_2sided_single(&a, &a, &PermutationConfig::default()).unwrap();

    assert!(is_permutation_matrix(&result.permutation, 0.0));
    assert_abs_diff_eq!(result.error, 0.0, epsilon = 1e-12);
    assert_eq!(result.transformed, a);
}

#[test]
fn test_rank_one_skips_orthogonal_guesses() {
    let a = DMatrix::from_element(2, 2, 1.0);
    let result = permutation_2sided_single(&a, &a, &PermutationConfig::default()).unwrap();

    assert_eq!(result.branches[0].status, BranchStatus::Skipped);
    assert_eq!(result.branches[1].status, BranchStatus::Skipped);
    assert_eq!(result.branches[0].error, None);
    assert_eq!(result.strategy, GuessStrategy::SortedProfile);
    assert_abs_diff_eq!(result.error, 0.0, epsilon = 1e-12);
}

#[test]
fn test_recovers_small_relabelling() {
    let a = DMatrix::from_row_slice(
        3,
        3,
        &[4.0, 1.0, 0.5, 1.0, 3.0, 2.0, 0.5, 2.0, 1.0],
    );
    let p = permutation_matrix(&[2, 0, 1]);
    let b = p.transpose() * &a * &p;

    let result = permutation_2sided_single(&a, &b, &PermutationConfig::default()).unwrap();
    assert_eq!(result.permutation, p);
    assert_abs_diff_eq!(result.error, 0.0, epsilon = 1e-12);
}

#[test]
fn test_rejects_asymmetric_input() {
    let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    let b = sample();
    assert!(matches!(
        permutation_2sided_single(&a, &b, &PermutationConfig::default()),
        Err(ProcrustesError::NotSymmetric { .. })
    ));
    assert!(matches!(
        permutation_2sided_single(&b, &a, &PermutationConfig::default()),
        Err(ProcrustesError::NotSymmetric { .. })
    ));
}

#[test]
fn test_rejects_bad_shapes_and_values() {
    let a = sample();
    let b = DMatrix::<f64>::identity(3, 3);
    let unpadded = PermutationConfig::default().with_setup(SetupOptions::new().with_pad(false));
    assert!(matches!(
        permutation_2sided_single(&a, &b, &unpadded),
        Err(ProcrustesError::ShapeMismatch { .. })
    ));

    let nan = DMatrix::from_row_slice(2, 2, &[1.0, f64::NAN, f64::NAN, 1.0]);
    assert_eq!(
        permutation_2sided_single(&nan, &a, &PermutationConfig::default()).unwrap_err(),
        ProcrustesError::NonFinite
    );

    let bad = PermutationConfig::new(1e-5, 1.5);
    assert!(matches!(
        permutation_2sided_single(&a, &a, &bad),
        Err(ProcrustesError::InvalidParameter(_))
    ));
}

#[test]
fn test_padding_to_common_size() {
    let a = sample();
    let b = DMatrix::from_row_slice(3, 3, &[3.0, 1.0, 0.0, 1.0, 2.0, 0.0, 0.0, 0.0, 0.0]);
    let result = permutation_2sided_single(&a, &b, &PermutationConfig::default()).unwrap();

    assert_eq!(result.permutation.shape(), (3, 3));
    assert_abs_diff_eq!(result.error, 0.0, epsilon = 1e-12);
}

#[test]
fn test_broken_down_branch_is_not_scored() {
    let a = sample();
    let guess = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 0.0]);
    let (report, candidate) = run_branch(
        &a,
        &a,
        GuessStrategy::SortedProfile,
        Some(&guess),
        &PermutationConfig::default(),
    )
    .unwrap();

    assert_eq!(
        report.status,
        BranchStatus::Refined(RefineOutcome::NumericalBreakdown)
    );
    assert_eq!(report.error, None);
    assert!(candidate.is_none());
}

#[test]
fn test_missing_guess_is_skipped() {
    let a = sample();
    let (report, candidate) = run_branch(
        &a,
        &a,
        GuessStrategy::OrthogonalBest,
        None,
        &PermutationConfig::default(),
    )
    .unwrap();

    assert_eq!(report.status, BranchStatus::Skipped);
    assert_eq!(report.sweeps, 0);
    assert!(candidate.is_none());
}

#[test]
fn test_every_branch_breaking_down_is_an_error() {
    // D vanishes for both 2x2 permutations while T does not
    let a = DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 1.0, 0.0]);
    let b = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, -1.0]);
    assert_eq!(
        permutation_2sided_single(&a, &b, &PermutationConfig::default()).unwrap_err(),
        ProcrustesError::NoValidCandidate
    );
}
