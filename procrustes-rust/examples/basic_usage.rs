//! Basic usage example for procrustes-rust

use procrustes_rust::linalg::permutation_matrix;
use procrustes_rust::*;

fn main() -> Result<()> {
    println!("=== Procrustes Examples ===\n");

    // Example 1: recover a relabelling of a weighted graph
    println!("1. Two-sided permutation, single transformation");
    let a = DMatrix::from_row_slice(
        4,
        4,
        &[
            0.0, 3.0, 1.0, 0.0, //
            3.0, 0.0, 2.0, 5.0, //
            1.0, 2.0, 0.0, 4.0, //
            0.0, 5.0, 4.0, 0.0,
        ],
    );
    let p = permutation_matrix(&[2, 0, 3, 1]);
    let b = p.transpose() * &a * &p;

    let result = permutation_2sided_single(&a, &b, &PermutationConfig::default())?;
    println!("   Strategy: {}", result.strategy);
    println!("   Error:    {:.3e}", result.error);
    println!("   Recovered the relabelling: {}", result.permutation == p);
    for report in &result.branches {
        println!(
            "   - {:<18} {:?} after {} sweeps, error {:?}",
            report.strategy.to_string(),
            report.status,
            report.sweeps,
            report.error
        );
    }

    // Example 2: one-sided orthogonal Procrustes
    println!("\n2. One-sided orthogonal");
    let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 0.0, 2.0, 1.0, 1.0]);
    let rotation = DMatrix::from_row_slice(2, 2, &[0.0, -1.0, 1.0, 0.0]);
    let y = &x * &rotation;
    let ortho = orthogonal(&x, &y, &SetupOptions::default())?;
    println!("   Error: {:.3e}", ortho.error);
    println!("   Q = {}", ortho.t);

    // Example 3: nearest permutation to a doubly-stochastic-like matrix
    println!("3. Nearest permutation");
    let soft = DMatrix::from_row_slice(3, 3, &[0.2, 0.7, 0.1, 0.6, 0.3, 0.1, 0.2, 0.0, 0.8]);
    let nearest = match_permutation(&DMatrix::identity(3, 3), &soft)?;
    println!("   Assignment: {:?}", nearest.assignment);

    Ok(())
}
