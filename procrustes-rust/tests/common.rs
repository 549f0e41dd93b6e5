//! Common test utilities

#![allow(dead_code)]

use nalgebra::DMatrix;
use procrustes_linalg::permutation_matrix;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Random symmetric matrix with entries drawn from [-5, 5)
pub fn random_symmetric(rng: &mut StdRng, n: usize) -> DMatrix<f64> {
    let mut m = DMatrix::zeros(n, n);
    for i in 0..n {
        for j in i..n {
            let value = rng.gen_range(-5.0..5.0);
            m[(i, j)] = value;
            m[(j, i)] = value;
        }
    }
    m
}

/// Random permutation vector of length `n`
pub fn random_permutation(rng: &mut StdRng, n: usize) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..n).collect();
    perm.shuffle(rng);
    perm
}

/// Relabel `a` with a random permutation, returning `(P, P^T A P)`
pub fn relabel(rng: &mut StdRng, a: &DMatrix<f64>) -> (DMatrix<f64>, DMatrix<f64>) {
    let p = permutation_matrix(&random_permutation(rng, a.nrows()));
    let b = p.transpose() * a * &p;
    (p, b)
}
