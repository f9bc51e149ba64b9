//! Destination-first vector and matrix primitives.
//!
//! Matrices are flat row-major `f64` buffers with dimensions carried by the
//! caller, so the matrix variants of these operations are the vector
//! operations applied to the flattened storage. Every routine writes into a
//! caller-supplied destination, which is what keeps the training hot path
//! allocation-free.

use rand::Rng;
use rand_distr::StandardNormal;

/// Element-wise `dst += src`.
///
/// A source shorter than the destination is permitted and leaves the
/// destination tail untouched; a longer source is a shape error.
#[inline]
pub fn sum_into(dst: &mut [f64], src: &[f64]) {
    assert!(
        src.len() <= dst.len(),
        "src len {} exceeds dst len {}",
        src.len(),
        dst.len()
    );

    for (d, &s) in dst.iter_mut().zip(src) {
        *d += s;
    }
}

/// In-place `dst *= k`.
#[inline]
pub fn scale(dst: &mut [f64], k: f64) {
    for d in dst.iter_mut() {
        *d *= k;
    }
}

/// Element-wise `dst = a * b`. All three lengths must match.
#[inline]
pub fn mul_elementwise_into(dst: &mut [f64], a: &[f64], b: &[f64]) {
    assert_eq!(
        a.len(),
        b.len(),
        "a len {} does not match b len {}",
        a.len(),
        b.len()
    );
    assert_eq!(
        dst.len(),
        a.len(),
        "dst len {} does not match operand len {}",
        dst.len(),
        a.len()
    );

    for (d, (&x, &y)) in dst.iter_mut().zip(a.iter().zip(b)) {
        *d = x * y;
    }
}

/// Outer product `dst[i][j] = a[i] * b[j]` into a flat row-major buffer
/// shaped `(a.len(), b.len())`.
#[inline]
pub fn outer_product_into(dst: &mut [f64], a: &[f64], b: &[f64]) {
    assert_eq!(
        dst.len(),
        a.len() * b.len(),
        "dst len {} does not match a.len() * b.len() ({} * {})",
        dst.len(),
        a.len(),
        b.len()
    );

    for (i, &x) in a.iter().enumerate() {
        let row = i * b.len();
        for (j, &y) in b.iter().enumerate() {
            dst[row + j] = x * y;
        }
    }
}

/// Index of the maximal element; ties resolve to the lowest index.
///
/// Panics on an empty slice.
#[inline]
pub fn argmax(v: &[f64]) -> usize {
    assert!(!v.is_empty(), "argmax of an empty vector");

    let mut best = 0;
    for (i, &val) in v.iter().enumerate().skip(1) {
        if val > v[best] {
            best = i;
        }
    }
    best
}

/// A vector of `n` independent draws from the standard normal distribution.
pub fn random_vector<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<f64> {
    (0..n).map(|_| rng.sample(StandardNormal)).collect()
}

/// A flat row-major `(rows, cols)` matrix of independent standard normal draws.
pub fn random_matrix<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Vec<f64> {
    random_vector(rows * cols, rng)
}
