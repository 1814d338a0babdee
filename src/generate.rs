//! Generator functions for test matrices and the pseudo-random initial
//! residual (§6: "random vector is drawn uniformly from `[-0.5, 0.5]^n`").

use ndarray::*;
use rand::prelude::*;

use crate::types::Scalar;

/// A pseudo-random initial residual drawn uniformly from `[-0.5, 0.5]^n`
/// (§6). Each implementation exposes its own RNG handle so callers can
/// reproduce a run with a fixed seed.
pub fn random_residual<A, R>(n: usize, rng: &mut R) -> Array1<A>
where
    A: Scalar,
    R: Rng,
{
    Array1::from_shape_fn(n, |_| {
        let u: f64 = rng.gen_range(-0.5..0.5);
        A::from_real(<A::Real as num_traits::NumCast>::from(u).unwrap())
    })
}

/// Construct a square matrix from its diagonal entries.
pub fn from_diag<A>(d: &[A]) -> Array2<A>
where
    A: Scalar,
{
    let n = d.len();
    let mut e = Array::zeros((n, n));
    for i in 0..n {
        e[(i, i)] = d[i];
    }
    e
}
