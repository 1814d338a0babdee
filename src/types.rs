//! Basic scalar bounds and the derived tolerances used throughout the crate.

pub use cauchy::Scalar;
pub use lax::Lapack;

pub use num_complex::Complex32 as c32;
pub use num_complex::Complex64 as c64;

use num_traits::{Float, NumCast};

/// Real scalar type usable as the working precision of the solver.
///
/// `ndarray_linalg::Eig` requires `Scalar + Lapack`; `Real = Self` restricts
/// this to the two real floating-point types (`f32`, `f64`) since the solver
/// works with a real operator and only lets the Ritz values go complex.
pub trait RealField: Scalar<Real = Self> + Lapack + Float {}

impl<T> RealField for T where T: Scalar<Real = T> + Lapack + Float {}

/// Orthogonality / breakdown tolerance `ε^{2/3}`.
///
/// Used both as the Arnoldi re-orthogonalization trigger and as the
/// numerical-breakdown threshold on the residual norm (§3, §4.4, §7).
pub fn eps_2_3<A: Scalar>() -> A::Real
where
    A::Real: Float,
{
    A::Real::epsilon().powf(NumCast::from(2.0 / 3.0).unwrap())
}

/// Near-zero tolerance `ε^{0.9}` used to skip negligible Givens/Householder
/// rotations in the QR sweeps (§4.2, §4.3).
pub fn eps_0_9<A: Scalar>() -> A::Real
where
    A::Real: Float,
{
    A::Real::epsilon().powf(NumCast::from(0.9).unwrap())
}
