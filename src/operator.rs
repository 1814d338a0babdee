//! Linear operator abstraction (C1).
//!
//! The solver never materializes `A`; it only ever calls `apply`. Shift-and-
//! invert mode additionally requires `apply_shift_solve`, computing
//! `(A - sigma*I)^-1 * x`, and `set_shift` to move `sigma`.
//!
//! The operator is borrowed, not owned, for the solver's lifetime (mirrors
//! `krylov::gmres::Gmres`'s `a: &'a F` field) and is treated as a pure
//! function of its input with respect to any state observable through
//! `apply`; operator call counts are tracked by the solver, not the
//! operator.

use crate::types::RealField;
use ndarray::{Array1, ArrayView1};

/// Required capability set: dimension and matrix-vector product.
pub trait LinearOperator<A: RealField> {
    /// Dimension `n` of the operator.
    fn rows(&self) -> usize;

    /// `y <- A * x`. Must not mutate `x` and must fully write `y`.
    fn apply(&self, x: ArrayView1<A>, y: &mut Array1<A>);
}

/// Additional capability set required for shift-and-invert mode.
pub trait ShiftSolve<A: RealField>: LinearOperator<A> {
    /// Move the spectral transformation point to `sigma`.
    ///
    /// Takes `&self`: an operator that needs to refactorize `A - sigma*I`
    /// internally must provide its own interior mutability (§4.1, §5).
    fn set_shift(&self, sigma: A);

    /// `y <- (A - sigma*I)^-1 * x` for the current shift.
    fn apply_shift_solve(&self, x: ArrayView1<A>, y: &mut Array1<A>);
}

/// A dense matrix used directly as an operator (scenario tests S1-S3, S5-S6).
impl<A: RealField> LinearOperator<A> for ndarray::Array2<A> {
    fn rows(&self) -> usize {
        self.nrows()
    }

    fn apply(&self, x: ArrayView1<A>, y: &mut Array1<A>) {
        y.assign(&self.dot(&x));
    }
}

/// Wraps a closure as a [`LinearOperator`], for operators that are neither a
/// dense nor a user-defined tagged type (§9: "one tagged variant per
/// operator kind").
pub struct FnOperator<A, F> {
    n: usize,
    apply: F,
    _marker: std::marker::PhantomData<A>,
}

impl<A, F> FnOperator<A, F>
where
    A: RealField,
    F: Fn(ArrayView1<A>, &mut Array1<A>),
{
    pub fn new(n: usize, apply: F) -> Self {
        FnOperator {
            n,
            apply,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<A, F> LinearOperator<A> for FnOperator<A, F>
where
    A: RealField,
    F: Fn(ArrayView1<A>, &mut Array1<A>),
{
    fn rows(&self) -> usize {
        self.n
    }

    fn apply(&self, x: ArrayView1<A>, y: &mut Array1<A>) {
        (self.apply)(x, y)
    }
}
