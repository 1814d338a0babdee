//! Define Errors

use thiserror::Error;

pub type Result<T> = ::std::result::Result<T, IramError>;

/// Master error type of this crate.
///
/// `NonConvergence` deliberately has no variant here: per §7 returning
/// `nconv < k` after `maxit` restarts is a normal (non-error) outcome, read
/// off `compute`'s return value.
#[derive(Debug, Error)]
pub enum IramError {
    /// k < 1, k >= n, m <= k, or a near-zero initial residual.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Accessing results before `compute()` has been called.
    #[error("result accessed before compute() was called")]
    NotComputed,

    /// The small Hessenberg eigendecomposition failed in LAPACK.
    #[error(transparent)]
    Lapack(#[from] ndarray_linalg::error::LinalgError),
}
