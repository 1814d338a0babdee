//! `iram` implements the core of the Implicitly Restarted Arnoldi Method
//! (IRAM) for computing a handful of extremal eigenpairs of a large
//! nonsymmetric real matrix supplied only as an abstract linear operator.
//!
//! The two hardest pieces of the method live here: the Arnoldi factorization
//! with re-orthogonalization ([`arnoldi`]), and the implicit restart driven
//! by shifted QR sweeps on the small upper-Hessenberg matrix, including the
//! real bulge-chasing double-shift variant used when unwanted Ritz values
//! come in complex-conjugate pairs ([`qr`]).
//!
//! Concrete dense/sparse matrix products, the symmetric (Lanczos) variant,
//! and I/O are all out of scope: callers provide their own [`LinearOperator`]
//! and drive the solver through [`Iram`].
//!
//! Naming convention
//! -----------------
//! Mirrors `ndarray-linalg`: routines are exposed as traits over `ArrayBase`
//! where that makes sense (e.g. `impl LinearOperator for Array2<A>`), and the
//! top-level driver is a struct built with a small set of chained
//! configuration methods.

#![allow(clippy::many_single_char_names, clippy::type_complexity)]

pub mod arnoldi;
pub mod error;
pub mod generate;
pub mod iram;
pub mod operator;
pub mod qr;
pub mod ritz;
pub mod select;
pub mod shift_invert;
pub mod types;

pub use crate::arnoldi::*;
pub use crate::error::*;
pub use crate::generate::*;
pub use crate::iram::*;
pub use crate::operator::*;
pub use crate::qr::*;
pub use crate::ritz::*;
pub use crate::select::*;
pub use crate::shift_invert::*;
pub use crate::types::*;
