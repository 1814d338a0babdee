//! Ritz extractor (C5): dense eigendecomposition of the small Hessenberg
//! matrix, sorted by the active [`SelectionRule`], with the bottom-row
//! convergence estimator.
//!
//! The eigendecomposition itself is delegated to `ndarray_linalg::Eig`
//! rather than reimplemented (the teacher's own `lobpcg` module likewise
//! reuses sibling decomposition routines from the same crate family).

use crate::error::Result;
use crate::select::SelectionRule;
use crate::types::RealField;
use ndarray::{Array1, Array2};
use ndarray_linalg::Eig;
use num_traits::Zero;

/// The `m` Ritz pairs of an order-`m` Hessenberg matrix, sorted by a
/// [`SelectionRule`].
pub struct RitzPairs<A: RealField> {
    pub values: Array1<A::Complex>,
    pub vectors: Array2<A::Complex>,
}

impl<A: RealField> RitzPairs<A> {
    /// Diagonalizes `h` and sorts the resulting pairs by `rule` (§4.5).
    pub fn extract(h: &Array2<A>, rule: SelectionRule) -> Result<Self> {
        let (values, vectors) = h.eig()?;
        let perm = rule.sort_with_perm(values.as_slice().unwrap());

        let m = values.len();
        let mut sorted_values = Array1::from_elem(m, A::Complex::zero());
        let mut sorted_vectors = Array2::from_elem((m, m), A::Complex::zero());
        for (new_i, &old_i) in perm.iter().enumerate() {
            sorted_values[new_i] = values[old_i];
            sorted_vectors
                .column_mut(new_i)
                .assign(&vectors.column(old_i));
        }

        Ok(RitzPairs {
            values: sorted_values,
            vectors: sorted_vectors,
        })
    }

    /// `converged_i <=> |y_i[m-1]| * ||f|| < tol * max(eps^{2/3}, |theta_i|)`
    /// for `i` in `0..k` (§4.5).
    pub fn convergence_mask(&self, k: usize, f_norm: A, tol: A, eps_2_3: A) -> Vec<bool> {
        let m = self.values.len();
        (0..k)
            .map(|i| {
                let err = self.vectors[(m - 1, i)].abs() * f_norm;
                let scale = if eps_2_3 > self.values[i].abs() {
                    eps_2_3
                } else {
                    self.values[i].abs()
                };
                err < tol * scale
            })
            .collect()
    }
}
