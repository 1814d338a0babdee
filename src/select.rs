//! Selection rules (C8): strict weak ordering over complex Ritz values.
//!
//! Ritz values come out of [`ndarray_linalg::Eig`] as `A::Complex` (cauchy's
//! associated complex type for the real working precision `A`), so the
//! comparisons here go through `Scalar`'s own `re()`/`im()`/`abs()` rather
//! than `num_complex::Complex`'s inherent methods.

use cauchy::Scalar;
use std::cmp::Ordering;

/// Which extremal Ritz values the driver should retain.
///
/// Sorting is always descending in the "wanted first" sense: for every rule
/// the first `k` entries after `order` are the wanted ones, the remainder
/// the unwanted (used as exact shifts in §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionRule {
    LargestMagn,
    LargestReal,
    LargestImag,
    SmallestMagn,
    SmallestReal,
    SmallestImag,
}

impl SelectionRule {
    /// Compares two Ritz values per §4.5's table; `Ordering::Less` means `a`
    /// should sort *after* `b` (i.e. this is a "wanted-first" comparator fed
    /// to `sort_by` directly, not reversed).
    pub fn order<C>(self, a: C, b: C) -> Ordering
    where
        C: Scalar,
        C::Real: PartialOrd,
    {
        use SelectionRule::*;
        match self {
            LargestMagn => cmp_desc(a.abs(), b.abs()).then_with(|| cmp_desc(a.re(), b.re())),
            LargestReal => cmp_desc(a.re(), b.re()).then_with(|| cmp_desc(a.im(), b.im())),
            LargestImag => {
                cmp_desc(a.im().abs(), b.im().abs()).then_with(|| cmp_desc(a.re(), b.re()))
            }
            SmallestMagn => cmp_asc(a.abs(), b.abs()).then_with(|| cmp_asc(a.re(), b.re())),
            SmallestReal => cmp_asc(a.re(), b.re()).then_with(|| cmp_asc(a.im(), b.im())),
            SmallestImag => {
                cmp_asc(a.im().abs(), b.im().abs()).then_with(|| cmp_asc(a.re(), b.re()))
            }
        }
    }

    /// Sorts `values` by this rule, returning the permutation: `perm[i]` is
    /// the original index of the value now at position `i`. Callers use it
    /// to permute the corresponding Ritz vectors in lockstep.
    pub fn sort_with_perm<C>(self, values: &[C]) -> Vec<usize>
    where
        C: Scalar,
        C::Real: PartialOrd,
    {
        let mut perm: Vec<usize> = (0..values.len()).collect();
        perm.sort_by(|&i, &j| self.order(values[i], values[j]));
        perm
    }
}

fn cmp_desc<T: PartialOrd>(a: T, b: T) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

fn cmp_asc<T: PartialOrd>(a: T, b: T) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
