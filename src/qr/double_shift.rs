//! Francis double-implicit-shift bulge-chasing QR sweep (C3).
//!
//! Performs, in real arithmetic, the action of two single-shift QR steps
//! with a complex-conjugate shift pair `mu, conj(mu)`, using only the real
//! quantities `s = 2*Re(mu)` and `t = |mu|^2`. Grounded in the classic
//! Francis bulge-chase (same first-column `x, y, z` construction and
//! Householder/Givens interleaving as `rulinalg`'s
//! `francis_shift_eigenvalues`), adapted to act as a single externally-driven
//! sweep rather than a full deflating eigenvalue loop: the IRAM driver picks
//! `(s, t)` from a chosen unwanted Ritz pair and this type applies exactly
//! one sweep.

use crate::types::{eps_0_9, RealField};
use ndarray::{Array1, Array2};

/// A 3- (or, at the tail of a block, 2-) component Householder reflector,
/// or `None` for an identity reflector (norm collapsed below `eps^0.9`).
type Reflector<A> = Option<Vec<A>>;

pub struct DoubleShiftQR<A: RealField> {
    h: Array2<A>,
    q: Array2<A>,
}

impl<A: RealField> DoubleShiftQR<A> {
    /// Applies one double-shift sweep with `s = mu + conj(mu)`,
    /// `t = mu * conj(mu)`.
    pub fn new(h_in: &Array2<A>, s: A, t: A) -> Self {
        let m = h_in.nrows();
        let mut h = h_in.clone();
        let mut q = Array2::eye(m);
        let tol = eps_0_9::<A>();

        // Step 1: split into unreduced diagonal blocks.
        let mut blocks = Vec::new();
        let mut start = 0;
        for i in 1..m {
            if h[(i, i - 1)].abs() <= tol * (h[(i - 1, i - 1)].abs() + h[(i, i)].abs()) {
                h[(i, i - 1)] = A::zero();
                blocks.push((start, i));
                start = i;
            }
        }
        blocks.push((start, m));

        for (lo, hi) in blocks {
            if hi - lo >= 3 {
                bulge_chase(&mut h, &mut q, lo, hi, s, t, tol);
            }
            // Blocks of size 1 or 2 contribute identity reflectors (step 6).
        }

        DoubleShiftQR { h, q }
    }

    /// `Qᵀ*H*Q`, the swept Hessenberg matrix.
    pub fn matrix_qthq(&self) -> Array2<A> {
        self.h.clone()
    }

    /// `Y <- Y*Q`.
    pub fn apply_yq(&self, y: &mut Array2<A>) {
        let new_y = y.dot(&self.q);
        y.assign(&new_y);
    }

    /// `y <- Qᵀ*y`.
    pub fn apply_qty(&self, y: &mut Array1<A>) {
        let new_y = self.q.t().dot(y);
        y.assign(&new_y);
    }
}

/// Chases the Francis bulge across the active block `[lo, hi)` of `h`,
/// accumulating the reflectors into `q` (full-size, `m x m`).
fn bulge_chase<A: RealField>(
    h: &mut Array2<A>,
    q: &mut Array2<A>,
    lo: usize,
    hi: usize,
    s: A,
    t: A,
    tol: A,
) {
    let m = h.nrows();
    let n = hi - lo;

    let h00 = h[(lo, lo)];
    let h01 = h[(lo, lo + 1)];
    let h10 = h[(lo + 1, lo)];
    let h11 = h[(lo + 1, lo + 1)];
    let h21 = h[(lo + 2, lo + 1)];

    let mut x = h00 * (h00 - s) + h01 * h10 + t;
    let mut y = h10 * (h00 + h11 - s);
    let mut z = h21 * h10;

    // n-1 reflectors total: a leading run of 3-vectors, shrinking to a
    // final 2-vector at the bottom of the block (steps 3-5).
    for k in 0..(n - 1) {
        let row0 = lo + k;
        let last_row = hi - 1;
        let width = (last_row - row0 + 1).min(3);

        let refl: Reflector<A> = if width == 3 {
            householder(&[x, y, z], tol)
        } else {
            householder(&[x, y], tol)
        };

        if let Some(v) = refl {
            let rows: Vec<usize> = (row0..row0 + v.len()).collect();
            // Apply from the left across all columns from max(lo, row0-1)
            // onward, i.e. the whole trailing part of the matrix touched by
            // this block's sweep.
            let col_start = if k == 0 { lo } else { row0 - 1 };
            apply_left(h, &rows, col_start, m, &v);
            // Apply from the right across all rows above, accumulating
            // into both H and Q to track the similarity transform.
            apply_right(h, 0, hi, &rows, &v);
            apply_right(q, 0, m, &rows, &v);
        }

        if k + 2 < n {
            x = h[(lo + k + 1, lo + k)];
            y = h[(lo + k + 2, lo + k)];
            z = if k + 3 < n {
                h[(lo + k + 3, lo + k)]
            } else {
                A::zero()
            };
        }
    }
}

/// Builds a Householder reflector for `x` (length 2 or 3), per the sign
/// convention `rho = -sign(x1)`. Returns `None` (identity) if the input or
/// the reflector vector norm falls below `tol`.
fn householder<A: RealField>(x: &[A], tol: A) -> Reflector<A> {
    let norm_sq = x.iter().fold(A::zero(), |acc, &xi| acc + xi * xi);
    let norm = norm_sq.sqrt();
    if norm <= tol {
        return None;
    }
    let rho = if x[0] >= A::zero() { -A::one() } else { A::one() };
    let alpha = rho * norm;
    let mut v: Vec<A> = x.to_vec();
    v[0] = v[0] - alpha;
    let vnorm_sq = v.iter().fold(A::zero(), |acc, &vi| acc + vi * vi);
    let vnorm = vnorm_sq.sqrt();
    if vnorm <= tol {
        return None;
    }
    for vi in v.iter_mut() {
        *vi = *vi / vnorm;
    }
    Some(v)
}

/// `H(rows, col_start..col_end) <- (I - 2*v*vT) * H(rows, col_start..col_end)`.
fn apply_left<A: RealField>(h: &mut Array2<A>, rows: &[usize], col_start: usize, col_end: usize, v: &[A]) {
    for col in col_start..col_end {
        let mut dot = A::zero();
        for (k, &r) in rows.iter().enumerate() {
            dot = dot + v[k] * h[(r, col)];
        }
        let two = A::one() + A::one();
        for (k, &r) in rows.iter().enumerate() {
            h[(r, col)] = h[(r, col)] - two * v[k] * dot;
        }
    }
}

/// `H(row_start..row_end, cols) <- H(row_start..row_end, cols) * (I - 2*v*vT)`.
fn apply_right<A: RealField>(h: &mut Array2<A>, row_start: usize, row_end: usize, cols: &[usize], v: &[A]) {
    for row in row_start..row_end {
        let mut dot = A::zero();
        for (k, &c) in cols.iter().enumerate() {
            dot = dot + v[k] * h[(row, c)];
        }
        let two = A::one() + A::one();
        for (k, &c) in cols.iter().enumerate() {
            h[(row, c)] = h[(row, c)] - two * v[k] * dot;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_shift_preserves_hessenberg_and_trace() {
        let h: Array2<f64> = Array2::from_shape_vec(
            (4, 4),
            vec![
                2.0, 1.0, 0.5, 0.0, 3.0, 4.0, 1.0, 0.5, 0.0, 2.0, 5.0, 1.0, 0.0, 0.0, 1.0, 6.0,
            ],
        )
        .unwrap();
        let step = DoubleShiftQR::new(&h, 0.0, 0.0);
        let swept = step.matrix_qthq();
        for i in 0..4 {
            for j in 0..4 {
                if i > j + 1 {
                    assert!(swept[(i, j)].abs() < 1e-6);
                }
            }
        }
        let tr_before: f64 = (0..4).map(|i| h[(i, i)]).sum();
        let tr_after: f64 = (0..4).map(|i| swept[(i, i)]).sum();
        assert!((tr_before - tr_after).abs() < 1e-6);
    }
}
