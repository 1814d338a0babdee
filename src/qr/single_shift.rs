//! Single-shift real Hessenberg QR step (C2).

use crate::types::{eps_0_9, RealField};
use ndarray::{Array1, Array2};

/// One step of `H - mu*I = Q*R` via `m-1` Givens rotations annihilating the
/// subdiagonal in order, with the rotation and its transpose exposed
/// separately so callers can push `Q` through `V` (`apply_yq`) and `Qᵀ`
/// through the tracked unit vector (`apply_qty`) without forming `Q`
/// explicitly.
pub struct SingleShiftQR<A: RealField> {
    /// `R`, i.e. `H - mu*I` reduced to upper-triangular form.
    r: Array2<A>,
    /// `(c_i, s_i)` for the rotation zeroing `H(i, i-1)`, `i = 1..m`.
    /// `(1, 0)` marks a skipped (identity) rotation.
    rot: Vec<(A, A)>,
    mu: A,
    m: usize,
}

impl<A: RealField> SingleShiftQR<A> {
    /// Factors `H - mu*I = Q*R`.
    pub fn new(h: &Array2<A>, mu: A) -> Self {
        let m = h.nrows();
        let mut r = h.clone();
        for i in 0..m {
            r[(i, i)] = r[(i, i)] - mu;
        }
        let tol = eps_0_9::<A>();
        let mut rot = Vec::with_capacity(m.saturating_sub(1));
        for i in 1..m {
            let a = r[(i - 1, i - 1)];
            let b = r[(i, i - 1)];
            let norm = (a * a + b * b).sqrt();
            if norm <= tol {
                rot.push((A::one(), A::zero()));
                continue;
            }
            let c = a / norm;
            let s = b / norm;
            rot.push((c, s));
            for col in (i - 1)..m {
                let top = r[(i - 1, col)];
                let bot = r[(i, col)];
                r[(i - 1, col)] = c * top + s * bot;
                r[(i, col)] = -s * top + c * bot;
            }
        }
        SingleShiftQR { r, rot, mu, m }
    }

    /// `R*Q`, again upper-Hessenberg.
    pub fn matrix_rq(&self) -> Array2<A> {
        let mut y = self.r.clone();
        self.apply_yq(&mut y);
        y
    }

    /// `H'`, the new Hessenberg matrix similar to the original: `R*Q + mu*I`.
    pub fn shifted_h(&self) -> Array2<A> {
        let mut h = self.matrix_rq();
        for i in 0..self.m {
            h[(i, i)] = h[(i, i)] + self.mu;
        }
        h
    }

    /// `Y <- Y*Q`, where `Q = G_1ᵀ*G_2ᵀ*...*G_{m-1}ᵀ` (the `R` above is
    /// `G_{m-1}*...*G_1*(H-mu*I)`, so `Q` is its inverse/transpose applied
    /// in the same left-to-right order).
    pub fn apply_yq(&self, y: &mut Array2<A>) {
        for (i, &(c, s)) in self.rot.iter().enumerate() {
            let i = i + 1;
            for row in 0..y.nrows() {
                let left = y[(row, i - 1)];
                let right = y[(row, i)];
                y[(row, i - 1)] = c * left + s * right;
                y[(row, i)] = -s * left + c * right;
            }
        }
    }

    /// `y <- Qᵀ*y = G_{m-1}*...*G_1*y`: the same rotations used to build
    /// `R`, applied in the same left-to-right order (not reversed).
    pub fn apply_qty(&self, y: &mut Array1<A>) {
        for (i, &(c, s)) in self.rot.iter().enumerate() {
            let i = i + 1;
            let top = y[i - 1];
            let bot = y[i];
            y[i - 1] = c * top + s * bot;
            y[i] = -s * top + c * bot;
        }
    }
}
