//! Arnoldi factorization with re-orthogonalization (C4).
//!
//! Maintains `F = (V, H, f)` with `A*V_j = V_j*H_j + f*e_j^T` and
//! `V_j^T*V_j = I_j`. Grounded in the shape of `krylov::arnoldi::Arnoldi`
//! (the `V`/`H` layout and the extend-to-completion pattern) and
//! `krylov::mgs::MGS` (append-one-vector-at-a-time orthogonalization), but
//! implements the specific one-step-reorthogonalization-against-the-first-
//! basis-vector heuristic this crate specifies rather than full
//! modified Gram-Schmidt against every prior basis vector.

use crate::error::{IramError, Result};
use crate::operator::LinearOperator;
use crate::types::{eps_2_3, RealField};
use ndarray::{Array1, Array2};

/// An Arnoldi factorization `(V, H, f)` of order up to `m`.
pub struct Arnoldi<A: RealField> {
    v: Array2<A>,
    h: Array2<A>,
    f: Array1<A>,
    /// Current order: columns `0..order` of `V`/`H` are populated.
    order: usize,
    m: usize,
    n_ops: usize,
}

impl<A: RealField> Arnoldi<A> {
    /// Order-0 factorization from an initial residual (§4.4 `init`).
    ///
    /// The residual is normalized; a zero or near-zero initial residual is
    /// an error.
    pub fn init<Op: LinearOperator<A>>(op: &Op, init_resid: Array1<A>, m: usize) -> Result<Self> {
        let n = op.rows();
        if init_resid.len() != n {
            return Err(IramError::InvalidArgument(format!(
                "initial residual has length {}, expected {}",
                init_resid.len(),
                n
            )));
        }
        let beta = norm(&init_resid);
        if beta <= eps_2_3::<A>() {
            return Err(IramError::InvalidArgument(
                "initial residual norm is at or below machine tolerance".into(),
            ));
        }
        let v0 = init_resid.mapv(|x| x / beta);

        let mut w = Array1::zeros(n);
        op.apply(v0.view(), &mut w);
        let h00 = v0.dot(&w);
        let f = &w - &v0.mapv(|x| x * h00);

        let mut v = Array2::zeros((n, m));
        v.column_mut(0).assign(&v0);
        let mut h = Array2::zeros((m, m));
        h[(0, 0)] = h00;

        Ok(Arnoldi {
            v,
            h,
            f,
            order: 1,
            m,
            n_ops: 1,
        })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn v(&self) -> &Array2<A> {
        &self.v
    }

    pub fn h(&self) -> &Array2<A> {
        &self.h
    }

    pub fn f(&self) -> &Array1<A> {
        &self.f
    }

    pub fn num_operations(&self) -> usize {
        self.n_ops
    }

    /// Replaces `V`, `H`, and `f` (used by the driver after a restart sweep
    /// compresses the factorization back to order `k`) and resets the
    /// current order.
    pub fn set_state(&mut self, v: Array2<A>, h: Array2<A>, f: Array1<A>, order: usize) {
        self.v = v;
        self.h = h;
        self.f = f;
        self.order = order;
    }

    /// Extends the factorization from its current order to `m` (§4.4
    /// `factorize_from`). Returns `Ok(())` on reaching order `m`, or
    /// `Ok(())` with `order() < m` if an invariant subspace was discovered
    /// (β dropped below `eps^{2/3}`; §7 NumericalBreakdown, option (b)).
    pub fn extend<Op: LinearOperator<A>>(&mut self, op: &Op) -> Result<()> {
        let tol = eps_2_3::<A>();
        while self.order < self.m {
            let i = self.order;

            // 1. beta <- ||f||; break on invariant subspace.
            let beta = norm(&self.f);
            if beta <= tol {
                return Ok(());
            }
            let v = self.f.mapv(|x| x / beta);

            // 2. store V(:,i), set H(i,i-1), zero H(i,0..i-1).
            self.v.column_mut(i).assign(&v);
            self.h[(i, i - 1)] = beta;
            for j in 0..i.saturating_sub(1) {
                self.h[(i, j)] = A::zero();
            }

            // 3. w <- A*v.
            let n = self.v.nrows();
            let mut w = Array1::zeros(n);
            op.apply(v.view(), &mut w);
            self.n_ops += 1;

            // 4. h <- V(:,0:i+1)^T * w; H(0:i+1, i) <- h.
            let vi = self.v.slice(ndarray::s![.., 0..=i]);
            let h_col = vi.t().dot(&w);
            for row in 0..=i {
                self.h[(row, i)] = h_col[row];
            }

            // 5. f <- w - V(:,0:i+1)*h.
            let mut f = &w - &vi.dot(&h_col);

            // 6. one-step re-orthogonalization against the first basis
            // vector only (a documented heuristic, not full DGKS; §9 open
            // question).
            let v0 = self.v.column(0);
            if v0.dot(&f).abs() > tol {
                let vf = vi.t().dot(&f);
                f = &f - &vi.dot(&vf);
            }

            self.f = f;
            self.order = i + 1;
        }
        Ok(())
    }
}

fn norm<A: RealField>(x: &Array1<A>) -> A {
    x.iter().fold(A::zero(), |acc, &xi| acc + xi * xi).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn diag_operator(n: usize) -> Array2<f64> {
        let mut a = Array2::zeros((n, n));
        for i in 0..n {
            a[(i, i)] = (i + 1) as f64;
        }
        a
    }

    #[test]
    fn orthogonality_holds_after_extension() {
        let a = diag_operator(10);
        let resid = Array1::from_elem(10, 1.0);
        let mut arnoldi = Arnoldi::init(&a, resid, 6).unwrap();
        arnoldi.extend(&a).unwrap();
        let j = arnoldi.order();
        let vj = arnoldi.v().slice(ndarray::s![.., 0..j]);
        let gram = vj.t().dot(&vj);
        let tol = 10.0 * (j as f64) * eps_2_3::<f64>();
        for i in 0..j {
            for jj in 0..j {
                let expect = if i == jj { 1.0 } else { 0.0 };
                assert!((gram[(i, jj)] - expect).abs() <= tol, "P1 violated at ({i},{jj})");
            }
        }
    }

    #[test]
    fn arnoldi_relation_holds() {
        let a = diag_operator(10);
        let resid = Array1::from_elem(10, 1.0);
        let mut arnoldi = Arnoldi::init(&a, resid, 6).unwrap();
        arnoldi.extend(&a).unwrap();
        let j = arnoldi.order();
        let vj = arnoldi.v().slice(ndarray::s![.., 0..j]).to_owned();
        let hj = arnoldi.h().slice(ndarray::s![0..j, 0..j]).to_owned();
        let av = a.dot(&vj);
        let rhs = vj.dot(&hj);
        let mut resid_mat = &av - &rhs;
        for row in 0..10 {
            resid_mat[(row, j - 1)] -= arnoldi.f()[row];
        }
        let norm_resid: f64 = resid_mat.iter().map(|x| x * x).sum::<f64>().sqrt();
        assert!(norm_resid <= 10.0 * (j as f64) * eps_2_3::<f64>() * 10.0);
    }

    #[test]
    fn rejects_zero_initial_residual() {
        let a = diag_operator(4);
        let resid = Array1::zeros(4);
        assert!(Arnoldi::init(&a, resid, 3).is_err());
    }
}
