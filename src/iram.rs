//! IRAM driver (C6): the top-level loop tying together the Arnoldi
//! factorizer, the Ritz extractor/selector, and the QR-sweep restart.
//!
//! Builder-pattern configuration mirrors `lobpcg::eig::TruncatedEig` and
//! `krylov::gmres::Gmres`: construction takes the required parameters,
//! chained `#[must_use]` methods adjust optional ones, and `compute` drives
//! the iteration to completion.

use crate::arnoldi::Arnoldi;
use crate::error::{IramError, Result};
use crate::generate::random_residual;
use crate::operator::LinearOperator;
use crate::qr::{DoubleShiftQR, SingleShiftQR};
use crate::ritz::RitzPairs;
use crate::select::SelectionRule;
use crate::types::{eps_2_3, RealField};
use ndarray::{s, Array1, Array2};
use num_traits::{One, Zero};
use rand::prelude::*;

/// Default iteration cap and tolerance, per §6.
pub const DEFAULT_MAXIT: usize = 1000;

pub fn default_tol<A: RealField>() -> A {
    num_traits::NumCast::from(1e-10).unwrap()
}

/// Top-level IRAM solver over a borrowed operator `op: &'a Op`.
pub struct Iram<'a, A: RealField, Op: LinearOperator<A>> {
    op: &'a Op,
    k: usize,
    m: usize,
    rule: SelectionRule,
    /// Spectral transformation point for shift-and-invert post-processing
    /// (§9: composition hook). `None` for the plain (non shift-invert) case.
    sigma: Option<A>,

    arnoldi: Option<Arnoldi<A>>,
    ritz: Option<RitzPairs<A>>,
    nconv: usize,
    n_iter: usize,
    /// Tolerance passed to the in-progress `compute()` call; `finalize`
    /// reuses it so the returned `nconv` matches the loop's own convergence
    /// test rather than drifting to a different default.
    tol: A,

    eigenvalues: Option<Array1<A::Complex>>,
    eigenvectors: Option<Array2<A::Complex>>,
}

impl<'a, A: RealField, Op: LinearOperator<A>> Iram<'a, A, Op> {
    /// `k` wanted eigenvalues, Arnoldi subspace size `m`, selection `rule`.
    pub fn new(op: &'a Op, k: usize, m: usize, rule: SelectionRule) -> Result<Self> {
        let n = op.rows();
        if k < 1 || k >= n {
            return Err(IramError::InvalidArgument(format!(
                "k must satisfy 1 <= k < n (k={k}, n={n})"
            )));
        }
        if m <= k || m > n {
            return Err(IramError::InvalidArgument(format!(
                "m must satisfy k < m <= n (k={k}, m={m}, n={n})"
            )));
        }
        Ok(Iram {
            op,
            k,
            m,
            rule,
            sigma: None,
            arnoldi: None,
            ritz: None,
            nconv: 0,
            n_iter: 0,
            tol: default_tol::<A>(),
            eigenvalues: None,
            eigenvectors: None,
        })
    }

    /// Configures this solver to treat Ritz values as living in the
    /// shift-and-invert spectral transformation `mu -> 1/mu + sigma`,
    /// applied once before the final canonical sort (§4.6, §9). Used only
    /// by [`crate::shift_invert::ShiftInvertIram`].
    #[must_use]
    pub fn with_shift(mut self, sigma: A) -> Self {
        self.sigma = Some(sigma);
        self
    }

    pub fn num_iterations(&self) -> usize {
        self.n_iter
    }

    pub fn num_operations(&self) -> usize {
        self.arnoldi.as_ref().map(|a| a.num_operations()).unwrap_or(0)
    }

    /// Seeds the factorization with a pseudo-random residual drawn
    /// uniformly from `[-0.5, 0.5]^n` (§6).
    pub fn init(&mut self) -> Result<()> {
        let mut rng = thread_rng();
        let n = self.op.rows();
        let resid = random_residual::<A, _>(n, &mut rng);
        self.init_with(resid)
    }

    /// Seeds the factorization with a user-supplied residual.
    pub fn init_with(&mut self, resid: Array1<A>) -> Result<()> {
        self.arnoldi = Some(Arnoldi::init(self.op, resid, self.m)?);
        Ok(())
    }

    /// Runs the init -> extend -> converge? -> restart loop (§4.6), and
    /// returns `min(k, nconv)`.
    pub fn compute(&mut self, maxit: usize, tol: A) -> Result<usize> {
        self.tol = tol;
        {
            let arnoldi = self
                .arnoldi
                .as_mut()
                .ok_or(IramError::NotComputed)?;
            arnoldi.extend(self.op)?;
        }
        self.extract_and_sort_ritz()?;

        self.n_iter = 0;
        for _ in 0..maxit {
            self.n_iter += 1;
            let nconv = self.count_converged(tol);
            self.nconv = nconv;
            if nconv >= self.k {
                break;
            }
            let k_prime = self.adjust_k(nconv);
            self.restart(k_prime)?;
            self.arnoldi.as_mut().unwrap().extend(self.op)?;
            self.extract_and_sort_ritz()?;
        }

        self.finalize();
        Ok(self.nconv.min(self.k))
    }

    pub fn eigenvalues(&self) -> Result<&Array1<A::Complex>> {
        self.eigenvalues.as_ref().ok_or(IramError::NotComputed)
    }

    pub fn eigenvectors(&self) -> Result<&Array2<A::Complex>> {
        self.eigenvectors.as_ref().ok_or(IramError::NotComputed)
    }

    fn extract_and_sort_ritz(&mut self) -> Result<()> {
        let h = self.arnoldi.as_ref().unwrap().h().slice(s![0..self.m, 0..self.m]).to_owned();
        self.ritz = Some(RitzPairs::extract(&h, self.rule)?);
        Ok(())
    }

    fn count_converged(&self, tol: A) -> usize {
        let arnoldi = self.arnoldi.as_ref().unwrap();
        let ritz = self.ritz.as_ref().unwrap();
        let f_norm = norm(arnoldi.f());
        let mask = ritz.convergence_mask(self.k, f_norm, tol, eps_2_3::<A>());
        mask.iter().filter(|&&b| b).count()
    }

    /// The restart-width heuristic (§4.6 `adjust_k`).
    fn adjust_k(&self, nconv: usize) -> usize {
        let ritz = self.ritz.as_ref().unwrap();
        let m = self.m;
        let mut k_new = self.k;

        if k_new >= 1 && is_conjugate_pair::<A>(&ritz.values, k_new - 1, k_new) {
            k_new += 1;
        }

        k_new += nconv.min((m - k_new) / 2);

        if k_new == 1 {
            if m >= 6 {
                k_new = m / 2;
            } else if m > 3 {
                k_new = 2;
            }
        }

        if k_new > m - 2 {
            k_new = m - 2;
        }

        if k_new >= 1 && is_conjugate_pair::<A>(&ritz.values, k_new - 1, k_new) {
            k_new += 1;
        }

        k_new
    }

    /// Compresses the order-`m` factorization to order `k_prime` by
    /// applying a QR sweep per unwanted Ritz value (exact shifts), updating
    /// `V`, `H`, and the tracked unit vector `em` in place, then forming
    /// the new residual (§4.6).
    fn restart(&mut self, k_prime: usize) -> Result<()> {
        let m = self.m;
        let n = self.op.rows();
        let ritz = self.ritz.as_ref().unwrap();
        let tol = eps_2_3::<A>();

        let arnoldi = self.arnoldi.as_ref().unwrap();
        let mut h = arnoldi.h().slice(s![0..m, 0..m]).to_owned();
        let mut v = arnoldi.v().slice(s![.., 0..m]).to_owned();
        let f_old = arnoldi.f().clone();
        let mut em: Array1<A> = Array1::zeros(m);
        em[m - 1] = A::one();

        let mut i = k_prime;
        while i < m {
            let theta = ritz.values[i];
            if theta.im().abs() <= tol {
                let mu = theta.re();
                let step = SingleShiftQR::new(&h, mu);
                h = step.shifted_h();
                step.apply_yq(&mut v);
                step.apply_qty(&mut em);
                i += 1;
            } else {
                let s_shift = theta.re() + theta.re();
                let t_shift = theta.abs() * theta.abs();
                let step = DoubleShiftQR::new(&h, s_shift, t_shift);
                h = step.matrix_qthq();
                step.apply_yq(&mut v);
                step.apply_qty(&mut em);
                i += 2;
            }
        }

        let new_f = &f_old.mapv(|x| x * em[k_prime - 1])
            + &v.column(k_prime).mapv(|x| x * h[(k_prime, k_prime - 1)]);

        let mut v_full: Array2<A> = Array2::zeros((n, m));
        v_full.slice_mut(s![.., 0..k_prime]).assign(&v.slice(s![.., 0..k_prime]));
        let mut h_full: Array2<A> = Array2::zeros((m, m));
        h_full
            .slice_mut(s![0..k_prime, 0..k_prime])
            .assign(&h.slice(s![0..k_prime, 0..k_prime]));

        self.arnoldi
            .as_mut()
            .unwrap()
            .set_state(v_full, h_full, new_f, k_prime);
        Ok(())
    }

    /// `sort_ritzpair`: retains the converged Ritz pairs, applies the
    /// shift-and-invert spectral transform if configured, and re-sorts by
    /// LARGEST_MAGN for a canonical output ordering regardless of the rule
    /// used during iteration (§4.6).
    fn finalize(&mut self) {
        let ritz = self.ritz.as_ref().unwrap();
        let arnoldi = self.arnoldi.as_ref().unwrap();
        let f_norm = norm(arnoldi.f());
        let mask = ritz.convergence_mask(self.k, f_norm, self.tol, eps_2_3::<A>());

        let converged_idx: Vec<usize> = (0..self.k).filter(|&i| mask[i]).collect();

        let mut values: Vec<A::Complex> = converged_idx
            .iter()
            .map(|&i| transform(ritz.values[i], self.sigma))
            .collect();
        let perm = SelectionRule::LargestMagn.sort_with_perm(&values);
        values = perm.iter().map(|&p| values[p]).collect();

        let n = arnoldi.v().nrows();
        let nconv = values.len();
        let mut vectors: Array2<A::Complex> = Array2::from_elem((n, nconv), A::Complex::zero());
        let v = arnoldi.v().slice(s![.., 0..self.m]);
        for (new_i, &p) in perm.iter().enumerate() {
            let orig_i = converged_idx[p];
            let y = ritz.vectors.column(orig_i);
            // eigenvectors(): V (real) times the Ritz eigenvector of H.
            for row in 0..n {
                let mut acc = A::Complex::zero();
                for col in 0..self.m {
                    acc = acc + y[col].mul_real(v[(row, col)]);
                }
                vectors[(row, new_i)] = acc;
            }
        }

        self.eigenvalues = Some(Array1::from_vec(values));
        self.eigenvectors = Some(vectors);
        self.nconv = nconv;
    }
}

fn transform<A: RealField>(theta: A::Complex, sigma: Option<A>) -> A::Complex {
    match sigma {
        None => theta,
        Some(sigma) => A::Complex::one() / theta + A::Complex::from_real(sigma),
    }
}

fn is_conjugate_pair<A: RealField>(values: &Array1<A::Complex>, i: usize, j: usize) -> bool {
    if j >= values.len() {
        return false;
    }
    let tol = eps_2_3::<A>();
    values[i].im().abs() > tol && (values[i].im() + values[j].im()).abs() <= tol
        && (values[i].re() - values[j].re()).abs() <= tol
}

fn norm<A: RealField>(x: &Array1<A>) -> A {
    x.iter().fold(A::zero(), |acc, &xi| acc + xi * xi).sqrt()
}
