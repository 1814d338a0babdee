use iram::{eps_2_3, generate::from_diag, Arnoldi, LinearOperator};
use ndarray::{s, Array1, Array2};

fn tridiag(n: usize) -> Array2<f64> {
    let mut a = Array2::zeros((n, n));
    for i in 0..n {
        a[(i, i)] = 1.0;
        if i + 1 < n {
            a[(i + 1, i)] = 2.0;
            a[(i, i + 1)] = 3.0;
        }
    }
    a
}

#[test]
fn orthogonality_holds_for_a_tridiagonal_operator() {
    let a = tridiag(10);
    let resid = Array1::from_elem(10, 1.0);
    let mut arnoldi = Arnoldi::init(&a, resid, 6).unwrap();
    arnoldi.extend(&a).unwrap();
    let j = arnoldi.order();
    let vj = arnoldi.v().slice(s![.., 0..j]);
    let gram = vj.t().dot(&vj);
    let tol = 10.0 * (j as f64) * eps_2_3::<f64>();
    for i in 0..j {
        for jj in 0..j {
            let expect = if i == jj { 1.0 } else { 0.0 };
            assert!((gram[(i, jj)] - expect).abs() <= tol);
        }
    }
}

#[test]
fn arnoldi_relation_holds_for_a_tridiagonal_operator() {
    let a = tridiag(10);
    let resid = Array1::from_elem(10, 1.0);
    let mut arnoldi = Arnoldi::init(&a, resid, 6).unwrap();
    arnoldi.extend(&a).unwrap();
    let j = arnoldi.order();
    let vj = arnoldi.v().slice(s![.., 0..j]).to_owned();
    let hj = arnoldi.h().slice(s![0..j, 0..j]).to_owned();
    let mut resid_mat = &a.dot(&vj) - &vj.dot(&hj);
    for row in 0..10 {
        resid_mat[(row, j - 1)] -= arnoldi.f()[row];
    }
    let a_norm: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_resid: f64 = resid_mat.iter().map(|x| x * x).sum::<f64>().sqrt();
    assert!(norm_resid <= 10.0 * (j as f64) * eps_2_3::<f64>() * a_norm.max(1.0));
}

#[test]
fn extend_stops_at_an_invariant_subspace() {
    // A diagonal operator started from e_0 never leaves span(e_0): the
    // factorization should discover the invariant subspace at order 1
    // rather than reach the requested order 4.
    let a: Array2<f64> = from_diag(&[3.0, 1.0, 1.0, 1.0]);
    let mut resid = Array1::zeros(4);
    resid[0] = 1.0;
    let mut arnoldi = Arnoldi::init(&a, resid.clone(), 4).unwrap();
    arnoldi.extend(&a).unwrap();
    assert_eq!(arnoldi.order(), 1);
}

#[test]
fn dimension_mismatch_between_operator_and_residual_is_rejected() {
    let a = tridiag(5);
    let resid = Array1::from_elem(4, 1.0);
    assert!(Arnoldi::init(&a, resid, 3).is_err());
}
