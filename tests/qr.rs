use iram::{DoubleShiftQR, SingleShiftQR};
use ndarray::Array2;

fn sample_hessenberg() -> Array2<f64> {
    Array2::from_shape_vec(
        (5, 5),
        vec![
            2.0, 1.0, 0.5, 0.3, 0.1, 3.0, 4.0, 1.0, 0.4, 0.2, 0.0, 2.0, 5.0, 1.0, 0.3, 0.0, 0.0,
            1.5, 6.0, 1.0, 0.0, 0.0, 0.0, 2.0, 7.0,
        ],
    )
    .unwrap()
}

fn assert_hessenberg(h: &Array2<f64>, tol: f64) {
    let m = h.nrows();
    for i in 0..m {
        for j in 0..m {
            if i > j + 1 {
                assert!(h[(i, j)].abs() < tol, "H({i},{j}) = {} not negligible", h[(i, j)]);
            }
        }
    }
}

fn trace(h: &Array2<f64>) -> f64 {
    (0..h.nrows()).map(|i| h[(i, i)]).sum()
}

#[test]
fn single_shift_sweep_preserves_hessenberg_form_and_trace_p3_p4() {
    let h = sample_hessenberg();
    let step = SingleShiftQR::new(&h, 2.5);
    let swept = step.shifted_h();
    assert_hessenberg(&swept, 1e-8);
    assert!((trace(&h) - trace(&swept)).abs() < 1e-8);
}

#[test]
fn double_shift_sweep_preserves_hessenberg_form_and_trace_p3_p4() {
    let h = sample_hessenberg();
    // (s, t) as though chosen for a complex-conjugate Ritz pair 1 +/- 2i:
    // s = 2*Re(mu), t = |mu|^2.
    let step = DoubleShiftQR::new(&h, 2.0, 5.0);
    let swept = step.matrix_qthq();
    assert_hessenberg(&swept, 1e-6);
    assert!((trace(&h) - trace(&swept)).abs() < 1e-6);
}

#[test]
fn single_shift_apply_yq_then_apply_qty_is_the_identity() {
    let h = sample_hessenberg();
    let step = SingleShiftQR::new(&h, 0.7);
    let m = h.nrows();
    let mut q = Array2::eye(m);
    step.apply_yq(&mut q);
    for col in 0..m {
        let mut v = q.column(col).to_owned();
        step.apply_qty(&mut v);
        for row in 0..m {
            let expect = if row == col { 1.0 } else { 0.0 };
            assert!((v[row] - expect).abs() < 1e-8);
        }
    }
}

#[test]
fn two_single_shift_sweeps_compose_to_a_similarity_transform_r3() {
    let h = sample_hessenberg();
    let step1 = SingleShiftQR::new(&h, 1.0);
    let h1 = step1.shifted_h();
    let step2 = SingleShiftQR::new(&h1, -0.5);
    let h2 = step2.shifted_h();
    assert_hessenberg(&h2, 1e-7);
    assert!((trace(&h) - trace(&h2)).abs() < 1e-7);
}
