//! Cross-checks between decompositions on shared inputs.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use densela::linalg::{cofactor_det, QrMethod, SpectralSettings};
use densela::Matrix;

fn assert_mat_eq(a: &Matrix<f64>, b: &Matrix<f64>, eps: f64) {
    assert_eq!(a.shape(), b.shape());
    for (x, y) in a.as_slice().iter().zip(b.as_slice()) {
        assert_abs_diff_eq!(*x, *y, epsilon = eps);
    }
}

fn well_conditioned() -> Matrix<f64> {
    Matrix::new([
        [4.0, -2.0, 1.0, 0.5],
        [3.0, 6.0, -4.0, 1.0],
        [2.0, 1.0, 8.0, -3.0],
        [0.5, -1.0, 2.0, 5.0],
    ])
}

fn spd() -> Matrix<f64> {
    // BᵗB + I
    let b = Matrix::new([[1.0, 2.0, 0.0], [0.0, 1.0, 3.0], [2.0, 0.0, 1.0]]);
    &(&b.transpose() * &b) + &Matrix::eye(3)
}

// ── Inverses ────────────────────────────────────────────────────────

#[test]
fn inverse_round_trip() {
    let a = well_conditioned();
    let eye = Matrix::eye(4);
    let lu_inv = a.inverse().unwrap();
    let gj_inv = a.inverse_gauss_jordan().unwrap();
    assert_mat_eq(&(&a * &lu_inv), &eye, 1e-12);
    assert_mat_eq(&(&gj_inv * &a), &eye, 1e-12);
    assert_mat_eq(&lu_inv, &gj_inv, 1e-12);
}

#[test]
fn identity_properties() {
    let i3 = Matrix::<f64>::eye(3);
    assert!(i3.is_identity());
    assert!(i3.is_orthogonal());
    assert_relative_eq!(i3.det().unwrap(), 1.0);
    assert_eq!(i3.inverse().unwrap(), i3);
    assert_eq!(i3.inverse_gauss_jordan().unwrap(), i3);
}

// ── LU ──────────────────────────────────────────────────────────────

#[test]
fn lu_factors_reassemble() {
    let a = well_conditioned();
    let lu = a.lu().unwrap();
    assert!(lu.l().is_lower_triangular());
    assert!(lu.u().is_upper_triangular());
    assert_mat_eq(&(&lu.p() * &a), &(&lu.l() * &lu.u()), 1e-12);
}

#[test]
fn small_lu_example() {
    let a = Matrix::new([[4.0, 3.0], [6.0, 3.0]]);
    assert_relative_eq!(a.det().unwrap(), -6.0, epsilon = 1e-12);

    let lu = a.lu_unpivoted().unwrap();
    assert_mat_eq(&lu.l(), &Matrix::new([[1.0, 0.0], [1.5, 1.0]]), 1e-12);
    assert_mat_eq(&lu.u(), &Matrix::new([[4.0, 3.0], [0.0, -1.5]]), 1e-12);
    assert_mat_eq(&(&lu.l() * &lu.u()), &a, 1e-12);
}

// ── QR ──────────────────────────────────────────────────────────────

#[test]
fn qr_methods_agree() {
    let a = well_conditioned();
    let reference = a.qr_with(QrMethod::Householder).unwrap();
    for method in QrMethod::ALL {
        let qr = a.qr_with(method).unwrap();
        let (q, r) = (qr.q(), qr.r());
        assert!(r.is_upper_triangular(), "{}", method);
        assert_mat_eq(&(q * r), &a, 1e-10);
        assert_mat_eq(&(&q.transpose() * q), &Matrix::eye(4), 1e-10);
        for (x, y) in r.diag().iter().zip(reference.r().diag()) {
            assert_relative_eq!(x.abs(), y.abs(), epsilon = 1e-10);
        }
    }
}

#[test]
fn determinants_agree() {
    let a = well_conditioned();
    let expected = cofactor_det(&a).unwrap();
    assert_relative_eq!(a.det().unwrap(), expected, max_relative = 1e-12);
    for method in QrMethod::ALL {
        assert_relative_eq!(a.det_qr(method).unwrap(), expected, max_relative = 1e-10);
    }
    assert_relative_eq!(spd().cholesky().unwrap().det(), cofactor_det(&spd()).unwrap(), max_relative = 1e-12);
}

// ── Cholesky ────────────────────────────────────────────────────────

#[test]
fn cholesky_reassembles() {
    let a = spd();
    let l = a.cholesky().unwrap().into_l();
    assert!(l.is_lower_triangular());
    assert_mat_eq(&(&l * &l.transpose()), &a, 1e-12);
}

#[test]
fn cholesky_small_example() {
    let a = Matrix::new([[4.0, 2.0], [2.0, 3.0]]);
    let chol = a.cholesky().unwrap();
    let l = chol.l();
    assert_relative_eq!(l[(0, 0)], 2.0);
    assert_relative_eq!(l[(1, 0)], 1.0);
    assert_relative_eq!(l[(1, 1)], 2.0_f64.sqrt(), epsilon = 1e-14);
    assert_mat_eq(&chol.inverse().unwrap(), &a.inverse().unwrap(), 1e-12);
}

// ── Eigen ───────────────────────────────────────────────────────────

#[test]
fn jacobi_two_by_two() {
    let a: Matrix<f64> = Matrix::new([[2.0, 1.0], [1.0, 2.0]]);
    let eig = a.eig_jacobi().unwrap();
    assert!(eig.converged());
    assert_abs_diff_eq!(eig.eigenvalues()[0], 1.0, epsilon = 1e-8);
    assert_abs_diff_eq!(eig.eigenvalues()[1], 3.0, epsilon = 1e-8);
}

#[test]
fn jacobi_eigenpairs() {
    let a = spd();
    let eig = a.eig_jacobi().unwrap();
    for (i, &lambda) in eig.eigenvalues().iter().enumerate() {
        let v = Matrix::from_rows(3, 1, eig.eigenvector(i));
        assert_mat_eq(&(&a * &v), &(&v * lambda), 1e-9);
    }
    let trace: f64 = eig.eigenvalues().iter().sum();
    assert_relative_eq!(trace, a.trace(), max_relative = 1e-12);
}

#[test]
fn qr_eigenvalues_match_jacobi() {
    let a = spd();
    let settings = SpectralSettings { tolerance: 1e-12, max_iter: 5000 };
    let mut qr = a.eigenvalues_qr_with(&settings).unwrap().eigenvalues().to_vec();
    qr.sort_by(|x, y| x.partial_cmp(y).unwrap());
    let jac = a.eig_jacobi().unwrap();
    for (x, y) in qr.iter().zip(jac.eigenvalues()) {
        assert_relative_eq!(*x, *y, max_relative = 1e-8);
    }
}

// ── SVD ─────────────────────────────────────────────────────────────

#[test]
fn svd_reconstructs_for_every_method() {
    let a = well_conditioned();
    for method in QrMethod::ALL {
        let svd = a.svd_with(method, &SpectralSettings::default()).unwrap();
        let (u, sigma, v) = svd.clone().into_parts();
        assert_mat_eq(&(&(&u * &sigma) * &v.transpose()), &a, 1e-8);
        let s = svd.singular_values();
        assert!(s.windows(2).all(|w| w[0] >= w[1]), "{}: {:?}", method, s);
        assert_eq!(svd.rank(), 4);
    }
}

#[test]
fn svd_singular_values_square_to_gram_eigenvalues() {
    let a = well_conditioned();
    let mut s2: Vec<f64> = a.singular_values().unwrap().iter().map(|s| s * s).collect();
    s2.reverse();
    let gram = &a.transpose() * &a;
    let eig = gram.eig_jacobi().unwrap();
    for (x, y) in s2.iter().zip(eig.eigenvalues()) {
        assert_relative_eq!(*x, *y, max_relative = 1e-8);
    }
}

#[test]
fn rank_deficient() {
    let a: Matrix<f64> = Matrix::new([[1.0, 2.0], [2.0, 4.0]]);
    assert_eq!(a.rank().unwrap(), 1);
    assert!(!a.is_full_rank().unwrap());
    assert!(a.condition_number().unwrap() > 1e10);
}

#[test]
fn pseudoinverse_penrose_conditions() {
    let a: Matrix<f64> = Matrix::new([[1.0, 2.0], [2.0, 4.0]]);
    let pinv = a.pseudoinverse().unwrap();
    assert_mat_eq(&(&(&a * &pinv) * &a), &a, 1e-8);
    assert_mat_eq(&(&(&pinv * &a) * &pinv), &pinv, 1e-8);

    let b = well_conditioned();
    assert_mat_eq(&b.pseudoinverse().unwrap(), &b.inverse().unwrap(), 1e-8);
}

#[test]
fn clustered_spectrum_diagnostics() {
    // Hilbert(6) + I: well conditioned, eigenvalues 1.0000001 … 2.619
    let a = Matrix::from_fn(6, 6, |i, j| 1.0 / (i + j + 1) as f64 + if i == j { 1.0 } else { 0.0 });
    let jac = a.eig_jacobi().unwrap();
    let (lo, hi) = (jac.eigenvalues()[0], jac.eigenvalues()[5]);

    for method in QrMethod::ALL {
        let svd = a.svd_with(method, &SpectralSettings::default()).unwrap();
        assert_eq!(svd.rank(), 6, "{}", method);
        assert_relative_eq!(svd.condition_number(), hi / lo, max_relative = 1e-8);
        assert_mat_eq(&svd.pseudoinverse(), &a.inverse().unwrap(), 1e-9);
        assert_mat_eq(&svd.reconstruct(), &a, 1e-9);
    }
    assert_relative_eq!(a.condition_number().unwrap(), hi / lo, max_relative = 1e-8);

    let mut qr = a.eigenvalues_qr().unwrap().eigenvalues().to_vec();
    qr.sort_by(|x, y| x.partial_cmp(y).unwrap());
    for (x, y) in qr.iter().zip(jac.eigenvalues()) {
        assert_relative_eq!(*x, *y, max_relative = 1e-9);
    }
}

// ── Multiplication ──────────────────────────────────────────────────

#[test]
fn strassen_variants_agree() {
    let a = Matrix::from_fn(64, 64, |i, j| ((i * 31 + j * 17) % 23) as f64 / 7.0 - 1.5);
    let b = Matrix::from_fn(64, 64, |i, j| ((i * 13 + j * 29) % 19) as f64 / 5.0 - 2.0);
    let naive = a.matmul(&b).unwrap();
    assert_mat_eq(&a.strassen(&b).unwrap(), &naive, 1e-10);
    assert_mat_eq(&a.strassen_multiply(&b).unwrap(), &naive, 1e-10);
}

#[test]
fn transpose_is_an_involution() {
    let a = Matrix::from_fn(3, 5, |i, j| (i * 5 + j) as f64);
    assert_eq!(a.transpose().transpose(), a);
    assert_eq!(a.transpose().shape(), (5, 3));
}
