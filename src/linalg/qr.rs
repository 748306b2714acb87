use core::fmt;
use core::str::FromStr;

use crate::linalg::triangular::back_substitution;
use crate::linalg::{givens, gram_schmidt, LinalgError};
use crate::traits::{FloatScalar, MatrixMut};
use crate::Matrix;

/// Algorithm used to compute a QR factorization.
///
/// All three produce an orthogonal Q and upper-triangular R with `Q·R = A`;
/// they differ in numerical behaviour and in how rank deficiency is
/// treated (see [`QrDecomposition`]).
///
/// Parses case-insensitively:
///
/// ```
/// use densela::linalg::QrMethod;
///
/// assert_eq!("Householder".parse::<QrMethod>().unwrap(), QrMethod::Householder);
/// assert_eq!("givens".parse::<QrMethod>().unwrap(), QrMethod::Givens);
/// assert_eq!("Gram-Schmidt".parse::<QrMethod>().unwrap(), QrMethod::GramSchmidt);
/// assert!("cholesky".parse::<QrMethod>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QrMethod {
    /// Householder reflections.
    #[default]
    Householder,
    /// Givens plane rotations.
    Givens,
    /// Modified Gram-Schmidt orthogonalisation.
    GramSchmidt,
}

impl QrMethod {
    /// Every method, in declaration order.
    pub const ALL: [QrMethod; 3] = [QrMethod::Householder, QrMethod::Givens, QrMethod::GramSchmidt];
}

impl fmt::Display for QrMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QrMethod::Householder => write!(f, "Householder"),
            QrMethod::Givens => write!(f, "Givens"),
            QrMethod::GramSchmidt => write!(f, "Gram-Schmidt"),
        }
    }
}

/// Unknown name passed to `QrMethod::from_str`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseQrMethodError;

impl fmt::Display for ParseQrMethodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown QR method (expected householder, givens or gram-schmidt)")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseQrMethodError {}

impl FromStr for QrMethod {
    type Err = ParseQrMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let is = |name: &str| s.eq_ignore_ascii_case(name);
        if is("householder") {
            Ok(QrMethod::Householder)
        } else if is("givens") {
            Ok(QrMethod::Givens)
        } else if is("gramschmidt") || is("gram-schmidt") || is("gram_schmidt") {
            Ok(QrMethod::GramSchmidt)
        } else {
            Err(ParseQrMethodError)
        }
    }
}

/// Householder QR in place for `M >= N`.
///
/// On return, `a` holds the packed factorization:
/// - upper triangle (including diagonal): R
/// - strict lower triangle: Householder vectors, scaled so their leading
///   entry is an implicit 1
///
/// `tau[k]` is the scalar of reflector `k`, `H_k = I - tau_k·v_k·v_kᵗ`. A
/// column whose active part is already exactly zero gets no reflector
/// (`tau[k] = 0`), so rank-deficient input factors without error.
///
/// Returns the number of reflectors applied; each has determinant -1.
pub fn householder_in_place<T: FloatScalar>(a: &mut impl MatrixMut<T>, tau: &mut [T]) -> usize {
    let m = a.nrows();
    let n = a.ncols();
    assert!(m >= n, "QR decomposition requires M >= N");
    assert_eq!(tau.len(), n, "tau length must equal the column count");

    let mut reflectors = 0;
    for col in 0..n {
        let mut norm_sq = T::zero();
        for i in col..m {
            let v = *a.get(i, col);
            norm_sq = norm_sq + v * v;
        }

        if norm_sq == T::zero() {
            log::trace!("householder: column {} already zero, skipped", col);
            tau[col] = T::zero();
            continue;
        }

        // sigma carries the sign of the diagonal so v0 = a + sigma never cancels.
        let norm = norm_sq.sqrt();
        let a_cc = *a.get(col, col);
        let sigma = if a_cc < T::zero() { -norm } else { norm };
        let v0 = a_cc + sigma;
        let tau_val = v0 / sigma;
        tau[col] = tau_val;
        reflectors += 1;

        for i in (col + 1)..m {
            let scaled = *a.get(i, col) / v0;
            *a.get_mut(i, col) = scaled;
        }

        // A[col.., j] -= tau·v·(vᵗ·A[col.., j])
        for j in (col + 1)..n {
            let mut dot = *a.get(col, j);
            for i in (col + 1)..m {
                dot = dot + *a.get(i, col) * *a.get(i, j);
            }
            dot = dot * tau_val;

            let top = *a.get(col, j);
            *a.get_mut(col, j) = top - dot;
            for i in (col + 1)..m {
                let vi = *a.get(i, col);
                let old = *a.get(i, j);
                *a.get_mut(i, j) = old - dot * vi;
            }
        }

        *a.get_mut(col, col) = -sigma;
    }

    reflectors
}

/// Explicit `(Q, R, det Q)` from a square matrix by Householder reflections.
pub(crate) fn householder_qr<T: FloatScalar>(a: &Matrix<T>) -> (Matrix<T>, Matrix<T>, T) {
    let n = a.nrows();
    let mut packed = a.clone();
    let mut tau = alloc::vec![T::zero(); n];
    let reflectors = householder_in_place(&mut packed, &mut tau);

    let r = Matrix::from_fn(n, n, |i, j| if i <= j { packed[(i, j)] } else { T::zero() });

    // Q = H_0·H_1·…·H_{n-1}, applied right-to-left onto I.
    let mut q = Matrix::eye(n);
    for col in (0..n).rev() {
        let tau_val = tau[col];
        if tau_val == T::zero() {
            continue;
        }
        for j in col..n {
            let mut dot = q[(col, j)];
            for i in (col + 1)..n {
                dot = dot + packed[(i, col)] * q[(i, j)];
            }
            dot = dot * tau_val;

            q[(col, j)] = q[(col, j)] - dot;
            for i in (col + 1)..n {
                q[(i, j)] = q[(i, j)] - dot * packed[(i, col)];
            }
        }
    }

    let q_det = if reflectors % 2 == 0 { T::one() } else { -T::one() };
    (q, r, q_det)
}

/// QR factorization `A = Q·R` of a square matrix.
///
/// | method | rank-deficient input | det Q |
/// |---|---|---|
/// | Householder | factors (zero columns skipped) | `(-1)^reflectors` |
/// | Givens | factors | `+1` |
/// | Gram-Schmidt | `Singular` | sign of `det Q` |
///
/// Gram-Schmidt normalises R to a positive diagonal; the other two leave
/// diagonal signs as the rotations produce them, so only `|R_ii|` agrees
/// across methods.
///
/// # Example
///
/// ```
/// use densela::Matrix;
/// use densela::linalg::QrMethod;
///
/// let a = Matrix::new([[12.0_f64, -51.0, 4.0], [6.0, 167.0, -68.0], [-4.0, 24.0, -41.0]]);
/// for method in QrMethod::ALL {
///     let qr = a.qr_with(method).unwrap();
///     assert!((qr.q() * qr.r()).approx_eq(&a, 1e-10));
///     assert!(qr.q().is_orthogonal());
///     assert!((qr.det() - a.det().unwrap()).abs() < 1e-8);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct QrDecomposition<T> {
    q: Matrix<T>,
    r: Matrix<T>,
    q_det: T,
    method: QrMethod,
}

impl<T: FloatScalar> QrDecomposition<T> {
    /// Factor `a` with the given method. Fails with `NotSquare`, and for
    /// Gram-Schmidt with `Singular` on a rank-deficient column.
    pub fn new(a: &Matrix<T>, method: QrMethod) -> Result<Self, LinalgError> {
        a.require_square()?;
        let (q, r, q_det) = match method {
            QrMethod::Householder => householder_qr(a),
            QrMethod::Givens => givens::givens_qr(a),
            QrMethod::GramSchmidt => gram_schmidt::gram_schmidt_qr(a)?,
        };
        Ok(Self { q, r, q_det, method })
    }

    /// Orthogonal factor Q.
    pub fn q(&self) -> &Matrix<T> {
        &self.q
    }

    /// Upper-triangular factor R.
    pub fn r(&self) -> &Matrix<T> {
        &self.r
    }

    pub fn method(&self) -> QrMethod {
        self.method
    }

    /// `(Q, R)`.
    pub fn into_parts(self) -> (Matrix<T>, Matrix<T>) {
        (self.q, self.r)
    }

    /// `det(A) = det(Q)·Π R_ii`.
    pub fn det(&self) -> T {
        self.r.diag().into_iter().fold(self.q_det, |acc, x| acc * x)
    }

    /// Solve `A·X = B` as `R⁻¹·Qᵗ·B`.
    pub fn solve(&self, b: &Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        let qtb = self.q.transpose().matmul(b)?;
        back_substitution(&self.r, &qtb)
    }
}

impl<T: FloatScalar> Matrix<T> {
    /// Householder QR.
    pub fn qr(&self) -> Result<QrDecomposition<T>, LinalgError> {
        QrDecomposition::new(self, QrMethod::Householder)
    }

    /// QR with an explicit method.
    pub fn qr_with(&self, method: QrMethod) -> Result<QrDecomposition<T>, LinalgError> {
        QrDecomposition::new(self, method)
    }

    /// Determinant as `det(Q)·Π R_ii` from the chosen QR method.
    pub fn det_qr(&self, method: QrMethod) -> Result<T, LinalgError> {
        Ok(self.qr_with(method)?.det())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    fn textbook() -> Matrix<f64> {
        Matrix::new([[12.0, -51.0, 4.0], [6.0, 167.0, -68.0], [-4.0, 24.0, -41.0]])
    }

    #[test]
    fn householder_3x3() {
        let a = textbook();
        let qr = a.qr().unwrap();
        assert!((qr.q() * qr.r()).approx_eq(&a, TOL));
        assert!(qr.q().is_orthogonal());
        assert!(qr.r().is_upper_triangular());
        // |R| diagonal of the classic example: 14, 175, 35
        let d: Vec<f64> = qr.r().diag().iter().map(|x| x.abs()).collect();
        assert!((d[0] - 14.0).abs() < TOL);
        assert!((d[1] - 175.0).abs() < TOL);
        assert!((d[2] - 35.0).abs() < TOL);
    }

    #[test]
    fn householder_det_sign() {
        let a = textbook();
        assert!((a.det_qr(QrMethod::Householder).unwrap() - a.det().unwrap()).abs() < 1e-8);
        let swap = Matrix::new([[0.0_f64, 1.0], [1.0, 0.0]]);
        assert!((swap.qr().unwrap().det() + 1.0).abs() < TOL);
    }

    #[test]
    fn householder_rank_deficient_factors() {
        let a = Matrix::new([[1.0_f64, 2.0], [2.0, 4.0]]);
        let qr = a.qr().unwrap();
        assert!((qr.q() * qr.r()).approx_eq(&a, TOL));
        assert!(qr.r()[(1, 1)].abs() < TOL);
        assert!(qr.det().abs() < TOL);

        let zero_col = Matrix::new([[0.0_f64, 1.0], [0.0, 1.0]]);
        let qr = zero_col.qr().unwrap();
        assert!((qr.q() * qr.r()).approx_eq(&zero_col, TOL));
    }

    #[test]
    fn solve_square() {
        let a = Matrix::new([[2.0_f64, 1.0, -1.0], [-3.0, -1.0, 2.0], [-2.0, 1.0, 2.0]]);
        let b = Matrix::new([[8.0], [-11.0], [-3.0]]);
        let x = a.qr().unwrap().solve(&b).unwrap();
        assert!(x.approx_eq(&Matrix::new([[2.0], [3.0], [-1.0]]), TOL));
    }

    #[test]
    fn identity() {
        let id = Matrix::<f64>::eye(4);
        for m in QrMethod::ALL {
            let qr = id.qr_with(m).unwrap();
            assert!((qr.q() * qr.r()).approx_eq(&id, TOL), "{}", m);
            assert!((qr.det() - 1.0).abs() < TOL, "{}", m);
        }
    }

    #[test]
    fn not_square() {
        let a = Matrix::<f64>::zeros(3, 2);
        for m in QrMethod::ALL {
            assert_eq!(a.qr_with(m).unwrap_err(), LinalgError::NotSquare { nrows: 3, ncols: 2 });
        }
    }

    #[test]
    fn householder_in_place_tall() {
        let mut a = Matrix::new([[1.0_f64, 0.0], [1.0, 1.0], [1.0, 2.0]]);
        let mut tau = [0.0; 2];
        let k = householder_in_place(&mut a, &mut tau);
        assert_eq!(k, 2);
        // |R_00| = ||(1,1,1)||
        assert!((a[(0, 0)].abs() - 3.0_f64.sqrt()).abs() < TOL);
    }

    #[test]
    fn parse_method() {
        assert_eq!(" GRAMSCHMIDT ".parse::<QrMethod>(), Ok(QrMethod::GramSchmidt));
        assert_eq!("gram_schmidt".parse::<QrMethod>(), Ok(QrMethod::GramSchmidt));
        assert_eq!("qr".parse::<QrMethod>(), Err(ParseQrMethodError));
        assert_eq!(QrMethod::default(), QrMethod::Householder);
        assert_eq!(format!("{}", QrMethod::GramSchmidt), "Gram-Schmidt");
    }
}
