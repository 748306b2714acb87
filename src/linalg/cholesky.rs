use num_traits::{Float, Zero};

use crate::linalg::triangular::{back_substitution, forward_substitution};
use crate::linalg::LinalgError;
use crate::traits::{real_const, LinalgScalar, MatrixMut};
use crate::Matrix;

/// Cholesky decomposition in place: `A = L·Lᴴ`.
///
/// Reads only the lower triangle of `a`; on return it holds L there. The
/// strict upper triangle is left unchanged.
///
/// Fails with `NotPositiveDefinite` when a pivot `a_jj - Σ|l_jk|²` has a
/// real part that is not strictly positive.
pub fn cholesky_in_place<T: LinalgScalar>(a: &mut impl MatrixMut<T>) -> Result<(), LinalgError> {
    let n = a.nrows();
    assert_eq!(n, a.ncols(), "Cholesky decomposition requires a square matrix");

    for i in 0..n {
        for j in 0..=i {
            let mut sum = *a.get(i, j);
            for k in 0..j {
                sum = sum - *a.get(i, k) * (*a.get(j, k)).conj();
            }

            if i == j {
                let d = sum.re();
                if d <= <T::Real as Zero>::zero() {
                    return Err(LinalgError::NotPositiveDefinite);
                }
                *a.get_mut(i, i) = T::from_real(d.lsqrt());
            } else {
                let ljj = *a.get(j, j);
                *a.get_mut(i, j) = sum / ljj;
            }
        }
    }

    Ok(())
}

// Hermitian within 100·ε relative to the larger of each mirrored pair.
fn is_hermitian_approx<T: LinalgScalar>(a: &Matrix<T>) -> bool {
    let eps = T::lepsilon() * real_const::<T::Real>(100.0);
    let n = a.nrows();
    (0..n).all(|i| {
        (i..n).all(|j| {
            let x = a[(i, j)];
            let y = a[(j, i)].conj();
            let scale = Float::max(x.modulus(), y.modulus());
            (x - y).modulus() <= eps * scale
        })
    })
}

/// Cholesky decomposition of a (Hermitian) positive-definite matrix.
///
/// Construction checks symmetry as well as the pivots, so every error
/// path reports `NotPositiveDefinite` and there is no unchecked variant.
///
/// # Example
///
/// ```
/// use densela::Matrix;
///
/// let a = Matrix::new([[4.0_f64, 2.0], [2.0, 3.0]]);
/// let chol = a.cholesky().unwrap();
///
/// let l = chol.l();
/// assert!((l[(1, 1)] - 2.0_f64.sqrt()).abs() < 1e-12);
/// assert!((l * l.transpose()).approx_eq(&a, 1e-12));
/// assert!((chol.det() - 8.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct CholeskyDecomposition<T> {
    l: Matrix<T>,
}

impl<T: LinalgScalar> CholeskyDecomposition<T> {
    /// Fails with `NotSquare`, or `NotPositiveDefinite` if `a` is not
    /// Hermitian-symmetric or not positive definite.
    pub fn new(a: &Matrix<T>) -> Result<Self, LinalgError> {
        let n = a.require_square()?;
        if !is_hermitian_approx(a) {
            return Err(LinalgError::NotPositiveDefinite);
        }
        let mut l = a.clone();
        cholesky_in_place(&mut l)?;
        for i in 0..n {
            for j in (i + 1)..n {
                l[(i, j)] = T::zero();
            }
        }
        Ok(Self { l })
    }

    /// Lower-triangular factor (zeros above the diagonal).
    pub fn l(&self) -> &Matrix<T> {
        &self.l
    }

    pub fn into_l(self) -> Matrix<T> {
        self.l
    }

    /// Solve `A·X = B` as `Lᴴ \ (L \ B)`.
    pub fn solve(&self, b: &Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        let y = forward_substitution(&self.l, b)?;
        back_substitution(&self.l.conjugate_transpose(), &y)
    }

    /// `det(A) = (Π L_ii)²`.
    pub fn det(&self) -> T {
        let p = self.l.diag().into_iter().fold(T::one(), |acc, x| acc * x);
        p * p
    }

    /// `ln det(A) = 2·Σ ln L_ii`, stable where `det` would overflow.
    pub fn ln_det(&self) -> T {
        self.l
            .diag()
            .into_iter()
            .fold(T::zero(), |acc, x| acc + x.lln())
            * T::two()
    }

    /// Inverse by solving against the identity.
    pub fn inverse(&self) -> Result<Matrix<T>, LinalgError> {
        self.solve(&Matrix::eye(self.l.nrows()))
    }
}

impl<T: LinalgScalar> Matrix<T> {
    /// Checked Cholesky decomposition `A = L·Lᴴ`.
    pub fn cholesky(&self) -> Result<CholeskyDecomposition<T>, LinalgError> {
        CholeskyDecomposition::new(self)
    }

    /// True if the Cholesky decomposition succeeds.
    pub fn is_positive_definite(&self) -> bool {
        self.cholesky().is_ok()
    }
}
