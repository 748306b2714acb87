use alloc::vec::Vec;

use crate::linalg::LinalgError;
use crate::traits::{FloatScalar, LinalgScalar, Scalar};

use super::Matrix;

impl<T: Scalar> Matrix<T> {
    /// Sum of the main diagonal.
    pub fn trace(&self) -> T {
        self.diag().into_iter().fold(T::zero(), |acc, x| acc + x)
    }

    /// Main diagonal as a vector (length `min(nrows, ncols)`).
    pub fn diag(&self) -> Vec<T> {
        (0..self.nrows.min(self.ncols)).map(|i| self[(i, i)]).collect()
    }

    /// The matrix with row `row` and column `col` removed.
    ///
    /// ```
    /// use densela::Matrix;
    /// let m = Matrix::new([[1, 2, 3], [4, 5, 6], [7, 8, 9]]);
    /// assert_eq!(m.minor(1, 1), Matrix::new([[1, 3], [7, 9]]));
    /// ```
    pub fn minor(&self, row: usize, col: usize) -> Self {
        assert!(
            row < self.nrows && col < self.ncols,
            "minor ({},{}) out of bounds for {}x{} matrix",
            row, col, self.nrows, self.ncols,
        );
        let mut data = Vec::with_capacity((self.nrows - 1) * (self.ncols - 1));
        for i in (0..self.nrows).filter(|&i| i != row) {
            for j in (0..self.ncols).filter(|&j| j != col) {
                data.push(self[(i, j)]);
            }
        }
        Matrix::from_vec(self.nrows - 1, self.ncols - 1, data)
    }

    /// Non-negative integer power by repeated squaring. `A⁰ = I`.
    ///
    /// ```
    /// use densela::Matrix;
    /// let f = Matrix::new([[1_u64, 1], [1, 0]]);
    /// assert_eq!(f.pow(10).unwrap()[(0, 1)], 55);
    /// ```
    pub fn pow(&self, mut exp: u32) -> Result<Self, LinalgError> {
        self.require_square()?;
        let mut base = self.clone();
        let mut acc = Matrix::eye(self.nrows);
        while exp > 0 {
            if exp & 1 == 1 {
                acc = &acc * &base;
            }
            exp >>= 1;
            if exp > 0 {
                base = &base * &base;
            }
        }
        Ok(acc)
    }

    pub(crate) fn require_square(&self) -> Result<usize, LinalgError> {
        if self.is_square() {
            Ok(self.nrows)
        } else {
            Err(LinalgError::NotSquare {
                nrows: self.nrows,
                ncols: self.ncols,
            })
        }
    }

    // ── Structural predicates (exact) ───────────────────────────────

    /// `A == Aᵗ`, compared exactly.
    pub fn is_symmetric(&self) -> bool {
        self.is_square()
            && (0..self.nrows).all(|i| (i + 1..self.ncols).all(|j| self[(i, j)] == self[(j, i)]))
    }

    /// Square with every off-diagonal entry exactly zero.
    pub fn is_diagonal(&self) -> bool {
        self.is_square() && self.all_where(|i, j| i != j, |x| x == T::zero())
    }

    /// Square identity, compared exactly.
    pub fn is_identity(&self) -> bool {
        self.is_diagonal() && self.diag().into_iter().all(|x| x == T::one())
    }

    /// Square with every entry below the diagonal exactly zero.
    pub fn is_upper_triangular(&self) -> bool {
        self.is_square() && self.all_where(|i, j| i > j, |x| x == T::zero())
    }

    /// Square with every entry above the diagonal exactly zero.
    pub fn is_lower_triangular(&self) -> bool {
        self.is_square() && self.all_where(|i, j| i < j, |x| x == T::zero())
    }

    fn all_where(&self, select: impl Fn(usize, usize) -> bool, pred: impl Fn(T) -> bool) -> bool {
        (0..self.nrows).all(|i| {
            (0..self.ncols)
                .filter(|&j| select(i, j))
                .all(|j| pred(self[(i, j)]))
        })
    }
}

impl<T: LinalgScalar> Matrix<T> {
    /// Elementwise complex conjugate (a copy for real elements).
    pub fn conjugate(&self) -> Self {
        self.map(|x| x.conj())
    }

    /// Conjugate transpose `Aᴴ`.
    pub fn conjugate_transpose(&self) -> Self {
        self.transpose().conjugate()
    }

    /// `A == Aᴴ`, compared exactly. Equivalent to
    /// [`is_symmetric`](Self::is_symmetric) for real elements.
    pub fn is_hermitian(&self) -> bool {
        self.is_square()
            && (0..self.nrows)
                .all(|i| (i..self.ncols).all(|j| self[(i, j)] == self[(j, i)].conj()))
    }

    /// Integer power accepting negative exponents via the LU inverse.
    ///
    /// ```
    /// use densela::Matrix;
    /// let a = Matrix::new([[2.0_f64, 0.0], [0.0, 4.0]]);
    /// let p = a.pow_signed(-2).unwrap();
    /// assert!((p[(0, 0)] - 0.25).abs() < 1e-12);
    /// assert!((p[(1, 1)] - 0.0625).abs() < 1e-12);
    /// ```
    pub fn pow_signed(&self, exp: i32) -> Result<Self, LinalgError> {
        if exp < 0 {
            self.inverse()?.pow(exp.unsigned_abs())
        } else {
            self.pow(exp.unsigned_abs())
        }
    }
}

impl<T: FloatScalar> Matrix<T> {
    /// Every element within `tol` of the corresponding element of `rhs`.
    pub fn approx_eq(&self, rhs: &Matrix<T>, tol: T) -> bool {
        self.shape() == rhs.shape()
            && self
                .data
                .iter()
                .zip(rhs.data.iter())
                .all(|(&a, &b)| (a - b).abs() <= tol)
    }

    /// `AᵗA ≈ I` within `tol` per element.
    pub fn is_orthogonal_within(&self, tol: T) -> bool {
        self.is_square() && (&self.transpose() * self).approx_eq(&Matrix::eye(self.nrows), tol)
    }

    /// `AᵗA ≈ I` within `1000·ε` per element.
    ///
    /// ```
    /// use densela::Matrix;
    /// assert!(Matrix::<f64>::eye(3).is_orthogonal());
    /// let s = 0.5_f64.sqrt();
    /// assert!(Matrix::new([[s, -s], [s, s]]).is_orthogonal());
    /// assert!(!Matrix::new([[1.0_f64, 1.0], [0.0, 1.0]]).is_orthogonal());
    /// ```
    pub fn is_orthogonal(&self) -> bool {
        self.is_orthogonal_within(crate::traits::real_const::<T>(1e3) * T::epsilon())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_and_diag() {
        let m = Matrix::new([[1.0_f64, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        assert_eq!(m.trace(), 15.0);
        assert_eq!(m.diag(), vec![1.0, 5.0, 9.0]);
        assert_eq!(Matrix::new([[1, 2, 3], [4, 5, 6]]).diag(), vec![1, 5]);
    }

    #[test]
    fn predicates() {
        let id = Matrix::<f64>::eye(3);
        assert!(id.is_identity());
        assert!(id.is_diagonal());
        assert!(id.is_symmetric());
        assert!(id.is_upper_triangular());
        assert!(id.is_lower_triangular());
        assert!(id.is_orthogonal());

        let u = Matrix::new([[1, 2], [0, 3]]);
        assert!(u.is_upper_triangular());
        assert!(!u.is_lower_triangular());
        assert!(!u.is_symmetric());
        assert!(u.transpose().is_lower_triangular());

        let rect = Matrix::<f64>::identity(2, 3);
        assert!(!rect.is_identity());
        assert!(!rect.is_symmetric());
    }

    #[test]
    fn pow_non_square() {
        let m = Matrix::<f64>::zeros(2, 3);
        assert_eq!(m.pow(2).unwrap_err(), LinalgError::NotSquare { nrows: 2, ncols: 3 });
    }

    #[test]
    fn pow_zero_is_identity() {
        let m = Matrix::new([[3, 1], [4, 1]]);
        assert_eq!(m.pow(0).unwrap(), Matrix::eye(2));
        assert_eq!(m.pow(3).unwrap(), &(&m * &m) * &m);
    }

    #[test]
    fn pow_signed_singular() {
        let m = Matrix::new([[1.0_f64, 2.0], [2.0, 4.0]]);
        assert_eq!(m.pow_signed(-1).unwrap_err(), LinalgError::Singular);
        assert!(m.pow_signed(2).is_ok());
    }

    #[test]
    fn conjugate_real_is_copy() {
        let m = Matrix::new([[1.0_f64, 2.0], [2.0, 5.0]]);
        assert_eq!(m.conjugate(), m);
        assert_eq!(m.conjugate_transpose(), m.transpose());
        assert!(m.is_hermitian());
        assert!(!Matrix::new([[1.0_f64, 2.0], [3.0, 5.0]]).is_hermitian());
    }

    #[test]
    fn approx_eq_tolerance() {
        let a = Matrix::new([[1.0_f64, 2.0]]);
        let b = Matrix::new([[1.0 + 1e-12, 2.0]]);
        assert!(a.approx_eq(&b, 1e-10));
        assert!(!a.approx_eq(&b, 1e-14));
        assert!(!a.approx_eq(&a.transpose(), 1.0));
    }
}
