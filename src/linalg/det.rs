use crate::linalg::LinalgError;
use crate::traits::Scalar;
use crate::Matrix;

/// Determinant by recursive Laplace expansion along the first row.
///
/// O(n!) time: this is a correctness oracle for small matrices, not a
/// production path (use [`Matrix::det`]). Works for integer elements since
/// no division is performed. The empty matrix has determinant one.
///
/// ```
/// use densela::Matrix;
/// use densela::linalg::cofactor_det;
///
/// let a = Matrix::new([[2_i64, 0, 1], [1, 3, 2], [1, 1, 2]]);
/// assert_eq!(cofactor_det(&a).unwrap(), 6);
/// ```
pub fn cofactor_det<T: Scalar>(a: &Matrix<T>) -> Result<T, LinalgError> {
    a.require_square()?;
    Ok(expand(a))
}

fn expand<T: Scalar>(a: &Matrix<T>) -> T {
    match a.nrows() {
        0 => T::one(),
        1 => a[(0, 0)],
        2 => a[(0, 0)] * a[(1, 1)] - a[(0, 1)] * a[(1, 0)],
        n => {
            let mut det = T::zero();
            for j in 0..n {
                let a0j = a[(0, j)];
                if a0j == T::zero() {
                    continue;
                }
                let term = a0j * expand(&a.minor(0, j));
                det = if j % 2 == 0 { det + term } else { det - term };
            }
            det
        }
    }
}

impl<T: Scalar> Matrix<T> {
    /// Cofactor matrix: entry `(i, j)` is `(-1)^(i+j)` times the
    /// determinant of [`minor(i, j)`](Self::minor).
    pub fn cofactors(&self) -> Result<Matrix<T>, LinalgError> {
        let n = self.require_square()?;
        if n == 0 {
            return Ok(Matrix::zeros(0, 0));
        }
        Ok(Matrix::from_fn(n, n, |i, j| {
            let m = expand(&self.minor(i, j));
            if (i + j) % 2 == 0 {
                m
            } else {
                m.negate()
            }
        }))
    }

    /// Adjugate (transposed cofactor matrix), so that `A·adj(A) = det(A)·I`.
    ///
    /// ```
    /// use densela::Matrix;
    /// let a = Matrix::new([[1, 2], [3, 4]]);
    /// assert_eq!(a.adjugate().unwrap(), Matrix::new([[4, -2], [-3, 1]]));
    /// ```
    pub fn adjugate(&self) -> Result<Matrix<T>, LinalgError> {
        Ok(self.cofactors()?.transpose())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_cases() {
        assert_eq!(cofactor_det(&Matrix::new([[7.0_f64]])).unwrap(), 7.0);
        assert_eq!(cofactor_det(&Matrix::new([[4.0_f64, 3.0], [6.0, 3.0]])).unwrap(), -6.0);
        assert_eq!(cofactor_det(&Matrix::<i32>::eye(4)).unwrap(), 1);
        assert_eq!(cofactor_det(&Matrix::<f64>::zeros(0, 0)).unwrap(), 1.0);
    }

    #[test]
    fn agrees_with_lu() {
        let a = Matrix::from_fn(5, 5, |i, j| ((i * 7 + j * 3) % 11) as f64 - 5.0);
        let oracle = cofactor_det(&a).unwrap();
        let lu = a.det().unwrap();
        assert!((oracle - lu).abs() < 1e-9 * oracle.abs().max(1.0), "{} vs {}", oracle, lu);
    }

    #[test]
    fn not_square() {
        let a = Matrix::<i64>::zeros(2, 3);
        assert_eq!(cofactor_det(&a).unwrap_err(), LinalgError::NotSquare { nrows: 2, ncols: 3 });
    }

    #[test]
    fn adjugate_identity() {
        let a = Matrix::new([[2_i64, 0, 1], [1, 3, 2], [1, 1, 2]]);
        let det = cofactor_det(&a).unwrap();
        let prod = &a * &a.adjugate().unwrap();
        assert_eq!(prod, Matrix::<i64>::eye(3) * det);
    }
}
