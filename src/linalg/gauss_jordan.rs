use crate::linalg::LinalgError;
use crate::traits::LinalgScalar;
use crate::Matrix;

/// Inverse by Gauss-Jordan elimination on the augmented matrix `[A | I]`.
///
/// Each column is pivoted on its largest-modulus entry, the pivot row is
/// scaled to 1 and the column is cleared in every other row. The right
/// half of the reduced system is `A⁻¹`.
///
/// Fails with `NotSquare`, or `Singular` when a column has no non-zero
/// pivot candidate.
///
/// ```
/// use densela::Matrix;
/// use densela::linalg::gauss_jordan_inverse;
///
/// let a = Matrix::new([[4.0_f64, 7.0], [2.0, 6.0]]);
/// let inv = gauss_jordan_inverse(&a).unwrap();
/// assert!((inv[(0, 0)] - 0.6).abs() < 1e-12);
/// assert!((inv[(0, 1)] + 0.7).abs() < 1e-12);
/// ```
pub fn gauss_jordan_inverse<T: LinalgScalar>(a: &Matrix<T>) -> Result<Matrix<T>, LinalgError> {
    let n = a.require_square()?;
    let mut aug = a.hcat(&Matrix::eye(n))?;
    let width = 2 * n;

    for col in 0..n {
        let mut pivot_row = col;
        let mut max_val = aug[(col, col)].modulus();
        for row in (col + 1)..n {
            let val = aug[(row, col)].modulus();
            if val > max_val {
                max_val = val;
                pivot_row = row;
            }
        }
        if max_val == <T::Real as num_traits::Zero>::zero() {
            return Err(LinalgError::Singular);
        }
        aug.swap_rows(col, pivot_row);

        let inv_pivot = T::one() / aug[(col, col)];
        for x in aug.row_slice_mut(col)[col..].iter_mut() {
            *x = *x * inv_pivot;
        }

        for row in (0..n).filter(|&r| r != col) {
            let factor = aug[(row, col)];
            if factor == T::zero() {
                continue;
            }
            for j in col..width {
                let v = aug[(col, j)];
                aug[(row, j)] = aug[(row, j)] - factor * v;
            }
        }
    }

    Ok(aug.block(0, n, n, n))
}

impl<T: LinalgScalar> Matrix<T> {
    /// Inverse by Gauss-Jordan elimination. See [`gauss_jordan_inverse`].
    pub fn inverse_gauss_jordan(&self) -> Result<Matrix<T>, LinalgError> {
        gauss_jordan_inverse(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_lu_inverse() {
        let a = Matrix::new([[2.0_f64, -1.0, 0.0], [-1.0, 2.0, -1.0], [0.0, -1.0, 2.0]]);
        let gj = a.inverse_gauss_jordan().unwrap();
        let lu = a.inverse().unwrap();
        assert!(gj.approx_eq(&lu, 1e-12));
        assert!((&a * &gj).approx_eq(&Matrix::eye(3), 1e-12));
    }

    #[test]
    fn needs_row_exchange() {
        let a = Matrix::new([[0.0_f64, 2.0], [3.0, 0.0]]);
        let inv = a.inverse_gauss_jordan().unwrap();
        assert_eq!(inv, Matrix::new([[0.0, 1.0 / 3.0], [0.5, 0.0]]));
    }

    #[test]
    fn identity_is_own_inverse() {
        let id = Matrix::<f64>::eye(3);
        assert_eq!(id.inverse_gauss_jordan().unwrap(), id);
    }

    #[test]
    fn singular_and_non_square() {
        let s = Matrix::new([[1.0_f64, 2.0], [2.0, 4.0]]);
        assert_eq!(s.inverse_gauss_jordan().unwrap_err(), LinalgError::Singular);
        let r = Matrix::<f64>::zeros(3, 2);
        assert_eq!(
            r.inverse_gauss_jordan().unwrap_err(),
            LinalgError::NotSquare { nrows: 3, ncols: 2 }
        );
    }
}
