use crate::linalg::LinalgError;
use crate::traits::LinalgScalar;
use crate::Matrix;

fn check_system<T>(tri: &Matrix<T>, b: &Matrix<T>) -> Result<usize, LinalgError> {
    if !tri.is_square() {
        return Err(LinalgError::NotSquare {
            nrows: tri.nrows(),
            ncols: tri.ncols(),
        });
    }
    let n = tri.nrows();
    if b.nrows() != n {
        return Err(LinalgError::InvalidShape {
            expected: (n, b.ncols()),
            got: b.shape(),
        });
    }
    Ok(n)
}

/// Solve `L·X = B` for lower-triangular `L`, one column of `B` at a time.
///
/// Only the lower triangle of `l` is read. Fails with `Singular` if a
/// diagonal entry is exactly zero.
///
/// ```
/// use densela::Matrix;
/// use densela::linalg::forward_substitution;
///
/// let l = Matrix::new([[2.0_f64, 0.0], [1.0, 4.0]]);
/// let b = Matrix::new([[2.0], [9.0]]);
/// let x = forward_substitution(&l, &b).unwrap();
/// assert_eq!(x, Matrix::new([[1.0], [2.0]]));
/// ```
pub fn forward_substitution<T: LinalgScalar>(
    l: &Matrix<T>,
    b: &Matrix<T>,
) -> Result<Matrix<T>, LinalgError> {
    let n = check_system(l, b)?;
    let mut x = b.clone();
    for c in 0..b.ncols() {
        for i in 0..n {
            let d = l[(i, i)];
            if d == T::zero() {
                return Err(LinalgError::Singular);
            }
            let mut sum = x[(i, c)];
            for j in 0..i {
                sum = sum - l[(i, j)] * x[(j, c)];
            }
            x[(i, c)] = sum / d;
        }
    }
    Ok(x)
}

/// Solve `U·X = B` for upper-triangular `U`, one column of `B` at a time.
///
/// Only the upper triangle of `u` is read. Fails with `Singular` if a
/// diagonal entry is exactly zero.
pub fn back_substitution<T: LinalgScalar>(
    u: &Matrix<T>,
    b: &Matrix<T>,
) -> Result<Matrix<T>, LinalgError> {
    let n = check_system(u, b)?;
    let mut x = b.clone();
    for c in 0..b.ncols() {
        for i in (0..n).rev() {
            let d = u[(i, i)];
            if d == T::zero() {
                return Err(LinalgError::Singular);
            }
            let mut sum = x[(i, c)];
            for j in (i + 1)..n {
                sum = sum - u[(i, j)] * x[(j, c)];
            }
            x[(i, c)] = sum / d;
        }
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_substitution_3x3() {
        let u = Matrix::new([[1.0_f64, 2.0, 3.0], [0.0, 4.0, 5.0], [0.0, 0.0, 6.0]]);
        let x_true = Matrix::new([[1.0], [-1.0], [2.0]]);
        let b = &u * &x_true;
        let x = back_substitution(&u, &b).unwrap();
        assert!(x.approx_eq(&x_true, 1e-14));
    }

    #[test]
    fn forward_ignores_upper_triangle() {
        // Entries above the diagonal are never read.
        let l = Matrix::new([[1.0_f64, 99.0], [2.0, 1.0]]);
        let b = Matrix::new([[1.0, 0.0], [4.0, 1.0]]);
        let x = forward_substitution(&l, &b).unwrap();
        assert_eq!(x, Matrix::new([[1.0, 0.0], [2.0, 1.0]]));
    }

    #[test]
    fn zero_diagonal_is_singular() {
        let u = Matrix::new([[1.0_f64, 2.0], [0.0, 0.0]]);
        let b = Matrix::new([[1.0], [1.0]]);
        assert_eq!(back_substitution(&u, &b).unwrap_err(), LinalgError::Singular);
        assert_eq!(forward_substitution(&u, &b).unwrap_err(), LinalgError::Singular);
    }

    #[test]
    fn shape_errors() {
        let l = Matrix::<f64>::eye(2);
        let b = Matrix::<f64>::zeros(3, 1);
        assert_eq!(
            forward_substitution(&l, &b).unwrap_err(),
            LinalgError::InvalidShape { expected: (2, 1), got: (3, 1) }
        );
        let r = Matrix::<f64>::zeros(2, 3);
        assert_eq!(
            back_substitution(&r, &b).unwrap_err(),
            LinalgError::NotSquare { nrows: 2, ncols: 3 }
        );
    }
}
