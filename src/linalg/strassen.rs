use crate::linalg::LinalgError;
use crate::traits::Scalar;
use crate::Matrix;

/// Block size at or below which [`Matrix::strassen`] switches to the naive
/// triple loop.
pub const STRASSEN_CUTOFF: usize = 32;

// Both operands square, same size, size a power of two.
fn check_operands<T>(a: &Matrix<T>, b: &Matrix<T>) -> Result<usize, LinalgError> {
    for m in [a, b] {
        if !m.is_square() {
            return Err(LinalgError::NotSquare {
                nrows: m.nrows(),
                ncols: m.ncols(),
            });
        }
    }
    let n = a.nrows();
    if b.nrows() != n {
        return Err(LinalgError::InvalidShape {
            expected: a.shape(),
            got: b.shape(),
        });
    }
    if !n.is_power_of_two() {
        let next = n.next_power_of_two();
        return Err(LinalgError::InvalidShape {
            expected: (next, next),
            got: a.shape(),
        });
    }
    Ok(n)
}

// Seven-product recursion:
//   P1 = (A11 + A22)(B11 + B22)   P5 = (A11 + A12) B22
//   P2 = (A21 + A22) B11          P6 = (A21 - A11)(B11 + B12)
//   P3 = A11 (B12 - B22)          P7 = (A12 - A22)(B21 + B22)
//   P4 = A22 (B21 - B11)
//   C11 = P1 + P4 - P5 + P7       C12 = P3 + P5
//   C21 = P2 + P4                 C22 = P1 - P2 + P3 + P6
fn strassen_rec<T: Scalar>(a: &Matrix<T>, b: &Matrix<T>, cutoff: usize) -> Result<Matrix<T>, LinalgError> {
    let n = a.nrows();
    if n <= cutoff.max(1) {
        return a.matmul(b);
    }
    log::trace!("strassen: splitting {}x{}", n, n);

    let [a11, a12, a21, a22] = a.quadrants();
    let [b11, b12, b21, b22] = b.quadrants();

    let p1 = strassen_rec(&(&a11 + &a22), &(&b11 + &b22), cutoff)?;
    let p2 = strassen_rec(&(&a21 + &a22), &b11, cutoff)?;
    let p3 = strassen_rec(&a11, &(&b12 - &b22), cutoff)?;
    let p4 = strassen_rec(&a22, &(&b21 - &b11), cutoff)?;
    let p5 = strassen_rec(&(&a11 + &a12), &b22, cutoff)?;
    let p6 = strassen_rec(&(&a21 - &a11), &(&b11 + &b12), cutoff)?;
    let p7 = strassen_rec(&(&a12 - &a22), &(&b21 + &b22), cutoff)?;

    let c11 = &(&(&p1 + &p4) - &p5) + &p7;
    let c12 = &p3 + &p5;
    let c21 = &p2 + &p4;
    let c22 = &(&(&p1 - &p2) + &p3) + &p6;

    Matrix::from_quadrants(&c11, &c12, &c21, &c22)
}

impl<T: Scalar> Matrix<T> {
    /// Strassen product, recursing until blocks are at most
    /// [`STRASSEN_CUTOFF`] wide and multiplying those naively.
    ///
    /// Operands must be square with equal power-of-two size: a non-square
    /// operand is `NotSquare`, any other mismatch `InvalidShape`.
    ///
    /// ```
    /// use densela::Matrix;
    /// let a = Matrix::from_fn(64, 64, |i, j| ((i * 3 + j) % 7) as i64 - 3);
    /// let b = Matrix::from_fn(64, 64, |i, j| ((i + 2 * j) % 5) as i64);
    /// assert_eq!(a.strassen(&b).unwrap(), a.matmul(&b).unwrap());
    /// ```
    pub fn strassen(&self, rhs: &Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        check_operands(self, rhs)?;
        strassen_rec(self, rhs, STRASSEN_CUTOFF)
    }

    /// Strassen product recursing all the way to 1×1 blocks.
    ///
    /// Same preconditions as [`strassen`](Self::strassen). Slower than
    /// either `strassen` or [`matmul`](Self::matmul) in practice; useful
    /// for exercising the recursion on small inputs.
    ///
    /// ```
    /// use densela::Matrix;
    /// let a = Matrix::new([[1, 2], [3, 4]]);
    /// let b = Matrix::new([[5, 6], [7, 8]]);
    /// assert_eq!(a.strassen_multiply(&b).unwrap(), Matrix::new([[19, 22], [43, 50]]));
    /// ```
    pub fn strassen_multiply(&self, rhs: &Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        check_operands(self, rhs)?;
        strassen_rec(self, rhs, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_pair(n: usize) -> (Matrix<i64>, Matrix<i64>) {
        (
            Matrix::from_fn(n, n, |i, j| ((i * 7 + j * 13) % 17) as i64 - 8),
            Matrix::from_fn(n, n, |i, j| ((i * 5 + j * 3) % 11) as i64 - 5),
        )
    }

    #[test]
    fn matches_naive_integers() {
        for n in [1, 2, 4, 8, 16] {
            let (a, b) = int_pair(n);
            let naive = a.matmul(&b).unwrap();
            assert_eq!(a.strassen_multiply(&b).unwrap(), naive, "n={}", n);
            assert_eq!(a.strassen(&b).unwrap(), naive, "n={}", n);
        }
    }

    #[test]
    fn above_cutoff_recurses_correctly() {
        let (a, b) = int_pair(128);
        assert_eq!(a.strassen(&b).unwrap(), a.matmul(&b).unwrap());
    }

    #[test]
    fn floats_agree() {
        let a = Matrix::from_fn(64, 64, |i, j| ((i + j) as f64).sin());
        let b = Matrix::from_fn(64, 64, |i, j| ((i * j) as f64 * 0.01).cos());
        let naive = a.matmul(&b).unwrap();
        assert!(a.strassen(&b).unwrap().approx_eq(&naive, 1e-10));
        assert!(a.strassen_multiply(&b).unwrap().approx_eq(&naive, 1e-10));
    }

    #[test]
    fn shape_errors() {
        let sq3 = Matrix::<f64>::zeros(3, 3);
        assert_eq!(
            sq3.strassen(&sq3).unwrap_err(),
            LinalgError::InvalidShape { expected: (4, 4), got: (3, 3) }
        );
        let rect = Matrix::<f64>::zeros(2, 4);
        assert_eq!(
            rect.strassen_multiply(&rect).unwrap_err(),
            LinalgError::NotSquare { nrows: 2, ncols: 4 }
        );
        let a = Matrix::<f64>::zeros(2, 2);
        let b = Matrix::<f64>::zeros(4, 4);
        assert_eq!(
            a.strassen(&b).unwrap_err(),
            LinalgError::InvalidShape { expected: (2, 2), got: (4, 4) }
        );
    }
}
