use crate::linalg::{LinalgError, LuDecomposition};
use crate::traits::FloatScalar;
use crate::Matrix;

/// Explicit `(Q, R, det Q)` by modified Gram-Schmidt.
///
/// Column `j` of Q is the normalised residual of column `j` of A after
/// removing its components along `q_0..q_{j-1}`; each new `q_j` is removed
/// from the remaining columns immediately, which keeps Q orthogonal to
/// working precision. R has a strictly positive diagonal.
///
/// Fails with `Singular` when a residual column is exactly zero.
pub(crate) fn gram_schmidt_qr<T: FloatScalar>(
    a: &Matrix<T>,
) -> Result<(Matrix<T>, Matrix<T>, T), LinalgError> {
    let n = a.nrows();
    let mut v = a.clone();
    let mut r = Matrix::zeros(n, n);

    for j in 0..n {
        let mut norm_sq = T::zero();
        for i in 0..n {
            norm_sq = norm_sq + v[(i, j)] * v[(i, j)];
        }
        if norm_sq == T::zero() {
            return Err(LinalgError::Singular);
        }
        let norm = norm_sq.sqrt();
        r[(j, j)] = norm;
        for i in 0..n {
            v[(i, j)] = v[(i, j)] / norm;
        }

        for k in (j + 1)..n {
            let mut dot = T::zero();
            for i in 0..n {
                dot = dot + v[(i, j)] * v[(i, k)];
            }
            r[(j, k)] = dot;
            for i in 0..n {
                let qij = v[(i, j)];
                v[(i, k)] = v[(i, k)] - dot * qij;
            }
        }
    }

    // Q is orthogonal, so its determinant is ±1; LU recovers the sign.
    let q_det = match LuDecomposition::new(&v) {
        Ok(lu) if lu.det() < T::zero() => -T::one(),
        Ok(_) => T::one(),
        Err(e) => return Err(e),
    };

    Ok((v, r, q_det))
}
