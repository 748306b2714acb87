use crate::traits::FloatScalar;
use crate::Matrix;

/// Plane rotation `(c, s)` with `[c s; -s c]·[a; b] = [r; 0]`.
///
/// Computed without overflow for large `a`, `b`. `(1, 0)` when `b == 0`.
///
/// ```
/// use densela::linalg::givens_rotation;
///
/// let (c, s) = givens_rotation(3.0_f64, 4.0);
/// assert!((-s * 3.0 + c * 4.0).abs() < 1e-15);
/// assert!(((c * 3.0 + s * 4.0).abs() - 5.0).abs() < 1e-14);
/// ```
pub fn givens_rotation<T: FloatScalar>(a: T, b: T) -> (T, T) {
    if b == T::zero() {
        (T::one(), T::zero())
    } else if b.abs() > a.abs() {
        let t = a / b;
        let s = T::one() / (T::one() + t * t).sqrt();
        (s * t, s)
    } else {
        let t = b / a;
        let c = T::one() / (T::one() + t * t).sqrt();
        (c, c * t)
    }
}

/// Explicit `(Q, R, det Q)` by Givens rotations.
///
/// Each sub-diagonal entry `(i, j)` is zeroed against the diagonal row `j`;
/// Q accumulates the transposed rotations, so `det Q = 1`.
pub(crate) fn givens_qr<T: FloatScalar>(a: &Matrix<T>) -> (Matrix<T>, Matrix<T>, T) {
    let n = a.nrows();
    let mut r = a.clone();
    let mut q = Matrix::eye(n);

    for j in 0..n {
        for i in (j + 1)..n {
            let b = r[(i, j)];
            if b == T::zero() {
                continue;
            }
            let (c, s) = givens_rotation(r[(j, j)], b);

            // rows j, i of R
            for k in j..n {
                let rj = r[(j, k)];
                let ri = r[(i, k)];
                r[(j, k)] = c * rj + s * ri;
                r[(i, k)] = c * ri - s * rj;
            }
            r[(i, j)] = T::zero();

            // columns j, i of Q
            for k in 0..n {
                let qj = q[(k, j)];
                let qi = q[(k, i)];
                q[(k, j)] = c * qj + s * qi;
                q[(k, i)] = c * qi - s * qj;
            }
        }
    }

    (q, r, T::one())
}
