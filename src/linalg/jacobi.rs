use alloc::vec::Vec;

use crate::linalg::{LinalgError, SpectralSettings};
use crate::traits::FloatScalar;
use crate::Matrix;

/// Eigen decomposition of a real symmetric matrix by the classical Jacobi
/// method.
///
/// Each step picks the largest off-diagonal entry `a_pq`, applies the plane
/// rotation that zeroes it on both sides (`A ← Jᵗ·A·J`) and accumulates
/// `V ← V·J`. Iteration stops once the off-diagonal Frobenius norm drops
/// below `settings.tolerance`, or after `settings.max_iter` rotations; the
/// cap is not an error, [`converged`](Self::converged) reports which
/// happened.
///
/// The input is assumed symmetric; only square shape is checked.
///
/// # Example
///
/// ```
/// use densela::Matrix;
///
/// let a = Matrix::new([[2.0_f64, 1.0], [1.0, 2.0]]);
/// let eig = a.eig_jacobi().unwrap();
/// assert!((eig.eigenvalues()[0] - 1.0).abs() < 1e-10);
/// assert!((eig.eigenvalues()[1] - 3.0).abs() < 1e-10);
///
/// // Row i of the eigenvector matrix pairs with eigenvalue i.
/// let v = eig.eigenvector(1);
/// assert!((v[0].abs() - 0.5_f64.sqrt()).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct JacobiEigen<T> {
    eigenvalues: Vec<T>,
    eigenvectors: Matrix<T>,
    iterations: usize,
    converged: bool,
}

impl<T: FloatScalar> JacobiEigen<T> {
    pub fn new(a: &Matrix<T>, settings: &SpectralSettings<T>) -> Result<Self, LinalgError> {
        let n = a.require_square()?;
        let mut w = a.clone();
        let mut v = Matrix::eye(n);
        let mut iterations = 0;
        let mut converged = false;

        loop {
            let off = w.off_diagonal_norm();
            if off <= settings.tolerance {
                converged = true;
                break;
            }
            // for symmetric input off > 0 implies n >= 2 and a nonzero upper entry
            let Some((p, q)) = largest_off_diagonal(&w) else {
                converged = true;
                break;
            };
            if iterations >= settings.max_iter {
                log::warn!(
                    "jacobi: stopped at {} rotations, off-diagonal norm {:?}",
                    iterations,
                    off
                );
                break;
            }

            rotate(&mut w, &mut v, p, q);
            iterations += 1;
        }

        log::debug!("jacobi: n={} rotations={} converged={}", n, iterations, converged);

        // Columns of V are eigenvectors; order them by ascending eigenvalue
        // and hand them out as rows.
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&i, &j| {
            w[(i, i)]
                .partial_cmp(&w[(j, j)])
                .unwrap_or(core::cmp::Ordering::Equal)
        });

        let eigenvalues = order.iter().map(|&k| w[(k, k)]).collect();
        let mut eigenvectors = Matrix::zeros(n, n);
        for (row, &k) in order.iter().enumerate() {
            let mut norm_sq = T::zero();
            for i in 0..n {
                norm_sq = norm_sq + v[(i, k)] * v[(i, k)];
            }
            let norm = norm_sq.sqrt();
            for i in 0..n {
                eigenvectors[(row, i)] = v[(i, k)] / norm;
            }
        }

        Ok(Self {
            eigenvalues,
            eigenvectors,
            iterations,
            converged,
        })
    }

    /// Eigenvalues in ascending order.
    pub fn eigenvalues(&self) -> &[T] {
        &self.eigenvalues
    }

    /// Unit eigenvectors as rows, in the order of [`eigenvalues`](Self::eigenvalues).
    pub fn eigenvectors(&self) -> &Matrix<T> {
        &self.eigenvectors
    }

    /// Eigenvector for eigenvalue `i`.
    pub fn eigenvector(&self, i: usize) -> &[T] {
        self.eigenvectors.row_slice(i)
    }

    /// Rotations applied.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Whether the off-diagonal norm reached the tolerance.
    pub fn converged(&self) -> bool {
        self.converged
    }

    pub fn into_parts(self) -> (Vec<T>, Matrix<T>) {
        (self.eigenvalues, self.eigenvectors)
    }
}

// Upper-triangle position of the largest |w_ij|, or None if all are zero.
fn largest_off_diagonal<T: FloatScalar>(w: &Matrix<T>) -> Option<(usize, usize)> {
    let n = w.nrows();
    let mut best = T::zero();
    let mut at = None;
    for i in 0..n {
        for j in (i + 1)..n {
            let x = w[(i, j)].abs();
            if x > best {
                best = x;
                at = Some((i, j));
            }
        }
    }
    at
}

// Symmetric Schur rotation zeroing w[p][q]:
//   tau = (w_qq - w_pp) / (2 w_pq),  t = sign(tau) / (|tau| + sqrt(1 + tau²))
fn rotate<T: FloatScalar>(w: &mut Matrix<T>, v: &mut Matrix<T>, p: usize, q: usize) {
    let n = w.nrows();
    let apq = w[(p, q)];
    if apq == T::zero() {
        return;
    }
    let tau = (w[(q, q)] - w[(p, p)]) / (T::two() * apq);
    let t = if tau >= T::zero() {
        T::one() / (tau + (T::one() + tau * tau).sqrt())
    } else {
        -T::one() / (-tau + (T::one() + tau * tau).sqrt())
    };
    let c = T::one() / (T::one() + t * t).sqrt();
    let s = t * c;

    // W·J
    for k in 0..n {
        let wkp = w[(k, p)];
        let wkq = w[(k, q)];
        w[(k, p)] = c * wkp - s * wkq;
        w[(k, q)] = s * wkp + c * wkq;
    }
    // Jᵗ·(W·J)
    for k in 0..n {
        let wpk = w[(p, k)];
        let wqk = w[(q, k)];
        w[(p, k)] = c * wpk - s * wqk;
        w[(q, k)] = s * wpk + c * wqk;
    }
    w[(p, q)] = T::zero();
    w[(q, p)] = T::zero();

    for k in 0..n {
        let vkp = v[(k, p)];
        let vkq = v[(k, q)];
        v[(k, p)] = c * vkp - s * vkq;
        v[(k, q)] = s * vkp + c * vkq;
    }
}

impl<T: FloatScalar> Matrix<T> {
    /// Jacobi eigen decomposition with explicit settings.
    pub fn eig_jacobi_with(&self, settings: &SpectralSettings<T>) -> Result<JacobiEigen<T>, LinalgError> {
        JacobiEigen::new(self, settings)
    }
}

impl Matrix<f64> {
    /// Jacobi eigen decomposition with default settings (tolerance 1e-10,
    /// at most 1000 rotations).
    pub fn eig_jacobi(&self) -> Result<JacobiEigen<f64>, LinalgError> {
        JacobiEigen::new(self, &SpectralSettings::default())
    }
}

impl Matrix<f32> {
    /// Jacobi eigen decomposition with default settings.
    pub fn eig_jacobi(&self) -> Result<JacobiEigen<f32>, LinalgError> {
        JacobiEigen::new(self, &SpectralSettings::default())
    }
}
