use alloc::vec::Vec;

use crate::linalg::qr::householder_qr;
use crate::linalg::{LinalgError, SpectralSettings};
use crate::traits::{real_const, FloatScalar};
use crate::Matrix;

/// Eigenvalues by shifted QR iteration with deflation.
///
/// Works on the leading `m×m` active block `A_k` of the iterate:
///
/// ```text
/// A_k - μI = Q·R   (Householder),   A_{k+1} = R·Q + μI
/// ```
///
/// applied as a similarity to the whole matrix, with `V ← V·Q`. The shift
/// μ is the eigenvalue of the trailing 2x2 nearest its last diagonal entry
/// (that entry itself when the pair is complex), with an exceptional shift
/// every ten steps without progress. The last row of the block deflates
/// once its part left of the diagonal has norm at most
/// `settings.tolerance / √n` (or is lost in rounding against the
/// neighbouring diagonal). On success the strictly lower triangle is
/// therefore within `settings.tolerance`, rounding permitting, and
/// `A = V·T·Vᵗ` with `T` the returned Schur form.
///
/// A complex-conjugate pair never deflates in real arithmetic; such input
/// exhausts `max_iter` and reports `ConvergenceFailure`.
///
/// # Example
///
/// ```
/// use densela::Matrix;
///
/// let a = Matrix::new([[4.0_f64, 1.0], [2.0, 3.0]]);
/// let eig = a.eigenvalues_qr().unwrap();
/// let mut ev = eig.eigenvalues().to_vec();
/// ev.sort_by(|x, y| x.partial_cmp(y).unwrap());
/// assert!((ev[0] - 2.0).abs() < 1e-8);
/// assert!((ev[1] - 5.0).abs() < 1e-8);
/// ```
#[derive(Debug, Clone)]
pub struct QrEigen<T> {
    eigenvalues: Vec<T>,
    schur: Matrix<T>,
    vectors: Matrix<T>,
    iterations: usize,
}

impl<T: FloatScalar> QrEigen<T> {
    pub fn new(a: &Matrix<T>, settings: &SpectralSettings<T>) -> Result<Self, LinalgError> {
        let n = a.require_square()?;
        let row_tol = settings.tolerance / real_const::<T>(n.max(1) as f64).sqrt();
        let mut ak = a.clone();
        let mut vectors = Matrix::eye(n);
        let mut iterations = 0;
        let mut active = n;
        let mut stalled = 0;

        loop {
            while active > 1 && deflates(&ak, active - 1, row_tol) {
                active -= 1;
                stalled = 0;
            }
            if active <= 1 {
                break;
            }
            if iterations >= settings.max_iter {
                log::debug!(
                    "qr eigen: no convergence after {} steps, {} of {} rows active, residual {:?}",
                    iterations,
                    active,
                    n,
                    ak.lower_off_diagonal_norm()
                );
                return Err(LinalgError::ConvergenceFailure);
            }

            let block = ak.block(0, 0, active, active);
            let mu = if stalled > 0 && stalled % 10 == 0 {
                block[(active - 1, active - 1)] + row_norm(&block, active - 1)
            } else {
                trailing_shift(&block)
            };

            let mut shifted = block;
            for i in 0..active {
                shifted[(i, i)] = shifted[(i, i)] - mu;
            }
            let (q, r, _) = householder_qr(&shifted);
            let mut next = &r * &q;
            for i in 0..active {
                next[(i, i)] = next[(i, i)] + mu;
            }

            // diag(Q, I)ᵗ·A·diag(Q, I)
            ak.set_block(0, 0, &next);
            if active < n {
                let right = ak.block(0, active, active, n - active);
                ak.set_block(0, active, &(&q.transpose() * &right));
                let below = ak.block(active, 0, n - active, active);
                ak.set_block(active, 0, &(&below * &q));
            }
            let lead = vectors.block(0, 0, n, active);
            vectors.set_block(0, 0, &(&lead * &q));

            iterations += 1;
            stalled += 1;
        }

        log::debug!("qr eigen: n={} converged in {} steps", n, iterations);

        Ok(Self {
            eigenvalues: ak.diag(),
            schur: ak,
            vectors,
            iterations,
        })
    }

    /// Diagonal of the Schur form, in the order the iteration deflated
    /// them (last row first).
    pub fn eigenvalues(&self) -> &[T] {
        &self.eigenvalues
    }

    /// Converged upper-triangular iterate `T` with `A = V·T·Vᵗ`.
    pub fn schur_form(&self) -> &Matrix<T> {
        &self.schur
    }

    /// Accumulated orthogonal `V`. For symmetric input its columns are
    /// eigenvectors.
    pub fn schur_vectors(&self) -> &Matrix<T> {
        &self.vectors
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

// Norm of row k left of the diagonal.
fn row_norm<T: FloatScalar>(a: &Matrix<T>, k: usize) -> T {
    (0..k).fold(T::zero(), |acc, j| acc.hypot(a[(k, j)]))
}

// Row k (k >= 1) is negligible against `tol` or against rounding in its
// neighbouring diagonal entries.
fn deflates<T: FloatScalar>(a: &Matrix<T>, k: usize, tol: T) -> bool {
    let rounding = T::epsilon() * (a[(k - 1, k - 1)].abs() + a[(k, k)].abs());
    let norm = row_norm(a, k);
    norm <= tol || norm <= rounding
}

// Eigenvalue of the trailing 2x2 nearest its last diagonal entry, or that
// entry when the pair is complex.
fn trailing_shift<T: FloatScalar>(a: &Matrix<T>) -> T {
    let m = a.nrows();
    let (p, q) = (a[(m - 2, m - 2)], a[(m - 2, m - 1)]);
    let (r, s) = (a[(m - 1, m - 2)], a[(m - 1, m - 1)]);
    let half = (p - s) / T::two();
    let disc = half * half + q * r;
    if disc < T::zero() {
        return s;
    }
    let mid = (p + s) / T::two();
    let root = disc.sqrt();
    let (hi, lo) = (mid + root, mid - root);
    if (hi - s).abs() <= (lo - s).abs() {
        hi
    } else {
        lo
    }
}

impl<T: FloatScalar> Matrix<T> {
    /// One-step eigenvalue approximation: the diagonal of `R·Q` after a
    /// single Householder QR of `self`.
    ///
    /// This is exactly one step of QR iteration and is only an estimate;
    /// see [`eigenvalues_qr`](Matrix::eigenvalues_qr) for the converged
    /// values.
    ///
    /// ```
    /// use densela::Matrix;
    /// // Already diagonal: one step is exact.
    /// let d = Matrix::from_diag(&[3.0_f64, 1.0]);
    /// let ev = d.eigenvalues_qr_step().unwrap();
    /// assert!((ev[0] - 3.0).abs() < 1e-12 && (ev[1] - 1.0).abs() < 1e-12);
    /// ```
    pub fn eigenvalues_qr_step(&self) -> Result<Vec<T>, LinalgError> {
        self.require_square()?;
        let (q, r, _) = householder_qr(self);
        Ok((&r * &q).diag())
    }

    /// Iterated QR eigenvalues with explicit settings.
    pub fn eigenvalues_qr_with(&self, settings: &SpectralSettings<T>) -> Result<QrEigen<T>, LinalgError> {
        QrEigen::new(self, settings)
    }
}

impl Matrix<f64> {
    /// Iterated QR eigenvalues with default settings.
    pub fn eigenvalues_qr(&self) -> Result<QrEigen<f64>, LinalgError> {
        QrEigen::new(self, &SpectralSettings::default())
    }
}

impl Matrix<f32> {
    /// Iterated QR eigenvalues with default settings.
    pub fn eigenvalues_qr(&self) -> Result<QrEigen<f32>, LinalgError> {
        QrEigen::new(self, &SpectralSettings::default())
    }
}
