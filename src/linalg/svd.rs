use alloc::vec::Vec;

use crate::linalg::givens::givens_rotation;
use crate::linalg::{LinalgError, QrDecomposition, QrMethod, SpectralSettings};
use crate::traits::{real_const, FloatScalar};
use crate::Matrix;

/// Singular values at or below this are treated as zero by
/// [`SvdDecomposition::rank`] and [`SvdDecomposition::pseudoinverse`].
pub const RANK_TOLERANCE: f64 = 1e-10;

/// Singular value decomposition `A = U·Σ·Vᵗ` of a square matrix.
///
/// Three stages:
///
/// ```text
/// A = Q·R             chosen QrMethod
/// R = P·B·Vᵗ          Householder bidiagonalization
/// B = X·Σ·Yᵗ          Golub-Kahan QR sweeps, Wilkinson shift
/// U = Q·P·X,  V ← V·Y
/// ```
///
/// Each sweep chases the shifted bulge down the active block of B. A
/// superdiagonal entry deflates once it is at most
/// `settings.tolerance · ‖A‖_F` (or below rounding relative to its
/// neighbours), which splits the problem. A zero on the diagonal is
/// rotated out before shifting. Needing more than `settings.max_iter`
/// sweeps is a `ConvergenceFailure`.
///
/// Singular values are returned non-negative and in descending order,
/// with any sign folded into U.
///
/// Gram-Schmidt fails with `Singular` on rank-deficient input; use
/// Householder or Givens there.
///
/// # Example
///
/// ```
/// use densela::Matrix;
///
/// let a = Matrix::new([[3.0_f64, 0.0], [4.0, 5.0]]);
/// let svd = a.svd().unwrap();
/// let s = svd.singular_values();
/// assert!((s[0] - 45.0_f64.sqrt()).abs() < 1e-10);
/// assert!((s[1] - 5.0_f64.sqrt()).abs() < 1e-10);
/// assert!(svd.reconstruct().approx_eq(&a, 1e-10));
/// assert_eq!(svd.rank(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SvdDecomposition<T> {
    u: Matrix<T>,
    sigma: Vec<T>,
    v: Matrix<T>,
    iterations: usize,
}

impl<T: FloatScalar> SvdDecomposition<T> {
    pub fn new(a: &Matrix<T>, method: QrMethod, settings: &SpectralSettings<T>) -> Result<Self, LinalgError> {
        let n = a.require_square()?;
        let scale = a.frobenius_norm();

        let (q, mut r) = QrDecomposition::new(a, method)?.into_parts();
        let mut p = Matrix::eye(n);
        let mut v = Matrix::eye(n);
        let (mut d, mut e) = bidiagonalize(&mut r, &mut p, &mut v);
        let mut u = &q * &p;

        let iterations = bidiagonal_qr(&mut d, &mut e, &mut u, &mut v, scale, settings).map_err(|err| {
            log::debug!("svd ({}): no convergence after {} sweeps", method, settings.max_iter);
            err
        })?;

        log::debug!("svd ({}): n={} converged in {} sweeps", method, n, iterations);

        // Make Σ non-negative: flipping column i of U absorbs the sign.
        for (i, s) in d.iter_mut().enumerate() {
            if *s < T::zero() {
                *s = -*s;
                for k in 0..n {
                    u[(k, i)] = -u[(k, i)];
                }
            }
        }

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&i, &j| d[j].partial_cmp(&d[i]).unwrap_or(core::cmp::Ordering::Equal));

        Ok(Self {
            u: Matrix::from_fn(n, n, |r, c| u[(r, order[c])]),
            sigma: order.iter().map(|&k| d[k]).collect(),
            v: Matrix::from_fn(n, n, |r, c| v[(r, order[c])]),
            iterations,
        })
    }

    /// Left singular vectors (columns).
    pub fn u(&self) -> &Matrix<T> {
        &self.u
    }

    /// Right singular vectors (columns).
    pub fn v(&self) -> &Matrix<T> {
        &self.v
    }

    pub fn vt(&self) -> Matrix<T> {
        self.v.transpose()
    }

    /// Singular values, descending.
    pub fn singular_values(&self) -> &[T] {
        &self.sigma
    }

    /// Σ as a diagonal matrix.
    pub fn sigma(&self) -> Matrix<T> {
        Matrix::from_diag(&self.sigma)
    }

    /// QR sweeps performed.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// `(U, Σ, V)`.
    pub fn into_parts(self) -> (Matrix<T>, Matrix<T>, Matrix<T>) {
        let sigma = Matrix::from_diag(&self.sigma);
        (self.u, sigma, self.v)
    }

    /// `U·Σ·Vᵗ`.
    pub fn reconstruct(&self) -> Matrix<T> {
        let mut us = self.u.clone();
        for (j, &s) in self.sigma.iter().enumerate() {
            for i in 0..us.nrows() {
                us[(i, j)] = us[(i, j)] * s;
            }
        }
        &us * &self.v.transpose()
    }

    /// Number of singular values above [`RANK_TOLERANCE`].
    pub fn rank(&self) -> usize {
        self.rank_with_tol(real_const(RANK_TOLERANCE))
    }

    /// Number of singular values strictly above `tol`.
    pub fn rank_with_tol(&self, tol: T) -> usize {
        self.sigma.iter().filter(|&&s| s > tol).count()
    }

    /// `σ_max / σ_min`; `+∞` when the smallest singular value is zero.
    /// The empty matrix has condition number one.
    pub fn condition_number(&self) -> T {
        match (self.sigma.first(), self.sigma.last()) {
            (Some(_), Some(&min)) if min == T::zero() => T::infinity(),
            (Some(&max), Some(&min)) => max / min,
            _ => T::one(),
        }
    }

    /// Moore-Penrose pseudoinverse `V·Σ⁺·Uᵗ`, where `Σ⁺` inverts every
    /// singular value above [`RANK_TOLERANCE`] and zeroes the rest.
    pub fn pseudoinverse(&self) -> Matrix<T> {
        let tol: T = real_const(RANK_TOLERANCE);
        let mut vs = self.v.clone();
        for (j, &s) in self.sigma.iter().enumerate() {
            let inv = if s > tol { T::one() / s } else { T::zero() };
            for i in 0..vs.nrows() {
                vs[(i, j)] = vs[(i, j)] * inv;
            }
        }
        &vs * &self.u.transpose()
    }
}

// Householder vector h (h[0] = 1) and β with (I - β·h·hᵗ)·x = (α, 0, …, 0).
// None when x has nothing below its first entry.
fn reflector<T: FloatScalar>(x: &[T]) -> Option<(Vec<T>, T)> {
    let tail = x[1..].iter().fold(T::zero(), |acc, &xi| acc.hypot(xi));
    if tail == T::zero() {
        return None;
    }
    let norm = x[0].hypot(tail);
    let alpha = if x[0] > T::zero() { -norm } else { norm };
    let v0 = x[0] - alpha;
    let mut h: Vec<T> = x.iter().map(|&xi| xi / v0).collect();
    h[0] = T::one();
    let hh = h.iter().fold(T::zero(), |acc, &hi| acc + hi * hi);
    Some((h, T::two() / hh))
}

// m[:, j0..j0+h.len()] ← m[:, j0..]·(I - β·h·hᵗ)
fn reflect_cols<T: FloatScalar>(m: &mut Matrix<T>, rows: core::ops::Range<usize>, j0: usize, h: &[T], beta: T) {
    for r in rows {
        let mut dot = T::zero();
        for (i, &hi) in h.iter().enumerate() {
            dot = dot + m[(r, j0 + i)] * hi;
        }
        dot = dot * beta;
        for (i, &hi) in h.iter().enumerate() {
            m[(r, j0 + i)] = m[(r, j0 + i)] - dot * hi;
        }
    }
}

// m[i0..i0+h.len(), :] ← (I - β·h·hᵗ)·m[i0.., :]
fn reflect_rows<T: FloatScalar>(m: &mut Matrix<T>, cols: core::ops::Range<usize>, i0: usize, h: &[T], beta: T) {
    for c in cols {
        let mut dot = T::zero();
        for (i, &hi) in h.iter().enumerate() {
            dot = dot + m[(i0 + i, c)] * hi;
        }
        dot = dot * beta;
        for (i, &hi) in h.iter().enumerate() {
            m[(i0 + i, c)] = m[(i0 + i, c)] - dot * hi;
        }
    }
}

/// Reduce the square `b` in place to upper bidiagonal B with
/// `b = U·B·Vᵗ`, accumulating the reflections into `u` and `v` from the
/// right. Returns the diagonal and superdiagonal of B.
fn bidiagonalize<T: FloatScalar>(b: &mut Matrix<T>, u: &mut Matrix<T>, v: &mut Matrix<T>) -> (Vec<T>, Vec<T>) {
    let n = b.nrows();
    let mut d = alloc::vec![T::zero(); n];
    let mut e = alloc::vec![T::zero(); n.saturating_sub(1)];

    for k in 0..n {
        let col: Vec<T> = (k..n).map(|i| b[(i, k)]).collect();
        if let Some((h, beta)) = reflector(&col) {
            reflect_rows(b, k..n, k, &h, beta);
            reflect_cols(u, 0..u.nrows(), k, &h, beta);
        }
        d[k] = b[(k, k)];

        if k + 1 < n {
            let row: Vec<T> = ((k + 1)..n).map(|j| b[(k, j)]).collect();
            if let Some((h, beta)) = reflector(&row) {
                reflect_cols(b, k..n, k + 1, &h, beta);
                reflect_cols(v, 0..v.nrows(), k + 1, &h, beta);
            }
            e[k] = b[(k, k + 1)];
        }
    }

    (d, e)
}

// Eigenvalue of [[a, b], [b, c]] nearest c.
fn wilkinson_shift<T: FloatScalar>(a: T, b: T, c: T) -> T {
    let half = (a - c) / T::two();
    if half == T::zero() && b == T::zero() {
        return c;
    }
    let sign = if half >= T::zero() { T::one() } else { -T::one() };
    c - b * b / (half + sign * half.hypot(b))
}

// Columns i, j of m ← (c·m_i + s·m_j, c·m_j - s·m_i).
fn rotate_cols<T: FloatScalar>(m: &mut Matrix<T>, i: usize, j: usize, c: T, s: T) {
    for r in 0..m.nrows() {
        let mi = m[(r, i)];
        let mj = m[(r, j)];
        m[(r, i)] = c * mi + s * mj;
        m[(r, j)] = c * mj - s * mi;
    }
}

/// Golub-Kahan implicit-shift QR on the bidiagonal `(d, e)`, accumulating
/// left rotations into `u` and right rotations into `v`. On success `e` is
/// zero up to the deflation threshold and `d` holds signed singular
/// values. Returns the number of sweeps.
fn bidiagonal_qr<T: FloatScalar>(
    d: &mut [T],
    e: &mut [T],
    u: &mut Matrix<T>,
    v: &mut Matrix<T>,
    scale: T,
    settings: &SpectralSettings<T>,
) -> Result<usize, LinalgError> {
    let n = d.len();
    let eps = T::epsilon();
    let absolute = settings.tolerance * scale;
    let negligible = |off: T, d0: T, d1: T| {
        let relative = eps * (d0.abs() + d1.abs());
        off.abs() <= if absolute > relative { absolute } else { relative }
    };

    let mut sweeps = 0;
    let mut hi = n.saturating_sub(1);

    while hi > 0 {
        if negligible(e[hi - 1], d[hi - 1], d[hi]) {
            e[hi - 1] = T::zero();
            hi -= 1;
            continue;
        }

        // start of the unreduced block ending at hi
        let mut lo = hi - 1;
        while lo > 0 {
            if negligible(e[lo - 1], d[lo - 1], d[lo]) {
                e[lo - 1] = T::zero();
                break;
            }
            lo -= 1;
        }

        // A zero diagonal entry above hi: rotate its superdiagonal
        // neighbour down and out of the block from the left.
        if let Some(idx) = (lo..hi).find(|&i| d[i].abs() <= eps * scale) {
            d[idx] = T::zero();
            let mut z = e[idx];
            e[idx] = T::zero();
            for j in (idx + 1)..=hi {
                let (c, s) = givens_rotation(d[j], z);
                d[j] = c * d[j] + s * z;
                if j < hi {
                    z = -s * e[j];
                    e[j] = c * e[j];
                }
                rotate_cols(u, j, idx, c, s);
            }
            continue;
        }

        if sweeps >= settings.max_iter {
            return Err(LinalgError::ConvergenceFailure);
        }
        sweeps += 1;

        // shift from the trailing 2x2 of BᵗB
        let e_above = if hi >= lo + 2 { e[hi - 2] } else { T::zero() };
        let mu = wilkinson_shift(
            d[hi - 1] * d[hi - 1] + e_above * e_above,
            d[hi - 1] * e[hi - 1],
            d[hi] * d[hi] + e[hi - 1] * e[hi - 1],
        );

        let mut x = d[lo] * d[lo] - mu;
        let mut z = d[lo] * e[lo];

        for k in lo..hi {
            // right rotation on columns k, k+1 of B
            let (c, s) = givens_rotation(x, z);
            if k > lo {
                e[k - 1] = c * x + s * z;
            }
            let (dk, ek, dk1) = (d[k], e[k], d[k + 1]);
            d[k] = c * dk + s * ek;
            e[k] = c * ek - s * dk;
            let bulge = s * dk1;
            d[k + 1] = c * dk1;
            rotate_cols(v, k, k + 1, c, s);

            // left rotation on rows k, k+1 clears the bulge below d[k]
            let (c, s) = givens_rotation(d[k], bulge);
            d[k] = c * d[k] + s * bulge;
            let (ek, dk1) = (e[k], d[k + 1]);
            e[k] = c * ek + s * dk1;
            d[k + 1] = c * dk1 - s * ek;
            if k + 1 < hi {
                x = e[k];
                z = s * e[k + 1];
                e[k + 1] = c * e[k + 1];
            }
            rotate_cols(u, k, k + 1, c, s);
        }
    }

    Ok(sweeps)
}

impl<T: FloatScalar> Matrix<T> {
    /// SVD with an explicit QR method and settings.
    pub fn svd_with(&self, method: QrMethod, settings: &SpectralSettings<T>) -> Result<SvdDecomposition<T>, LinalgError> {
        SvdDecomposition::new(self, method, settings)
    }
}

macro_rules! impl_svd_defaults {
    ($($t:ty),*) => {
        $(
            impl Matrix<$t> {
                /// SVD by Householder sweeps with default settings.
                pub fn svd(&self) -> Result<SvdDecomposition<$t>, LinalgError> {
                    SvdDecomposition::new(self, QrMethod::Householder, &SpectralSettings::default())
                }

                /// Singular values, descending.
                pub fn singular_values(&self) -> Result<Vec<$t>, LinalgError> {
                    Ok(self.svd()?.sigma)
                }

                /// Numerical rank: singular values above [`RANK_TOLERANCE`].
                pub fn rank(&self) -> Result<usize, LinalgError> {
                    Ok(self.svd()?.rank())
                }

                /// True if the numerical rank equals the dimension.
                pub fn is_full_rank(&self) -> Result<bool, LinalgError> {
                    Ok(self.rank()? == self.nrows())
                }

                /// 2-norm condition number `σ_max / σ_min`.
                pub fn condition_number(&self) -> Result<$t, LinalgError> {
                    Ok(self.svd()?.condition_number())
                }

                /// Moore-Penrose pseudoinverse.
                pub fn pseudoinverse(&self) -> Result<Matrix<$t>, LinalgError> {
                    Ok(self.svd()?.pseudoinverse())
                }
            }
        )*
    };
}

impl_svd_defaults!(f32, f64);
