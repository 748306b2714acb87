pub(crate) mod cholesky;
pub(crate) mod det;
pub(crate) mod gauss_jordan;
pub(crate) mod givens;
pub(crate) mod gram_schmidt;
pub(crate) mod jacobi;
pub(crate) mod lu;
pub(crate) mod qr;
pub(crate) mod qr_eigen;
pub(crate) mod strassen;
pub(crate) mod svd;
pub(crate) mod triangular;

pub use cholesky::{cholesky_in_place, CholeskyDecomposition};
pub use det::cofactor_det;
pub use gauss_jordan::gauss_jordan_inverse;
pub use givens::givens_rotation;
pub use jacobi::JacobiEigen;
pub use lu::{lu_in_place, lu_in_place_unpivoted, lu_solve, LuDecomposition};
pub use qr::{householder_in_place, ParseQrMethodError, QrDecomposition, QrMethod};
pub use qr_eigen::QrEigen;
pub use strassen::STRASSEN_CUTOFF;
pub use svd::{SvdDecomposition, RANK_TOLERANCE};
pub use triangular::{back_substitution, forward_substitution};

/// Errors from matrix algebra and decompositions.
///
/// Every fallible operation in the crate returns this type. All variants
/// are fail-fast: no partial results are produced.
///
/// ```
/// use densela::Matrix;
/// use densela::linalg::LinalgError;
///
/// let singular = Matrix::new([[1.0_f64, 2.0], [2.0, 4.0]]);
/// assert_eq!(singular.lu().unwrap_err(), LinalgError::Singular);
///
/// let not_pd = Matrix::new([[1.0_f64, 5.0], [5.0, 1.0]]);
/// assert_eq!(not_pd.cholesky().unwrap_err(), LinalgError::NotPositiveDefinite);
///
/// let rect = Matrix::<f64>::zeros(2, 3);
/// assert_eq!(rect.det().unwrap_err(), LinalgError::NotSquare { nrows: 2, ncols: 3 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinalgError {
    /// Operand dimensions are incompatible with the operation.
    InvalidShape {
        /// Shape the operation required, `(rows, cols)`.
        expected: (usize, usize),
        /// Shape it was given.
        got: (usize, usize),
    },
    /// A square matrix was required.
    NotSquare { nrows: usize, ncols: usize },
    /// A pivot or triangular diagonal entry is exactly zero.
    Singular,
    /// Matrix is not symmetric positive definite (required for Cholesky).
    NotPositiveDefinite,
    /// Iterative algorithm did not converge within its iteration cap.
    ConvergenceFailure,
}

impl core::fmt::Display for LinalgError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LinalgError::InvalidShape { expected, got } => write!(
                f,
                "invalid shape: expected {}x{}, got {}x{}",
                expected.0, expected.1, got.0, got.1
            ),
            LinalgError::NotSquare { nrows, ncols } => {
                write!(f, "square matrix required, got {}x{}", nrows, ncols)
            }
            LinalgError::Singular => write!(f, "matrix is singular"),
            LinalgError::NotPositiveDefinite => write!(f, "matrix is not positive definite"),
            LinalgError::ConvergenceFailure => write!(f, "iterative algorithm did not converge"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LinalgError {}

/// Stopping rule shared by the iterative solvers
/// ([`JacobiEigen`], [`QrEigen`], [`SvdDecomposition`]).
///
/// ```
/// use densela::linalg::SpectralSettings;
///
/// let s = SpectralSettings::<f64>::default();
/// assert_eq!(s.max_iter, 1000);
///
/// let tight = SpectralSettings { tolerance: 1e-13, ..s };
/// assert_eq!(tight.tolerance, 1e-13);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralSettings<T> {
    /// Convergence threshold on the relevant off-diagonal norm.
    pub tolerance: T,
    /// Iteration cap.
    pub max_iter: usize,
}

impl Default for SpectralSettings<f64> {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iter: 1000,
        }
    }
}

impl Default for SpectralSettings<f32> {
    fn default() -> Self {
        Self {
            tolerance: 1e-5,
            max_iter: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let e = LinalgError::InvalidShape { expected: (2, 3), got: (3, 3) };
        assert_eq!(format!("{}", e), "invalid shape: expected 2x3, got 3x3");
        assert_eq!(
            format!("{}", LinalgError::NotSquare { nrows: 1, ncols: 4 }),
            "square matrix required, got 1x4"
        );
        assert_eq!(format!("{}", LinalgError::Singular), "matrix is singular");
    }

    #[cfg(feature = "std")]
    #[test]
    fn error_is_std_error() {
        fn takes(_: &dyn std::error::Error) {}
        takes(&LinalgError::ConvergenceFailure);
    }

    #[test]
    fn default_settings() {
        let d = SpectralSettings::<f64>::default();
        assert_eq!(d.tolerance, 1e-10);
        let f = SpectralSettings::<f32>::default();
        assert_eq!(f.max_iter, 1000);
    }
}
