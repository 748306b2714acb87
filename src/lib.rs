//! # densela
//!
//! Dense, generic matrices with the classical factorizations: LU,
//! Gauss-Jordan, three QR variants, Cholesky, Jacobi eigen decomposition,
//! QR eigenvalue iteration, SVD and Strassen multiplication. Pure Rust,
//! no BLAS/LAPACK, no-std compatible (needs `alloc`).
//!
//! ## Quick start
//!
//! ```
//! use densela::Matrix;
//! use densela::linalg::QrMethod;
//!
//! let a = Matrix::new([
//!     [2.0_f64, 1.0, -1.0],
//!     [-3.0, -1.0, 2.0],
//!     [-2.0, 1.0, 2.0],
//! ]);
//! let b = Matrix::new([[8.0], [-11.0], [-3.0]]);
//! let x = a.solve(&b).unwrap(); // [2, 3, -1]
//! assert!((x[(1, 0)] - 3.0).abs() < 1e-12);
//!
//! let det_lu = a.det().unwrap();
//! let det_qr = a.det_qr(QrMethod::Givens).unwrap();
//! assert!((det_lu - det_qr).abs() < 1e-10);
//!
//! let svd = a.svd().unwrap();
//! assert_eq!(svd.rank(), 3);
//! ```
//!
//! ## Modules
//!
//! - [`matrix`]: `Matrix<T>`, row-major `Vec<T>` storage with runtime
//!   dimensions. Construction, `(row, col)` and flat indexing, blocks,
//!   concatenation, transpose, operators, norms and structural predicates.
//!
//! - [`linalg`]: the decompositions. Free in-place kernels
//!   (`lu_in_place`, `householder_in_place`, `cholesky_in_place`) operate on
//!   `&mut impl MatrixMut<T>`; result structs (`LuDecomposition`,
//!   `QrDecomposition`, `CholeskyDecomposition`, `JacobiEigen`, `QrEigen`,
//!   `SvdDecomposition`) offer the high-level API, and convenience methods
//!   hang off `Matrix`: `a.lu()`, `a.qr_with(method)`, `a.cholesky()`,
//!   `a.eig_jacobi()`, `a.svd()`, `a.strassen(&b)`.
//!
//! - [`traits`]: element trait hierarchy:
//!   - [`Scalar`]: every matrix element (`Copy + PartialEq + Debug + Num`),
//!     integers included
//!   - [`LinalgScalar`]: real floats and complex numbers, used by the
//!     pivoting and triangular kernels
//!   - [`FloatScalar`]: real floats, used by QR, eigen and SVD
//!   - [`MatrixRef`] / [`MatrixMut`]: generic element access for kernels
//!
//! ## Errors
//!
//! Every fallible operation returns [`LinalgError`](linalg::LinalgError).
//! Operators (`+`, `-`, `*`) panic on a shape mismatch; their checked
//! counterparts are `try_add`, `try_sub` and `matmul`.
//!
//! ## Logging
//!
//! Iterative solvers report through the [`log`] facade (`debug!` on
//! completion, `warn!` when Jacobi hits its rotation cap). Install any
//! logger to see them.
//!
//! ## Cargo features
//!
//! | Feature   | Default  | Description |
//! |-----------|----------|-------------|
//! | `std`     | yes      | Hardware FPU via system libm, `std::error::Error` impls |
//! | `libm`    | baseline | Pure-Rust software float fallback |
//! | `complex` | no       | `Complex<f32>` / `Complex<f64>` in LU, Cholesky and triangular solves |
//! | `all`     | no       | `std` + `complex` |

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod linalg;
pub mod matrix;
pub mod traits;

pub use linalg::LinalgError;
pub use matrix::Matrix;
pub use traits::{FloatScalar, LinalgScalar, MatrixMut, MatrixRef, Scalar};

#[cfg(feature = "complex")]
pub use num_complex::Complex;
