use alloc::vec::Vec;
use core::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::linalg::LinalgError;
use crate::traits::Scalar;

use super::Matrix;

fn zip_with<T: Scalar>(a: &Matrix<T>, b: &Matrix<T>, f: impl Fn(T, T) -> T) -> Matrix<T> {
    let data = a.data.iter().zip(b.data.iter()).map(|(&x, &y)| f(x, y)).collect();
    Matrix::from_vec(a.nrows, a.ncols, data)
}

fn same_shape<T>(a: &Matrix<T>, b: &Matrix<T>) -> Result<(), LinalgError> {
    if a.shape() == b.shape() {
        Ok(())
    } else {
        Err(LinalgError::InvalidShape {
            expected: a.shape(),
            got: b.shape(),
        })
    }
}

// ── Checked algebra ─────────────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// Elementwise sum, failing with `InvalidShape` on mismatched shapes.
    pub fn try_add(&self, rhs: &Matrix<T>) -> Result<Self, LinalgError> {
        same_shape(self, rhs)?;
        Ok(zip_with(self, rhs, |a, b| a + b))
    }

    /// Elementwise difference, failing with `InvalidShape` on mismatched shapes.
    pub fn try_sub(&self, rhs: &Matrix<T>) -> Result<Self, LinalgError> {
        same_shape(self, rhs)?;
        Ok(zip_with(self, rhs, |a, b| a - b))
    }

    /// Naive O(n³) matrix product.
    ///
    /// Fails with `InvalidShape` when `self.ncols() != rhs.nrows()`. The
    /// `*` operator is the panicking form of the same product.
    ///
    /// ```
    /// use densela::Matrix;
    /// let a = Matrix::new([[1, 2], [3, 4]]);
    /// let b = Matrix::new([[5, 6], [7, 8]]);
    /// assert_eq!(a.matmul(&b).unwrap(), Matrix::new([[19, 22], [43, 50]]));
    /// assert!(a.matmul(&Matrix::<i32>::zeros(3, 1)).is_err());
    /// ```
    pub fn matmul(&self, rhs: &Matrix<T>) -> Result<Self, LinalgError> {
        if self.ncols != rhs.nrows {
            return Err(LinalgError::InvalidShape {
                expected: (self.ncols, rhs.ncols),
                got: rhs.shape(),
            });
        }
        let (m, n) = (self.nrows, rhs.ncols);
        let mut out = Matrix::zeros(m, n);
        // i-k-j order keeps both the rhs row and the output row contiguous.
        for i in 0..m {
            for k in 0..self.ncols {
                let a_ik = self.data[i * self.ncols + k];
                if a_ik == T::zero() {
                    continue;
                }
                let src = rhs.row_slice(k);
                for (dst, &b_kj) in out.row_slice_mut(i).iter_mut().zip(src) {
                    *dst = *dst + a_ik * b_kj;
                }
            }
        }
        Ok(out)
    }

    /// Hadamard (elementwise) product.
    pub fn element_mul(&self, rhs: &Matrix<T>) -> Result<Self, LinalgError> {
        same_shape(self, rhs)?;
        Ok(zip_with(self, rhs, |a, b| a * b))
    }

    /// Transpose.
    ///
    /// ```
    /// use densela::Matrix;
    /// let m = Matrix::new([[1, 2, 3], [4, 5, 6]]);
    /// let t = m.transpose();
    /// assert_eq!(t.shape(), (3, 2));
    /// assert_eq!(t[(2, 1)], 6);
    /// assert_eq!(t.transpose(), m);
    /// ```
    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for j in 0..self.ncols {
            for i in 0..self.nrows {
                data.push(self.data[i * self.ncols + j]);
            }
        }
        Matrix::from_vec(self.ncols, self.nrows, data)
    }
}

// ── Operators ───────────────────────────────────────────────────────
//
// Every owned/borrowed combination forwards to the `&a op &b` impl.

macro_rules! forward_binop {
    ($trait:ident, $method:ident) => {
        impl<T: Scalar> $trait<Matrix<T>> for Matrix<T> {
            type Output = Matrix<T>;
            fn $method(self, rhs: Matrix<T>) -> Matrix<T> {
                (&self).$method(&rhs)
            }
        }

        impl<T: Scalar> $trait<&Matrix<T>> for Matrix<T> {
            type Output = Matrix<T>;
            fn $method(self, rhs: &Matrix<T>) -> Matrix<T> {
                (&self).$method(rhs)
            }
        }

        impl<T: Scalar> $trait<Matrix<T>> for &Matrix<T> {
            type Output = Matrix<T>;
            fn $method(self, rhs: Matrix<T>) -> Matrix<T> {
                self.$method(&rhs)
            }
        }
    };
}

impl<T: Scalar> Add<&Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;

    fn add(self, rhs: &Matrix<T>) -> Matrix<T> {
        assert_eq!(
            self.shape(),
            rhs.shape(),
            "dimension mismatch: {}x{} + {}x{}",
            self.nrows, self.ncols, rhs.nrows, rhs.ncols,
        );
        zip_with(self, rhs, |a, b| a + b)
    }
}

impl<T: Scalar> Sub<&Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;

    fn sub(self, rhs: &Matrix<T>) -> Matrix<T> {
        assert_eq!(
            self.shape(),
            rhs.shape(),
            "dimension mismatch: {}x{} - {}x{}",
            self.nrows, self.ncols, rhs.nrows, rhs.ncols,
        );
        zip_with(self, rhs, |a, b| a - b)
    }
}

impl<T: Scalar> Mul<&Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: &Matrix<T>) -> Matrix<T> {
        match self.matmul(rhs) {
            Ok(m) => m,
            Err(_) => panic!(
                "dimension mismatch: {}x{} * {}x{}",
                self.nrows, self.ncols, rhs.nrows, rhs.ncols,
            ),
        }
    }
}

forward_binop!(Add, add);
forward_binop!(Sub, sub);
forward_binop!(Mul, mul);

impl<T: Scalar> AddAssign<&Matrix<T>> for Matrix<T> {
    fn add_assign(&mut self, rhs: &Matrix<T>) {
        *self = &*self + rhs;
    }
}

impl<T: Scalar> SubAssign<&Matrix<T>> for Matrix<T> {
    fn sub_assign(&mut self, rhs: &Matrix<T>) {
        *self = &*self - rhs;
    }
}

impl<T: Scalar> Neg for &Matrix<T> {
    type Output = Matrix<T>;

    fn neg(self) -> Matrix<T> {
        self.map(|x| x.negate())
    }
}

impl<T: Scalar> Neg for Matrix<T> {
    type Output = Matrix<T>;

    fn neg(self) -> Matrix<T> {
        -&self
    }
}

// ── Scalar multiply / divide ────────────────────────────────────────

impl<T: Scalar> Mul<T> for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: T) -> Matrix<T> {
        self.map(|x| x * rhs)
    }
}

impl<T: Scalar> Mul<T> for Matrix<T> {
    type Output = Matrix<T>;

    fn mul(mut self, rhs: T) -> Matrix<T> {
        self *= rhs;
        self
    }
}

impl<T: Scalar> MulAssign<T> for Matrix<T> {
    fn mul_assign(&mut self, rhs: T) {
        for x in self.data.iter_mut() {
            *x = *x * rhs;
        }
    }
}

impl<T: Scalar> Div<T> for &Matrix<T> {
    type Output = Matrix<T>;

    fn div(self, rhs: T) -> Matrix<T> {
        self.map(|x| x / rhs)
    }
}

impl<T: Scalar> Div<T> for Matrix<T> {
    type Output = Matrix<T>;

    fn div(self, rhs: T) -> Matrix<T> {
        &self / rhs
    }
}

// `scalar * matrix` for concrete element types (orphan rules prevent a
// blanket impl).
macro_rules! impl_scalar_lhs_mul {
    ($($t:ty),*) => {
        $(
            impl Mul<Matrix<$t>> for $t {
                type Output = Matrix<$t>;
                fn mul(self, rhs: Matrix<$t>) -> Matrix<$t> {
                    rhs * self
                }
            }

            impl Mul<&Matrix<$t>> for $t {
                type Output = Matrix<$t>;
                fn mul(self, rhs: &Matrix<$t>) -> Matrix<$t> {
                    rhs * self
                }
            }
        )*
    };
}

impl_scalar_lhs_mul!(f32, f64, i32, i64);
