use core::fmt::Debug;
use num_traits::{Float, Num, One, Zero};

#[cfg(feature = "complex")]
use num_complex::Complex;

/// Anything a [`Matrix`](crate::Matrix) can add, multiply and compare.
///
/// There is a blanket impl over the bounds, so `f32`, `f64` and every
/// primitive integer qualify without opting in. An element type without
/// arithmetic is rejected at compile time rather than at run time.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num {
    /// Additive inverse, computed as `0 - self`.
    ///
    /// Overflows for unsigned kinds unless `self` is zero.
    #[inline]
    fn negate(self) -> Self {
        Self::zero() - self
    }

    /// The constant `1 + 1`.
    #[inline]
    fn two() -> Self {
        Self::one() + Self::one()
    }
}

impl<T: Copy + PartialEq + Debug + Zero + One + Num> Scalar for T {}

/// Real floating-point elements, their own [`LinalgScalar::Real`].
///
/// The orthogonal factorizations (QR, Jacobi, QR eigenvalues, SVD) need
/// ordered entries and real rotations, so they are bounded on this rather
/// than on [`LinalgScalar`].
pub trait FloatScalar: Scalar + Float + LinalgScalar<Real = Self> {}

impl<T: Scalar + Float + LinalgScalar<Real = T>> FloatScalar for T {}

/// Elements usable by the pivoting and triangular kernels.
///
/// Covers real floats and, with the `complex` feature, `Complex<f32>` /
/// `Complex<f64>`. Pivot selection compares [`modulus`](Self::modulus),
/// which is always real.
pub trait LinalgScalar: Scalar {
    /// Type that moduli, norms and tolerances are measured in.
    type Real: FloatScalar;

    /// Distance from zero; pivots are ranked by it.
    fn modulus(self) -> Self::Real;

    /// Mirror across the real axis. Hermitian transposes and Cholesky
    /// use it; reals return themselves.
    fn conj(self) -> Self;

    fn re(self) -> Self::Real;

    /// Principal square root, taken in `Self` (Cholesky pivots).
    fn lsqrt(self) -> Self;

    /// Principal logarithm, taken in `Self` (log-determinants).
    fn lln(self) -> Self;

    /// Rounding unit of [`Real`](Self::Real).
    fn lepsilon() -> Self::Real;

    /// Embed a real value, with zero imaginary part for complex kinds.
    fn from_real(r: Self::Real) -> Self;
}

// Reals are their own real part and conjugate.
macro_rules! real_floats {
    ($($t:ty),*) => {$(
        impl LinalgScalar for $t {
            type Real = $t;

            #[inline]
            fn from_real(r: $t) -> $t {
                r
            }

            #[inline]
            fn re(self) -> $t {
                self
            }

            #[inline]
            fn conj(self) -> $t {
                self
            }

            #[inline]
            fn modulus(self) -> $t {
                Float::abs(self)
            }

            #[inline]
            fn lsqrt(self) -> $t {
                Float::sqrt(self)
            }

            #[inline]
            fn lln(self) -> $t {
                Float::ln(self)
            }

            #[inline]
            fn lepsilon() -> $t {
                <$t as Float>::epsilon()
            }
        }
    )*};
}

real_floats!(f32, f64);

#[cfg(feature = "complex")]
impl<T: FloatScalar> LinalgScalar for Complex<T> {
    type Real = T;

    #[inline]
    fn modulus(self) -> T {
        self.norm()
    }

    #[inline]
    fn conj(self) -> Self {
        Complex::conj(&self)
    }

    #[inline]
    fn re(self) -> T {
        self.re
    }

    #[inline]
    fn lsqrt(self) -> Self {
        self.sqrt()
    }

    #[inline]
    fn lln(self) -> Self {
        self.ln()
    }

    #[inline]
    fn lepsilon() -> T {
        T::epsilon()
    }

    #[inline]
    fn from_real(r: T) -> Self {
        Complex::new(r, T::zero())
    }
}

/// Row/column addressed storage the in-place kernels read from.
pub trait MatrixRef<T> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> &T;
}

/// Mutable element access, letting `lu_in_place`, `householder_in_place`
/// and `cholesky_in_place` run on any row-addressable storage.
pub trait MatrixMut<T>: MatrixRef<T> {
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T;

    /// Exchange rows `a` and `b`.
    fn swap_rows(&mut self, a: usize, b: usize)
    where
        T: Copy,
    {
        if a == b {
            return;
        }
        for j in 0..self.ncols() {
            let tmp = *self.get(a, j);
            *self.get_mut(a, j) = *self.get(b, j);
            *self.get_mut(b, j) = tmp;
        }
    }
}

/// Convert an `f64` constant into a real element type.
///
/// Every `Float` the crate instantiates with represents these constants, so
/// the fallback is never taken in practice.
#[inline]
pub(crate) fn real_const<R: Float>(x: f64) -> R {
    R::from(x).unwrap_or_else(R::nan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negate_and_two() {
        assert_eq!(3.5_f64.negate(), -3.5);
        assert_eq!(7_i32.negate(), -7);
        assert_eq!(<i64 as Scalar>::two(), 2);
        assert_eq!(<f32 as Scalar>::two(), 2.0);
    }

    #[test]
    fn real_linalg_scalar() {
        assert_eq!((-2.0_f64).modulus(), 2.0);
        assert_eq!(9.0_f64.lsqrt(), 3.0);
        assert_eq!(4.0_f32.conj(), 4.0);
        assert_eq!(<f64 as LinalgScalar>::lepsilon(), f64::EPSILON);
    }

    #[test]
    fn real_const_roundtrip() {
        let x: f32 = real_const(1e-10);
        assert!(x > 0.0);
        let y: f64 = real_const(100.0);
        assert_eq!(y, 100.0);
    }
}
