mod block;
mod ops;
mod square;
mod util;

use alloc::vec;
use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use crate::traits::{MatrixMut, MatrixRef, Scalar};

/// Dense heap-allocated matrix with runtime dimensions.
///
/// Row-major `Vec<T>` storage: element `(i, j)` lives at `i * ncols + j`.
/// Implements [`MatrixRef`] and [`MatrixMut`], so the generic in-place
/// kernels in [`linalg`](crate::linalg) accept it directly.
///
/// Every decomposition takes `&Matrix<T>` and returns freshly owned
/// factors; the receiver is never modified.
///
/// # Examples
///
/// ```
/// use densela::Matrix;
///
/// let a = Matrix::new([[1.0_f64, 2.0], [3.0, 4.0]]);
/// assert_eq!(a.shape(), (2, 2));
/// assert_eq!(a[(1, 0)], 3.0);
/// assert_eq!(a[3], 4.0); // flat row-major index
///
/// let id = Matrix::<f64>::eye(3);
/// assert!(id.is_identity());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Matrix<T> {
    data: Vec<T>,
    nrows: usize,
    ncols: usize,
}

impl<T: Scalar> Matrix<T> {
    /// Matrix of zeros.
    ///
    /// ```
    /// use densela::Matrix;
    /// let m = Matrix::<f64>::zeros(2, 3);
    /// assert_eq!(m.nrows(), 2);
    /// assert_eq!(m[(1, 2)], 0.0);
    /// ```
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self::fill(nrows, ncols, T::zero())
    }

    /// Square identity matrix.
    pub fn eye(n: usize) -> Self {
        Self::identity(n, n)
    }

    /// Rectangular identity: ones on the main diagonal, zeros elsewhere.
    ///
    /// ```
    /// use densela::Matrix;
    /// let m = Matrix::<i32>::identity(2, 3);
    /// assert_eq!(m.as_slice(), &[1, 0, 0, 0, 1, 0]);
    /// ```
    pub fn identity(nrows: usize, ncols: usize) -> Self {
        let mut m = Self::zeros(nrows, ncols);
        for i in 0..nrows.min(ncols) {
            m[(i, i)] = T::one();
        }
        m
    }

    /// Square matrix with `diag` on the main diagonal.
    pub fn from_diag(diag: &[T]) -> Self {
        let n = diag.len();
        let mut m = Self::zeros(n, n);
        for (i, &d) in diag.iter().enumerate() {
            m[(i, i)] = d;
        }
        m
    }
}

impl<T: Copy> Matrix<T> {
    /// Build from nested row arrays.
    ///
    /// ```
    /// use densela::Matrix;
    /// let m = Matrix::new([[1, 2, 3], [4, 5, 6]]);
    /// assert_eq!(m.shape(), (2, 3));
    /// assert_eq!(m[(1, 2)], 6);
    /// ```
    pub fn new<const M: usize, const N: usize>(rows: [[T; N]; M]) -> Self {
        let mut data = Vec::with_capacity(M * N);
        for row in rows.iter() {
            data.extend_from_slice(row);
        }
        Self {
            data,
            nrows: M,
            ncols: N,
        }
    }

    /// Matrix with every element set to `value`.
    pub fn fill(nrows: usize, ncols: usize, value: T) -> Self {
        Self {
            data: vec![value; nrows * ncols],
            nrows,
            ncols,
        }
    }

    /// Build from a row-major slice.
    ///
    /// Panics if `data.len() != nrows * ncols`.
    ///
    /// ```
    /// use densela::Matrix;
    /// let m = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
    /// assert_eq!(m[(0, 1)], 2.0);
    /// ```
    pub fn from_rows(nrows: usize, ncols: usize, data: &[T]) -> Self {
        assert_eq!(
            data.len(),
            nrows * ncols,
            "slice length {} does not match {}x{}",
            data.len(),
            nrows,
            ncols
        );
        Self {
            data: data.to_vec(),
            nrows,
            ncols,
        }
    }
}

impl<T> Matrix<T> {
    /// Take ownership of a row-major `Vec`.
    ///
    /// Panics if `data.len() != nrows * ncols`.
    pub fn from_vec(nrows: usize, ncols: usize, data: Vec<T>) -> Self {
        assert_eq!(
            data.len(),
            nrows * ncols,
            "vec length {} does not match {}x{}",
            data.len(),
            nrows,
            ncols
        );
        Self { data, nrows, ncols }
    }

    /// Build element-by-element from `f(row, col)`.
    ///
    /// ```
    /// use densela::Matrix;
    /// let m = Matrix::from_fn(2, 2, |i, j| (i * 2 + j) as f64);
    /// assert_eq!(m[(1, 1)], 3.0);
    /// ```
    pub fn from_fn(nrows: usize, ncols: usize, f: impl Fn(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(nrows * ncols);
        for i in 0..nrows {
            for j in 0..ncols {
                data.push(f(i, j));
            }
        }
        Self { data, nrows, ncols }
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// `(nrows, ncols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// True if either dimension is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major element buffer.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Contiguous slice of row `i`.
    #[inline]
    pub fn row_slice(&self, i: usize) -> &[T] {
        &self.data[i * self.ncols..(i + 1) * self.ncols]
    }

    #[inline]
    pub fn row_slice_mut(&mut self, i: usize) -> &mut [T] {
        &mut self.data[i * self.ncols..(i + 1) * self.ncols]
    }
}

impl<T> MatrixRef<T> for Matrix<T> {
    #[inline]
    fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> &T {
        &self.data[row * self.ncols + col]
    }
}

impl<T> MatrixMut<T> for Matrix<T> {
    #[inline]
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        &mut self.data[row * self.ncols + col]
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        debug_assert!(row < self.nrows && col < self.ncols, "index out of bounds");
        &self.data[row * self.ncols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        debug_assert!(row < self.nrows && col < self.ncols, "index out of bounds");
        &mut self.data[row * self.ncols + col]
    }
}

/// Flat row-major indexing.
impl<T> Index<usize> for Matrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

impl<T> IndexMut<usize> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors() {
        let z = Matrix::<f64>::zeros(2, 3);
        assert_eq!(z.shape(), (2, 3));
        assert!(z.as_slice().iter().all(|&x| x == 0.0));

        let f = Matrix::fill(2, 2, 7_i32);
        assert_eq!(f.as_slice(), &[7, 7, 7, 7]);

        let id = Matrix::<f64>::eye(3);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(id[(i, j)], if i == j { 1.0 } else { 0.0 });
            }
        }

        let d = Matrix::from_diag(&[1, 2, 3]);
        assert_eq!(d[(1, 1)], 2);
        assert_eq!(d[(0, 2)], 0);
    }

    #[test]
    fn new_is_row_major() {
        let m = Matrix::new([[1, 2, 3], [4, 5, 6]]);
        assert_eq!(m.as_slice(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(m[(0, 2)], 3);
        assert_eq!(m[4], 5);
        assert_eq!(m.row_slice(1), &[4, 5, 6]);
    }

    #[test]
    fn from_fn_and_from_vec_agree() {
        let a = Matrix::from_fn(2, 3, |i, j| (i * 3 + j) as f64);
        let b = Matrix::from_vec(2, 3, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(a, b);
    }

    #[test]
    #[should_panic(expected = "does not match")]
    fn from_rows_wrong_len() {
        let _ = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0]);
    }

    #[test]
    fn index_mut() {
        let mut m = Matrix::<f64>::zeros(2, 2);
        m[(0, 1)] = 5.0;
        m[2] = 3.0;
        assert_eq!(m.as_slice(), &[0.0, 5.0, 3.0, 0.0]);
    }

    #[test]
    fn matrix_ref_trait() {
        let m = Matrix::new([[1.0_f64, 2.0], [3.0, 4.0]]);
        fn sum_diag(m: &impl MatrixRef<f64>) -> f64 {
            (0..m.nrows()).map(|i| *m.get(i, i)).sum()
        }
        assert_eq!(sum_diag(&m), 5.0);
    }

    #[test]
    fn empty_matrix() {
        let m = Matrix::<f64>::zeros(0, 3);
        assert!(m.is_empty());
        assert!(!m.is_square());
    }
}
