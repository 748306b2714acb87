use alloc::vec::Vec;

use crate::linalg::LinalgError;
use crate::traits::Scalar;

use super::Matrix;

impl<T: Scalar> Matrix<T> {
    /// Extract a sub-matrix of size `rows x cols` starting at `(i, j)`.
    ///
    /// Panics if the block extends beyond the matrix bounds.
    ///
    /// ```
    /// use densela::Matrix;
    /// let m = Matrix::from_fn(3, 3, |i, j| (i * 3 + j) as f64);
    /// let b = m.block(1, 1, 2, 2);
    /// assert_eq!(b[(0, 0)], 4.0);
    /// assert_eq!(b[(1, 1)], 8.0);
    /// ```
    pub fn block(&self, i: usize, j: usize, rows: usize, cols: usize) -> Self {
        assert!(
            i + rows <= self.nrows && j + cols <= self.ncols,
            "block ({},{}) size {}x{} out of bounds for {}x{} matrix",
            i, j, rows, cols, self.nrows, self.ncols,
        );
        let mut data = Vec::with_capacity(rows * cols);
        for r in i..i + rows {
            data.extend_from_slice(&self.row_slice(r)[j..j + cols]);
        }
        Matrix::from_vec(rows, cols, data)
    }

    /// Write `src` into self with its top-left corner at `(i, j)`.
    ///
    /// Panics if the block extends beyond the matrix bounds.
    pub fn set_block(&mut self, i: usize, j: usize, src: &Matrix<T>) {
        assert!(
            i + src.nrows <= self.nrows && j + src.ncols <= self.ncols,
            "set_block ({},{}) size {}x{} out of bounds for {}x{} matrix",
            i, j, src.nrows, src.ncols, self.nrows, self.ncols,
        );
        for r in 0..src.nrows {
            self.row_slice_mut(i + r)[j..j + src.ncols].copy_from_slice(src.row_slice(r));
        }
    }

    /// Horizontal concatenation `[self | rhs]`.
    ///
    /// Fails with `InvalidShape` if the row counts differ.
    ///
    /// ```
    /// use densela::Matrix;
    /// let a = Matrix::new([[1, 2], [3, 4]]);
    /// let b = Matrix::new([[5], [6]]);
    /// let c = a.hcat(&b).unwrap();
    /// assert_eq!(c, Matrix::new([[1, 2, 5], [3, 4, 6]]));
    /// ```
    pub fn hcat(&self, rhs: &Matrix<T>) -> Result<Self, LinalgError> {
        if self.nrows != rhs.nrows {
            return Err(LinalgError::InvalidShape {
                expected: (self.nrows, rhs.ncols),
                got: rhs.shape(),
            });
        }
        let ncols = self.ncols + rhs.ncols;
        let mut data = Vec::with_capacity(self.nrows * ncols);
        for r in 0..self.nrows {
            data.extend_from_slice(self.row_slice(r));
            data.extend_from_slice(rhs.row_slice(r));
        }
        Ok(Matrix::from_vec(self.nrows, ncols, data))
    }

    /// Vertical concatenation: `self` stacked on top of `rhs`.
    ///
    /// Fails with `InvalidShape` if the column counts differ.
    pub fn vcat(&self, rhs: &Matrix<T>) -> Result<Self, LinalgError> {
        if self.ncols != rhs.ncols {
            return Err(LinalgError::InvalidShape {
                expected: (rhs.nrows, self.ncols),
                got: rhs.shape(),
            });
        }
        let mut data = Vec::with_capacity((self.nrows + rhs.nrows) * self.ncols);
        data.extend_from_slice(&self.data);
        data.extend_from_slice(&rhs.data);
        Ok(Matrix::from_vec(self.nrows + rhs.nrows, self.ncols, data))
    }

    /// Split into `[top_left, top_right, bottom_left, bottom_right]` at
    /// `(nrows / 2, ncols / 2)`.
    pub fn quadrants(&self) -> [Self; 4] {
        let (rh, ch) = (self.nrows / 2, self.ncols / 2);
        let (rl, cl) = (self.nrows - rh, self.ncols - ch);
        [
            self.block(0, 0, rh, ch),
            self.block(0, ch, rh, cl),
            self.block(rh, 0, rl, ch),
            self.block(rh, ch, rl, cl),
        ]
    }

    /// Reassemble a matrix from four quadrants.
    ///
    /// Fails with `InvalidShape` unless the quadrants tile a rectangle.
    ///
    /// ```
    /// use densela::Matrix;
    /// let m = Matrix::from_fn(4, 4, |i, j| (i * 4 + j) as i64);
    /// let [a, b, c, d] = m.quadrants();
    /// assert_eq!(Matrix::from_quadrants(&a, &b, &c, &d).unwrap(), m);
    /// ```
    pub fn from_quadrants(
        c11: &Matrix<T>,
        c12: &Matrix<T>,
        c21: &Matrix<T>,
        c22: &Matrix<T>,
    ) -> Result<Self, LinalgError> {
        let top = c11.hcat(c12)?;
        let bottom = c21.hcat(c22)?;
        top.vcat(&bottom)
    }
}
