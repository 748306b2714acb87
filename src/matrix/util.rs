use num_traits::Zero;

use crate::traits::{LinalgScalar, Scalar};

use super::Matrix;

impl<T: Copy> Matrix<T> {
    /// Apply `f` to every element.
    pub fn map<U>(&self, f: impl Fn(T) -> U) -> Matrix<U> {
        Matrix::from_vec(self.nrows, self.ncols, self.data.iter().map(|&x| f(x)).collect())
    }

    /// Exchange rows `a` and `b`.
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let (lo, hi) = (a.min(b), a.max(b));
        let (head, tail) = self.data.split_at_mut(hi * self.ncols);
        head[lo * self.ncols..(lo + 1) * self.ncols].swap_with_slice(&mut tail[..self.ncols]);
    }

    /// Exchange columns `a` and `b`.
    pub fn swap_cols(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for i in 0..self.nrows {
            self.data.swap(i * self.ncols + a, i * self.ncols + b);
        }
    }
}

impl<T: Scalar> Matrix<T> {
    /// Row `i` as a `1 x ncols` matrix.
    pub fn row(&self, i: usize) -> Self {
        self.block(i, 0, 1, self.ncols)
    }

    /// Column `j` as an `nrows x 1` matrix.
    pub fn col(&self, j: usize) -> Self {
        self.block(0, j, self.nrows, 1)
    }
}

impl<T: LinalgScalar> Matrix<T> {
    /// Frobenius norm `sqrt(Σ |a_ij|²)`.
    pub fn frobenius_norm(&self) -> T::Real {
        sum_sq(self.data.iter().copied()).lsqrt()
    }

    /// Frobenius norm of the entries off the main diagonal.
    ///
    /// Zero exactly when the matrix is diagonal.
    pub fn off_diagonal_norm(&self) -> T::Real {
        let n = self.ncols;
        sum_sq(
            self.data
                .iter()
                .enumerate()
                .filter(|(k, _)| k / n != k % n)
                .map(|(_, &x)| x),
        )
        .lsqrt()
    }

    /// Frobenius norm of the entries strictly below the main diagonal.
    pub fn lower_off_diagonal_norm(&self) -> T::Real {
        let n = self.ncols;
        sum_sq(
            self.data
                .iter()
                .enumerate()
                .filter(|(k, _)| k / n > k % n)
                .map(|(_, &x)| x),
        )
        .lsqrt()
    }
}

fn sum_sq<T: LinalgScalar>(it: impl Iterator<Item = T>) -> T::Real {
    it.fold(<T::Real as Zero>::zero(), |acc, x| {
        let m = x.modulus();
        acc + m * m
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_rows_and_cols() {
        let mut m = Matrix::new([[1, 2, 3], [4, 5, 6], [7, 8, 9]]);
        m.swap_rows(2, 0);
        assert_eq!(m, Matrix::new([[7, 8, 9], [4, 5, 6], [1, 2, 3]]));
        m.swap_cols(0, 1);
        assert_eq!(m, Matrix::new([[8, 7, 9], [5, 4, 6], [2, 1, 3]]));
        m.swap_rows(1, 1);
        assert_eq!(m[(1, 0)], 5);
    }

    #[test]
    fn row_and_col() {
        let m = Matrix::new([[1.0_f64, 2.0], [3.0, 4.0]]);
        assert_eq!(m.row(1), Matrix::new([[3.0, 4.0]]));
        assert_eq!(m.col(0), Matrix::new([[1.0], [3.0]]));
    }

    #[test]
    fn map_changes_type() {
        let m = Matrix::new([[1, 2], [3, 4]]);
        let f = m.map(|x| x as f64 * 0.5);
        assert_eq!(f[(1, 1)], 2.0);
    }

    #[test]
    fn norms() {
        let m = Matrix::new([[3.0_f64, 4.0], [0.0, 0.0]]);
        assert!((m.frobenius_norm() - 5.0).abs() < 1e-14);
        assert!((m.off_diagonal_norm() - 4.0).abs() < 1e-14);
        assert_eq!(m.lower_off_diagonal_norm(), 0.0);

        let l = Matrix::new([[1.0_f64, 0.0], [-2.0, 1.0]]);
        assert!((l.lower_off_diagonal_norm() - 2.0).abs() < 1e-14);
        assert_eq!(Matrix::<f64>::eye(4).off_diagonal_norm(), 0.0);
    }
}
