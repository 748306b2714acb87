use alloc::vec;
use alloc::vec::Vec;

use crate::linalg::LinalgError;
use crate::traits::{LinalgScalar, MatrixMut, MatrixRef};
use crate::Matrix;

/// LU decomposition with partial pivoting, in place: `P·A = L·U`.
///
/// On return, `a` holds both factors packed together:
/// - upper triangle (including diagonal): U
/// - strict lower triangle: L (its unit diagonal is implicit)
///
/// `perm[i]` is the original row now at position `i`. Returns `true` if
/// the number of row swaps was even.
///
/// Fails with `Singular` when every candidate pivot in a column is exactly
/// zero.
pub fn lu_in_place<T: LinalgScalar>(
    a: &mut impl MatrixMut<T>,
    perm: &mut [usize],
) -> Result<bool, LinalgError> {
    let n = a.nrows();
    assert_eq!(n, a.ncols(), "LU decomposition requires a square matrix");
    assert_eq!(n, perm.len(), "permutation slice length must match matrix size");

    for (i, p) in perm.iter_mut().enumerate() {
        *p = i;
    }

    let mut even = true;

    for col in 0..n {
        let mut max_row = col;
        let mut max_val = a.get(col, col).modulus();
        for row in (col + 1)..n {
            let val = a.get(row, col).modulus();
            if val > max_val {
                max_val = val;
                max_row = row;
            }
        }

        if max_val == <T::Real as num_traits::Zero>::zero() {
            return Err(LinalgError::Singular);
        }

        if max_row != col {
            perm.swap(col, max_row);
            a.swap_rows(col, max_row);
            even = !even;
        }

        eliminate_below(a, col);
    }

    Ok(even)
}

/// Doolittle LU without row exchanges, in place: `A = L·U`.
///
/// Same packed layout as [`lu_in_place`]. Fails with `Singular` as soon as
/// a diagonal pivot is exactly zero, even if a row exchange would have
/// rescued it.
pub fn lu_in_place_unpivoted<T: LinalgScalar>(a: &mut impl MatrixMut<T>) -> Result<(), LinalgError> {
    let n = a.nrows();
    assert_eq!(n, a.ncols(), "LU decomposition requires a square matrix");

    for col in 0..n {
        if *a.get(col, col) == T::zero() {
            return Err(LinalgError::Singular);
        }
        eliminate_below(a, col);
    }
    Ok(())
}

// Store multipliers l_ik = a_ik / a_kk below the pivot and apply the
// row update a_i· -= l_ik · a_k· to the trailing block.
fn eliminate_below<T: LinalgScalar>(a: &mut impl MatrixMut<T>, col: usize) {
    let n = a.nrows();
    let inv_pivot = T::one() / *a.get(col, col);
    for row in (col + 1)..n {
        let l = *a.get(row, col) * inv_pivot;
        *a.get_mut(row, col) = l;
        if l == T::zero() {
            continue;
        }
        for j in (col + 1)..n {
            let u = *a.get(col, j);
            let cur = *a.get(row, j);
            *a.get_mut(row, j) = cur - l * u;
        }
    }
}

/// Solve `A·x = b` given the packed LU factors and permutation.
///
/// `b` (input) and `x` (output) are separate slices of length n.
pub fn lu_solve<T: LinalgScalar>(lu: &impl MatrixRef<T>, perm: &[usize], b: &[T], x: &mut [T]) {
    let n = lu.nrows();

    // L·y = P·b
    for i in 0..n {
        let mut sum = b[perm[i]];
        for j in 0..i {
            sum = sum - *lu.get(i, j) * x[j];
        }
        x[i] = sum;
    }

    // U·x = y
    for i in (0..n).rev() {
        let mut sum = x[i];
        for j in (i + 1)..n {
            sum = sum - *lu.get(i, j) * x[j];
        }
        x[i] = sum / *lu.get(i, i);
    }
}

/// LU decomposition of a square matrix, `P·A = L·U`.
///
/// The pivoted form from [`Matrix::lu`] is the one `det`, `inverse` and
/// `solve` are built on. [`Matrix::lu_unpivoted`] produces the Doolittle
/// factors with `P = I`.
///
/// # Example
///
/// ```
/// use densela::Matrix;
///
/// let a = Matrix::new([[2.0_f64, 1.0], [5.0, 3.0]]);
/// let lu = a.lu().unwrap();
///
/// let b = Matrix::new([[4.0], [11.0]]);
/// let x = lu.solve(&b).unwrap();
/// assert!((x[(0, 0)] - 1.0).abs() < 1e-12);
/// assert!((x[(1, 0)] - 2.0).abs() < 1e-12);
/// assert!((lu.det() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct LuDecomposition<T> {
    lu: Matrix<T>,
    perm: Vec<usize>,
    even: bool,
}

impl<T: LinalgScalar> LuDecomposition<T> {
    /// Decompose with partial pivoting.
    pub fn new(a: &Matrix<T>) -> Result<Self, LinalgError> {
        let n = a.require_square()?;
        let mut lu = a.clone();
        let mut perm = vec![0usize; n];
        let even = lu_in_place(&mut lu, &mut perm)?;
        Ok(Self { lu, perm, even })
    }

    /// Decompose without row exchanges.
    pub fn without_pivoting(a: &Matrix<T>) -> Result<Self, LinalgError> {
        let n = a.require_square()?;
        let mut lu = a.clone();
        lu_in_place_unpivoted(&mut lu)?;
        Ok(Self {
            lu,
            perm: (0..n).collect(),
            even: true,
        })
    }

    /// Unit lower-triangular factor L.
    pub fn l(&self) -> Matrix<T> {
        let n = self.lu.nrows();
        Matrix::from_fn(n, n, |i, j| {
            if i == j {
                T::one()
            } else if i > j {
                self.lu[(i, j)]
            } else {
                T::zero()
            }
        })
    }

    /// Upper-triangular factor U.
    pub fn u(&self) -> Matrix<T> {
        let n = self.lu.nrows();
        Matrix::from_fn(n, n, |i, j| if i <= j { self.lu[(i, j)] } else { T::zero() })
    }

    /// Row permutation: row `i` of `P·A` is row `permutation()[i]` of A.
    pub fn permutation(&self) -> &[usize] {
        &self.perm
    }

    /// Permutation matrix P with `P·A = L·U`.
    pub fn p(&self) -> Matrix<T> {
        let n = self.perm.len();
        let mut p = Matrix::zeros(n, n);
        for (i, &src) in self.perm.iter().enumerate() {
            p[(i, src)] = T::one();
        }
        p
    }

    /// `(L, U)`.
    pub fn into_parts(self) -> (Matrix<T>, Matrix<T>) {
        (self.l(), self.u())
    }

    /// Determinant: sign(P) times the product of U's diagonal.
    pub fn det(&self) -> T {
        let d = self.lu.diag().into_iter().fold(T::one(), |acc, x| acc * x);
        if self.even {
            d
        } else {
            d.negate()
        }
    }

    /// Solve `A·X = B` column by column.
    ///
    /// Fails with `InvalidShape` if `B` does not have n rows.
    pub fn solve(&self, b: &Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        let n = self.lu.nrows();
        if b.nrows() != n {
            return Err(LinalgError::InvalidShape {
                expected: (n, b.ncols()),
                got: b.shape(),
            });
        }
        let k = b.ncols();
        let mut x = Matrix::zeros(n, k);
        let mut rhs = vec![T::zero(); n];
        let mut col = vec![T::zero(); n];
        for c in 0..k {
            for (i, r) in rhs.iter_mut().enumerate() {
                *r = b[(i, c)];
            }
            lu_solve(&self.lu, &self.perm, &rhs, &mut col);
            for (i, &v) in col.iter().enumerate() {
                x[(i, c)] = v;
            }
        }
        Ok(x)
    }

    /// Inverse, solving against each column of the identity.
    pub fn inverse(&self) -> Matrix<T> {
        let n = self.lu.nrows();
        let mut inv = Matrix::zeros(n, n);
        let mut e = vec![T::zero(); n];
        let mut col = vec![T::zero(); n];
        for c in 0..n {
            if c > 0 {
                e[c - 1] = T::zero();
            }
            e[c] = T::one();
            lu_solve(&self.lu, &self.perm, &e, &mut col);
            for (r, &v) in col.iter().enumerate() {
                inv[(r, c)] = v;
            }
        }
        inv
    }
}

impl<T: LinalgScalar> Matrix<T> {
    /// LU decomposition with partial pivoting.
    pub fn lu(&self) -> Result<LuDecomposition<T>, LinalgError> {
        LuDecomposition::new(self)
    }

    /// Doolittle LU without pivoting.
    ///
    /// ```
    /// use densela::Matrix;
    /// let a = Matrix::new([[4.0_f64, 3.0], [6.0, 3.0]]);
    /// let (l, u) = a.lu_unpivoted().unwrap().into_parts();
    /// assert_eq!(l, Matrix::new([[1.0, 0.0], [1.5, 1.0]]));
    /// assert_eq!(u, Matrix::new([[4.0, 3.0], [0.0, -1.5]]));
    /// ```
    pub fn lu_unpivoted(&self) -> Result<LuDecomposition<T>, LinalgError> {
        LuDecomposition::without_pivoting(self)
    }

    /// Solve `A·X = B` via pivoted LU.
    pub fn solve(&self, b: &Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        self.lu()?.solve(b)
    }

    /// Inverse via pivoted LU. Fails with `Singular` or `NotSquare`.
    pub fn inverse(&self) -> Result<Matrix<T>, LinalgError> {
        Ok(self.lu()?.inverse())
    }

    /// Determinant via pivoted LU.
    ///
    /// A singular matrix has determinant zero; only a non-square receiver
    /// is an error.
    ///
    /// ```
    /// use densela::Matrix;
    /// assert_eq!(Matrix::new([[4.0_f64, 3.0], [6.0, 3.0]]).det().unwrap(), -6.0);
    /// assert_eq!(Matrix::new([[1.0_f64, 2.0], [2.0, 4.0]]).det().unwrap(), 0.0);
    /// ```
    pub fn det(&self) -> Result<T, LinalgError> {
        match self.lu() {
            Ok(lu) => Ok(lu.det()),
            Err(LinalgError::Singular) => Ok(T::zero()),
            Err(e) => Err(e),
        }
    }
}
