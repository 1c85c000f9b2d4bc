//! Dense linear algebra boundary over `nalgebra`.
//!
//! Tables cross into `DMatrix<f64>` here and only here. Factorization
//! failures come back as [`TableError::FactorizationFailed`].

use nalgebra::{Cholesky, DMatrix, DVector};

use crate::error::{Result, TableError};
use crate::stats::CompensatedSum;
use crate::table::LabeledTable;

/// Cell values of `table` as an `n_rows × n_cols` matrix.
pub fn to_matrix(table: &LabeledTable) -> DMatrix<f64> {
    DMatrix::from_row_slice(table.n_rows(), table.n_cols(), table.data())
}

/// Writes `m` into the cells of `table`; shapes must agree.
pub(crate) fn store_matrix(table: &mut LabeledTable, m: &DMatrix<f64>) {
    for i in 0..table.n_rows() {
        for j in 0..table.n_cols() {
            *table.at_mut(i, j) = m[(i, j)];
        }
    }
}

/// Lower Cholesky factor `L` with `m = L·Lᵀ`.
///
/// Only the lower triangle of `m` is read.
///
/// # Errors
/// [`TableError::FactorizationFailed`] if `m` is not positive definite.
pub fn cholesky_lower(m: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    Cholesky::new(m.clone())
        .map(|chol| chol.l())
        .ok_or_else(|| {
            TableError::FactorizationFailed(format!(
                "{}x{} matrix is not positive definite",
                m.nrows(),
                m.ncols()
            ))
        })
}

/// Inverse of a lower-triangular matrix.
///
/// # Errors
/// [`TableError::FactorizationFailed`] if a diagonal entry is zero.
pub fn invert_lower_triangular(l: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    let n = l.nrows();
    l.solve_lower_triangular(&DMatrix::identity(n, n))
        .ok_or_else(|| TableError::FactorizationFailed("singular triangular factor".to_string()))
}

/// Column means and sample covariance (`n − 1` denominator) of the rows.
///
/// The caller guarantees at least two rows.
pub(crate) fn covariance(table: &LabeledTable) -> (DVector<f64>, DMatrix<f64>) {
    let (n, p) = table.shape();
    let centroid = DVector::from_fn(p, |j, _| table.column_mean(0..n, j));
    let mut cov = DMatrix::zeros(p, p);
    for a in 0..p {
        for b in 0..=a {
            let mut acc = CompensatedSum::new();
            for i in 0..n {
                acc.add((table.at(i, a) - centroid[a]) * (table.at(i, b) - centroid[b]));
            }
            let v = acc.value() / (n - 1) as f64;
            cov[(a, b)] = v;
            cov[(b, a)] = v;
        }
    }
    (centroid, cov)
}

/// Squared Mahalanobis distances under a fixed covariance.
///
/// Points are whitened once by `L⁻¹`, after which the distance is the
/// squared Euclidean distance of the whitened vectors.
#[derive(Debug, Clone)]
pub struct Mahalanobis {
    whitener: DMatrix<f64>,
}

impl Mahalanobis {
    /// # Errors
    /// [`TableError::FactorizationFailed`] if `cov` is not positive definite.
    pub fn new(cov: &DMatrix<f64>) -> Result<Self> {
        let l = cholesky_lower(cov)?;
        Ok(Self {
            whitener: invert_lower_triangular(&l)?,
        })
    }

    /// `L⁻¹·x`.
    pub fn whiten(&self, x: &DVector<f64>) -> DVector<f64> {
        &self.whitener * x
    }

    /// `(x − y)ᵀ Σ⁻¹ (x − y)`.
    pub fn squared_distance(&self, x: &DVector<f64>, y: &DVector<f64>) -> f64 {
        self.whiten(&(x - y)).norm_squared()
    }
}
