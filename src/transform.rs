//! Structural transforms: every operation here builds a new table.

use rand::Rng;
use tracing::{debug, warn};

use crate::error::{Result, TableError};
use crate::label;
use crate::linalg;
use crate::random;
use crate::table::LabeledTable;

/// Result of [`LabeledTable::append_columns`].
#[derive(Debug, Clone, PartialEq)]
pub struct AppendedColumns {
    pub table: LabeledTable,
    /// Rows whose label in the appended table differs from the original's.
    pub row_label_mismatches: usize,
}

impl LabeledTable {
    /// Swaps rows and columns, labels included.
    pub fn transpose(&self) -> LabeledTable {
        let (nr, nc) = self.shape();
        let mut out = LabeledTable::new(nc, nr);
        for i in 0..nr {
            for j in 0..nc {
                *out.at_mut(j, i) = self.at(i, j);
            }
        }
        out.row_labels_mut().clone_from_slice(self.column_labels());
        out.column_labels_mut().clone_from_slice(self.row_labels());
        out
    }

    /// Places the columns of `other` to the right of these.
    ///
    /// Row labels are taken from `self`. Rows whose labels disagree are
    /// counted and logged but do not stop the append.
    ///
    /// # Errors
    /// [`TableError::DimensionMismatch`] if the row counts differ.
    ///
    /// # Examples
    /// ```
    /// use u_table::LabeledTable;
    /// let a = LabeledTable::from_rows(&[[1.0], [2.0]]).unwrap();
    /// let b = LabeledTable::from_rows(&[[3.0, 4.0], [5.0, 6.0]]).unwrap();
    /// let joined = a.append_columns(&b).unwrap();
    /// assert_eq!(joined.table.row(1), &[2.0, 5.0, 6.0]);
    /// assert_eq!(joined.row_label_mismatches, 0);
    /// ```
    pub fn append_columns(&self, other: &LabeledTable) -> Result<AppendedColumns> {
        if self.n_rows() != other.n_rows() {
            return Err(TableError::shape(
                format!("{} rows", self.n_rows()),
                format!("{} rows", other.n_rows()),
            ));
        }
        let mismatches = self
            .row_labels()
            .iter()
            .zip(other.row_labels())
            .filter(|(a, b)| !label::equal(a, b))
            .count();
        if mismatches > 0 {
            warn!(
                mismatches,
                rows = self.n_rows(),
                "row labels differ between appended tables"
            );
        }
        Ok(AppendedColumns {
            table: concat_columns(&[self, other]),
            row_label_mismatches: mismatches,
        })
    }

    /// Cholesky factor of a symmetric positive definite table.
    ///
    /// Only the triangle selected by `upper` is read; the matrix is taken
    /// to be its symmetric completion. The result is the upper factor `U`
    /// (`A = UᵀU`) when `upper`, else the lower factor `L` (`A = LLᵀ`), with
    /// the opposite triangle zero. With `inverse` the factor is inverted.
    /// Labels are copied.
    ///
    /// # Errors
    /// - [`TableError::NotSquare`] if the table is not square.
    /// - [`TableError::FactorizationFailed`] if the matrix is not positive
    ///   definite.
    pub fn cholesky_decomposition(&self, upper: bool, inverse: bool) -> Result<LabeledTable> {
        if !self.is_square() {
            return Err(TableError::NotSquare {
                rows: self.n_rows(),
                cols: self.n_cols(),
            });
        }
        let mut m = linalg::to_matrix(self);
        if upper {
            m.fill_lower_triangle_with_upper_triangle();
        } else {
            m.fill_upper_triangle_with_lower_triangle();
        }
        let mut factor = linalg::cholesky_lower(&m)?;
        if inverse {
            factor = linalg::invert_lower_triangular(&factor)?;
        }
        if upper {
            factor = factor.transpose();
        }
        let mut out = self.clone();
        linalg::store_matrix(&mut out, &factor);
        debug!(n = self.n_rows(), upper, inverse, "cholesky decomposition");
        Ok(out)
    }

    /// Same-shaped table whose rows are drawn uniformly with replacement.
    ///
    /// Each drawn row carries its label along.
    pub fn bootstrap<R: Rng>(&self, rng: &mut R) -> LabeledTable {
        let n = self.n_rows();
        self.gather_rows(&random::draw_with_replacement(n, n, rng))
    }
}

/// Side-by-side concatenation; row counts are already checked.
/// Row labels come from the first table.
pub(crate) fn concat_columns(tables: &[&LabeledTable]) -> LabeledTable {
    let n_rows = tables.first().map_or(0, |t| t.n_rows());
    let n_cols = tables.iter().map(|t| t.n_cols()).sum();
    let mut out = LabeledTable::new(n_rows, n_cols);
    let mut offset = 0;
    for t in tables {
        let width = t.n_cols();
        for i in 0..n_rows {
            out.row_mut(i)[offset..offset + width].copy_from_slice(t.row(i));
        }
        out.column_labels_mut()[offset..offset + width].clone_from_slice(t.column_labels());
        offset += width;
    }
    if let Some(first) = tables.first() {
        out.row_labels_mut().clone_from_slice(first.row_labels());
    }
    debug!(tables = tables.len(), rows = n_rows, cols = n_cols, "appended columns");
    out
}
