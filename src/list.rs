//! Aggregates over a list of tables.

use crate::error::{Result, TableError};
use crate::label;
use crate::stats::CompensatedSum;
use crate::table::LabeledTable;
use crate::transform;

/// Cell-wise sum of tables that share shape and labels.
///
/// Labels are copied from the first table.
///
/// # Errors
/// - [`TableError::EmptyList`] if `tables` is empty.
/// - [`TableError::IncompatibleTables`] naming the first table whose shape,
///   row labels or column labels differ from the first one.
///
/// # Examples
/// ```
/// use u_table::{list, LabeledTable};
/// let a = LabeledTable::from_rows(&[[1.0, 2.0]]).unwrap();
/// let b = LabeledTable::from_rows(&[[10.0, 20.0]]).unwrap();
/// assert_eq!(list::sum(&[a, b]).unwrap().data(), &[11.0, 22.0]);
/// ```
pub fn sum(tables: &[LabeledTable]) -> Result<LabeledTable> {
    let first = tables.first().ok_or(TableError::EmptyList)?;
    if let Some(index) = tables.iter().position(|t| !compatible(first, t)) {
        return Err(TableError::IncompatibleTables { index });
    }
    let mut out = first.clone();
    for (k, cell) in out.data_mut().iter_mut().enumerate() {
        let mut acc = CompensatedSum::new();
        for t in tables {
            acc.add(t.data()[k]);
        }
        *cell = acc.value();
    }
    Ok(out)
}

/// Every table has the shape of the first; labels are not compared.
///
/// `true` for lists of fewer than two tables.
pub fn have_identical_dimensions(tables: &[LabeledTable]) -> bool {
    match tables.first() {
        Some(first) => tables.iter().all(|t| t.shape() == first.shape()),
        None => true,
    }
}

/// Side-by-side concatenation of every table, row labels from the first.
///
/// # Errors
/// - [`TableError::EmptyList`] if `tables` is empty.
/// - [`TableError::DimensionMismatch`] naming the first table whose row
///   count differs from the first one.
pub fn append_columns_many(tables: &[LabeledTable]) -> Result<LabeledTable> {
    let first = tables.first().ok_or(TableError::EmptyList)?;
    if let Some(index) = tables.iter().position(|t| t.n_rows() != first.n_rows()) {
        return Err(TableError::shape(
            format!("{} rows", first.n_rows()),
            format!("{} rows in table {index}", tables[index].n_rows()),
        ));
    }
    let refs: Vec<&LabeledTable> = tables.iter().collect();
    Ok(transform::concat_columns(&refs))
}

fn compatible(a: &LabeledTable, b: &LabeledTable) -> bool {
    a.shape() == b.shape()
        && label::all_equal(a.row_labels(), b.row_labels())
        && label::all_equal(a.column_labels(), b.column_labels())
}
