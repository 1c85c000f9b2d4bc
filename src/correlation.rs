//! Correlation engine.
//!
//! Cell `(i, k)` of a row correlation is the dot product of row `i` of the
//! first table and row `k` of the second, after the optional centring and
//! unit-normalization selected by [`CorrelationOptions`]. Dot products use
//! compensated accumulation and are narrowed once per cell.

use crate::config::CorrelationOptions;
use crate::error::{Result, TableError};
use crate::stats;
use crate::table::LabeledTable;

/// `a.n_rows × b.n_rows` table of row-by-row correlations.
///
/// Row labels come from `a`'s row labels, column labels from `b`'s.
///
/// # Errors
/// [`TableError::DimensionMismatch`] if the column counts differ.
///
/// # Examples
/// ```
/// use u_table::{correlation, CorrelationOptions, LabeledTable};
/// let a = LabeledTable::from_rows(&[[1.0, 2.0, 3.0]]).unwrap();
/// let b = LabeledTable::from_rows(&[[2.0, 4.0, 6.0], [3.0, 2.0, 1.0]]).unwrap();
/// let r = correlation::row_correlations(&a, &b, CorrelationOptions::default()).unwrap();
/// assert!((r.get(0, 0).unwrap() - 1.0).abs() < 1e-12);
/// assert!((r.get(0, 1).unwrap() + 1.0).abs() < 1e-12);
/// ```
pub fn row_correlations(
    a: &LabeledTable,
    b: &LabeledTable,
    options: CorrelationOptions,
) -> Result<LabeledTable> {
    if a.n_cols() != b.n_cols() {
        return Err(TableError::shape(
            format!("{} columns", a.n_cols()),
            format!("{} columns", b.n_cols()),
        ));
    }
    let x = prepare_rows(a, options);
    let y = prepare_rows(b, options);
    let mut out = LabeledTable::new(a.n_rows(), b.n_rows());
    for i in 0..x.n_rows() {
        for k in 0..y.n_rows() {
            *out.at_mut(i, k) = stats::dot(x.row(i), y.row(k));
        }
    }
    out.row_labels_mut().clone_from_slice(a.row_labels());
    out.column_labels_mut().clone_from_slice(b.row_labels());
    Ok(out)
}

/// `a.n_cols × b.n_cols` table of column-by-column correlations.
///
/// Row labels come from `a`'s column labels, column labels from `b`'s.
///
/// # Errors
/// [`TableError::DimensionMismatch`] if the row counts differ.
pub fn column_correlations(
    a: &LabeledTable,
    b: &LabeledTable,
    options: CorrelationOptions,
) -> Result<LabeledTable> {
    if a.n_rows() != b.n_rows() {
        return Err(TableError::shape(
            format!("{} rows", a.n_rows()),
            format!("{} rows", b.n_rows()),
        ));
    }
    row_correlations(&a.transpose(), &b.transpose(), options)
}

/// Column correlations when `by_columns`, row correlations otherwise.
///
/// # Errors
/// As [`row_correlations`] / [`column_correlations`].
pub fn cross_correlations(
    a: &LabeledTable,
    b: &LabeledTable,
    by_columns: bool,
    options: CorrelationOptions,
) -> Result<LabeledTable> {
    if by_columns {
        column_correlations(a, b, options)
    } else {
        row_correlations(a, b, options)
    }
}

fn prepare_rows(t: &LabeledTable, options: CorrelationOptions) -> LabeledTable {
    let mut out = t.clone();
    if options.centre {
        out.centre_rows();
    }
    if options.normalize {
        out.normalize_rows(1.0);
    }
    out
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn pearson_is_bounded_and_symmetric(
            data in proptest::collection::vec(-50.0_f64..50.0, 12),
        ) {
            let t = LabeledTable::from_vec(3, 4, data).unwrap();
            let r = row_correlations(&t, &t, CorrelationOptions::default()).unwrap();
            for i in 0..3 {
                for k in 0..3 {
                    let v = r.get(i, k).unwrap();
                    prop_assert!(v.abs() <= 1.0 + 1e-9);
                    prop_assert!((v - r.get(k, i).unwrap()).abs() < 1e-12);
                }
            }
        }
    }
}
