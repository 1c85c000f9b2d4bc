//! Label-keyed grouping engine.
//!
//! Grouping is sort-then-scan: rows are stably sorted by row label, the
//! maximal runs of equal labels are aggregated column by column, and the
//! result is either collapsed to one row per label or restored to the
//! original row order.

use tracing::debug;

use crate::config::Aggregate;
use crate::error::{Result, TableError};
use crate::permutation::Permutation;
use crate::table::LabeledTable;

impl LabeledTable {
    /// Stable sort order of the rows by label (absent sorts as `""`).
    pub fn sorted_row_label_index(&self) -> Permutation {
        Permutation::sorting_labels(self.row_labels())
    }

    /// Copy with rows reordered by an explicit index, labels travelling
    /// with them.
    ///
    /// With `reverse == false` row `i` is old row `index[i]`; with
    /// `reverse == true` old row `i` lands at position `index[i]`.
    ///
    /// # Errors
    /// - [`TableError::MissingRowLabels`] if no row carries a label.
    /// - [`TableError::InvalidPermutation`] if `index` is not a bijection.
    /// - [`TableError::DimensionMismatch`] if `index` has the wrong length.
    pub fn sort_rows_by_index(&self, index: &[usize], reverse: bool) -> Result<LabeledTable> {
        if !self.has_any_row_label() {
            return Err(TableError::MissingRowLabels);
        }
        let p = Permutation::new(index.to_vec())?;
        if reverse {
            self.permute_rows(&p.inverse())
        } else {
            self.permute_rows(&p)
        }
    }

    /// Copy with rows sorted by label; rows with equal labels keep their
    /// order.
    ///
    /// # Errors
    /// [`TableError::MissingRowLabels`] if no row carries a label.
    pub fn sort_only_by_row_labels(&self) -> Result<LabeledTable> {
        let order = self.sorted_row_label_index();
        self.sort_rows_by_index(order.as_slice(), false)
    }

    /// Aggregates the rows of every label group.
    ///
    /// With `expand == false` the result has one row per distinct label in
    /// sorted label order. With `expand == true` every original row is kept,
    /// in its original position, holding its group's aggregate.
    ///
    /// Groups of a single row are passed through unchanged.
    ///
    /// # Errors
    /// [`TableError::MissingRowLabels`] if no row carries a label.
    ///
    /// # Examples
    /// ```
    /// use u_table::{Aggregate, LabeledTable};
    /// let t = LabeledTable::from_rows(&[[1.0, 1.0], [3.0, 3.0], [10.0, 10.0]])
    ///     .unwrap()
    ///     .with_row_labels(&["a", "a", "b"])
    ///     .unwrap();
    /// let means = t.means_by_row_labels(false, Aggregate::Mean).unwrap();
    /// assert_eq!(means.data(), &[2.0, 2.0, 10.0, 10.0]);
    /// assert_eq!(means.row_label(1), Some("b"));
    /// ```
    pub fn means_by_row_labels(&self, expand: bool, aggregate: Aggregate) -> Result<LabeledTable> {
        if !self.has_any_row_label() {
            return Err(TableError::MissingRowLabels);
        }
        let order = self.sorted_row_label_index();
        let mut sorted = self.gather_rows(order.as_slice());
        let groups = sorted.row_label_blocks()?;
        for group in &groups {
            match aggregate {
                Aggregate::Mean => sorted.average_column_band(group.clone()),
                Aggregate::Median => sorted.median_column_band(group.clone()),
            }
        }
        debug!(
            rows = self.n_rows(),
            groups = groups.len(),
            ?aggregate,
            expand,
            "aggregated rows by label"
        );
        if expand {
            Ok(sorted.gather_rows(order.inverse().as_slice()))
        } else {
            let firsts: Vec<usize> = groups.iter().map(|g| g.start).collect();
            Ok(sorted.gather_rows(&firsts))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grouped() -> LabeledTable {
        LabeledTable::from_rows(&[[1.0, 1.0], [3.0, 3.0], [10.0, 10.0]])
            .unwrap()
            .with_row_labels(&["a", "a", "b"])
            .unwrap()
            .with_column_labels(&["u", "v"])
            .unwrap()
    }

    #[test]
    fn test_means_collapsed() {
        let m = grouped().means_by_row_labels(false, Aggregate::Mean).unwrap();
        assert_eq!(m.shape(), (2, 2));
        assert_eq!(m.row(0), &[2.0, 2.0]);
        assert_eq!(m.row(1), &[10.0, 10.0]);
        assert_eq!(m.row_label(0), Some("a"));
        assert_eq!(m.row_label(1), Some("b"));
        assert_eq!(m.column_label(1), Some("v"));
    }

    #[test]
    fn test_means_expanded_keeps_order() {
        let m = grouped().means_by_row_labels(true, Aggregate::Mean).unwrap();
        assert_eq!(m.data(), &[2.0, 2.0, 2.0, 2.0, 10.0, 10.0]);
        assert_eq!(m.row_labels(), grouped().row_labels());
    }

    #[test]
    fn test_means_expanded_unsorted_input() {
        let t = LabeledTable::from_rows(&[[5.0], [1.0], [7.0], [3.0]])
            .unwrap()
            .with_row_labels(&["b", "a", "b", "a"])
            .unwrap();
        let m = t.means_by_row_labels(true, Aggregate::Mean).unwrap();
        assert_eq!(m.data(), &[6.0, 2.0, 6.0, 2.0]);
        assert_eq!(m.row_label(0), Some("b"));
        assert_eq!(m.row_label(3), Some("a"));
    }

    #[test]
    fn test_medians() {
        let t = LabeledTable::from_rows(&[[1.0], [2.0], [100.0], [4.0]])
            .unwrap()
            .with_row_labels(&["g", "g", "g", "h"])
            .unwrap();
        let m = t.means_by_row_labels(false, Aggregate::Median).unwrap();
        assert_eq!(m.data(), &[2.0, 4.0]);
    }

    #[test]
    fn test_medians_with_nan_cells() {
        let t = LabeledTable::from_rows(&[[1.0], [f64::NAN], [3.0], [4.0]])
            .unwrap()
            .with_row_labels(&["g", "g", "g", "h"])
            .unwrap();
        let m = t.means_by_row_labels(false, Aggregate::Median).unwrap();
        assert_eq!(m.shape(), (2, 1));
        assert_eq!(m.get(1, 0), Some(4.0));
    }

    #[test]
    fn test_means_require_labels() {
        let t = LabeledTable::new(3, 2);
        assert_eq!(
            t.means_by_row_labels(false, Aggregate::Mean),
            Err(TableError::MissingRowLabels)
        );
    }

    #[test]
    fn test_absent_label_groups_with_empty() {
        let mut t = LabeledTable::from_rows(&[[1.0], [3.0], [8.0]]).unwrap();
        t.set_row_label(1, "").unwrap();
        t.set_row_label(2, "z").unwrap();
        let m = t.means_by_row_labels(false, Aggregate::Mean).unwrap();
        assert_eq!(m.data(), &[2.0, 8.0]);
    }

    #[test]
    fn test_sort_only_by_row_labels() {
        let t = LabeledTable::from_rows(&[[3.0], [1.0], [2.0], [4.0]])
            .unwrap()
            .with_row_labels(&["c", "a", "b", "a"])
            .unwrap();
        let before = t.clone();
        let sorted = t.sort_only_by_row_labels().unwrap();
        assert_eq!(sorted.data(), &[1.0, 4.0, 2.0, 3.0]);
        assert_eq!(sorted.row_label(0), Some("a"));
        assert_eq!(sorted.row_label(3), Some("c"));
        assert_eq!(t, before);
    }

    #[test]
    fn test_sort_rows_by_index_reverse_undoes_forward() {
        let original = LabeledTable::from_rows(&[[1.0], [2.0], [3.0]])
            .unwrap()
            .with_row_labels(&["x", "y", "z"])
            .unwrap();
        let index = [2, 0, 1];
        let forward = original.sort_rows_by_index(&index, false).unwrap();
        assert_eq!(forward.data(), &[3.0, 1.0, 2.0]);
        assert_eq!(original.data(), &[1.0, 2.0, 3.0]);
        assert_eq!(forward.sort_rows_by_index(&index, true).unwrap(), original);
    }

    #[test]
    fn test_sort_rows_by_index_errors() {
        let unlabeled = LabeledTable::new(2, 1);
        assert_eq!(
            unlabeled.sort_rows_by_index(&[1, 0], false),
            Err(TableError::MissingRowLabels)
        );
        let t = grouped();
        assert!(matches!(
            t.sort_rows_by_index(&[0, 0, 1], false),
            Err(TableError::InvalidPermutation(_))
        ));
        assert!(matches!(
            t.sort_rows_by_index(&[1, 0], false),
            Err(TableError::DimensionMismatch { .. })
        ));
    }
}
