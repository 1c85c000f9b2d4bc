//! The labeled numeric table.
//!
//! [`LabeledTable`] owns a dense row-major `f64` matrix together with one
//! optional label per row and per column. All indices are 0-based.
//!
//! The engines built on top of the table live in their own modules
//! (`reduce`, `group`, `correlation`, `transform`, ...) as further `impl`
//! blocks or free functions; this module only deals with storage, labels
//! and lookup.

use crate::error::{Axis, Result, TableError};
use crate::label::{self, Label, LabelMatcher, LabelReplacement};

/// Dense matrix with optional row and column labels.
///
/// # Invariants
/// - `data.len() == n_rows * n_cols`, stored row-major.
/// - `row_labels.len() == n_rows` and `col_labels.len() == n_cols`.
///
/// # Examples
/// ```
/// use u_table::LabeledTable;
/// let mut t = LabeledTable::new(2, 3);
/// t.set(1, 2, 4.5).unwrap();
/// t.set_row_label(0, "first").unwrap();
/// assert_eq!(t.get(1, 2), Some(4.5));
/// assert_eq!(t.row_label(0), Some("first"));
/// assert_eq!(t.row_label_to_index("first"), Some(0));
/// assert!(!t.has_row_labels());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledTable {
    n_rows: usize,
    n_cols: usize,
    data: Vec<f64>,
    row_labels: Vec<Label>,
    col_labels: Vec<Label>,
}

/// Where [`LabeledTable::copy_labels_from`] takes one label set from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelOrigin {
    /// Leave the target labels alone.
    Skip,
    /// Same axis of the source table.
    Same,
    /// Opposite axis of the source table.
    Transposed,
}

impl LabeledTable {
    /// Zero-filled table with all labels absent.
    pub fn new(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            data: vec![0.0; n_rows * n_cols],
            row_labels: vec![None; n_rows],
            col_labels: vec![None; n_cols],
        }
    }

    /// Builds an unlabeled table from row vectors.
    ///
    /// # Errors
    /// [`TableError::DimensionMismatch`] if the rows are ragged.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut table = Self::new(n_rows, n_cols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != n_cols {
                return Err(TableError::shape(
                    format!("{n_cols} values in row {i}"),
                    format!("{}", row.len()),
                ));
            }
            table.row_mut(i).copy_from_slice(row);
        }
        Ok(table)
    }

    /// Builds a table from row-major `data`.
    ///
    /// # Errors
    /// [`TableError::DimensionMismatch`] if `data.len() != n_rows * n_cols`.
    pub fn from_vec(n_rows: usize, n_cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != n_rows * n_cols {
            return Err(TableError::shape(
                format!("{} values for {n_rows}x{n_cols}", n_rows * n_cols),
                data.len().to_string(),
            ));
        }
        Ok(Self {
            n_rows,
            n_cols,
            data,
            row_labels: vec![None; n_rows],
            col_labels: vec![None; n_cols],
        })
    }

    /// Builder-style row labels.
    ///
    /// # Errors
    /// [`TableError::DimensionMismatch`] if the count differs from the row count.
    pub fn with_row_labels<S: AsRef<str>>(mut self, labels: &[S]) -> Result<Self> {
        if labels.len() != self.n_rows {
            return Err(TableError::shape(
                format!("{} row labels", self.n_rows),
                labels.len().to_string(),
            ));
        }
        self.row_labels = labels.iter().map(|s| Some(s.as_ref().to_string())).collect();
        Ok(self)
    }

    /// Builder-style column labels.
    ///
    /// # Errors
    /// [`TableError::DimensionMismatch`] if the count differs from the column count.
    pub fn with_column_labels<S: AsRef<str>>(mut self, labels: &[S]) -> Result<Self> {
        if labels.len() != self.n_cols {
            return Err(TableError::shape(
                format!("{} column labels", self.n_cols),
                labels.len().to_string(),
            ));
        }
        self.col_labels = labels.iter().map(|s| Some(s.as_ref().to_string())).collect();
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Shape and cell access
    // ------------------------------------------------------------------

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    pub fn is_square(&self) -> bool {
        self.n_rows == self.n_cols
    }

    /// Row-major cell storage.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Cell value, `None` outside the table.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        (row < self.n_rows && col < self.n_cols).then(|| self.data[row * self.n_cols + col])
    }

    /// Overwrites one cell.
    ///
    /// # Errors
    /// [`TableError::InvalidIndex`] if either index is out of range.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        self.check_row(row)?;
        self.check_column(col)?;
        self.data[row * self.n_cols + col] = value;
        Ok(())
    }

    /// Unchecked cell read for engine loops (caller guarantees bounds).
    #[inline]
    pub(crate) fn at(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.n_cols + col]
    }

    #[inline]
    pub(crate) fn at_mut(&mut self, row: usize, col: usize) -> &mut f64 {
        &mut self.data[row * self.n_cols + col]
    }

    /// One row as a slice.
    ///
    /// # Panics
    /// Panics if `row >= n_rows`.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.n_cols..(row + 1) * self.n_cols]
    }

    /// One row as a mutable slice.
    ///
    /// # Panics
    /// Panics if `row >= n_rows`.
    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        let n = self.n_cols;
        &mut self.data[row * n..(row + 1) * n]
    }

    /// Copy of one column.
    ///
    /// # Errors
    /// [`TableError::InvalidIndex`] if `col` is out of range.
    pub fn column(&self, col: usize) -> Result<Vec<f64>> {
        self.check_column(col)?;
        Ok(self.column_values(col))
    }

    pub(crate) fn column_values(&self, col: usize) -> Vec<f64> {
        (0..self.n_rows).map(|i| self.at(i, col)).collect()
    }

    pub(crate) fn check_row(&self, row: usize) -> Result<()> {
        if row < self.n_rows {
            Ok(())
        } else {
            Err(TableError::row_index(row, self.n_rows))
        }
    }

    pub(crate) fn check_column(&self, col: usize) -> Result<()> {
        if col < self.n_cols {
            Ok(())
        } else {
            Err(TableError::column_index(col, self.n_cols))
        }
    }

    // ------------------------------------------------------------------
    // Labels
    // ------------------------------------------------------------------

    /// Replaces the label of row `row`.
    ///
    /// # Errors
    /// [`TableError::InvalidIndex`] if `row` is out of range.
    pub fn set_row_label(&mut self, row: usize, text: &str) -> Result<()> {
        self.check_row(row)?;
        self.row_labels[row] = Some(text.to_string());
        Ok(())
    }

    /// Replaces the label of column `col`.
    ///
    /// # Errors
    /// [`TableError::InvalidIndex`] if `col` is out of range.
    pub fn set_column_label(&mut self, col: usize, text: &str) -> Result<()> {
        self.check_column(col)?;
        self.col_labels[col] = Some(text.to_string());
        Ok(())
    }

    /// Label of row `row`; `None` when absent or out of range.
    pub fn row_label(&self, row: usize) -> Option<&str> {
        self.row_labels.get(row).and_then(|l| l.as_deref())
    }

    /// Label of column `col`; `None` when absent or out of range.
    pub fn column_label(&self, col: usize) -> Option<&str> {
        self.col_labels.get(col).and_then(|l| l.as_deref())
    }

    pub fn row_labels(&self) -> &[Label] {
        &self.row_labels
    }

    pub fn column_labels(&self) -> &[Label] {
        &self.col_labels
    }

    pub(crate) fn row_labels_mut(&mut self) -> &mut [Label] {
        &mut self.row_labels
    }

    pub(crate) fn column_labels_mut(&mut self) -> &mut [Label] {
        &mut self.col_labels
    }

    /// First row carrying `text`.
    pub fn row_label_to_index(&self, text: &str) -> Option<usize> {
        self.label_to_index(text, Axis::Row)
    }

    /// First column carrying `text`.
    pub fn column_label_to_index(&self, text: &str) -> Option<usize> {
        self.label_to_index(text, Axis::Column)
    }

    /// First index on `axis` whose label equals `text`.
    ///
    /// Empty `text` never matches.
    pub fn label_to_index(&self, text: &str, axis: Axis) -> Option<usize> {
        if text.is_empty() {
            return None;
        }
        self.labels(axis)
            .iter()
            .position(|l| l.as_deref() == Some(text))
    }

    /// Every row label is present and non-empty.
    pub fn has_row_labels(&self) -> bool {
        self.row_labels.iter().all(label::is_present)
    }

    /// Every column label is present and non-empty.
    pub fn has_column_labels(&self) -> bool {
        self.col_labels.iter().all(label::is_present)
    }

    /// At least one row label is present.
    pub fn has_any_row_label(&self) -> bool {
        self.row_labels.iter().any(Option::is_some)
    }

    /// Row labels with absent ones rendered as `"?"`.
    pub fn extract_row_labels(&self) -> Vec<String> {
        label::rendered(&self.row_labels)
    }

    /// Column labels with absent ones rendered as `"?"`.
    pub fn extract_column_labels(&self) -> Vec<String> {
        label::rendered(&self.col_labels)
    }

    fn labels(&self, axis: Axis) -> &[Label] {
        match axis {
            Axis::Row => &self.row_labels,
            Axis::Column => &self.col_labels,
        }
    }

    fn labels_mut(&mut self, axis: Axis) -> &mut Vec<Label> {
        match axis {
            Axis::Row => &mut self.row_labels,
            Axis::Column => &mut self.col_labels,
        }
    }

    /// Sets labels `prefix<number>`, `prefix<number+increment>`, ... on
    /// rows `from..=to`. `None` bounds mean the first and last row.
    ///
    /// # Errors
    /// [`TableError::InvalidIndex`] if the range is empty or out of bounds.
    pub fn set_sequential_row_labels(
        &mut self,
        from: Option<usize>,
        to: Option<usize>,
        prefix: &str,
        number: i64,
        increment: i64,
    ) -> Result<()> {
        self.set_sequential_labels(Axis::Row, from, to, prefix, number, increment)
    }

    /// Column counterpart of [`set_sequential_row_labels`](Self::set_sequential_row_labels).
    ///
    /// # Errors
    /// [`TableError::InvalidIndex`] if the range is empty or out of bounds.
    pub fn set_sequential_column_labels(
        &mut self,
        from: Option<usize>,
        to: Option<usize>,
        prefix: &str,
        number: i64,
        increment: i64,
    ) -> Result<()> {
        self.set_sequential_labels(Axis::Column, from, to, prefix, number, increment)
    }

    fn set_sequential_labels(
        &mut self,
        axis: Axis,
        from: Option<usize>,
        to: Option<usize>,
        prefix: &str,
        number: i64,
        increment: i64,
    ) -> Result<()> {
        let len = self.labels(axis).len();
        let from = from.unwrap_or(0);
        let to = to.unwrap_or(len.saturating_sub(1));
        if to >= len || from > to {
            let bad = if to >= len { to } else { from };
            return Err(TableError::InvalidIndex {
                axis,
                index: bad,
                len,
            });
        }
        let fresh = label::sequential(prefix, number, increment, to - from + 1);
        self.labels_mut(axis)[from..=to].clone_from_slice(&fresh);
        Ok(())
    }

    /// Copies label sets from `other`.
    ///
    /// # Errors
    /// [`TableError::DimensionMismatch`] if a requested label set does not fit.
    pub fn copy_labels_from(
        &mut self,
        other: &LabeledTable,
        rows: LabelOrigin,
        columns: LabelOrigin,
    ) -> Result<()> {
        let row_source = match rows {
            LabelOrigin::Skip => None,
            LabelOrigin::Same => Some(&other.row_labels),
            LabelOrigin::Transposed => Some(&other.col_labels),
        };
        let col_source = match columns {
            LabelOrigin::Skip => None,
            LabelOrigin::Same => Some(&other.col_labels),
            LabelOrigin::Transposed => Some(&other.row_labels),
        };
        if let Some(src) = row_source {
            if src.len() != self.n_rows {
                return Err(TableError::shape(
                    format!("{} row labels", self.n_rows),
                    src.len().to_string(),
                ));
            }
        }
        if let Some(src) = col_source {
            if src.len() != self.n_cols {
                return Err(TableError::shape(
                    format!("{} column labels", self.n_cols),
                    src.len().to_string(),
                ));
            }
        }
        if let Some(src) = row_source {
            self.row_labels.clone_from(src);
        }
        if let Some(src) = col_source {
            self.col_labels.clone_from(src);
        }
        Ok(())
    }

    /// Copies row `src_row` of `src` (data and label) into row `dst_row`.
    ///
    /// # Errors
    /// [`TableError::InvalidIndex`] for bad rows,
    /// [`TableError::DimensionMismatch`] if the column counts differ.
    pub fn copy_row_with_label(
        &mut self,
        src: &LabeledTable,
        src_row: usize,
        dst_row: usize,
    ) -> Result<()> {
        src.check_row(src_row)?;
        self.check_row(dst_row)?;
        if src.n_cols != self.n_cols {
            return Err(TableError::shape(
                format!("{} columns", self.n_cols),
                src.n_cols.to_string(),
            ));
        }
        self.row_labels[dst_row] = src.row_labels[src_row].clone();
        self.row_mut(dst_row).copy_from_slice(src.row(src_row));
        Ok(())
    }

    /// Column of the first maximum in `row`; `None` for an invalid row or
    /// a table without columns.
    pub fn column_index_at_maximum_in_row(&self, row: usize) -> Option<usize> {
        if row >= self.n_rows || self.n_cols == 0 {
            return None;
        }
        let values = self.row(row);
        let mut best = 0;
        for (j, &v) in values.iter().enumerate().skip(1) {
            if v > values[best] {
                best = j;
            }
        }
        Some(best)
    }

    /// Label of the column holding the maximum of `row`.
    pub fn column_label_at_maximum_in_row(&self, row: usize) -> Option<&str> {
        self.column_index_at_maximum_in_row(row)
            .and_then(|j| self.column_label(j))
    }

    // ------------------------------------------------------------------
    // Label search and replace
    // ------------------------------------------------------------------

    /// Replaces `search` by `replace` inside the row labels.
    ///
    /// At most `max_replaces` occurrences are replaced per label
    /// (`0` = all).
    ///
    /// # Errors
    /// [`TableError::InvalidPattern`] for an invalid regular expression.
    pub fn change_row_labels(
        &mut self,
        search: &str,
        replace: &str,
        max_replaces: usize,
        use_regex: bool,
    ) -> Result<LabelReplacement> {
        self.change_labels(Axis::Row, search, replace, max_replaces, use_regex)
    }

    /// Column counterpart of [`change_row_labels`](Self::change_row_labels).
    ///
    /// # Errors
    /// [`TableError::InvalidPattern`] for an invalid regular expression.
    pub fn change_column_labels(
        &mut self,
        search: &str,
        replace: &str,
        max_replaces: usize,
        use_regex: bool,
    ) -> Result<LabelReplacement> {
        self.change_labels(Axis::Column, search, replace, max_replaces, use_regex)
    }

    fn change_labels(
        &mut self,
        axis: Axis,
        search: &str,
        replace: &str,
        max_replaces: usize,
        use_regex: bool,
    ) -> Result<LabelReplacement> {
        let matcher = label::matcher(search, use_regex)?;
        Ok(self.replace_labels_with(axis, matcher.as_ref(), replace, max_replaces))
    }

    /// Search and replace on one label axis with a caller-supplied matcher.
    pub fn replace_labels_with(
        &mut self,
        axis: Axis,
        matcher: &dyn LabelMatcher,
        replace: &str,
        max_replaces: usize,
    ) -> LabelReplacement {
        let (fresh, stats) = label::search_and_replace(self.labels(axis), matcher, replace, max_replaces);
        *self.labels_mut(axis) = fresh;
        stats
    }

    /// Number of labels on `axis` matching `search`.
    ///
    /// A literal search compares whole labels; a regular expression may
    /// match anywhere inside a label. An empty search matches nothing.
    ///
    /// # Errors
    /// [`TableError::InvalidPattern`] for an invalid regular expression.
    pub fn number_of_label_matches(&self, search: &str, axis: Axis, use_regex: bool) -> Result<usize> {
        if search.is_empty() {
            return Ok(0);
        }
        let matcher = label::matcher(search, use_regex)?;
        Ok(label::count_matches(self.labels(axis), matcher.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LabeledTable {
        LabeledTable::from_rows(&[[1.0, 5.0, 2.0], [4.0, 4.0, 0.0]])
            .unwrap()
            .with_row_labels(&["r1", "r2"])
            .unwrap()
            .with_column_labels(&["a", "b", "c"])
            .unwrap()
    }

    #[test]
    fn test_new_is_zero_filled_and_unlabeled() {
        let t = LabeledTable::new(2, 3);
        assert_eq!(t.shape(), (2, 3));
        assert!(t.data().iter().all(|&x| x == 0.0));
        assert_eq!(t.row_label(0), None);
        assert!(!t.has_row_labels());
        assert!(!t.has_any_row_label());
    }

    #[test]
    fn test_from_rows_ragged() {
        let rows: Vec<Vec<f64>> = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(matches!(
            LabeledTable::from_rows(rows.as_slice()),
            Err(TableError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_from_vec_length_checked() {
        assert!(LabeledTable::from_vec(2, 2, vec![1.0; 3]).is_err());
        let t = LabeledTable::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(t.row(1), &[3.0, 4.0]);
    }

    #[test]
    fn test_set_label_out_of_range() {
        let mut t = LabeledTable::new(2, 2);
        assert_eq!(
            t.set_row_label(2, "x"),
            Err(TableError::InvalidIndex {
                axis: Axis::Row,
                index: 2,
                len: 2
            })
        );
        assert!(t.set_column_label(5, "x").is_err());
    }

    #[test]
    fn test_label_lookup_first_match() {
        let mut t = sample();
        t.set_column_label(2, "a").unwrap();
        assert_eq!(t.column_label_to_index("a"), Some(0));
        assert_eq!(t.row_label_to_index("r2"), Some(1));
        assert_eq!(t.row_label_to_index("zz"), None);
        assert_eq!(t.row_label_to_index(""), None);
    }

    #[test]
    fn test_has_labels_is_stringent() {
        let mut t = sample();
        assert!(t.has_row_labels());
        assert!(t.has_column_labels());
        t.set_row_label(1, "").unwrap();
        assert!(!t.has_row_labels());
        assert!(t.has_any_row_label());
    }

    #[test]
    fn test_extract_labels_placeholder() {
        let mut t = LabeledTable::new(2, 1);
        t.set_row_label(1, "x").unwrap();
        assert_eq!(t.extract_row_labels(), vec!["?", "x"]);
        assert_eq!(t.extract_column_labels(), vec!["?"]);
    }

    #[test]
    fn test_sequential_labels() {
        let mut t = LabeledTable::new(1, 4);
        t.set_sequential_column_labels(Some(1), None, "f", 1, 2).unwrap();
        assert_eq!(t.column_label(0), None);
        assert_eq!(t.column_label(1), Some("f1"));
        assert_eq!(t.column_label(3), Some("f5"));
        assert!(t.set_sequential_column_labels(Some(3), Some(2), "f", 1, 1).is_err());
        assert!(t.set_sequential_row_labels(None, Some(1), "r", 0, 1).is_err());
    }

    #[test]
    fn test_copy_labels_transposed() {
        let src = sample();
        let mut dst = LabeledTable::new(3, 2);
        dst.copy_labels_from(&src, LabelOrigin::Transposed, LabelOrigin::Transposed)
            .unwrap();
        assert_eq!(dst.row_label(2), Some("c"));
        assert_eq!(dst.column_label(1), Some("r2"));
        assert!(dst
            .copy_labels_from(&src, LabelOrigin::Same, LabelOrigin::Skip)
            .is_err());
    }

    #[test]
    fn test_copy_row_with_label() {
        let src = sample();
        let mut dst = LabeledTable::new(1, 3);
        dst.copy_row_with_label(&src, 1, 0).unwrap();
        assert_eq!(dst.row(0), &[4.0, 4.0, 0.0]);
        assert_eq!(dst.row_label(0), Some("r2"));
        let mut narrow = LabeledTable::new(1, 2);
        assert!(narrow.copy_row_with_label(&src, 0, 0).is_err());
    }

    #[test]
    fn test_column_at_maximum_first_wins() {
        let t = sample();
        assert_eq!(t.column_index_at_maximum_in_row(0), Some(1));
        assert_eq!(t.column_index_at_maximum_in_row(1), Some(0));
        assert_eq!(t.column_label_at_maximum_in_row(0), Some("b"));
        assert_eq!(t.column_index_at_maximum_in_row(9), None);
    }

    #[test]
    fn test_change_row_labels() {
        let mut t = sample();
        let stats = t.change_row_labels("r", "row", 0, false).unwrap();
        assert_eq!(stats.matches, 2);
        assert_eq!(stats.labels_changed, 2);
        assert_eq!(t.row_label(0), Some("row1"));

        let stats = t.change_column_labels("^[ab]$", "x", 0, true).unwrap();
        assert_eq!(stats.labels_changed, 2);
        assert_eq!(t.column_label(2), Some("c"));
    }

    #[test]
    fn test_number_of_label_matches() {
        let t = sample();
        assert_eq!(t.number_of_label_matches("r1", Axis::Row, false).unwrap(), 1);
        assert_eq!(t.number_of_label_matches("r", Axis::Row, false).unwrap(), 0);
        assert_eq!(t.number_of_label_matches("r", Axis::Row, true).unwrap(), 2);
        assert_eq!(t.number_of_label_matches("", Axis::Column, true).unwrap(), 0);
        assert!(t.number_of_label_matches("[", Axis::Column, true).is_err());
    }
}
