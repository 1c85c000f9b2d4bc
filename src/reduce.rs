//! Row/column reduction engine.
//!
//! Sums, extrema and quantiles read the table; centering, normalization and
//! standardization rewrite it in place; ranking returns a new table.
//!
//! # Degenerate cases
//!
//! - Zero norm: the vector is all zeros already and is left untouched.
//! - Standardization with a single observation, or with zero spread,
//!   writes `0.0` instead of dividing by zero.
//! - [`LabeledTable::column_quantile`] answers `None` for an invalid column.

use std::ops::Range;

use crate::error::{Result, TableError};
use crate::label;
use crate::stats::{self, CompensatedSum, WelfordAccumulator};
use crate::table::LabeledTable;

impl LabeledTable {
    // ------------------------------------------------------------------
    // Read-only reductions
    // ------------------------------------------------------------------

    /// `(min, max)` of column `col`.
    ///
    /// # Errors
    /// [`TableError::InvalidIndex`] if `col` is out of range or the table
    /// has no rows.
    pub fn column_extrema(&self, col: usize) -> Result<(f64, f64)> {
        self.check_column(col)?;
        self.check_row(0)?;
        let mut min = self.at(0, col);
        let mut max = min;
        for i in 1..self.n_rows() {
            let v = self.at(i, col);
            if v > max {
                max = v;
            } else if v < min {
                min = v;
            }
        }
        Ok((min, max))
    }

    /// Sum of row `row`.
    ///
    /// # Errors
    /// [`TableError::InvalidIndex`] if `row` is out of range.
    pub fn row_sum(&self, row: usize) -> Result<f64> {
        self.check_row(row)?;
        Ok(stats::kahan_sum(self.row(row)))
    }

    /// Sum of column `col`.
    ///
    /// # Errors
    /// [`TableError::InvalidIndex`] if `col` is out of range.
    pub fn column_sum(&self, col: usize) -> Result<f64> {
        self.check_column(col)?;
        let mut acc = CompensatedSum::new();
        for i in 0..self.n_rows() {
            acc.add(self.at(i, col));
        }
        Ok(acc.value())
    }

    /// Sum of the row labelled `text`.
    ///
    /// # Errors
    /// [`TableError::LabelNotFound`] if no row carries that label.
    pub fn row_sum_by_label(&self, text: &str) -> Result<f64> {
        let row = self
            .row_label_to_index(text)
            .ok_or_else(|| TableError::LabelNotFound(text.to_string()))?;
        self.row_sum(row)
    }

    /// Sum of the column labelled `text`.
    ///
    /// # Errors
    /// [`TableError::LabelNotFound`] if no column carries that label.
    pub fn column_sum_by_label(&self, text: &str) -> Result<f64> {
        let col = self
            .column_label_to_index(text)
            .ok_or_else(|| TableError::LabelNotFound(text.to_string()))?;
        self.column_sum(col)
    }

    /// Sum of every cell.
    pub fn grand_sum(&self) -> f64 {
        stats::kahan_sum(self.data())
    }

    /// Euclidean norm of all cells taken together.
    pub fn table_norm(&self) -> f64 {
        stats::l2_norm(self.data())
    }

    /// Quantile `q ∈ [0, 1]` of column `col` (Hazen interpolation).
    ///
    /// Soft failure: `None` for an invalid column, an out-of-range `q` or a
    /// table without rows.
    ///
    /// # Examples
    /// ```
    /// use u_table::LabeledTable;
    /// let t = LabeledTable::from_rows(&[[4.0], [1.0], [3.0], [2.0]]).unwrap();
    /// assert_eq!(t.column_quantile(0, 0.5), Some(2.5));
    /// assert_eq!(t.column_quantile(1, 0.5), None);
    /// ```
    pub fn column_quantile(&self, col: usize, q: f64) -> Option<f64> {
        if col >= self.n_cols() {
            return None;
        }
        stats::quantile(&self.column_values(col), q)
    }

    /// Every cell is `>= 0`.
    pub fn check_non_negativity(&self) -> bool {
        self.data().iter().all(|&x| x >= 0.0)
    }

    // ------------------------------------------------------------------
    // In-place transforms
    // ------------------------------------------------------------------

    /// Subtracts each column's mean from that column.
    pub fn centre_columns(&mut self) {
        self.centre_column_band(0..self.n_rows());
    }

    /// Subtracts each row's mean from that row.
    pub fn centre_rows(&mut self) {
        for i in 0..self.n_rows() {
            let row = self.row_mut(i);
            if let Some(m) = stats::mean(row) {
                row.iter_mut().for_each(|x| *x -= m);
            }
        }
    }

    /// `x[i][j] − rowMean[i] − colMean[j] + grandMean` for every cell.
    pub fn double_centre(&mut self) {
        let (nr, nc) = self.shape();
        if nr == 0 || nc == 0 {
            return;
        }
        let row_means: Vec<f64> = (0..nr).map(|i| stats::kahan_sum(self.row(i)) / nc as f64).collect();
        let col_means: Vec<f64> = (0..nc).map(|j| self.column_mean(0..nr, j)).collect();
        let grand = stats::kahan_sum(&row_means) / nr as f64;
        for i in 0..nr {
            for j in 0..nc {
                *self.at_mut(i, j) += grand - row_means[i] - col_means[j];
            }
        }
    }

    /// Scales every column to L2 norm `norm`; all-zero columns stay zero.
    pub fn normalize_columns(&mut self, norm: f64) {
        for j in 0..self.n_cols() {
            let length = stats::l2_norm(&self.column_values(j));
            if length > 0.0 {
                let factor = norm / length;
                for i in 0..self.n_rows() {
                    *self.at_mut(i, j) *= factor;
                }
            }
        }
    }

    /// Scales every row to L2 norm `norm`; all-zero rows stay zero.
    pub fn normalize_rows(&mut self, norm: f64) {
        for i in 0..self.n_rows() {
            let row = self.row_mut(i);
            let length = stats::l2_norm(row);
            if length > 0.0 {
                let factor = norm / length;
                row.iter_mut().for_each(|x| *x *= factor);
            }
        }
    }

    /// Scales the whole table to L2 norm `norm`; an all-zero table stays zero.
    pub fn normalize_table(&mut self, norm: f64) {
        let length = self.table_norm();
        if length > 0.0 {
            let factor = norm / length;
            self.data_mut().iter_mut().for_each(|x| *x *= factor);
        }
    }

    /// Column z-scores (sample standard deviation).
    ///
    /// With one row or fewer every cell becomes `0.0`; a column without
    /// spread also becomes `0.0`.
    pub fn standardize_columns(&mut self) {
        if self.n_rows() <= 1 {
            self.data_mut().fill(0.0);
            return;
        }
        for j in 0..self.n_cols() {
            let mut acc = WelfordAccumulator::new();
            for i in 0..self.n_rows() {
                acc.update(self.at(i, j));
            }
            let (mean, sd) = spread(&acc);
            for i in 0..self.n_rows() {
                let cell = self.at_mut(i, j);
                *cell = z_score(*cell, mean, sd);
            }
        }
    }

    /// Row z-scores (sample standard deviation).
    ///
    /// With one column or fewer every cell becomes `0.0`; a row without
    /// spread also becomes `0.0`.
    pub fn standardize_rows(&mut self) {
        if self.n_cols() <= 1 {
            self.data_mut().fill(0.0);
            return;
        }
        for i in 0..self.n_rows() {
            let row = self.row_mut(i);
            let mut acc = WelfordAccumulator::new();
            row.iter().for_each(|&x| acc.update(x));
            let (mean, sd) = spread(&acc);
            row.iter_mut().for_each(|x| *x = z_score(*x, mean, sd));
        }
    }

    /// Copy with each column replaced by its fractional ranks (1-based,
    /// ties share the mean rank). Labels are kept.
    pub fn rank_columns(&self) -> LabeledTable {
        let mut out = self.clone();
        for j in 0..self.n_cols() {
            let ranks = stats::fractional_ranks(&self.column_values(j));
            for (i, r) in ranks.into_iter().enumerate() {
                *out.at_mut(i, j) = r;
            }
        }
        out
    }

    /// Centres the columns of every block of equal, contiguous row labels
    /// independently.
    ///
    /// Labels must already be grouped: a label that re-appears after a
    /// different one is rejected before any cell changes.
    ///
    /// # Errors
    /// [`TableError::LabelsNotGrouped`] if the row labels are not contiguous.
    pub fn centre_columns_by_row_label(&mut self) -> Result<()> {
        let blocks = self.row_label_blocks()?;
        for block in blocks {
            self.centre_column_band(block);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Band helpers shared with the grouping engine
    // ------------------------------------------------------------------

    /// Maximal runs of equal row labels, verified to be contiguous groups.
    pub(crate) fn row_label_blocks(&self) -> Result<Vec<Range<usize>>> {
        let labels = self.row_labels();
        let mut blocks: Vec<Range<usize>> = Vec::new();
        let mut start = 0;
        for i in 1..=labels.len() {
            if i == labels.len() || !label::equal(&labels[i], &labels[start]) {
                blocks.push(start..i);
                start = i;
            }
        }
        for (k, block) in blocks.iter().enumerate() {
            let current = &labels[block.start];
            if blocks[..k]
                .iter()
                .any(|b| label::equal(&labels[b.start], current))
            {
                return Err(TableError::LabelsNotGrouped {
                    label: label::text(current).to_string(),
                    row: block.start,
                });
            }
        }
        Ok(blocks)
    }

    pub(crate) fn column_mean(&self, rows: Range<usize>, col: usize) -> f64 {
        let n = rows.len();
        let mut acc = CompensatedSum::new();
        for i in rows {
            acc.add(self.at(i, col));
        }
        acc.value() / n as f64
    }

    pub(crate) fn centre_column_band(&mut self, rows: Range<usize>) {
        if rows.is_empty() {
            return;
        }
        for j in 0..self.n_cols() {
            let m = self.column_mean(rows.clone(), j);
            for i in rows.clone() {
                *self.at_mut(i, j) -= m;
            }
        }
    }

    /// Writes each column's mean over `rows` into every row of the band.
    pub(crate) fn average_column_band(&mut self, rows: Range<usize>) {
        if rows.len() < 2 {
            return;
        }
        for j in 0..self.n_cols() {
            let m = self.column_mean(rows.clone(), j);
            for i in rows.clone() {
                *self.at_mut(i, j) = m;
            }
        }
    }

    /// Writes each column's median over `rows` into every row of the band.
    pub(crate) fn median_column_band(&mut self, rows: Range<usize>) {
        if rows.len() < 2 {
            return;
        }
        for j in 0..self.n_cols() {
            let values: Vec<f64> = rows.clone().map(|i| self.at(i, j)).collect();
            if let Some(m) = stats::median(&values) {
                for i in rows.clone() {
                    *self.at_mut(i, j) = m;
                }
            }
        }
    }
}

fn spread(acc: &WelfordAccumulator) -> (f64, f64) {
    (
        acc.mean().unwrap_or(0.0),
        acc.sample_std_dev().unwrap_or(0.0),
    )
}

fn z_score(x: f64, mean: f64, sd: f64) -> f64 {
    if sd == 0.0 {
        0.0
    } else {
        (x - mean) / sd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> LabeledTable {
        LabeledTable::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 10.0]])
            .unwrap()
            .with_row_labels(&["a", "b", "c"])
            .unwrap()
            .with_column_labels(&["x", "y", "z"])
            .unwrap()
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-12, "{a} != {b}");
    }

    #[test]
    fn test_column_extrema() {
        assert_eq!(grid().column_extrema(2).unwrap(), (3.0, 10.0));
        assert!(matches!(
            grid().column_extrema(3),
            Err(TableError::InvalidIndex { .. })
        ));
        assert!(LabeledTable::new(0, 2).column_extrema(0).is_err());
    }

    #[test]
    fn test_sums() {
        let t = grid();
        assert_eq!(t.row_sum(1).unwrap(), 15.0);
        assert_eq!(t.column_sum(0).unwrap(), 12.0);
        assert_eq!(t.grand_sum(), 46.0);
        assert!(t.row_sum(3).is_err());
        assert!(t.column_sum(9).is_err());
    }

    #[test]
    fn test_sums_by_label() {
        let t = grid();
        assert_eq!(t.row_sum_by_label("c").unwrap(), 25.0);
        assert_eq!(t.column_sum_by_label("y").unwrap(), 15.0);
        assert_eq!(
            t.column_sum_by_label("w"),
            Err(TableError::LabelNotFound("w".into()))
        );
    }

    #[test]
    fn test_column_quantile_median() {
        let t = LabeledTable::from_rows(&[[1.0], [2.0], [3.0], [4.0]]).unwrap();
        assert_eq!(t.column_quantile(0, 0.5), Some(2.5));
        assert_eq!(t.column_quantile(4, 0.5), None);
        assert_eq!(t.column_quantile(0, 1.5), None);
    }

    #[test]
    fn test_centre_columns_and_rows() {
        let mut t = grid();
        t.centre_columns();
        for j in 0..3 {
            assert!(t.column_sum(j).unwrap().abs() < 1e-12);
        }
        let mut t = grid();
        t.centre_rows();
        for i in 0..3 {
            assert!(t.row_sum(i).unwrap().abs() < 1e-12);
        }
        assert_eq!(t.row_label(0), Some("a"));
    }

    #[test]
    fn test_double_centre_zero_margins() {
        let mut t = grid();
        t.double_centre();
        for i in 0..3 {
            assert!(t.row_sum(i).unwrap().abs() < 1e-12);
        }
        for j in 0..3 {
            assert!(t.column_sum(j).unwrap().abs() < 1e-12);
        }
    }

    #[test]
    fn test_normalize_columns_and_rows() {
        let mut t = LabeledTable::from_rows(&[[3.0, 0.0], [4.0, 0.0]]).unwrap();
        t.normalize_columns(1.0);
        assert_close(t.get(0, 0).unwrap(), 0.6);
        assert_close(t.get(1, 0).unwrap(), 0.8);
        assert_eq!(t.get(0, 1), Some(0.0));

        let mut t = LabeledTable::from_rows(&[[3.0, 4.0], [0.0, 0.0]]).unwrap();
        t.normalize_rows(10.0);
        assert_close(t.get(0, 0).unwrap(), 6.0);
        assert_close(t.get(0, 1).unwrap(), 8.0);
        assert_eq!(t.row(1), &[0.0, 0.0]);
    }

    #[test]
    fn test_normalize_table() {
        let mut t = LabeledTable::from_rows(&[[3.0], [4.0]]).unwrap();
        assert_close(t.table_norm(), 5.0);
        t.normalize_table(1.0);
        assert_close(t.table_norm(), 1.0);
        let mut z = LabeledTable::new(2, 2);
        z.normalize_table(1.0);
        assert!(z.data().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_standardize_columns() {
        let mut t = grid();
        t.standardize_columns();
        for j in 0..3 {
            let col = t.column(j).unwrap();
            assert!(stats::mean(&col).unwrap().abs() < 1e-12);
            assert!((stats::std_dev(&col).unwrap() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_standardize_single_row_is_zero() {
        let mut t = LabeledTable::from_rows(&[[3.0, -2.0, 7.0]]).unwrap();
        t.standardize_columns();
        assert_eq!(t.row(0), &[0.0, 0.0, 0.0]);
        let mut t = LabeledTable::from_rows(&[[3.0], [9.0]]).unwrap();
        t.standardize_rows();
        assert_eq!(t.data(), &[0.0, 0.0]);
    }

    #[test]
    fn test_standardize_constant_column_is_zero() {
        let mut t = LabeledTable::from_rows(&[[5.0, 1.0], [5.0, 3.0]]).unwrap();
        t.standardize_columns();
        assert_eq!(t.get(0, 0), Some(0.0));
        assert_eq!(t.get(1, 0), Some(0.0));
        assert!(t.data().iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_standardize_rows() {
        let mut t = grid();
        t.standardize_rows();
        for i in 0..3 {
            assert!(stats::mean(t.row(i)).unwrap().abs() < 1e-12);
            assert!((stats::std_dev(t.row(i)).unwrap() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_check_non_negativity() {
        assert!(grid().check_non_negativity());
        let mut t = grid();
        t.set(2, 1, -0.5).unwrap();
        assert!(!t.check_non_negativity());
    }

    #[test]
    fn test_rank_columns_ties() {
        let t = LabeledTable::from_rows(&[[3.0], [1.0], [3.0], [2.0]])
            .unwrap()
            .with_column_labels(&["v"])
            .unwrap();
        let r = t.rank_columns();
        assert_eq!(r.data(), &[3.5, 1.0, 3.5, 2.0]);
        assert_eq!(r.column_label(0), Some("v"));
        assert_eq!(t.data(), &[3.0, 1.0, 3.0, 2.0]);
    }

    fn every_third_nan(n: usize) -> LabeledTable {
        let data: Vec<f64> = (0..n)
            .map(|i| if i % 3 == 0 { f64::NAN } else { i as f64 })
            .collect();
        LabeledTable::from_vec(n, 1, data).unwrap()
    }

    #[test]
    fn test_rank_columns_with_nan_cells() {
        let r = every_third_nan(64).rank_columns();
        assert_eq!(r.get(1, 0), Some(1.0));
        assert_eq!(r.get(2, 0), Some(2.0));
        assert_eq!(r.get(62, 0), Some(42.0));
        assert_eq!(r.get(0, 0), Some(43.0));
        assert_eq!(r.get(63, 0), Some(64.0));
    }

    #[test]
    fn test_column_quantile_with_nan_cells() {
        let t = every_third_nan(64);
        assert_eq!(t.column_quantile(0, 0.0), Some(1.0));
        assert!(t.column_quantile(0, 0.5).is_some());
    }

    #[test]
    fn test_centre_columns_by_row_label() {
        let mut t = LabeledTable::from_rows(&[[1.0], [3.0], [10.0], [20.0], [30.0]])
            .unwrap()
            .with_row_labels(&["a", "a", "b", "b", "b"])
            .unwrap();
        t.centre_columns_by_row_label().unwrap();
        assert_eq!(t.data(), &[-1.0, 1.0, -10.0, 0.0, 10.0]);
    }

    #[test]
    fn test_centre_columns_by_row_label_requires_grouping() {
        let mut t = LabeledTable::from_rows(&[[1.0], [3.0], [10.0]])
            .unwrap()
            .with_row_labels(&["a", "b", "a"])
            .unwrap();
        let before = t.clone();
        assert_eq!(
            t.centre_columns_by_row_label(),
            Err(TableError::LabelsNotGrouped {
                label: "a".into(),
                row: 2
            })
        );
        assert_eq!(t, before);
    }
}
