//! Index permutations and row reordering.
//!
//! A [`Permutation`] is a bijection on `0..n`. Applying it to a table
//! *gathers* rows: output row `i` is input row `p[i]`. The permutation is a
//! pure index artifact and never owns table data.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Result, TableError};
use crate::label::{self, Label};
use crate::table::LabeledTable;

/// Bijection on `0..n`.
///
/// # Examples
/// ```
/// use u_table::Permutation;
/// let p = Permutation::new(vec![2, 0, 1]).unwrap();
/// assert_eq!(p.inverse().as_slice(), &[1, 2, 0]);
/// assert!(Permutation::new(vec![0, 0, 1]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    p: Vec<usize>,
}

impl Permutation {
    /// Identity on `0..n`.
    pub fn identity(n: usize) -> Self {
        Self { p: (0..n).collect() }
    }

    /// Validates `indices` as a bijection on `0..indices.len()`.
    ///
    /// # Errors
    /// [`TableError::InvalidPermutation`] on out-of-range or repeated entries.
    pub fn new(indices: Vec<usize>) -> Result<Self> {
        let n = indices.len();
        let mut seen = vec![false; n];
        for &i in &indices {
            if i >= n {
                return Err(TableError::InvalidPermutation(format!(
                    "index {i} out of range [0, {n})"
                )));
            }
            if std::mem::replace(&mut seen[i], true) {
                return Err(TableError::InvalidPermutation(format!(
                    "index {i} occurs more than once"
                )));
            }
        }
        Ok(Self { p: indices })
    }

    /// Uniformly random permutation of `0..n`.
    pub fn random<R: Rng>(n: usize, rng: &mut R) -> Self {
        let mut p: Vec<usize> = (0..n).collect();
        p.shuffle(rng);
        Self { p }
    }

    /// Stable sort order of `labels`: ties keep their original order and
    /// absent labels sort as `""`.
    pub fn sorting_labels(labels: &[Label]) -> Self {
        let mut p: Vec<usize> = (0..labels.len()).collect();
        p.sort_by(|&a, &b| label::compare(&labels[a], &labels[b]));
        Self { p }
    }

    pub fn len(&self) -> usize {
        self.p.len()
    }

    pub fn is_empty(&self) -> bool {
        self.p.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.p
    }

    pub fn is_identity(&self) -> bool {
        self.p.iter().enumerate().all(|(i, &v)| i == v)
    }

    /// The permutation `q` with `q[p[i]] == i`.
    pub fn inverse(&self) -> Self {
        let mut q = vec![0; self.p.len()];
        for (i, &v) in self.p.iter().enumerate() {
            q[v] = i;
        }
        Self { p: q }
    }
}

impl LabeledTable {
    /// New table whose row `i` is row `p[i]` of `self`; row labels travel
    /// with their rows, column labels are copied.
    ///
    /// # Errors
    /// [`TableError::DimensionMismatch`] if `p.len() != n_rows`.
    pub fn permute_rows(&self, p: &Permutation) -> Result<LabeledTable> {
        if p.len() != self.n_rows() {
            return Err(TableError::shape(
                format!("permutation of {} rows", self.n_rows()),
                p.len().to_string(),
            ));
        }
        Ok(self.gather_rows(p.as_slice()))
    }

    /// Rows in a uniformly random order.
    pub fn randomize_rows<R: Rng>(&self, rng: &mut R) -> LabeledTable {
        let p = Permutation::random(self.n_rows(), rng);
        self.gather_rows(p.as_slice())
    }

    /// Output row `k` is row `rows[k]`; indices may repeat. Row labels
    /// travel with their rows, column labels are copied.
    pub(crate) fn gather_rows(&self, rows: &[usize]) -> LabeledTable {
        let mut out = LabeledTable::new(rows.len(), self.n_cols());
        for (dst, &src) in rows.iter().enumerate() {
            out.row_mut(dst).copy_from_slice(self.row(src));
            out.row_labels_mut()[dst] = self.row_labels()[src].clone();
        }
        out.column_labels_mut().clone_from_slice(self.column_labels());
        out
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn random_permutation_is_valid(seed in 0_u64..5000, n in 0_usize..64) {
            let mut rng = create_rng(seed);
            let p = Permutation::random(n, &mut rng);
            prop_assert!(Permutation::new(p.as_slice().to_vec()).is_ok());
            prop_assert!(p.inverse().inverse() == p);
        }

        #[test]
        fn randomized_rows_are_a_reordering(
            seed in 0_u64..5000,
            values in proptest::collection::vec(-1e3_f64..1e3, 0..40),
        ) {
            let t = LabeledTable::from_vec(values.len(), 1, values.clone()).unwrap();
            let out = t.randomize_rows(&mut create_rng(seed));
            let mut before = values;
            let mut after = out.data().to_vec();
            before.sort_by(f64::total_cmp);
            after.sort_by(f64::total_cmp);
            prop_assert_eq!(before, after);
        }
    }
}
