//! Error taxonomy for table operations.
//!
//! Structural and validation failures are reported through [`TableError`].
//! Numeric degenerate cases (zero variance, zero norm, singular covariance,
//! invalid quantile column) are *not* errors: they surface as `None` or as
//! documented fallback values on the operation itself.

use std::fmt;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TableError>;

/// Which dimension of a table an index or label refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Row dimension.
    Row,
    /// Column dimension.
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => f.write_str("row"),
            Axis::Column => f.write_str("column"),
        }
    }
}

/// Failure categories of table operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    /// A row or column index lies outside the table.
    #[error("{axis} index {index} out of range (table has {len} {axis}s)")]
    InvalidIndex {
        /// Dimension the index refers to.
        axis: Axis,
        /// Offending index (0-based).
        index: usize,
        /// Size of that dimension.
        len: usize,
    },

    /// Two tables (or a table and its input) disagree on a required size.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Required shape description.
        expected: String,
        /// Shape actually supplied.
        found: String,
    },

    /// Operation requires a square table.
    #[error("table is not square ({rows}x{cols})")]
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// The numeric backend could not factor or invert the input.
    #[error("factorization failed: {0}")]
    FactorizationFailed(String),

    /// The table carries no row labels at all.
    #[error("table has no row labels")]
    MissingRowLabels,

    /// A label lookup found no match.
    #[error("no label \"{0}\"")]
    LabelNotFound(String),

    /// A table in a list differs in shape or labels from the first one.
    #[error("dimensions or labels differ for table {index}")]
    IncompatibleTables {
        /// Position (0-based) of the first offending table.
        index: usize,
    },

    /// Row labels are not arranged in contiguous blocks.
    #[error("row label \"{label}\" reappears at row {row} after a different label")]
    LabelsNotGrouped {
        /// The label that re-appeared.
        label: String,
        /// Row (0-based) where it re-appeared.
        row: usize,
    },

    /// A list operation received no tables.
    #[error("no tables given")]
    EmptyList,

    /// An index vector is not a bijection on `0..n`.
    #[error("invalid permutation: {0}")]
    InvalidPermutation(String),

    /// A regular expression used for label matching failed to compile.
    #[error("invalid label pattern: {0}")]
    InvalidPattern(String),
}

impl TableError {
    pub(crate) fn row_index(index: usize, len: usize) -> Self {
        TableError::InvalidIndex {
            axis: Axis::Row,
            index,
            len,
        }
    }

    pub(crate) fn column_index(index: usize, len: usize) -> Self {
        TableError::InvalidIndex {
            axis: Axis::Column,
            index,
            len,
        }
    }

    pub(crate) fn shape(expected: impl Into<String>, found: impl Into<String>) -> Self {
        TableError::DimensionMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}
