//! # u-table
//!
//! Labeled numeric tables and the statistics that run over them.
//!
//! A [`LabeledTable`] is a dense row-major matrix of `f64` with an optional
//! text label on every row and column. The crate provides the engines that
//! read and rewrite such tables; it knows nothing about files, plotting or
//! any consumer domain.
//!
//! ## Modules
//!
//! - [`table`]: storage, labels, lookup and cell access
//! - [`reduce`]: sums, extrema, quantiles, centring, normalization, ranks
//! - [`group`]: label-keyed sorting and group aggregation
//! - [`correlation`]: row, column and cross correlations
//! - [`normality`]: BHEP multivariate normality test
//! - [`transform`]: transpose, column append, Cholesky, bootstrap
//! - [`list`]: aggregates over lists of tables
//! - [`permutation`]: row permutations
//! - [`label`]: label equality policy and search/replace
//! - [`stats`], [`special`], [`distributions`], [`random`]: slice-level numerics
//! - [`linalg`]: dense linear algebra boundary over `nalgebra`
//! - [`filter`]: two-pole resonator filters
//!
//! ## Conventions
//!
//! - Indices are 0-based.
//! - Structural failures return [`TableError`]; numeric degenerate cases
//!   return `Option` or a documented fallback value.
//! - Random operations take the generator as an argument
//!   ([`random::create_rng`] for a seeded one).
//! - Diagnostics go through `tracing`; no subscriber is installed here.

pub mod config;
pub mod correlation;
pub mod distributions;
pub mod error;
pub mod filter;
pub mod group;
pub mod label;
pub mod linalg;
pub mod list;
pub mod normality;
pub mod permutation;
pub mod random;
pub mod reduce;
pub mod special;
pub mod stats;
pub mod table;
pub mod transform;

pub use config::{Aggregate, BhepConfig, CorrelationOptions};
pub use error::{Axis, Result, TableError};
pub use label::{Label, LabelReplacement};
pub use normality::BhepResult;
pub use permutation::Permutation;
pub use table::{LabelOrigin, LabeledTable};
pub use transform::AppendedColumns;
