#![deny(missing_docs)]
//! Predicate-to-range-bound decomposition for scan pruning.
//!
//! A boolean filter tree is rewritten into a list of [`FilterSet`]s whose
//! disjunction is equivalent to the tree. Each set records, per column, the
//! [`Bound`]s a matching row must satisfy, plus the comparisons that could not
//! be reduced to a column-vs-value bound. Scans use the bounds to seek and
//! prune, and still evaluate everything in full on candidate rows.
//!
//! ```
//! use rangefilter::{
//!     decompose,
//!     expr::builder::{col, lit},
//! };
//!
//! let filter = col("x").greater_than(lit(1)).and(col("x").less_than(lit(10)));
//! let sets = decompose(Some(&filter));
//! assert_eq!(sets.len(), 1);
//! assert_eq!(sets[0].bounds("x").len(), 2);
//! ```

mod observability;

/// Closed expression model and builders.
pub mod expr;

/// Bounds, filter sets and the decomposition algorithm.
pub mod filter;

/// Key ranges derived from decomposed filters.
pub mod scan;

pub use crate::{
    expr::{BinaryExpr, BinaryOp, ColumnRef, Expr, ScalarValue, UnaryOp},
    filter::{
        decompose, matches_any, validate, Bound, DecomposeConfig, Decomposer, Evaluator,
        FilterSet, ValidateError,
    },
    scan::{key_ranges, KeyRange, RangeSet, ScanKey, ScanPlan},
};
