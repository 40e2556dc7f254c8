//! Per-column range bounds decomposed from filter expressions.
//!
//! A filter tree is rewritten into a list of [`FilterSet`]s whose disjunction
//! is equivalent to the original tree. Each set holds, per column, the
//! [`Bound`]s a matching row must satisfy plus the comparisons that could not
//! be reduced to a column-vs-value bound and must be evaluated in full.

mod config;
mod decompose;
mod eval;
mod validate;

use std::{collections::BTreeMap, fmt, sync::Arc};

pub use config::DecomposeConfig;
pub use decompose::{decompose, Decomposer};
pub use eval::{matches_any, Evaluator};
pub use validate::{validate, ValidateError};

use crate::expr::{BinaryExpr, Expr};

/// Single-column range constraint resolvable at scan time.
///
/// A column value `v` satisfies the bound when `(min <= v <= max) != negated`,
/// with both comparisons strict when `inclusive` is false. A side without a
/// limit holds the column's own reference expression instead of a value.
#[derive(Clone, Debug, PartialEq)]
pub struct Bound {
    /// Lower endpoint, or the column itself when unbounded below.
    pub min: Expr,
    /// Upper endpoint, or the column itself when unbounded above.
    pub max: Expr,
    /// Set when `v == min` or `v == max` is accepted.
    pub inclusive: bool,
    /// Logical NOT of the range test.
    pub negated: bool,
}

impl Bound {
    /// Creates a bound from its parts.
    #[must_use]
    pub fn new(min: Expr, max: Expr, inclusive: bool, negated: bool) -> Self {
        Self {
            min,
            max,
            inclusive,
            negated,
        }
    }

    /// Whether `endpoint` is the unbounded sentinel for `column`.
    #[must_use]
    pub fn is_sentinel(endpoint: &Expr, column: &str) -> bool {
        endpoint
            .as_column()
            .is_some_and(|endpoint| &*endpoint.name == column)
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cmp = if self.inclusive { "<=" } else { "<" };
        if self.negated {
            f.write_str("NOT ")?;
        }
        write!(f, "[{} {cmp} _ {cmp} {}]", self.min, self.max)
    }
}

/// Conjunction of per-column bounds and leftover comparisons.
///
/// Bounds keep insertion order per column; columns iterate in name order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterSet {
    col_conditions: BTreeMap<Arc<str>, Vec<Bound>>,
    remaining: Vec<BinaryExpr>,
}

impl FilterSet {
    /// Creates an empty set, which matches every row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn single(column: Arc<str>, bound: Bound) -> Self {
        let mut col_conditions = BTreeMap::new();
        col_conditions.insert(column, vec![bound]);
        Self {
            col_conditions,
            remaining: Vec::new(),
        }
    }

    /// Bounds grouped by column name.
    #[must_use]
    pub fn col_conditions(&self) -> &BTreeMap<Arc<str>, Vec<Bound>> {
        &self.col_conditions
    }

    /// Bounds recorded for `column`; empty when the column is unconstrained.
    #[must_use]
    pub fn bounds(&self, column: &str) -> &[Bound] {
        self.col_conditions
            .get(column)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Comparisons that must be evaluated in full for every candidate row.
    #[must_use]
    pub fn remaining(&self) -> &[BinaryExpr] {
        &self.remaining
    }

    /// Total number of bounds across all columns.
    #[must_use]
    pub fn bound_count(&self) -> usize {
        self.col_conditions.values().map(Vec::len).sum()
    }

    /// True when the set has neither bounds nor remaining comparisons.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.col_conditions.is_empty() && self.remaining.is_empty()
    }

    /// Appends the bounds of a freshly extracted set.
    ///
    /// # Panics
    ///
    /// Panics when `src` carries remaining comparisons: merging only unions
    /// bounds, so those comparisons would be lost.
    fn merge(&mut self, src: FilterSet) {
        assert!(
            src.remaining.is_empty(),
            "FilterSet::merge: source set must not carry remaining comparisons"
        );
        for (column, mut bounds) in src.col_conditions {
            self.col_conditions
                .entry(column)
                .or_default()
                .append(&mut bounds);
        }
    }

    fn add_remaining(&mut self, expr: BinaryExpr) {
        self.remaining.push(expr);
    }
}
