//! Scan-time contract for applying decomposed filters to rows.
//!
//! Expression evaluation itself belongs to the caller: an [`Evaluator`]
//! resolves endpoint expressions, column values and leftover comparisons
//! against a row, and the helpers here apply bound semantics on top of it.

use std::cmp::Ordering;

use super::{Bound, FilterSet};
use crate::expr::{BinaryExpr, ColumnRef, Expr, ScalarValue};

/// Evaluates expressions against a row.
pub trait Evaluator {
    /// Row representation understood by the evaluator.
    type Row: ?Sized;
    /// Error type used when evaluation fails.
    type Error;

    /// Evaluates an arbitrary expression.
    fn evaluate(&self, expr: &Expr, row: &Self::Row) -> Result<ScalarValue, Self::Error>;

    /// Evaluates a binary node, such as a remaining comparison.
    fn evaluate_binary(
        &self,
        node: &BinaryExpr,
        row: &Self::Row,
    ) -> Result<ScalarValue, Self::Error>;
}

impl Bound {
    /// Tests `value`, the row's value for `column`, against this bound.
    ///
    /// An endpoint that is `column`'s own reference leaves that side
    /// unconstrained. When `value` and an endpoint are incomparable (NULL,
    /// mismatched types) the test is unknown and the row is rejected, negated
    /// or not.
    pub fn contains<E>(
        &self,
        column: &str,
        value: &ScalarValue,
        evaluator: &E,
        row: &E::Row,
    ) -> Result<bool, E::Error>
    where
        E: Evaluator + ?Sized,
    {
        let above_min = if Bound::is_sentinel(&self.min, column) {
            Some(true)
        } else {
            let min = evaluator.evaluate(&self.min, row)?;
            min.compare(value).map(|ordering| admits(ordering, self.inclusive))
        };
        let in_range = match above_min {
            None => return Ok(false),
            // A false side decides the conjunction even if the other is unknown.
            Some(false) => false,
            Some(true) if Bound::is_sentinel(&self.max, column) => true,
            Some(true) => {
                let max = evaluator.evaluate(&self.max, row)?;
                match value.compare(&max) {
                    Some(ordering) => admits(ordering, self.inclusive),
                    None => return Ok(false),
                }
            }
        };
        Ok(in_range != self.negated)
    }
}

// `ordering` is `lower.compare(upper)`.
fn admits(ordering: Ordering, inclusive: bool) -> bool {
    match ordering {
        Ordering::Less => true,
        Ordering::Equal => inclusive,
        Ordering::Greater => false,
    }
}

impl FilterSet {
    /// Applies every bound and every remaining comparison to `row`.
    ///
    /// A remaining comparison passes only when it evaluates to `true`.
    pub fn matches<E>(&self, evaluator: &E, row: &E::Row) -> Result<bool, E::Error>
    where
        E: Evaluator + ?Sized,
    {
        for (column, bounds) in &self.col_conditions {
            let value = evaluator.evaluate(&Expr::Column(ColumnRef::new(column.clone())), row)?;
            for bound in bounds {
                if !bound.contains(column, &value, evaluator, row)? {
                    return Ok(false);
                }
            }
        }
        for node in &self.remaining {
            if evaluator.evaluate_binary(node, row)? != ScalarValue::Boolean(true) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// True when `row` matches any of the disjuncts in `sets`.
pub fn matches_any<E>(sets: &[FilterSet], evaluator: &E, row: &E::Row) -> Result<bool, E::Error>
where
    E: Evaluator + ?Sized,
{
    for set in sets {
        if set.matches(evaluator, row)? {
            return Ok(true);
        }
    }
    Ok(false)
}
