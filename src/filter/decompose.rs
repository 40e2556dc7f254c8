//! Recursive rewrite of a filter tree into [`FilterSet`]s.

use super::{validate, Bound, DecomposeConfig, FilterSet, ValidateError};
use crate::{
    expr::{BinaryExpr, BinaryOp, Expr},
    observability::{log_debug, log_trace, log_warn},
};

/// Decomposes `expr` with the default configuration.
///
/// The disjunction of the returned sets is equivalent to `expr`; the result is
/// never empty. `None` means "no filter" and yields one empty set.
///
/// # Panics
///
/// Panics when the tree holds a node other than a logical or comparison
/// binary node at filter level. Use [`Decomposer::try_decompose`] to reject
/// such trees instead.
#[must_use]
pub fn decompose(expr: Option<&Expr>) -> Vec<FilterSet> {
    Decomposer::default().decompose(expr)
}

/// Splits filter trees into disjuncts of per-column bounds.
#[derive(Clone, Debug, Default)]
pub struct Decomposer {
    config: DecomposeConfig,
}

impl Decomposer {
    /// Creates a decomposer with the supplied configuration.
    #[must_use]
    pub fn new(config: DecomposeConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &DecomposeConfig {
        &self.config
    }

    /// Decomposes `expr` into filter sets whose disjunction is equivalent to it.
    ///
    /// # Panics
    ///
    /// See [`decompose`].
    #[must_use]
    pub fn decompose(&self, expr: Option<&Expr>) -> Vec<FilterSet> {
        let mut sets = Vec::new();
        match expr {
            Some(expr) if self.config.split_root_disjunction => split_disjunction(expr, &mut sets),
            Some(expr) => {
                let mut set = FilterSet::new();
                build(expr, &mut set);
                sets.push(set);
            }
            None => sets.push(FilterSet::new()),
        }

        log_debug!(
            component = "decompose",
            event = "filter_decomposed",
            disjuncts = sets.len(),
            bounds = sets.iter().map(FilterSet::bound_count).sum::<usize>(),
            remaining = sets.iter().map(|set| set.remaining().len()).sum::<usize>(),
        );
        sets
    }

    /// Validates `expr` and decomposes it, returning an error instead of
    /// panicking on a malformed tree.
    pub fn try_decompose(&self, expr: Option<&Expr>) -> Result<Vec<FilterSet>, ValidateError> {
        if let Some(expr) = expr {
            if let Err(error) = validate(expr, self.config.max_depth) {
                log_warn!(
                    component = "decompose",
                    event = "filter_rejected",
                    error = %error,
                );
                return Err(error);
            }
        }
        Ok(self.decompose(expr))
    }
}

// Only the root distinguishes OR: an OR under AND stays whole in `remaining`.
fn split_disjunction(expr: &Expr, out: &mut Vec<FilterSet>) {
    match expr {
        Expr::Binary(node) if node.op == BinaryOp::Or => {
            split_disjunction(&node.left, out);
            split_disjunction(&node.right, out);
        }
        _ => {
            let mut set = FilterSet::new();
            build(expr, &mut set);
            out.push(set);
        }
    }
}

fn build(expr: &Expr, acc: &mut FilterSet) {
    match expr {
        Expr::Binary(node) => build_binary(node, acc),
        other => panic!("filter build: unknown expression node type: {other}"),
    }
}

fn build_binary(node: &BinaryExpr, acc: &mut FilterSet) {
    match node.op {
        BinaryOp::Or => acc.add_remaining(node.clone()),
        BinaryOp::And => {
            build(&node.left, acc);
            build(&node.right, acc);
        }
        op => {
            if let Some(extracted) = try_extract(&node.left, &node.right, op) {
                acc.merge(extracted);
            } else if let Some(extracted) = try_extract(&node.right, &node.left, op.flipped()) {
                acc.merge(extracted);
            } else {
                log_trace!(
                    component = "decompose",
                    event = "comparison_deferred",
                    expr = %node,
                );
                acc.add_remaining(node.clone());
            }
        }
    }
}

/// Builds a single-bound set from `candidate OP other`, with `candidate` as
/// the column side. Returns `None` when `candidate` is not a bare column.
fn try_extract(candidate: &Expr, other: &Expr, op: BinaryOp) -> Option<FilterSet> {
    let column = candidate.as_column()?;
    let (min, max, inclusive, negated) = match op {
        BinaryOp::Lt => (candidate, other, false, false),
        BinaryOp::LtEq => (candidate, other, true, false),
        BinaryOp::Gt => (other, candidate, false, false),
        BinaryOp::GtEq => (other, candidate, true, false),
        BinaryOp::Eq => (other, other, true, false),
        BinaryOp::NotEq => (other, other, true, true),
        op => panic!("filter try_extract: unhandled op type: {op}"),
    };
    // `x OP x` would be indistinguishable from an unbounded side.
    if Bound::is_sentinel(other, &column.name) {
        return None;
    }
    Some(FilterSet::single(
        column.name.clone(),
        Bound::new(min.clone(), max.clone(), inclusive, negated),
    ))
}
