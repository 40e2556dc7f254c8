use thiserror::Error;

use crate::expr::{BinaryOp, Expr};

/// Reasons a tree is rejected before decomposition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidateError {
    /// A leaf, call or unary node where a logical or comparison node is required.
    #[error("Unexpected node at filter level: {expr}")]
    UnexpectedNode {
        /// Rendered offending node.
        expr: String,
    },
    /// An arithmetic operator where a logical or comparison node is required.
    #[error("Operator {op} does not produce a boolean at filter level")]
    NonBooleanOperator {
        /// Offending operator.
        op: BinaryOp,
    },
    /// The tree is deeper than the configured limit.
    #[error("Filter exceeds the maximum depth of {limit}")]
    DepthExceeded {
        /// Configured limit.
        limit: usize,
    },
}

/// Checks that `expr` only holds logical nodes over comparison nodes at filter
/// level, and optionally that it is no deeper than `max_depth`.
///
/// A tree accepted here never trips the invariant checks of
/// [`decompose`](super::decompose()). Comparison operands are not inspected
/// beyond their depth: any expression is a valid runtime value. The walk stops
/// as soon as it passes `max_depth`, so nothing below the limit is visited.
pub fn validate(expr: &Expr, max_depth: Option<usize>) -> Result<(), ValidateError> {
    check_filter(expr, 1, max_depth)
}

fn check_level(level: usize, max_depth: Option<usize>) -> Result<(), ValidateError> {
    match max_depth {
        Some(limit) if level > limit => Err(ValidateError::DepthExceeded { limit }),
        _ => Ok(()),
    }
}

fn check_filter(expr: &Expr, level: usize, max_depth: Option<usize>) -> Result<(), ValidateError> {
    check_level(level, max_depth)?;
    match expr {
        Expr::Binary(node) if node.op.is_logical() => {
            check_filter(&node.left, level + 1, max_depth)?;
            check_filter(&node.right, level + 1, max_depth)
        }
        Expr::Binary(node) if node.op.is_comparison() => {
            check_operand(&node.left, level + 1, max_depth)?;
            check_operand(&node.right, level + 1, max_depth)
        }
        Expr::Binary(node) => Err(ValidateError::NonBooleanOperator { op: node.op }),
        other => Err(ValidateError::UnexpectedNode {
            expr: other.to_string(),
        }),
    }
}

fn check_operand(expr: &Expr, level: usize, max_depth: Option<usize>) -> Result<(), ValidateError> {
    if max_depth.is_none() {
        return Ok(());
    }
    check_level(level, max_depth)?;
    match expr {
        Expr::Column(_) | Expr::Literal(_) => Ok(()),
        Expr::Call { args, .. } => args
            .iter()
            .try_for_each(|arg| check_operand(arg, level + 1, max_depth)),
        Expr::Unary { expr, .. } => check_operand(expr, level + 1, max_depth),
        Expr::Binary(node) => {
            check_operand(&node.left, level + 1, max_depth)?;
            check_operand(&node.right, level + 1, max_depth)
        }
    }
}
