//! Common test utilities for integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;

use rangefilter::{BinaryExpr, BinaryOp, Evaluator, Expr, ScalarValue, UnaryOp};
use thiserror::Error;

/// Row of integer columns keyed by name.
pub type Row = BTreeMap<&'static str, i64>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    #[error("unknown column {0}")]
    UnknownColumn(String),
    #[error("unknown function {0}")]
    UnknownFunction(String),
    #[error("type mismatch in {0}")]
    TypeMismatch(String),
}

/// Reference evaluator over integer rows, mirroring what a scan operator runs.
#[derive(Debug, Default)]
pub struct RowEvaluator;

impl RowEvaluator {
    fn int(&self, expr: &Expr, row: &Row) -> Result<i64, EvalError> {
        self.evaluate(expr, row)?
            .as_i64()
            .ok_or_else(|| EvalError::TypeMismatch(expr.to_string()))
    }

    fn boolean(&self, expr: &Expr, row: &Row) -> Result<bool, EvalError> {
        self.evaluate(expr, row)?
            .as_bool()
            .ok_or_else(|| EvalError::TypeMismatch(expr.to_string()))
    }

    fn arithmetic(
        &self,
        node: &BinaryExpr,
        row: &Row,
        apply: fn(i64, i64) -> i64,
    ) -> Result<ScalarValue, EvalError> {
        let left = self.int(&node.left, row)?;
        let right = self.int(&node.right, row)?;
        Ok(ScalarValue::Int64(apply(left, right)))
    }
}

impl Evaluator for RowEvaluator {
    type Row = Row;
    type Error = EvalError;

    fn evaluate(&self, expr: &Expr, row: &Row) -> Result<ScalarValue, EvalError> {
        match expr {
            Expr::Column(column) => row
                .get(&*column.name)
                .map(|value| ScalarValue::Int64(*value))
                .ok_or_else(|| EvalError::UnknownColumn(column.name.to_string())),
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Call { name, args } => match (&**name, args.as_slice()) {
                ("abs", [arg]) => Ok(ScalarValue::Int64(self.int(arg, row)?.wrapping_abs())),
                ("double", [arg]) => Ok(ScalarValue::Int64(self.int(arg, row)?.wrapping_mul(2))),
                _ => Err(EvalError::UnknownFunction(name.to_string())),
            },
            Expr::Unary { op, expr } => match op {
                UnaryOp::Not => Ok(ScalarValue::Boolean(!self.boolean(expr, row)?)),
                UnaryOp::Neg => Ok(ScalarValue::Int64(self.int(expr, row)?.wrapping_neg())),
            },
            Expr::Binary(node) => self.evaluate_binary(node, row),
        }
    }

    fn evaluate_binary(&self, node: &BinaryExpr, row: &Row) -> Result<ScalarValue, EvalError> {
        let value = match node.op {
            BinaryOp::And => ScalarValue::Boolean(
                self.boolean(&node.left, row)? && self.boolean(&node.right, row)?,
            ),
            BinaryOp::Or => ScalarValue::Boolean(
                self.boolean(&node.left, row)? || self.boolean(&node.right, row)?,
            ),
            BinaryOp::Plus => self.arithmetic(node, row, i64::wrapping_add)?,
            BinaryOp::Minus => self.arithmetic(node, row, i64::wrapping_sub)?,
            BinaryOp::Multiply => self.arithmetic(node, row, i64::wrapping_mul)?,
            BinaryOp::Divide => {
                self.arithmetic(node, row, |lhs, rhs| lhs.checked_div(rhs).unwrap_or(0))?
            }
            op => {
                let left = self.evaluate(&node.left, row)?;
                let right = self.evaluate(&node.right, row)?;
                let ordering = left
                    .compare(&right)
                    .ok_or_else(|| EvalError::TypeMismatch(node.to_string()))?;
                let result = match op {
                    BinaryOp::Eq => ordering.is_eq(),
                    BinaryOp::NotEq => ordering.is_ne(),
                    BinaryOp::Lt => ordering.is_lt(),
                    BinaryOp::LtEq => ordering.is_le(),
                    BinaryOp::Gt => ordering.is_gt(),
                    BinaryOp::GtEq => ordering.is_ge(),
                    _ => unreachable!("logical and arithmetic operators handled above"),
                };
                ScalarValue::Boolean(result)
            }
        };
        Ok(value)
    }
}

/// Builds a row from `(column, value)` pairs.
pub fn row(values: &[(&'static str, i64)]) -> Row {
    values.iter().copied().collect()
}

/// Row whose columns may hold NULL or non-integer values.
pub type NullableRow = BTreeMap<&'static str, ScalarValue>;

/// Evaluator with SQL three-valued logic: comparisons involving NULL or
/// mismatched types yield NULL, and `AND`/`OR`/`NOT` propagate it.
#[derive(Debug, Default)]
pub struct TernaryEvaluator;

impl TernaryEvaluator {
    fn int(&self, expr: &Expr, row: &NullableRow) -> Result<Option<i64>, EvalError> {
        Ok(self.evaluate(expr, row)?.as_i64())
    }

    fn boolean(&self, expr: &Expr, row: &NullableRow) -> Result<Option<bool>, EvalError> {
        Ok(self.evaluate(expr, row)?.as_bool())
    }

    fn arithmetic(
        &self,
        node: &BinaryExpr,
        row: &NullableRow,
        apply: fn(i64, i64) -> i64,
    ) -> Result<ScalarValue, EvalError> {
        let left = self.int(&node.left, row)?;
        let right = self.int(&node.right, row)?;
        Ok(match (left, right) {
            (Some(left), Some(right)) => ScalarValue::Int64(apply(left, right)),
            _ => ScalarValue::Null,
        })
    }
}

fn nullable(value: Option<bool>) -> ScalarValue {
    value.map_or(ScalarValue::Null, ScalarValue::Boolean)
}

impl Evaluator for TernaryEvaluator {
    type Row = NullableRow;
    type Error = EvalError;

    fn evaluate(&self, expr: &Expr, row: &NullableRow) -> Result<ScalarValue, EvalError> {
        match expr {
            Expr::Column(column) => row
                .get(&*column.name)
                .cloned()
                .ok_or_else(|| EvalError::UnknownColumn(column.name.to_string())),
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Call { name, args } => {
                let apply: fn(i64) -> i64 = match (&**name, args.len()) {
                    ("abs", 1) => i64::wrapping_abs,
                    ("double", 1) => |value: i64| value.wrapping_mul(2),
                    _ => return Err(EvalError::UnknownFunction(name.to_string())),
                };
                let value = self.int(&args[0], row)?;
                Ok(value.map_or(ScalarValue::Null, |value| ScalarValue::Int64(apply(value))))
            }
            Expr::Unary { op, expr } => Ok(match op {
                UnaryOp::Not => nullable(self.boolean(expr, row)?.map(|value| !value)),
                UnaryOp::Neg => self
                    .int(expr, row)?
                    .map_or(ScalarValue::Null, |value| ScalarValue::Int64(value.wrapping_neg())),
            }),
            Expr::Binary(node) => self.evaluate_binary(node, row),
        }
    }

    fn evaluate_binary(
        &self,
        node: &BinaryExpr,
        row: &NullableRow,
    ) -> Result<ScalarValue, EvalError> {
        let value = match node.op {
            BinaryOp::And => {
                match (self.boolean(&node.left, row)?, self.boolean(&node.right, row)?) {
                    (Some(false), _) | (_, Some(false)) => ScalarValue::Boolean(false),
                    (Some(true), Some(true)) => ScalarValue::Boolean(true),
                    _ => ScalarValue::Null,
                }
            }
            BinaryOp::Or => {
                match (self.boolean(&node.left, row)?, self.boolean(&node.right, row)?) {
                    (Some(true), _) | (_, Some(true)) => ScalarValue::Boolean(true),
                    (Some(false), Some(false)) => ScalarValue::Boolean(false),
                    _ => ScalarValue::Null,
                }
            }
            BinaryOp::Plus => self.arithmetic(node, row, i64::wrapping_add)?,
            BinaryOp::Minus => self.arithmetic(node, row, i64::wrapping_sub)?,
            BinaryOp::Multiply => self.arithmetic(node, row, i64::wrapping_mul)?,
            BinaryOp::Divide => {
                self.arithmetic(node, row, |lhs, rhs| lhs.checked_div(rhs).unwrap_or(0))?
            }
            op => {
                let left = self.evaluate(&node.left, row)?;
                let right = self.evaluate(&node.right, row)?;
                nullable(left.compare(&right).map(|ordering| match op {
                    BinaryOp::Eq => ordering.is_eq(),
                    BinaryOp::NotEq => ordering.is_ne(),
                    BinaryOp::Lt => ordering.is_lt(),
                    BinaryOp::LtEq => ordering.is_le(),
                    BinaryOp::Gt => ordering.is_gt(),
                    BinaryOp::GtEq => ordering.is_ge(),
                    _ => unreachable!("logical and arithmetic operators handled above"),
                }))
            }
        };
        Ok(value)
    }
}
