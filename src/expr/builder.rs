//! Builders for composing expression trees.

use std::sync::Arc;

use super::{BinaryExpr, BinaryOp, ColumnRef, Expr, ScalarValue, UnaryOp};

/// Bare column reference.
#[must_use]
pub fn col<N>(name: N) -> Expr
where
    N: Into<Arc<str>>,
{
    Expr::Column(ColumnRef::new(name))
}

/// Literal value.
#[must_use]
pub fn lit<V>(value: V) -> Expr
where
    V: Into<ScalarValue>,
{
    Expr::Literal(value.into())
}

/// Opaque function call.
#[must_use]
pub fn call<N>(name: N, args: Vec<Expr>) -> Expr
where
    N: Into<Arc<str>>,
{
    Expr::Call {
        name: name.into(),
        args,
    }
}

impl Expr {
    /// Combines `self` and `rhs` under a binary operator.
    #[must_use]
    pub fn binary<R>(self, op: BinaryOp, rhs: R) -> Expr
    where
        R: Into<Expr>,
    {
        Expr::Binary(BinaryExpr::new(self, op, rhs.into()))
    }

    /// `self AND rhs`.
    #[must_use]
    pub fn and<R: Into<Expr>>(self, rhs: R) -> Expr {
        self.binary(BinaryOp::And, rhs)
    }

    /// `self OR rhs`.
    #[must_use]
    pub fn or<R: Into<Expr>>(self, rhs: R) -> Expr {
        self.binary(BinaryOp::Or, rhs)
    }

    /// `self == rhs`.
    #[must_use]
    pub fn equals<R: Into<Expr>>(self, rhs: R) -> Expr {
        self.binary(BinaryOp::Eq, rhs)
    }

    /// `self != rhs`.
    #[must_use]
    pub fn not_equals<R: Into<Expr>>(self, rhs: R) -> Expr {
        self.binary(BinaryOp::NotEq, rhs)
    }

    /// `self < rhs`.
    #[must_use]
    pub fn less_than<R: Into<Expr>>(self, rhs: R) -> Expr {
        self.binary(BinaryOp::Lt, rhs)
    }

    /// `self <= rhs`.
    #[must_use]
    pub fn less_than_or_equal<R: Into<Expr>>(self, rhs: R) -> Expr {
        self.binary(BinaryOp::LtEq, rhs)
    }

    /// `self > rhs`.
    #[must_use]
    pub fn greater_than<R: Into<Expr>>(self, rhs: R) -> Expr {
        self.binary(BinaryOp::Gt, rhs)
    }

    /// `self >= rhs`.
    #[must_use]
    pub fn greater_than_or_equal<R: Into<Expr>>(self, rhs: R) -> Expr {
        self.binary(BinaryOp::GtEq, rhs)
    }

    /// `self + rhs`.
    #[must_use]
    pub fn plus<R: Into<Expr>>(self, rhs: R) -> Expr {
        self.binary(BinaryOp::Plus, rhs)
    }

    /// `self - rhs`.
    #[must_use]
    pub fn minus<R: Into<Expr>>(self, rhs: R) -> Expr {
        self.binary(BinaryOp::Minus, rhs)
    }

    /// `self * rhs`.
    #[must_use]
    pub fn multiply<R: Into<Expr>>(self, rhs: R) -> Expr {
        self.binary(BinaryOp::Multiply, rhs)
    }

    /// `self / rhs`.
    #[must_use]
    pub fn divide<R: Into<Expr>>(self, rhs: R) -> Expr {
        self.binary(BinaryOp::Divide, rhs)
    }

    /// `NOT self`.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Expr {
        Expr::Unary {
            op: UnaryOp::Not,
            expr: Box::new(self),
        }
    }

    /// `-self`.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn neg(self) -> Expr {
        Expr::Unary {
            op: UnaryOp::Neg,
            expr: Box::new(self),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BuilderCombine {
    Leaf,
    Conjunction,
    Disjunction,
}

/// Builder collecting filter clauses and folding them into one tree.
///
/// Clauses are folded left-associatively: `a, b, c` under [`ExprBuilder::and`]
/// becomes `((a AND b) AND c)`.
#[derive(Debug)]
pub struct ExprBuilder {
    combine: BuilderCombine,
    clauses: Vec<Expr>,
}

impl ExprBuilder {
    const fn new(combine: BuilderCombine) -> Self {
        Self {
            combine,
            clauses: Vec::new(),
        }
    }

    /// Creates a builder that expects a single clause.
    #[must_use]
    pub fn leaf() -> Self {
        Self::new(BuilderCombine::Leaf)
    }

    /// Creates a builder that emits an `AND` of all clauses.
    #[must_use]
    pub fn and() -> Self {
        Self::new(BuilderCombine::Conjunction)
    }

    /// Creates a builder that emits an `OR` of all clauses.
    #[must_use]
    pub fn or() -> Self {
        Self::new(BuilderCombine::Disjunction)
    }

    /// Adds an existing expression to the builder.
    #[must_use]
    pub fn expr(mut self, expr: Expr) -> Self {
        self.clauses.push(expr);
        self
    }

    /// Adds a comparison clause.
    #[must_use]
    pub fn compare<L, R>(mut self, left: L, op: BinaryOp, right: R) -> Self
    where
        L: Into<Expr>,
        R: Into<Expr>,
    {
        self.clauses.push(left.into().binary(op, right));
        self
    }

    /// Adds an equality clause.
    #[must_use]
    pub fn equals<L: Into<Expr>, R: Into<Expr>>(self, left: L, right: R) -> Self {
        self.compare(left, BinaryOp::Eq, right)
    }

    /// Adds an inequality clause.
    #[must_use]
    pub fn not_equals<L: Into<Expr>, R: Into<Expr>>(self, left: L, right: R) -> Self {
        self.compare(left, BinaryOp::NotEq, right)
    }

    /// Adds a `<` clause.
    #[must_use]
    pub fn less_than<L: Into<Expr>, R: Into<Expr>>(self, left: L, right: R) -> Self {
        self.compare(left, BinaryOp::Lt, right)
    }

    /// Adds a `<=` clause.
    #[must_use]
    pub fn less_than_or_equal<L: Into<Expr>, R: Into<Expr>>(self, left: L, right: R) -> Self {
        self.compare(left, BinaryOp::LtEq, right)
    }

    /// Adds a `>` clause.
    #[must_use]
    pub fn greater_than<L: Into<Expr>, R: Into<Expr>>(self, left: L, right: R) -> Self {
        self.compare(left, BinaryOp::Gt, right)
    }

    /// Adds a `>=` clause.
    #[must_use]
    pub fn greater_than_or_equal<L: Into<Expr>, R: Into<Expr>>(
        self,
        left: L,
        right: R,
    ) -> Self {
        self.compare(left, BinaryOp::GtEq, right)
    }

    fn branch<F>(mut self, combine: BuilderCombine, build: F) -> Self
    where
        F: FnOnce(ExprBuilder) -> ExprBuilder,
    {
        let expr = build(ExprBuilder::new(combine)).build();
        self.clauses.push(expr);
        self
    }

    /// Adds a nested conjunction built by the supplied closure.
    #[must_use]
    pub fn and_group<F>(self, build: F) -> Self
    where
        F: FnOnce(ExprBuilder) -> ExprBuilder,
    {
        self.branch(BuilderCombine::Conjunction, build)
    }

    /// Adds a nested disjunction built by the supplied closure.
    #[must_use]
    pub fn or_group<F>(self, build: F) -> Self
    where
        F: FnOnce(ExprBuilder) -> ExprBuilder,
    {
        self.branch(BuilderCombine::Disjunction, build)
    }

    /// Consumes the builder and returns the composed expression.
    ///
    /// # Panics
    ///
    /// Panics when no clause was added, or when a leaf builder holds more
    /// than one clause.
    #[must_use]
    pub fn build(self) -> Expr {
        let mut clauses = self.clauses.into_iter();
        let Some(first) = clauses.next() else {
            panic!("ExprBuilder requires at least one clause");
        };
        let op = match self.combine {
            BuilderCombine::Leaf => {
                assert!(
                    clauses.as_slice().is_empty(),
                    "ExprBuilder::leaf must contain exactly one clause"
                );
                BinaryOp::And
            }
            BuilderCombine::Conjunction => BinaryOp::And,
            BuilderCombine::Disjunction => BinaryOp::Or,
        };
        clauses.fold(first, |acc, clause| acc.binary(op, clause))
    }
}

impl Default for ExprBuilder {
    fn default() -> Self {
        Self::leaf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conjunction_folds_left() {
        let built = ExprBuilder::and()
            .greater_than(col("a"), lit(1))
            .less_than(col("a"), lit(5))
            .equals(col("b"), lit(2))
            .build();
        let expected = col("a")
            .greater_than(lit(1))
            .and(col("a").less_than(lit(5)))
            .and(col("b").equals(lit(2)));
        assert_eq!(built, expected);
    }

    #[test]
    fn inclusive_clauses_use_inclusive_operators() {
        let built = ExprBuilder::or()
            .less_than_or_equal(col("a"), lit(1))
            .greater_than_or_equal(col("a"), lit(9))
            .build();
        let expected = col("a")
            .less_than_or_equal(lit(1))
            .or(col("a").greater_than_or_equal(lit(9)));
        assert_eq!(built, expected);
        assert_eq!(built.to_string(), "((a <= 1) OR (a >= 9))");
    }

    #[test]
    fn groups_nest_under_parent() {
        let built = ExprBuilder::and()
            .not_equals(col("a"), lit(0))
            .or_group(|b| b.equals(col("b"), lit(1)).equals(col("b"), lit(2)))
            .build();
        let expected = col("a").not_equals(lit(0)).and(
            col("b")
                .equals(lit(1))
                .or(col("b").equals(lit(2))),
        );
        assert_eq!(built, expected);
    }

    #[test]
    fn single_clause_is_returned_unchanged() {
        let clause = col("a").less_than_or_equal(lit(3));
        assert_eq!(ExprBuilder::or().expr(clause.clone()).build(), clause);
        assert_eq!(ExprBuilder::default().expr(clause.clone()).build(), clause);
        let grouped = ExprBuilder::leaf()
            .and_group(|b| b.expr(clause.clone()))
            .build();
        assert_eq!(grouped, clause);
    }

    #[test]
    #[should_panic(expected = "ExprBuilder requires at least one clause")]
    fn and_builder_requires_clause() {
        let _ = ExprBuilder::and().build();
    }

    #[test]
    #[should_panic(expected = "ExprBuilder requires at least one clause")]
    fn or_builder_requires_clause() {
        let _ = ExprBuilder::or().build();
    }

    #[test]
    #[should_panic(expected = "ExprBuilder::leaf must contain exactly one clause")]
    fn leaf_builder_rejects_multiple_clauses() {
        let _ = ExprBuilder::leaf()
            .equals(col("a"), lit(1))
            .equals(col("a"), lit(2))
            .build();
    }
}
