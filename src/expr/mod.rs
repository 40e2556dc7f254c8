//! Closed expression model that filters are decomposed from.
//!
//! Trees are built programmatically (see [`builder`]); nothing in this crate
//! parses query text. The only capability the decomposition needs from a node
//! is [`Expr::as_column`], which recognizes a bare column reference.

pub mod builder;
mod op;
mod value;

use std::{fmt, sync::Arc};

pub use op::{BinaryOp, UnaryOp};
pub use value::ScalarValue;

/// Reference identifying a column used inside expressions.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnRef {
    /// Canonical column name.
    pub name: Arc<str>,
}

impl ColumnRef {
    /// Creates a new column reference from a name.
    #[must_use]
    pub fn new<N>(name: N) -> Self
    where
        N: Into<Arc<str>>,
    {
        Self { name: name.into() }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Binary node: a logical, comparison or arithmetic operator over two children.
#[derive(Clone, Debug, PartialEq)]
pub struct BinaryExpr {
    /// Operator.
    pub op: BinaryOp,
    /// Left operand.
    pub left: Box<Expr>,
    /// Right operand.
    pub right: Box<Expr>,
}

impl BinaryExpr {
    /// Creates a binary node from its parts.
    #[must_use]
    pub fn new(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Self {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

impl fmt::Display for BinaryExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.left, self.op, self.right)
    }
}

/// Expression tree node.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Bare reference to a column.
    Column(ColumnRef),
    /// Literal value.
    Literal(ScalarValue),
    /// Opaque function call, evaluated at scan time.
    Call {
        /// Function name.
        name: Arc<str>,
        /// Call arguments.
        args: Vec<Expr>,
    },
    /// Unary operator applied to a child.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        expr: Box<Expr>,
    },
    /// Binary operator node.
    Binary(BinaryExpr),
}

impl Expr {
    /// Returns the column referenced by this node when it is a bare column reference.
    ///
    /// A column wrapped in arithmetic or a function call is not a column
    /// reference: such operands are opaque runtime values.
    #[must_use]
    pub fn as_column(&self) -> Option<&ColumnRef> {
        match self {
            Expr::Column(column) => Some(column),
            _ => None,
        }
    }

    /// Returns the binary node, if this is one.
    #[must_use]
    pub fn as_binary(&self) -> Option<&BinaryExpr> {
        match self {
            Expr::Binary(binary) => Some(binary),
            _ => None,
        }
    }

    /// Returns the literal payload, if this is a literal.
    #[must_use]
    pub fn as_literal(&self) -> Option<&ScalarValue> {
        match self {
            Expr::Literal(value) => Some(value),
            _ => None,
        }
    }
}

impl From<ColumnRef> for Expr {
    fn from(value: ColumnRef) -> Self {
        Expr::Column(value)
    }
}

impl From<ScalarValue> for Expr {
    fn from(value: ScalarValue) -> Self {
        Expr::Literal(value)
    }
}

impl From<BinaryExpr> for Expr {
    fn from(value: BinaryExpr) -> Self {
        Expr::Binary(value)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Column(column) => write!(f, "{column}"),
            Expr::Literal(value) => write!(f, "{value}"),
            Expr::Call { name, args } => {
                write!(f, "{name}(")?;
                for (idx, arg) in args.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Expr::Unary { op, expr } => write!(f, "{op}{expr}"),
            Expr::Binary(binary) => write!(f, "{binary}"),
        }
    }
}
