use std::fmt;

/// Operator carried by a binary expression node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// Logical conjunction (`AND`).
    And,
    /// Logical disjunction (`OR`).
    Or,
    /// Equals (`==`).
    Eq,
    /// Not equals (`!=`).
    NotEq,
    /// Less than (`<`).
    Lt,
    /// Less than or equal to (`<=`).
    LtEq,
    /// Greater than (`>`).
    Gt,
    /// Greater than or equal to (`>=`).
    GtEq,
    /// Addition (`+`).
    Plus,
    /// Subtraction (`-`).
    Minus,
    /// Multiplication (`*`).
    Multiply,
    /// Division (`/`).
    Divide,
}

impl BinaryOp {
    /// Returns a textual representation of the operator.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
        }
    }

    /// True for `AND` and `OR`.
    #[must_use]
    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    /// True for the six comparison operators.
    #[must_use]
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::NotEq
                | BinaryOp::Lt
                | BinaryOp::LtEq
                | BinaryOp::Gt
                | BinaryOp::GtEq
        )
    }

    /// Returns the operator that swaps the left/right side of the expression.
    ///
    /// # Panics
    ///
    /// Panics for arithmetic operators: only comparison and logical nodes may
    /// reach the filter level of a tree.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            BinaryOp::Lt => BinaryOp::Gt,
            BinaryOp::LtEq => BinaryOp::GtEq,
            BinaryOp::Gt => BinaryOp::Lt,
            BinaryOp::GtEq => BinaryOp::LtEq,
            BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::And | BinaryOp::Or => self,
            BinaryOp::Plus | BinaryOp::Minus | BinaryOp::Multiply | BinaryOp::Divide => {
                panic!("BinaryOp::flipped: unknown op type: {self}")
            }
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator carried by a unary expression node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Logical negation (`NOT`).
    Not,
    /// Arithmetic negation (`-`).
    Neg,
}

impl UnaryOp {
    /// Returns a textual representation of the operator.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Not => "NOT ",
            UnaryOp::Neg => "-",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flipped_mirrors_ordering_operators() {
        assert_eq!(BinaryOp::Lt.flipped(), BinaryOp::Gt);
        assert_eq!(BinaryOp::Gt.flipped(), BinaryOp::Lt);
        assert_eq!(BinaryOp::LtEq.flipped(), BinaryOp::GtEq);
        assert_eq!(BinaryOp::GtEq.flipped(), BinaryOp::LtEq);
    }

    #[test]
    fn flipped_keeps_symmetric_operators() {
        for op in [BinaryOp::Eq, BinaryOp::NotEq, BinaryOp::And, BinaryOp::Or] {
            assert_eq!(op.flipped(), op);
            assert_eq!(op.flipped().flipped(), op);
        }
    }

    #[test]
    #[should_panic(expected = "BinaryOp::flipped: unknown op type: +")]
    fn flipped_rejects_arithmetic() {
        let _ = BinaryOp::Plus.flipped();
    }

    #[test]
    fn classification() {
        assert!(BinaryOp::And.is_logical());
        assert!(!BinaryOp::And.is_comparison());
        assert!(BinaryOp::GtEq.is_comparison());
        assert!(!BinaryOp::Divide.is_comparison());
        assert!(!BinaryOp::Divide.is_logical());
    }
}
