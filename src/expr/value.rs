use std::{cmp::Ordering, fmt};

/// Literal values carried by expression leaves.
#[derive(Clone, Debug, PartialEq)]
pub enum ScalarValue {
    /// Represents SQL `NULL`.
    Null,
    /// Boolean literal.
    Boolean(bool),
    /// Signed 64-bit integer.
    Int64(i64),
    /// 64-bit floating point.
    Float64(f64),
    /// UTF-8 string.
    Utf8(String),
    /// Binary blob.
    Binary(Vec<u8>),
}

impl ScalarValue {
    /// Represents SQL `NULL`.
    #[must_use]
    pub fn null() -> Self {
        ScalarValue::Null
    }

    /// Returns true when the literal is the `Null` variant.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }

    /// Returns the boolean payload, if any.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ScalarValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the integer payload, if any.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ScalarValue::Int64(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the floating point payload, widening integers.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScalarValue::Float64(value) => Some(*value),
            ScalarValue::Int64(value) => Some(*value as f64),
            _ => None,
        }
    }

    /// Returns the string payload, if any.
    #[must_use]
    pub fn as_utf8(&self) -> Option<&str> {
        match self {
            ScalarValue::Utf8(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Returns the binary payload, if any.
    #[must_use]
    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            ScalarValue::Binary(value) => Some(value.as_slice()),
            _ => None,
        }
    }

    /// Compares this scalar with another, returning the ordering when both sides are comparable.
    ///
    /// `NULL` is never comparable. Integers and floats compare numerically.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        use ScalarValue::*;
        match (self, other) {
            (Null, _) | (_, Null) => None,
            (Boolean(lhs), Boolean(rhs)) => Some(lhs.cmp(rhs)),
            (Int64(lhs), Int64(rhs)) => Some(lhs.cmp(rhs)),
            (Float64(lhs), Float64(rhs)) => lhs.partial_cmp(rhs),
            (Int64(lhs), Float64(rhs)) => (*lhs as f64).partial_cmp(rhs),
            (Float64(lhs), Int64(rhs)) => lhs.partial_cmp(&(*rhs as f64)),
            (Utf8(lhs), Utf8(rhs)) => Some(lhs.cmp(rhs)),
            (Binary(lhs), Binary(rhs)) => Some(lhs.cmp(rhs)),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Null => f.write_str("NULL"),
            ScalarValue::Boolean(value) => write!(f, "{value}"),
            ScalarValue::Int64(value) => write!(f, "{value}"),
            ScalarValue::Float64(value) => write!(f, "{value}"),
            ScalarValue::Utf8(value) => write!(f, "'{value}'"),
            ScalarValue::Binary(value) => {
                f.write_str("x'")?;
                for byte in value {
                    write!(f, "{byte:02x}")?;
                }
                f.write_str("'")
            }
        }
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Boolean(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int64(value)
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        ScalarValue::Int64(i64::from(value))
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Float64(value)
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::Utf8(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Utf8(value.to_owned())
    }
}

impl From<Vec<u8>> for ScalarValue {
    fn from(value: Vec<u8>) -> Self {
        ScalarValue::Binary(value)
    }
}

impl From<&[u8]> for ScalarValue {
    fn from(value: &[u8]) -> Self {
        ScalarValue::Binary(value.to_vec())
    }
}
