//! Values
//!
//! Typed scalar values held by records, either a discrete category or a number.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// An immutable scalar cell of a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    /// A named category.
    Discrete(String),
    /// A point in an ordered, continuous domain.
    Numeric(f64),
}

impl Value {
    pub fn discrete(v: impl Into<String>) -> Self {
        Value::Discrete(v.into())
    }

    pub fn numeric(v: f64) -> Self {
        Value::Numeric(v)
    }

    /// Parse the value as a number, if possible.
    ///
    /// A discrete value parses when its trimmed text is a finite `f64`;
    /// labels such as `inf` or `nan` stay categories.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Numeric(v) => Some(*v),
            Value::Discrete(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Numeric(_))
    }

    // -0.0 and 0.0 compare equal, so they must hash alike.
    fn canonical_bits(v: f64) -> u64 {
        if v == 0.0 {
            0.0_f64.to_bits()
        } else {
            v.to_bits()
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Discrete(a), Value::Discrete(b)) => a == b,
            (Value::Numeric(a), Value::Numeric(b)) => Value::canonical_bits(*a) == Value::canonical_bits(*b),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Discrete(s) => {
                0_u8.hash(state);
                s.hash(state);
            }
            Value::Numeric(v) => {
                1_u8.hash(state);
                Value::canonical_bits(*v).hash(state);
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Discrete(s) => write!(f, "{}", s),
            Value::Numeric(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Discrete(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Discrete(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Numeric(v)
    }
}
