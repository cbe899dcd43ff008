//! Records
//!
//! A single labeled tuple of a dataset.
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Feature values aligned with an attribute list, plus the class value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    values: Vec<Value>,
    class_value: Value,
}

impl Record {
    pub fn new(values: Vec<Value>, class_value: Value) -> Self {
        Record { values, class_value }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn class_value(&self) -> &Value {
        &self.class_value
    }

    pub fn value_at(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    /// Number of values held, counting the class value.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.values.len() + 1
    }

    /// Drop the feature value at `idx`, as done when its attribute is used up by a split.
    pub fn remove_value(&mut self, idx: usize) -> Option<Value> {
        (idx < self.values.len()).then(|| self.values.remove(idx))
    }

    pub(crate) fn value_at_mut(&mut self, idx: usize) -> Option<&mut Value> {
        self.values.get_mut(idx)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for v in &self.values {
            write!(f, "{},", v)?;
        }
        write!(f, "{}", self.class_value)
    }
}
