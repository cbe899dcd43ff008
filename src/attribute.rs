//! Attributes
//!
//! Column descriptors and the ordered attribute list that owns them.
use crate::errors::TreeError;
use crate::value::Value;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Distinct values in first-seen order, with a hashed index for membership.
///
/// Serialized as the plain list; the index is rebuilt on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Value>", into = "Vec<Value>")]
pub struct ObservedValues {
    ordered: Vec<Value>,
    index: HashSet<Value>,
}

impl ObservedValues {
    /// Returns `true` if the value was not seen before.
    pub fn insert(&mut self, value: &Value) -> bool {
        if self.index.contains(value) {
            return false;
        }
        self.index.insert(value.clone());
        self.ordered.push(value.clone());
        true
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.ordered
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn clear(&mut self) {
        self.ordered.clear();
        self.index.clear();
    }
}

impl From<Vec<Value>> for ObservedValues {
    fn from(values: Vec<Value>) -> Self {
        let mut observed = ObservedValues::default();
        for v in &values {
            observed.insert(v);
        }
        observed
    }
}

impl From<ObservedValues> for Vec<Value> {
    fn from(observed: ObservedValues) -> Self {
        observed.ordered
    }
}

/// The domain of an attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AttributeKind {
    /// A categorical attribute, with the values observed for it so far,
    /// in first-seen order.
    Discrete { values: ObservedValues },
    /// An ordered, continuous attribute.
    Numeric,
}

/// A column descriptor.
///
/// Attributes are identified by name, so the same logical column compares
/// equal across parent and child attribute lists even when the observed
/// value sets differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub kind: AttributeKind,
}

impl Attribute {
    /// A discrete attribute with no observed values yet.
    pub fn discrete(name: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            kind: AttributeKind::Discrete {
                values: ObservedValues::default(),
            },
        }
    }

    /// A discrete attribute with a known set of values.
    pub fn discrete_with_values<V: Into<Value>>(name: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        let mut attr = Attribute::discrete(name);
        for v in values {
            attr.observe(&v.into());
        }
        attr
    }

    pub fn numeric(name: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            kind: AttributeKind::Numeric,
        }
    }

    pub fn is_discrete(&self) -> bool {
        matches!(self.kind, AttributeKind::Discrete { .. })
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, AttributeKind::Numeric)
    }

    /// Observed values of a discrete attribute; empty for numeric ones.
    pub fn values(&self) -> &[Value] {
        match &self.kind {
            AttributeKind::Discrete { values } => values.as_slice(),
            AttributeKind::Numeric => &[],
        }
    }

    /// Register a value as observed for this attribute.
    pub fn observe(&mut self, value: &Value) {
        if let AttributeKind::Discrete { values } = &mut self.kind {
            values.insert(value);
        }
    }

    /// True when this is a discrete attribute with at least one observed
    /// value and every observed value parses as a number.
    pub fn has_only_numbers(&self) -> bool {
        match &self.kind {
            AttributeKind::Discrete { values } => {
                !values.is_empty() && values.as_slice().iter().all(|v| v.as_number().is_some())
            },
            AttributeKind::Numeric => false,
        }
    }

    /// Forget every observed value, keeping the attribute's kind.
    pub fn clear_values(&mut self) {
        if let AttributeKind::Discrete { values } = &mut self.kind {
            values.clear();
        }
    }

    /// The numeric counterpart of this attribute, keeping its name.
    pub fn to_numeric(&self) -> Attribute {
        Attribute::numeric(self.name.clone())
    }
}

impl PartialEq for Attribute {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Attribute {}

impl Hash for Attribute {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Ordered feature attributes plus the designated class attribute.
///
/// The class attribute is kept apart from the features: it is never a split
/// candidate and is never removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attributelist {
    features: Vec<Attribute>,
    class: Attribute,
}

impl Attributelist {
    pub fn new(features: Vec<Attribute>, class: Attribute) -> Self {
        Attributelist { features, class }
    }

    pub fn features(&self) -> &[Attribute] {
        &self.features
    }

    pub fn class(&self) -> &Attribute {
        &self.class
    }

    /// Number of feature attributes, excluding the class.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True when no feature attributes remain.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.features.iter()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.features.iter().position(|a| a.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.features.iter().find(|a| a.name == name)
    }

    pub(crate) fn get_mut(&mut self, idx: usize) -> Option<&mut Attribute> {
        self.features.get_mut(idx)
    }

    pub(crate) fn class_mut(&mut self) -> &mut Attribute {
        &mut self.class
    }

    /// Remove a feature attribute by name, returning its former position.
    pub fn remove(&mut self, name: &str) -> Result<usize, TreeError> {
        let idx = self
            .position(name)
            .ok_or_else(|| TreeError::UnknownAttribute(name.to_string()))?;
        self.features.remove(idx);
        Ok(idx)
    }

    pub(crate) fn remove_at(&mut self, idx: usize) -> Attribute {
        self.features.remove(idx)
    }

    /// Clear the observed values of every attribute, class included.
    pub(crate) fn clear_values(&mut self) {
        self.features.iter_mut().for_each(Attribute::clear_values);
        self.class.clear_values();
    }

    /// Replace the feature attribute at `idx`.
    pub(crate) fn replace(&mut self, idx: usize, attr: Attribute) {
        self.features[idx] = attr;
    }
}
