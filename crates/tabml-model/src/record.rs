//! Incoming feature records.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ordered::OrderedMap;

/// A raw feature value as received from the host.
///
/// Integer codes produced by categorical encoding are kept as `Integer` so
/// that they survive unchanged into the tensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Integer(i64),
    Number(f64),
    Text(String),
    /// Booleans, nulls and nested structures. Never numeric.
    Other(Value),
}

impl FeatureValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
            Self::Other(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for FeatureValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

/// One inference request: feature name to raw value, in arrival order.
pub type Record = OrderedMap<FeatureValue>;

/// Build a record from `(name, value)` pairs.
pub fn record_from<I, K, V>(fields: I) -> Record
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<FeatureValue>,
{
    fields
        .into_iter()
        .map(|(name, value)| (name, value.into()))
        .collect()
}
