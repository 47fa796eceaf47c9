//! Structural whitespace normalization of configuration documents.
//!
//! Hand-edited or exported configuration files routinely carry stray spaces
//! in feature names and category labels (`" age"`, `"red "`). Every string
//! in the tree, keys included, is trimmed before the document is
//! interpreted so that lookups against incoming records line up.

use serde_json::{Map, Value};

/// Name lists that are re-materialized as plain string sequences.
pub const NAME_LIST_FIELDS: [&str; 3] = ["feature_order", "categorical_features", "numeric_features"];

/// Trim every string in the document, recursively.
///
/// Mapping keys are trimmed and their values normalized; sequence elements
/// are normalized in place; string leaves are trimmed; other leaves pass
/// through unchanged. When two keys collapse to the same trimmed key, the
/// later value wins at the earlier key's position.
///
/// The function is idempotent.
pub fn normalize_document(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (trim_owned(key), normalize_document(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_document).collect()),
        Value::String(text) => Value::String(trim_owned(text)),
        leaf => leaf,
    }
}

/// Rewrite the name-list fields of a document root as trimmed string lists.
///
/// Absent or non-sequence fields become empty lists. Numeric and boolean
/// elements are kept in their textual form; nulls and nested structures
/// carry no name and are dropped.
pub fn materialize_name_lists(root: &mut Map<String, Value>) {
    for field in NAME_LIST_FIELDS {
        let names = match root.get(field) {
            Some(Value::Array(items)) => items.iter().filter_map(name_of).collect(),
            _ => Vec::new(),
        };
        root.insert(
            field.to_string(),
            Value::Array(names.into_iter().map(Value::String).collect()),
        );
    }
}

fn name_of(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn trim_owned(text: String) -> String {
    let trimmed = text.trim();
    if trimmed.len() == text.len() {
        text
    } else {
        trimmed.to_string()
    }
}
