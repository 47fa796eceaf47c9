use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-request failure while turning a record into a numeric row.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("missing feature '{feature}'. Expected: {}", expected.join(", "))]
    MissingFeature {
        feature: String,
        expected: Vec<String>,
    },

    #[error("non-numeric after encoding: {feature}='{value}'")]
    NonNumericAfterEncoding { feature: String, value: String },

    #[error("non-numeric input: {value} (no preprocessor config loaded)")]
    NonNumericInput { value: String },
}

/// Preprocessing configuration could not be used; the empty config applies.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("preprocessor config warning ({}): {message}", path.display())]
pub struct ConfigLoadWarning {
    pub path: PathBuf,
    pub message: String,
}

/// A categorical value outside the configured vocabulary.
///
/// Reported for diagnostics; the record is still encoded with `code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownCategory {
    pub feature: String,
    pub value: String,
    pub code: i64,
}

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown category: {}='{}' -> {}",
            self.feature, self.value, self.code
        )
    }
}
