//! Outbound inference payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a raw engine score becomes the reported prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionPolicy {
    /// Collapse non-integral scores to the nearest integer label.
    #[default]
    Round,
    /// Report the engine value as-is.
    Raw,
}

/// The scalar result of one inference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Prediction {
    Label(i64),
    Score(f64),
}

impl Prediction {
    /// Apply `policy` to a raw engine value.
    ///
    /// Integral values always become labels. Rounding goes half away from
    /// zero. Values beyond the `i64` range stay scores.
    pub fn from_engine_value(value: f64, policy: PredictionPolicy) -> Self {
        if let Some(label) = exact_i64(value) {
            return Self::Label(label);
        }
        match policy {
            PredictionPolicy::Round => {
                exact_i64(value.round()).map_or(Self::Score(value), Self::Label)
            }
            PredictionPolicy::Raw => Self::Score(value),
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Label(label) => *label as f64,
            Self::Score(score) => *score,
        }
    }
}

/// `value` as an `i64` when it is integral and representable.
///
/// `2^63` itself is out of range, hence the strict upper bound.
pub(crate) fn exact_i64(value: f64) -> Option<i64> {
    (value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64)
        .then_some(value as i64)
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(label) => write!(f, "{label}"),
            Self::Score(score) => write!(f, "{score}"),
        }
    }
}

/// One response per request, success or failure.
///
/// Serializes to `{"status": "success", "prediction": 3, "timestamp": "..."}`
/// or `{"status": "error", "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum InferenceResponse {
    Success {
        prediction: Prediction,
        /// RFC 3339 / ISO 8601 UTC timestamp.
        timestamp: String,
    },
    Error {
        error: String,
    },
}

impl InferenceResponse {
    pub fn success(prediction: Prediction, timestamp: impl Into<String>) -> Self {
        Self::Success {
            prediction,
            timestamp: timestamp.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn prediction(&self) -> Option<Prediction> {
        match self {
            Self::Success { prediction, .. } => Some(*prediction),
            Self::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { error } => Some(error),
            Self::Success { .. } => None,
        }
    }
}
