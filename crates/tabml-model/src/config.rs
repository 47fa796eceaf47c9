//! Preprocessing configuration for a tabular model.
//!
//! A `PreprocessorConfig` describes how a raw record becomes a numeric row:
//!
//! - `feature_order` fixes the tensor columns and their order
//! - `categorical_encoders` maps raw category strings to integer codes
//! - `scaler` optionally standardizes the finished row
//!
//! `categorical_features` and `numeric_features` are carried for reporting
//! only; nothing else depends on them.
//!
//! ## Example document
//!
//! ```text
//! {
//!   "feature_order": ["age", "color"],
//!   "categorical_encoders": {
//!     "color": { "mapping": { "red": 0, "blue": 1, "__UNKNOWN__": 9 } }
//!   },
//!   "scaler": { "type": "standard", "mean": [40.0, 0.5], "scale": [12.0, 0.5] }
//! }
//! ```

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::ordered::OrderedMap;
use crate::response::exact_i64;

/// Reserved vocabulary key holding the code for unrecognized categories.
pub const UNKNOWN_CATEGORY_KEY: &str = "__UNKNOWN__";

/// Substituted for categorical values that are empty after trimming.
pub const MISSING_CATEGORY: &str = "MISSING";

/// Canonical, whitespace-normalized preprocessing configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessorConfig {
    /// Tensor column order. Empty means "use the record's own order".
    pub feature_order: Vec<String>,
    pub categorical_features: Vec<String>,
    pub numeric_features: Vec<String>,
    /// Per-feature category vocabularies.
    pub categorical_encoders: OrderedMap<EncoderSpec>,
    pub scaler: Option<ScalerSpec>,
}

impl PreprocessorConfig {
    /// The configuration used when no document could be loaded.
    ///
    /// Every value is treated as already numeric and the record's natural
    /// order is preserved.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether a column order is configured.
    pub fn has_feature_order(&self) -> bool {
        !self.feature_order.is_empty()
    }

    /// Look up the encoder for a feature.
    pub fn encoder(&self, feature: &str) -> Option<&EncoderSpec> {
        self.categorical_encoders.get(feature)
    }
}

/// Category vocabulary for one categorical feature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncoderSpec {
    /// Raw category string to integer code.
    #[serde(default, deserialize_with = "code_map")]
    pub mapping: OrderedMap<i64>,

    /// Unknown-category code given next to the mapping rather than inside it.
    #[serde(
        default,
        rename = "__UNKNOWN__",
        deserialize_with = "optional_code",
        skip_serializing_if = "Option::is_none"
    )]
    pub unknown: Option<i64>,
}

impl EncoderSpec {
    pub fn new(mapping: OrderedMap<i64>) -> Self {
        Self {
            mapping,
            unknown: None,
        }
    }

    /// Code assigned to values the vocabulary does not recognize.
    ///
    /// Resolution order: the `__UNKNOWN__` entry of the mapping, then the
    /// `__UNKNOWN__` field of the encoder, then one past the largest code,
    /// then `0` for an empty vocabulary.
    pub fn unknown_code(&self) -> i64 {
        if let Some(code) = self.mapping.get(UNKNOWN_CATEGORY_KEY) {
            return *code;
        }
        if let Some(code) = self.unknown {
            return code;
        }
        self.mapping
            .values()
            .copied()
            .max()
            .map_or(0, |max| max.saturating_add(1))
    }
}

/// A category code as written in the document: `0` or `0.0`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCode {
    Integer(i64),
    Number(f64),
}

impl RawCode {
    fn integral(self) -> Option<i64> {
        match self {
            Self::Integer(code) => Some(code),
            Self::Number(code) => exact_i64(code),
        }
    }
}

fn code_map<'de, D: Deserializer<'de>>(deserializer: D) -> Result<OrderedMap<i64>, D::Error> {
    OrderedMap::<RawCode>::deserialize(deserializer)?
        .into_iter()
        .map(|(key, code)| match code.integral() {
            Some(code) => Ok((key, code)),
            None => Err(D::Error::custom(format!(
                "category code for '{key}' is not an integer"
            ))),
        })
        .collect()
}

fn optional_code<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Option::<RawCode>::deserialize(deserializer)?
        .map(|code| {
            code.integral()
                .ok_or_else(|| D::Error::custom("unknown-category code is not an integer"))
        })
        .transpose()
}

/// Supported scaler transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalerKind {
    /// `(x - mean) / scale`, element-wise.
    Standard,
    /// Any type this crate does not apply.
    #[serde(other)]
    Unsupported,
}

/// Per-column scaling parameters, aligned with `feature_order`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerSpec {
    #[serde(rename = "type")]
    pub kind: ScalerKind,
    #[serde(default)]
    pub mean: Vec<f64>,
    #[serde(default)]
    pub scale: Vec<f64>,
}

impl ScalerSpec {
    pub fn standard(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self {
            kind: ScalerKind::Standard,
            mean,
            scale,
        }
    }

    /// Whether the parameters cover a row of `width` columns exactly.
    pub fn fits(&self, width: usize) -> bool {
        self.mean.len() == width && self.scale.len() == width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: &[(&str, i64)]) -> OrderedMap<i64> {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn test_unknown_code_prefers_mapping_entry() {
        let spec = EncoderSpec {
            mapping: mapping(&[("a", 0), ("__UNKNOWN__", 99)]),
            unknown: Some(5),
        };
        assert_eq!(spec.unknown_code(), 99);
    }

    #[test]
    fn test_unknown_code_uses_encoder_field() {
        let spec = EncoderSpec {
            mapping: mapping(&[("a", 0), ("b", 1)]),
            unknown: Some(7),
        };
        assert_eq!(spec.unknown_code(), 7);
    }

    #[test]
    fn test_unknown_code_falls_back_to_next_code() {
        let spec = EncoderSpec::new(mapping(&[("a", 0), ("b", 1)]));
        assert_eq!(spec.unknown_code(), 2);
        assert_eq!(EncoderSpec::default().unknown_code(), 0);
    }

    #[test]
    fn test_integral_float_codes_are_accepted() {
        let spec: EncoderSpec = serde_json::from_str(
            r#"{"mapping": {"red": 0.0, "blue": 1, "green": 2e0}, "__UNKNOWN__": 9.0}"#,
        )
        .expect("parse encoder");
        assert_eq!(spec.mapping.get("red"), Some(&0));
        assert_eq!(spec.mapping.get("green"), Some(&2));
        assert_eq!(spec.unknown, Some(9));
    }

    #[test]
    fn test_fractional_codes_are_rejected() {
        let error = serde_json::from_str::<EncoderSpec>(r#"{"mapping": {"red": 0.5}}"#)
            .expect_err("fractional code");
        assert!(error.to_string().contains("'red'"), "{error}");
        assert!(serde_json::from_str::<EncoderSpec>(r#"{"mapping": {"red": 1e19}}"#).is_err());
    }

    #[test]
    fn test_unsupported_scaler_type_parses() {
        let scaler: ScalerSpec =
            serde_json::from_str(r#"{"type": "minmax", "min": [0]}"#).expect("parse scaler");
        assert_eq!(scaler.kind, ScalerKind::Unsupported);
        assert!(scaler.mean.is_empty());
    }
}
