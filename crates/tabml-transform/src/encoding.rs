//! Categorical value encoding.
//!
//! Raw category strings are matched against the feature's vocabulary in a
//! fixed order, first hit wins:
//!
//! 1. exact key
//! 2. case-insensitive key (first such key in vocabulary order)
//! 3. unknown-category fallback ([`EncoderSpec::unknown_code`])
//!
//! Values are trimmed first, and a value that is empty after trimming is
//! looked up as [`MISSING_CATEGORY`].

use tracing::warn;

use tabml_model::{
    EncoderSpec, FeatureValue, MISSING_CATEGORY, PreprocessorConfig, Record, UnknownCategory,
};

/// How a category value was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryMatch {
    Exact(i64),
    CaseInsensitive { key: String, code: i64 },
    Unknown(i64),
}

impl CategoryMatch {
    pub fn code(&self) -> i64 {
        match self {
            Self::Exact(code) | Self::Unknown(code) => *code,
            Self::CaseInsensitive { code, .. } => *code,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

/// A record after categorical encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRecord {
    pub record: Record,
    /// Values that fell through to the unknown-category code.
    pub unknown: Vec<UnknownCategory>,
}

/// The lookup key for a raw category value.
pub fn category_key(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        MISSING_CATEGORY
    } else {
        trimmed
    }
}

/// Resolve an already-trimmed category key against a vocabulary.
pub fn resolve_category(spec: &EncoderSpec, key: &str) -> CategoryMatch {
    if let Some(code) = spec.mapping.get(key) {
        return CategoryMatch::Exact(*code);
    }
    let lowered = key.to_lowercase();
    if let Some((matched, code)) = spec
        .mapping
        .iter()
        .find(|(candidate, _)| candidate.to_lowercase() == lowered)
    {
        return CategoryMatch::CaseInsensitive {
            key: matched.to_string(),
            code: *code,
        };
    }
    CategoryMatch::Unknown(spec.unknown_code())
}

/// Replace configured categorical text values with their integer codes.
///
/// The input record is left untouched; features without an encoder and
/// non-text values of encoded features are copied as-is.
pub fn encode_categorical(record: &Record, config: &PreprocessorConfig) -> EncodedRecord {
    let mut encoded = record.clone();
    let mut unknown = Vec::new();

    for (feature, spec) in config.categorical_encoders.iter() {
        let Some(slot) = encoded.get_mut(feature) else {
            continue;
        };
        let Some(raw) = slot.as_text() else {
            continue;
        };
        let key = category_key(raw).to_string();
        let resolved = resolve_category(spec, &key);
        if resolved.is_unknown() {
            let event = UnknownCategory {
                feature: feature.to_string(),
                value: key,
                code: resolved.code(),
            };
            warn!(
                feature = %event.feature,
                code = event.code,
                "unknown category value, using fallback code"
            );
            unknown.push(event);
        }
        *slot = FeatureValue::Integer(resolved.code());
    }

    EncodedRecord {
        record: encoded,
        unknown,
    }
}
