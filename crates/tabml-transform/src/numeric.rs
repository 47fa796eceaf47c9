//! Numeric coercion of feature values.

use tabml_model::FeatureValue;

/// Parses a string as f64, returning None for invalid, empty or NaN strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Coerces a feature value to f64.
///
/// Numbers pass through, text must parse completely, everything else is
/// non-numeric.
pub fn coerce_f64(value: &FeatureValue) -> Option<f64> {
    match value {
        FeatureValue::Integer(v) => Some(*v as f64),
        FeatureValue::Number(v) if !v.is_nan() => Some(*v),
        FeatureValue::Number(_) => None,
        FeatureValue::Text(text) => parse_f64(text),
        FeatureValue::Other(_) => None,
    }
}
