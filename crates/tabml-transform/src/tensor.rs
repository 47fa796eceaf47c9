//! Record to `[1, L]` float32 tensor.
//!
//! Column selection depends on the configuration:
//!
//! - **configured order**: exactly `feature_order`, every feature required
//! - **no order** (degraded mode): the encoded record's own field order
//!
//! Rows are assembled in f64, optionally standardized, and narrowed to f32
//! only when the tensor is created.

use tracing::trace;

use tabml_model::{FeatureError, PreprocessorConfig, Record, UnknownCategory};

use crate::encoding::encode_categorical;
use crate::numeric::coerce_f64;
use crate::scaling::standardize;

/// A single-row, row-major float32 tensor of shape `[1, width]`.
#[derive(Debug, Clone, PartialEq)]
pub struct InputTensor {
    data: Vec<f32>,
}

impl InputTensor {
    pub fn from_row(row: &[f64]) -> Self {
        Self {
            data: row.iter().map(|value| *value as f32).collect(),
        }
    }

    pub fn shape(&self) -> [usize; 2] {
        [1, self.data.len()]
    }

    pub fn width(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }
}

/// Output of preprocessing one record.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedInput {
    /// Final (possibly standardized) row in f64.
    pub features: Vec<f64>,
    pub tensor: InputTensor,
    pub standardized: bool,
    pub unknown: Vec<UnknownCategory>,
}

/// Encode, order and coerce a record into a numeric row (before scaling).
pub fn build_features(
    record: &Record,
    config: &PreprocessorConfig,
) -> Result<(Vec<f64>, Vec<UnknownCategory>), FeatureError> {
    let encoded = encode_categorical(record, config);
    let row = if config.has_feature_order() {
        ordered_row(&encoded.record, &config.feature_order)?
    } else {
        natural_row(&encoded.record)?
    };
    Ok((row, encoded.unknown))
}

/// Full preprocessing: encode, order, coerce, standardize, package.
pub fn build_tensor(
    record: &Record,
    config: &PreprocessorConfig,
) -> Result<PreparedInput, FeatureError> {
    let (mut features, unknown) = build_features(record, config)?;
    let standardized = config
        .scaler
        .as_ref()
        .is_some_and(|scaler| standardize(&mut features, scaler));
    let tensor = InputTensor::from_row(&features);
    trace!(shape = ?tensor.shape(), standardized, "input tensor built");
    Ok(PreparedInput {
        features,
        tensor,
        standardized,
        unknown,
    })
}

fn ordered_row(record: &Record, order: &[String]) -> Result<Vec<f64>, FeatureError> {
    order
        .iter()
        .map(|feature| {
            let value = record
                .get(feature)
                .ok_or_else(|| FeatureError::MissingFeature {
                    feature: feature.clone(),
                    expected: order.to_vec(),
                })?;
            coerce_f64(value).ok_or_else(|| FeatureError::NonNumericAfterEncoding {
                feature: feature.clone(),
                value: value.to_string(),
            })
        })
        .collect()
}

fn natural_row(record: &Record) -> Result<Vec<f64>, FeatureError> {
    record
        .values()
        .map(|value| {
            coerce_f64(value).ok_or_else(|| FeatureError::NonNumericInput {
                value: value.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabml_model::record_from;

    #[test]
    fn test_tensor_shape_is_one_by_width() {
        let tensor = InputTensor::from_row(&[1.0, 2.5, -3.0]);
        assert_eq!(tensor.shape(), [1, 3]);
        assert_eq!(tensor.data(), &[1.0f32, 2.5, -3.0]);
    }

    #[test]
    fn test_empty_record_without_order_gives_empty_row() {
        let prepared =
            build_tensor(&Record::new(), &PreprocessorConfig::empty()).expect("empty row");
        assert_eq!(prepared.tensor.shape(), [1, 0]);
    }

    #[test]
    fn test_extra_fields_are_ignored_with_configured_order() {
        let mut config = PreprocessorConfig::empty();
        config.feature_order = vec!["b".to_string()];
        let record = record_from([("a", "not a number"), ("b", "2")]);
        let (row, _) = build_features(&record, &config).expect("row");
        assert_eq!(row, vec![2.0]);
    }
}
