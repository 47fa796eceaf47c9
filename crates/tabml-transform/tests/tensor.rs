//! Tests for feature ordering, coercion and standardization.

use tabml_model::{
    EncoderSpec, FeatureError, FeatureValue, PreprocessorConfig, ScalerSpec, record_from,
};
use tabml_transform::{build_features, build_tensor};

fn ordered_config(order: &[&str]) -> PreprocessorConfig {
    let mut config = PreprocessorConfig::empty();
    config.feature_order = order.iter().map(|name| name.to_string()).collect();
    config
}

#[test]
fn test_configured_order_defines_columns() {
    let config = ordered_config(&["c", "a", "b"]);
    let record = record_from([("a", "1"), ("b", "2"), ("c", "3")]);

    let prepared = build_tensor(&record, &config).expect("tensor");

    assert_eq!(prepared.features, vec![3.0, 1.0, 2.0]);
    assert_eq!(prepared.tensor.shape(), [1, 3]);
    assert_eq!(prepared.tensor.data(), &[3.0f32, 1.0, 2.0]);
}

#[test]
fn test_missing_feature_cites_name_and_expected_list() {
    let config = ordered_config(&["a", "b"]);
    let record = record_from([("a", "1")]);

    let error = build_tensor(&record, &config).expect_err("missing b");

    assert_eq!(
        error,
        FeatureError::MissingFeature {
            feature: "b".to_string(),
            expected: vec!["a".to_string(), "b".to_string()],
        }
    );
    assert_eq!(error.to_string(), "missing feature 'b'. Expected: a, b");
}

#[test]
fn test_non_numeric_after_encoding() {
    let config = ordered_config(&["a", "b"]);
    let record = record_from([("a", "1"), ("b", "blue")]);

    let error = build_tensor(&record, &config).expect_err("b is text");

    assert_eq!(
        error,
        FeatureError::NonNumericAfterEncoding {
            feature: "b".to_string(),
            value: "blue".to_string(),
        }
    );
}

#[test]
fn test_degraded_mode_uses_record_order() {
    let record = record_from([("a", "3"), ("b", "4")]);

    let prepared = build_tensor(&record, &PreprocessorConfig::empty()).expect("tensor");

    assert_eq!(prepared.features, vec![3.0, 4.0]);
    assert!(!prepared.standardized);
    assert!(prepared.unknown.is_empty());

    let reversed = record_from([("b", "4"), ("a", "3")]);
    let (row, _) = build_features(&reversed, &PreprocessorConfig::empty()).expect("row");
    assert_eq!(row, vec![4.0, 3.0]);
}

#[test]
fn test_degraded_mode_rejects_non_numeric_input() {
    let record = record_from([("a", "3"), ("b", "four")]);

    let error = build_tensor(&record, &PreprocessorConfig::empty()).expect_err("four");

    assert_eq!(
        error,
        FeatureError::NonNumericInput {
            value: "four".to_string()
        }
    );
}

#[test]
fn test_standardization_applies_when_lengths_match() {
    let mut config = ordered_config(&["x", "y"]);
    config.scaler = Some(ScalerSpec::standard(vec![5.0, 5.0], vec![5.0, 5.0]));
    let record = record_from([("x", FeatureValue::Integer(10)), ("y", FeatureValue::Integer(20))]);

    let prepared = build_tensor(&record, &config).expect("tensor");

    assert!(prepared.standardized);
    assert_eq!(prepared.features, vec![1.0, 3.0]);
}

#[test]
fn test_standardization_skipped_on_length_mismatch() {
    let mut config = ordered_config(&["x", "y"]);
    config.scaler = Some(ScalerSpec::standard(vec![5.0], vec![5.0]));
    let record = record_from([("x", "10"), ("y", "20")]);

    let prepared = build_tensor(&record, &config).expect("tensor");

    assert!(!prepared.standardized);
    assert_eq!(prepared.features, vec![10.0, 20.0]);
}

#[test]
fn test_categorical_codes_flow_into_row() {
    let mut config = ordered_config(&["age", "color"]);
    config.categorical_encoders.insert(
        "color",
        EncoderSpec::new([("red", 0), ("blue", 1)].into_iter().collect()),
    );
    let record = record_from([("color", "BLUE"), ("age", "42")]);

    let prepared = build_tensor(&record, &config).expect("tensor");

    assert_eq!(prepared.features, vec![42.0, 1.0]);
}

#[test]
fn test_unknown_categories_are_returned_with_row() {
    let mut config = ordered_config(&["color"]);
    config
        .categorical_encoders
        .insert("color", EncoderSpec::new([("red", 0)].into_iter().collect()));
    let record = record_from([("color", "green")]);

    let prepared = build_tensor(&record, &config).expect("tensor");

    assert_eq!(prepared.features, vec![1.0]);
    assert_eq!(prepared.unknown.len(), 1);
    assert_eq!(prepared.unknown[0].feature, "color");
}
