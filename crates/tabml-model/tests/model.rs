#![allow(missing_docs)]

use tabml_model::{
    EncoderSpec, FeatureValue, PreprocessorConfig, Record, ScalerKind, record_from,
};

#[test]
fn test_config_document_deserializes_with_defaults() {
    let config: PreprocessorConfig = serde_json::from_str(
        r#"{
            "feature_order": ["age", "color"],
            "categorical_encoders": {
                "color": { "mapping": { "red": 0, "blue": 1 }, "__UNKNOWN__": 9 }
            },
            "scaler": { "type": "standard", "mean": [1.0, 2.0], "scale": [3.0, 4.0] }
        }"#,
    )
    .expect("parse config");

    assert_eq!(config.feature_order, vec!["age", "color"]);
    assert!(config.categorical_features.is_empty());
    assert!(config.numeric_features.is_empty());

    let color = config.encoder("color").expect("color encoder");
    assert_eq!(color.mapping.get("blue"), Some(&1));
    assert_eq!(color.unknown_code(), 9);

    let scaler = config.scaler.expect("scaler");
    assert_eq!(scaler.kind, ScalerKind::Standard);
    assert!(scaler.fits(2));
    assert!(!scaler.fits(3));
}

#[test]
fn test_empty_config_has_no_order_or_encoders() {
    let config = PreprocessorConfig::empty();
    assert!(!config.has_feature_order());
    assert!(config.categorical_encoders.is_empty());
    assert!(config.scaler.is_none());
}

#[test]
fn test_config_serializes_in_document_order() {
    let mut config = PreprocessorConfig::empty();
    config.categorical_encoders.insert(
        "zeta",
        EncoderSpec::new([("b", 1), ("a", 0)].into_iter().collect()),
    );
    let json = serde_json::to_string(&config.categorical_encoders).expect("serialize");
    assert_eq!(json, r#"{"zeta":{"mapping":{"b":1,"a":0}}}"#);
}

#[test]
fn test_records_keep_arrival_order() {
    let record: Record = serde_json::from_str(r#"{"b": "4", "a": "3"}"#).expect("parse");
    let names: Vec<&str> = record.keys().collect();
    assert_eq!(names, vec!["b", "a"]);

    let built = record_from([("b", "4"), ("a", "3")]);
    assert_eq!(built, record);
    assert_eq!(built.get("a").and_then(FeatureValue::as_text), Some("3"));
}
