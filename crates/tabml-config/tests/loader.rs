//! Tests for loading preprocessor configuration documents from disk.

use std::fs;
use std::path::Path;

use tabml_config::{ConfigSource, load, load_preprocessor_config};
use tabml_model::PreprocessorConfig;

fn write(path: &Path, contents: &str) {
    fs::write(path, contents).expect("write config");
}

const DOCUMENT: &str = r#"{
    "feature_order": [" age ", "color "],
    "categorical_features": ["color"],
    "numeric_features": [" age"],
    "categorical_encoders": {
        "color ": { "mapping": { " red": 0, "blue ": 1 } }
    },
    "scaler": { "type": "standard", "mean": [40.5, 0.5], "scale": [12.5, 0.5] }
}"#;

#[test]
fn test_missing_document_yields_empty_config_without_warning() {
    let dir = tempfile::tempdir().expect("temp dir");
    let loaded = load_preprocessor_config(&dir.path().join("absent.json"));

    assert_eq!(loaded.source, ConfigSource::Missing);
    assert!(loaded.warning.is_none());
    assert_eq!(loaded.config, PreprocessorConfig::empty());
}

#[test]
fn test_malformed_document_falls_back_with_warning() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("model.json");
    write(&path, "{ \"feature_order\": [\"a\", ");

    let loaded = load_preprocessor_config(&path);

    assert_eq!(loaded.source, ConfigSource::Fallback);
    let warning = loaded.warning.expect("warning");
    assert_eq!(warning.path, path);
    assert!(warning.message.contains("failed to parse JSON"));
    assert_eq!(loaded.config, PreprocessorConfig::empty());
}

#[test]
fn test_wrongly_shaped_document_falls_back_with_warning() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("model.json");
    write(&path, r#"{"feature_order": ["color"], "categorical_encoders": ["color"]}"#);

    let loaded = load_preprocessor_config(&path);

    assert_eq!(loaded.source, ConfigSource::Fallback);
    assert!(loaded.warning.is_some());
    assert_eq!(loaded.config, PreprocessorConfig::empty());
}

fn load_document(contents: &str) -> tabml_config::LoadedConfig {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("model.json");
    write(&path, contents);
    load_preprocessor_config(&path)
}

#[test]
fn test_float_category_codes_are_kept() {
    let loaded = load_document(
        r#"{
            "feature_order": ["color", "size"],
            "categorical_encoders": {"color": {"mapping": {"red": 0.0, "blue": 1.0}}}
        }"#,
    );

    assert_eq!(loaded.source, ConfigSource::File);
    let encoder = loaded.config.encoder("color").expect("color encoder");
    assert_eq!(encoder.mapping.get("blue"), Some(&1));
    assert_eq!(loaded.config.feature_order, vec!["color", "size"]);
}

#[test]
fn test_unusable_encoder_is_dropped_alone() {
    let loaded = load_document(
        r#"{
            "feature_order": ["color", "shape"],
            "categorical_encoders": {
                "color": {"mapping": {"red": "zero"}},
                "shape": {"mapping": {"round": 0, "square": 1}}
            }
        }"#,
    );

    assert_eq!(loaded.source, ConfigSource::File);
    assert!(loaded.warning.is_none());
    assert!(loaded.config.encoder("color").is_none());
    assert!(loaded.config.encoder("shape").is_some());
    assert_eq!(loaded.config.feature_order, vec!["color", "shape"]);
}

#[test]
fn test_scaler_without_type_disables_standardization_only() {
    let loaded = load_document(
        r#"{"feature_order": ["a", "b"], "scaler": {"mean": [1, 2], "scale": [1, 1]}}"#,
    );

    assert_eq!(loaded.source, ConfigSource::File);
    assert!(loaded.config.scaler.is_none());
    assert_eq!(loaded.config.feature_order, vec!["a", "b"]);
}

#[test]
fn test_scaler_given_as_text_is_ignored() {
    let loaded = load_document(r#"{"feature_order": ["a"], "scaler": "none"}"#);

    assert_eq!(loaded.source, ConfigSource::File);
    assert!(loaded.config.scaler.is_none());
    assert_eq!(loaded.config.feature_order, vec!["a"]);
}

#[test]
fn test_scaler_with_null_parameters_is_ignored() {
    let loaded = load_document(
        r#"{
            "feature_order": ["a", "b"],
            "categorical_encoders": {"a": {"mapping": {"x": 0}}},
            "scaler": {"type": "standard", "mean": [1.0, null], "scale": [1.0, 2.0]}
        }"#,
    );

    assert_eq!(loaded.source, ConfigSource::File);
    assert!(loaded.config.scaler.is_none());
    assert!(loaded.config.encoder("a").is_some());
    assert_eq!(loaded.config.feature_order, vec!["a", "b"]);
}

#[test]
fn test_directory_path_falls_back_with_warning() {
    let dir = tempfile::tempdir().expect("temp dir");
    let loaded = load_preprocessor_config(dir.path());

    assert_eq!(loaded.source, ConfigSource::Fallback);
    assert!(loaded.warning.is_some());
}

#[test]
fn test_document_is_normalized_on_load() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("model.json");
    write(&path, DOCUMENT);

    let loaded = load_preprocessor_config(&path);
    assert_eq!(loaded.source, ConfigSource::File);

    insta::assert_json_snapshot!(loaded.config, @r###"
    {
      "feature_order": [
        "age",
        "color"
      ],
      "categorical_features": [
        "color"
      ],
      "numeric_features": [
        "age"
      ],
      "categorical_encoders": {
        "color": {
          "mapping": {
            "red": 0,
            "blue": 1
          }
        }
      },
      "scaler": {
        "type": "standard",
        "mean": [
          40.5,
          0.5
        ],
        "scale": [
          12.5,
          0.5
        ]
      }
    }
    "###);
}

#[test]
fn test_reloading_the_same_bytes_is_deterministic() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("model.json");
    write(&path, DOCUMENT);

    assert_eq!(load(&path), load(&path));
}
