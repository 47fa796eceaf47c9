//! Integration tests for the CLI commands.

use std::fs;
use std::path::Path;

use serde_json::{Value, json};
use tempfile::TempDir;

use tabml_cli::commands::{RunSummary, predict_records, tensor_records};
use tabml_cli::summary::config_table;
use tabml_config::load;
use tabml_engine::{
    EngineError, EngineOutputs, InferenceBackend, InferencePipeline, InferenceSession,
    OnnxBackend, OutputTensor, PipelineSettings,
};
use tabml_model::PreprocessorConfig;
use tabml_transform::InputTensor;

const CONFIG: &str = r#"{
    "feature_order": ["colour", "size"],
    "categorical_features": ["colour"],
    "numeric_features": ["size"],
    "categorical_encoders": {"colour": {"mapping": {"red": 0, "blue": 1}, "__UNKNOWN__": 9}},
    "scaler": {"type": "standard", "mean": [0.0, 10.0], "scale": [1.0, 2.0]}
}"#;

/// Returns the sum of the input row.
struct SumBackend;

struct SumSession {
    inputs: Vec<String>,
}

impl InferenceBackend for SumBackend {
    type Session = SumSession;

    fn name(&self) -> &'static str {
        "sum"
    }

    fn open(&self, _model_path: &Path) -> Result<SumSession, EngineError> {
        Ok(SumSession {
            inputs: vec!["input".to_string()],
        })
    }
}

impl InferenceSession for SumSession {
    fn input_names(&self) -> &[String] {
        &self.inputs
    }

    fn output_names(&self) -> &[String] {
        &self.inputs
    }

    fn run(&mut self, _input_name: &str, tensor: &InputTensor) -> Result<EngineOutputs, EngineError> {
        let sum: f32 = tensor.data().iter().sum();
        Ok(EngineOutputs::new().with("score", OutputTensor::scalar(f64::from(sum))))
    }
}

fn write_config(dir: &TempDir) -> PreprocessorConfig {
    let path = dir.path().join("model.json");
    fs::write(&path, CONFIG).expect("write config");
    load(&path)
}

fn lines(output: &[u8]) -> Vec<Value> {
    String::from_utf8(output.to_vec())
        .expect("utf8 output")
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect()
}

#[test]
fn test_tensor_command_prints_feature_vectors() {
    let dir = TempDir::new().expect("create temp dir");
    let config = write_config(&dir);
    let input = "{\"size\": 14, \"colour\": \"BLUE\"}\n\n{\"colour\": \"green\", \"size\": \"10\"}\n";
    let mut out = Vec::new();

    let summary = tensor_records(&config, input.as_bytes(), &mut out).expect("tensor");

    assert_eq!(summary, RunSummary { records: 2, failures: 0 });
    let rows = lines(&out);
    assert_eq!(rows[0]["features"], json!([1.0, 2.0]));
    assert_eq!(rows[0]["shape"], json!([1, 2]));
    assert_eq!(rows[0]["standardized"], json!(true));
    assert_eq!(rows[1]["features"], json!([9.0, 0.0]));
    assert_eq!(rows[1]["unknown"][0]["feature"], "colour");
    assert_eq!(rows[1]["unknown"][0]["code"], 9);
}

#[test]
fn test_tensor_command_reports_bad_lines() {
    let dir = TempDir::new().expect("create temp dir");
    let config = write_config(&dir);
    let input = "not json\n{\"colour\": \"red\"}\n";
    let mut out = Vec::new();

    let summary = tensor_records(&config, input.as_bytes(), &mut out).expect("tensor");

    assert_eq!(summary, RunSummary { records: 2, failures: 2 });
    let rows = lines(&out);
    assert_eq!(rows[0]["status"], "error");
    assert!(rows[0]["error"].as_str().is_some_and(|e| e.contains("line 1")));
    assert!(rows[1]["error"].as_str().is_some_and(|e| e.contains("'size'")));
}

#[test]
fn test_tensor_command_without_config_keeps_record_order() {
    let input = "{\"a\": \"3\", \"b\": 4}\n";
    let mut out = Vec::new();

    tensor_records(&PreprocessorConfig::empty(), input.as_bytes(), &mut out).expect("tensor");

    assert_eq!(lines(&out)[0]["features"], json!([3.0, 4.0]));
}

#[test]
fn test_predict_command_writes_one_response_per_record() {
    let dir = TempDir::new().expect("create temp dir");
    write_config(&dir);
    let model = dir.path().join("model.onnx");
    fs::write(&model, b"onnx").expect("write model");
    let mut pipeline = InferencePipeline::new(SumBackend, PipelineSettings::new(&model));
    pipeline.load().expect("load");
    let input = "{\"colour\": \"blue\", \"size\": 15}\n{\"colour\": \"red\"}\n[1, 2]\n";
    let mut out = Vec::new();

    let summary = predict_records(&mut pipeline, input.as_bytes(), &mut out).expect("predict");

    assert_eq!(summary, RunSummary { records: 3, failures: 2 });
    let rows = lines(&out);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["status"], "success");
    assert_eq!(rows[0]["prediction"], 4);
    assert_eq!(rows[1]["status"], "error");
    assert_eq!(rows[2]["status"], "error");
}

#[test]
fn test_inspect_table_lists_features_in_order() {
    let dir = TempDir::new().expect("create temp dir");
    let config = write_config(&dir);

    let rendered = config_table(&config).to_string();

    let colour = rendered.find("colour").expect("colour row");
    let size = rendered.find("size").expect("size row");
    assert!(colour < size);
    assert!(rendered.contains("categorical"));
    assert!(rendered.contains("(+unknown)"));
}

#[test]
fn test_default_build_links_the_onnx_backend() {
    assert!(OnnxBackend::is_available());
}
