//! Pipeline settings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use tabml_model::PredictionPolicy;

/// Default extension of the preprocessor document next to the model.
pub const DEFAULT_CONFIG_EXTENSION: &str = "json";

/// Default name of the output holding class labels.
pub const DEFAULT_LABEL_OUTPUT: &str = "label";

/// Settings for one inference pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSettings {
    /// Model artifact to load.
    pub model_path: PathBuf,

    /// Explicit preprocessor document. Takes priority over the derived path.
    pub preprocessor_path: Option<PathBuf>,

    /// Extension swapped onto the model path to find the preprocessor
    /// document when no explicit path is given.
    pub config_extension: String,

    /// Output read in preference to the first declared output.
    pub label_output: String,

    /// Rounding convention for engine results.
    pub prediction_policy: PredictionPolicy,
}

impl PipelineSettings {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            preprocessor_path: None,
            config_extension: DEFAULT_CONFIG_EXTENSION.to_string(),
            label_output: DEFAULT_LABEL_OUTPUT.to_string(),
            prediction_policy: PredictionPolicy::default(),
        }
    }

    /// Builder method to set an explicit preprocessor document.
    pub fn with_preprocessor_path(mut self, path: Option<PathBuf>) -> Self {
        self.preprocessor_path = path;
        self
    }

    /// Builder method to set the derived-config extension.
    pub fn with_config_extension(mut self, extension: impl Into<String>) -> Self {
        self.config_extension = extension.into();
        self
    }

    /// Builder method to set the preferred output name.
    pub fn with_label_output(mut self, name: impl Into<String>) -> Self {
        self.label_output = name.into();
        self
    }

    /// Builder method to set the prediction policy.
    pub fn with_prediction_policy(mut self, policy: PredictionPolicy) -> Self {
        self.prediction_policy = policy;
        self
    }

    /// Absolute model location.
    pub fn resolve_model_path(&self) -> PathBuf {
        absolute(&self.model_path)
    }

    /// Preprocessor document location for a resolved model path.
    ///
    /// `model.onnx` becomes `model.json`; a model path without an extension
    /// gets the extension appended.
    pub fn resolve_config_path(&self, model_path: &Path) -> PathBuf {
        match &self.preprocessor_path {
            Some(path) => absolute(path),
            None => model_path.with_extension(&self.config_extension),
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
