//! Inference engine boundary.
//!
//! The pipeline only needs two capabilities from an engine: open a session
//! for a model file, and run a named `[1, L]` float32 tensor through it.
//! Everything else about the engine stays behind these traits.

use std::path::Path;

use tabml_transform::InputTensor;

use crate::error::EngineError;

/// A numeric output tensor, widened to f64.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTensor {
    pub shape: Vec<i64>,
    pub data: Vec<f64>,
}

impl OutputTensor {
    pub fn new(shape: Vec<i64>, data: Vec<f64>) -> Self {
        Self { shape, data }
    }

    /// Single-element tensor of shape `[1]`.
    pub fn scalar(value: f64) -> Self {
        Self::new(vec![1], vec![value])
    }

    pub fn first(&self) -> Option<f64> {
        self.data.first().copied()
    }
}

/// Named outputs of one run, in the model's declared output order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineOutputs {
    outputs: Vec<(String, OutputTensor)>,
}

impl EngineOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, tensor: OutputTensor) {
        self.outputs.push((name.into(), tensor));
    }

    pub fn with(mut self, name: impl Into<String>, tensor: OutputTensor) -> Self {
        self.push(name, tensor);
        self
    }

    pub fn get(&self, name: &str) -> Option<&OutputTensor> {
        self.outputs
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, tensor)| tensor)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.outputs.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// The output carrying the prediction: `preferred` if the engine
    /// produced it, otherwise the first declared output.
    pub fn primary(&self, preferred: &str) -> Option<(&str, &OutputTensor)> {
        self.outputs
            .iter()
            .find(|(name, _)| name == preferred)
            .or_else(|| self.outputs.first())
            .map(|(name, tensor)| (name.as_str(), tensor))
    }
}

/// An open model session.
pub trait InferenceSession {
    /// Declared input names, in model order.
    fn input_names(&self) -> &[String];

    /// Declared output names, in model order.
    fn output_names(&self) -> &[String];

    /// Run `tensor` through the model under `input_name`.
    fn run(&mut self, input_name: &str, tensor: &InputTensor) -> Result<EngineOutputs, EngineError>;
}

/// Opens sessions for model files.
pub trait InferenceBackend {
    type Session: InferenceSession;

    /// Short engine name for diagnostics.
    fn name(&self) -> &'static str;

    fn open(&self, model_path: &Path) -> Result<Self::Session, EngineError>;
}
