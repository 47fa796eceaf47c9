//! Model lifecycle and per-record inference.
//!
//! - **backend**: the engine boundary (`InferenceBackend` / `InferenceSession`)
//! - **onnx**: ONNX Runtime backend, behind the `onnx` feature
//! - **pipeline**: load / infer / close state machine
//! - **shared**: thread-shared handle with background loading
//! - **settings**: model and preprocessor locations, output and rounding policy
//! - **sink**: status indicator channel

#![deny(unsafe_code)]

pub mod backend;
pub mod error;
pub mod onnx;
pub mod pipeline;
pub mod settings;
pub mod shared;
pub mod sink;

pub use crate::backend::{EngineOutputs, InferenceBackend, InferenceSession, OutputTensor};
pub use crate::error::{EngineError, ModelLoadError, PipelineError};
pub use crate::onnx::{OnnxBackend, OnnxSession};
pub use crate::pipeline::{InferencePipeline, LoadReport, respond, timestamp_now};
pub use crate::settings::{DEFAULT_CONFIG_EXTENSION, DEFAULT_LABEL_OUTPUT, PipelineSettings};
pub use crate::shared::SharedPipeline;
pub use crate::sink::{StatusSink, TracingSink};
