use std::path::PathBuf;

use thiserror::Error;

use tabml_model::FeatureError;

/// Failure reported by the inference engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("inference engine unavailable: {0}")]
    Unavailable(String),

    #[error("failed to open inference session: {message}")]
    SessionOpen { message: String },

    #[error("model declares no inputs")]
    NoInputs,

    #[error("inference run failed: {message}")]
    Run { message: String },

    #[error("model produced no usable output")]
    MissingOutput,

    #[error("output '{name}' is empty")]
    EmptyOutput { name: String },
}

/// The model could not be brought into service.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("model not accessible at {path}: {source}")]
    ModelNotAccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load model {path}: {source}")]
    Session {
        path: PathBuf,
        #[source]
        source: EngineError,
    },
}

/// Any failure surfaced at the pipeline boundary.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("model session not ready")]
    NotReady,

    #[error("a model load is already in progress")]
    LoadInProgress,

    #[error("another request is in flight")]
    Busy,

    #[error(transparent)]
    ModelLoad(#[from] ModelLoadError),

    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("pipeline lock poisoned")]
    Poisoned,
}
