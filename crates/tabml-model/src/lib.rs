//! Shared data model for tabular model preprocessing and inference.
//!
//! - **config**: the normalized preprocessing configuration
//! - **record**: raw feature records received per request
//! - **response**: success/error payloads emitted per request
//! - **status**: pipeline lifecycle and status indicator
//! - **error**: per-request errors and non-fatal warnings

pub mod config;
pub mod error;
pub mod ordered;
pub mod record;
pub mod response;
pub mod status;

pub use config::{
    EncoderSpec, MISSING_CATEGORY, PreprocessorConfig, ScalerKind, ScalerSpec,
    UNKNOWN_CATEGORY_KEY,
};
pub use error::{ConfigLoadWarning, FeatureError, UnknownCategory};
pub use ordered::OrderedMap;
pub use record::{FeatureValue, Record, record_from};
pub use response::{InferenceResponse, Prediction, PredictionPolicy};
pub use status::{PipelineState, PipelineStatus, StatusColor, StatusShape};
