//! Preprocessor configuration loader.
//!
//! Loading never fails outright: a missing document is the normal
//! "numeric inputs only" setup, and an unreadable or malformed document is
//! reported as a [`ConfigLoadWarning`] while the empty configuration is used.
//!
//! Within a readable document, an unusable `scaler` or categorical encoder is
//! dropped on its own with a warning; the rest of the document still applies.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use tabml_model::{ConfigLoadWarning, EncoderSpec, PreprocessorConfig, ScalerSpec};

use crate::error::ConfigError;
use crate::normalize::{materialize_name_lists, normalize_document};

/// Where the active configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from the document.
    File,
    /// No document at the path; the empty configuration applies.
    Missing,
    /// The document could not be used; the empty configuration applies.
    Fallback,
}

/// Result of loading a preprocessor configuration.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub config: PreprocessorConfig,
    pub source: ConfigSource,
    pub warning: Option<ConfigLoadWarning>,
}

impl LoadedConfig {
    fn empty(path: &Path, source: ConfigSource, warning: Option<ConfigLoadWarning>) -> Self {
        Self {
            path: path.to_path_buf(),
            config: PreprocessorConfig::empty(),
            source,
            warning,
        }
    }
}

/// Load the configuration at `path`, falling back to the empty configuration.
pub fn load(path: &Path) -> PreprocessorConfig {
    load_preprocessor_config(path).config
}

/// Load the configuration at `path` and report how it was obtained.
pub fn load_preprocessor_config(path: &Path) -> LoadedConfig {
    debug!(path = %path.display(), "loading preprocessor config");
    match read_preprocessor_config(path) {
        Ok(config) => {
            info!(
                config = %file_label(path),
                features = config.feature_order.len(),
                encoders = config.categorical_encoders.len(),
                scaler = config.scaler.is_some(),
                "preprocessor config loaded"
            );
            LoadedConfig {
                path: path.to_path_buf(),
                config,
                source: ConfigSource::File,
                warning: None,
            }
        }
        Err(error) if error.is_not_found() => {
            info!(
                path = %path.display(),
                "no preprocessor config found - numeric inputs only"
            );
            LoadedConfig::empty(path, ConfigSource::Missing, None)
        }
        Err(error) => {
            let warning = ConfigLoadWarning {
                path: path.to_path_buf(),
                message: error.to_string(),
            };
            warn!(%warning, "using empty preprocessor config - numeric inputs only");
            LoadedConfig::empty(path, ConfigSource::Fallback, Some(warning))
        }
    }
}

/// Read and parse the configuration at `path` without any fallback.
pub fn read_preprocessor_config(path: &Path) -> Result<PreprocessorConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::io(path, source))?;
    parse_preprocessor_config(&text)
}

/// Parse, normalize and interpret a configuration document.
pub fn parse_preprocessor_config(text: &str) -> Result<PreprocessorConfig, ConfigError> {
    let document: Value =
        serde_json::from_str(text).map_err(|source| ConfigError::Json { source })?;
    config_from_document(document)
}

/// Interpret an already-parsed document.
pub fn config_from_document(document: Value) -> Result<PreprocessorConfig, ConfigError> {
    let mut root = match normalize_document(document) {
        Value::Object(root) => root,
        other => {
            return Err(ConfigError::NotAnObject {
                found: kind_of(&other),
            });
        }
    };
    materialize_name_lists(&mut root);
    // Explicit nulls mean "absent" for every top-level field.
    root.retain(|_, value| !value.is_null());
    let scaler = root.remove("scaler").and_then(interpret_scaler);
    if let Some(Value::Object(encoders)) = root.get_mut("categorical_encoders") {
        encoders.retain(|feature, encoder| usable_encoder(feature, encoder));
    }
    let mut config: PreprocessorConfig = serde_json::from_value(Value::Object(root))
        .map_err(|source| ConfigError::Shape { source })?;
    config.scaler = scaler;
    Ok(config)
}

/// A scaler that cannot be read disables standardization.
fn interpret_scaler(value: Value) -> Option<ScalerSpec> {
    match serde_json::from_value(value) {
        Ok(scaler) => Some(scaler),
        Err(error) => {
            warn!(%error, "ignoring unusable scaler - inputs are not standardized");
            None
        }
    }
}

fn usable_encoder(feature: &str, encoder: &Value) -> bool {
    match serde_json::from_value::<EncoderSpec>(encoder.clone()) {
        Ok(_) => true,
        Err(error) => {
            warn!(feature, %error, "ignoring unusable categorical encoder");
            false
        }
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
