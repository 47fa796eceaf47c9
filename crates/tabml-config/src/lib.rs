#![deny(unsafe_code)]

pub mod error;
pub mod loader;
pub mod normalize;

pub use crate::error::ConfigError;
pub use crate::loader::{
    ConfigSource, LoadedConfig, config_from_document, load, load_preprocessor_config,
    parse_preprocessor_config, read_preprocessor_config,
};
pub use crate::normalize::{NAME_LIST_FIELDS, materialize_name_lists, normalize_document};
