//! Record preprocessing for tabular model inference.
//!
//! - **encoding**: categorical value to integer code, with deterministic fallbacks
//! - **numeric**: coercion of raw values to f64
//! - **scaling**: standardization of finished rows
//! - **tensor**: column ordering and `[1, L]` tensor construction

pub mod encoding;
pub mod numeric;
pub mod scaling;
pub mod tensor;

pub use encoding::{CategoryMatch, EncodedRecord, category_key, encode_categorical, resolve_category};
pub use numeric::{coerce_f64, parse_f64};
pub use scaling::standardize;
pub use tensor::{InputTensor, PreparedInput, build_features, build_tensor};
