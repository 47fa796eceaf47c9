//! Standardization of finished feature rows.

use tracing::debug;

use tabml_model::{ScalerKind, ScalerSpec};

/// Apply `scaler` to `row` in place, returning whether it was applied.
///
/// Only standard scalers whose `mean` and `scale` both match the row width
/// are applied. Any other shape leaves the row untouched: a partial apply
/// would silently corrupt the row.
pub fn standardize(row: &mut [f64], scaler: &ScalerSpec) -> bool {
    if scaler.kind != ScalerKind::Standard {
        debug!(kind = ?scaler.kind, "unsupported scaler type, row left unscaled");
        return false;
    }
    if !scaler.fits(row.len()) {
        debug!(
            width = row.len(),
            mean = scaler.mean.len(),
            scale = scaler.scale.len(),
            "scaler parameters do not match feature count, row left unscaled"
        );
        return false;
    }
    for ((value, mean), scale) in row.iter_mut().zip(&scaler.mean).zip(&scaler.scale) {
        *value = (*value - mean) / scale;
    }
    true
}
