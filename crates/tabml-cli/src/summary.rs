use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use tabml_model::{EncoderSpec, PreprocessorConfig, ScalerKind, UNKNOWN_CATEGORY_KEY};

/// One row per configured feature, in tensor column order.
///
/// Without a feature order only the encoded features are listed.
pub fn config_table(config: &PreprocessorConfig) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Feature"),
        header_cell("Kind"),
        header_cell("Categories"),
        header_cell("Mean"),
        header_cell("Scale"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);

    let features: Vec<&str> = if config.has_feature_order() {
        config.feature_order.iter().map(String::as_str).collect()
    } else {
        config.categorical_encoders.keys().collect()
    };
    let scaler = config
        .scaler
        .as_ref()
        .filter(|scaler| scaler.kind == ScalerKind::Standard && scaler.fits(features.len()));

    for (index, feature) in features.iter().enumerate() {
        let encoder = config.encoder(feature);
        let (mean, scale) = match scaler {
            Some(scaler) => (
                Cell::new(scaler.mean[index]),
                Cell::new(scaler.scale[index]),
            ),
            None => (dim_cell("-"), dim_cell("-")),
        };
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(feature),
            kind_cell(config, feature, encoder.is_some()),
            categories_cell(encoder),
            mean,
            scale,
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn kind_cell(config: &PreprocessorConfig, feature: &str, encoded: bool) -> Cell {
    let listed = |names: &[String]| names.iter().any(|name| name == feature);
    if encoded || listed(&config.categorical_features) {
        Cell::new("categorical").fg(Color::Cyan)
    } else if listed(&config.numeric_features) {
        Cell::new("numeric")
    } else {
        dim_cell("-")
    }
}

fn categories_cell(encoder: Option<&EncoderSpec>) -> Cell {
    match encoder {
        Some(encoder) if encoder.unknown.is_some() || encoder.mapping.contains_key(UNKNOWN_CATEGORY_KEY) => {
            Cell::new(format!("{} (+unknown)", encoder.mapping.len()))
        }
        Some(encoder) => Cell::new(encoder.mapping.len()),
        None => dim_cell("-"),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn dim_cell(value: impl ToString) -> Cell {
    Cell::new(value.to_string()).add_attribute(Attribute::Dim)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
