//! Terminal table renderer.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::validation::ValidationError;

use super::{report_title, REPORT_HEADERS};

/// Render errors as a titled box table.
pub fn render_console(dataset: &str, schema: &str, errors: &[ValidationError]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            REPORT_HEADERS
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );

    for error in errors {
        let [kind, source, column, rows, message] = error.to_cells();
        table.add_row(vec![
            Cell::new(kind).fg(Color::Red),
            Cell::new(source),
            Cell::new(column).fg(Color::Cyan),
            Cell::new(rows),
            Cell::new(message),
        ]);
    }

    format!("{}\n{table}\n", report_title(dataset, schema))
}
