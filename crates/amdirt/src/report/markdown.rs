//! GitHub markdown renderer, for posting reports on pull requests.

use crate::validation::ValidationError;

use super::REPORT_HEADERS;

/// Render errors as `Invalid dataset` followed by a markdown table.
pub fn render_markdown(dataset: &str, errors: &[ValidationError]) -> String {
    let mut out = format!("Invalid dataset `{}`\n\n", dataset);

    out.push_str(&format!("| {} |\n", REPORT_HEADERS.join(" | ")));
    out.push_str(&format!("|{}\n", "---|".repeat(REPORT_HEADERS.len())));

    for error in errors {
        let cells: Vec<String> = error.to_cells().iter().map(|c| escape_cell(c)).collect();
        out.push_str(&format!("| {} |\n", cells.join(" | ")));
    }

    out
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
}
