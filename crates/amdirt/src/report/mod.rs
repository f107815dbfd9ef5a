//! Rendering of accumulated validation errors.
//!
//! Every renderer writes to a caller-supplied sink. With no errors nothing is
//! written and the verdict is logged instead.

mod console;
mod json;
mod markdown;

use std::io::Write;

use tracing::info;

use crate::error::{AmdirtError, Result};
use crate::validation::ValidationError;

pub use console::render_console;
pub use json::render_json;
pub use markdown::render_markdown;

/// Column headers shared by the tabular renderers.
pub const REPORT_HEADERS: [&str; 5] = ["Error", "Source", "Column", "Row", "Message"];

/// Output format of a validation report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Box-drawn table for terminals.
    #[default]
    Console,
    /// GitHub-flavoured markdown table.
    Markdown,
    /// Machine-readable JSON.
    Json,
}

/// Title of a report for `dataset` checked against `schema`.
pub fn report_title(dataset: &str, schema: &str) -> String {
    format!("AMDirT Validation Report of {} against {}", dataset, schema)
}

/// Write a report and turn a non-empty error list into `Err(InvalidDataset)`.
pub fn write_report(
    format: ReportFormat,
    dataset: &str,
    schema: &str,
    errors: &[ValidationError],
    out: &mut dyn Write,
) -> Result<()> {
    if errors.is_empty() {
        info!("{} is valid", dataset);
        return Ok(());
    }

    let rendered = match format {
        ReportFormat::Console => render_console(dataset, schema, errors),
        ReportFormat::Markdown => render_markdown(dataset, errors),
        ReportFormat::Json => render_json(dataset, schema, errors)?,
    };
    out.write_all(rendered.as_bytes())?;
    out.flush()?;

    Err(AmdirtError::InvalidDataset {
        dataset: dataset.to_string(),
        errors: errors.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ErrorKind;

    #[test]
    fn test_valid_writes_nothing() {
        let mut out = Vec::new();
        write_report(ReportFormat::Markdown, "d.tsv", "s.json", &[], &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_invalid_is_error() {
        let errors = vec![ValidationError::new(ErrorKind::DuplicateRowError, "x", "m")];
        for format in [ReportFormat::Console, ReportFormat::Markdown, ReportFormat::Json] {
            let mut out = Vec::new();
            let result = write_report(format, "d.tsv", "s.json", &errors, &mut out);
            assert!(matches!(
                result,
                Err(AmdirtError::InvalidDataset { errors: 1, .. })
            ));
            assert!(!out.is_empty());
        }
    }

    #[test]
    fn test_title() {
        assert_eq!(
            report_title("samples.tsv", "samples.json"),
            "AMDirT Validation Report of samples.tsv against samples.json"
        );
    }
}
