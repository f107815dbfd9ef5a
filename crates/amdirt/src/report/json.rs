//! JSON renderer.

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::validation::{ErrorKind, ValidationError};

#[derive(Serialize)]
struct JsonReport<'a> {
    dataset: &'a str,
    schema: &'a str,
    valid: bool,
    errors: Vec<JsonRecord<'a>>,
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    error: &'static str,
    kind: ErrorKind,
    source: &'a Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    column: Option<&'a str>,
    lines: Vec<usize>,
    message: &'a str,
}

/// Render errors as a pretty-printed JSON document.
pub fn render_json(dataset: &str, schema: &str, errors: &[ValidationError]) -> Result<String> {
    let report = JsonReport {
        dataset,
        schema,
        valid: errors.is_empty(),
        errors: errors
            .iter()
            .map(|e| JsonRecord {
                error: e.kind.label(),
                kind: e.kind,
                source: &e.source,
                column: e.column.as_deref(),
                lines: e.line_numbers(),
                message: &e.message,
            })
            .collect(),
    };

    let mut out = serde_json::to_string_pretty(&report)?;
    out.push('\n');
    Ok(out)
}
