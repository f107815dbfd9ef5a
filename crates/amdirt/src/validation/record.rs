//! Structured validation error records.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::input::line_number;

/// Kind of problem a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The schema itself is malformed.
    SchemaError,
    /// The dataset could not be parsed under the schema's column types.
    ParsingError,
    /// Dataset columns differ from the schema's required columns.
    ColumnDifferenceError,
    /// Two or more rows are identical.
    DuplicateRowError,
    /// A multi-valued cell repeats a sub-value.
    DuplicateEntryError,
    /// A project declares more than one DOI.
    DuplicatedDoiError,
    /// A new accession is not registered in the archive.
    InvalidAccessionError,
    /// A JSON-Schema constraint is violated.
    SchemaValidationError,
    /// The archive could not be reached for a project.
    NetworkError,
}

impl ErrorKind {
    /// Get a human-readable label for the error kind.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::SchemaError => "Schema Error",
            ErrorKind::ParsingError => "Dataset Parsing Error",
            ErrorKind::ColumnDifferenceError => "Different Columns Error",
            ErrorKind::DuplicateRowError => "Duplicated Row Error",
            ErrorKind::DuplicateEntryError => "Duplicated Entries in column Error",
            ErrorKind::DuplicatedDoiError => "Duplicated DOI Error",
            ErrorKind::InvalidAccessionError => "Invalid Accession Error",
            ErrorKind::SchemaValidationError => "Schema Validation Error",
            ErrorKind::NetworkError => "Network Error",
        }
    }

    /// Whether this kind stops every further check.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ErrorKind::SchemaError | ErrorKind::ParsingError)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One problem found while validating a dataset.
///
/// Records are immutable once created. `rows` holds zero-based data row
/// indices; [`ValidationError::line_numbers`] converts them to file lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Kind of problem.
    pub kind: ErrorKind,
    /// The offending value(s).
    pub source: Value,
    /// Affected column, if column-specific.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    /// Affected data rows (zero-based).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<usize>,
    /// Human-readable description.
    pub message: String,
}

impl ValidationError {
    /// Create a new record with no column or row provenance.
    pub fn new(kind: ErrorKind, source: impl Into<Value>, message: impl Into<String>) -> Self {
        Self {
            kind,
            source: source.into(),
            column: None,
            rows: Vec::new(),
            message: message.into(),
        }
    }

    /// Set the affected column.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Set a single affected row.
    pub fn with_row(mut self, row: usize) -> Self {
        self.rows = vec![row];
        self
    }

    /// Set the affected rows.
    pub fn with_rows(mut self, rows: Vec<usize>) -> Self {
        self.rows = rows;
        self
    }

    /// File line numbers of the affected rows.
    pub fn line_numbers(&self) -> Vec<usize> {
        self.rows.iter().map(|&r| line_number(r)).collect()
    }

    /// Offending values as strings (arrays are flattened one level).
    pub fn source_values(&self) -> Vec<String> {
        match &self.source {
            Value::Array(values) => values.iter().map(display_value).collect(),
            Value::Null => Vec::new(),
            other => vec![display_value(other)],
        }
    }

    /// The five report cells: Error, Source, Column, Row, Message.
    pub fn to_cells(&self) -> [String; 5] {
        [
            self.kind.label().to_string(),
            self.source_values().join(", "),
            self.column.clone().unwrap_or_default(),
            self.line_numbers()
                .iter()
                .map(|l| l.to_string())
                .collect::<Vec<_>>()
                .join(", "),
            self.message.clone(),
        ]
    }
}

/// Render a JSON value the way a curator typed it (strings unquoted).
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "NA".to_string(),
        other => other.to_string(),
    }
}
