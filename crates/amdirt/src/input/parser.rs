//! Schema-driven TSV parser.

use std::collections::HashSet;
use std::time::Duration;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::DEFAULT_TIMEOUT;
use crate::error::{AmdirtError, Result};
use crate::schema::{ScalarType, TableSchema};

use super::location::Location;
use super::source::{line_number, DataTable, SourceMetadata};
use super::value::CellValue;

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Field delimiter.
    pub delimiter: u8,
    /// Quote character.
    pub quote: u8,
    /// Timeout for tables fetched over HTTP.
    pub timeout: Duration,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: b'\t',
            quote: b'"',
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Parses tabular data under a schema's column types.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Read and parse a table from a path or URL.
    pub fn parse_location(&self, location: &Location, schema: &TableSchema) -> Result<DataTable> {
        let text = location.read_to_string_with_timeout(self.config.timeout)?;
        self.parse_bytes(&location.name(), &location.to_string(), text.as_bytes(), schema)
    }

    /// Parse a table held in memory.
    pub fn parse_str(&self, name: &str, text: &str, schema: &TableSchema) -> Result<DataTable> {
        self.parse_bytes(name, name, text.as_bytes(), schema)
    }

    fn parse_bytes(
        &self,
        name: &str,
        location: &str,
        bytes: &[u8],
        schema: &TableSchema,
    ) -> Result<DataTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter)
            .has_headers(true)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| AmdirtError::Parse(e.to_string()))?
            .iter()
            .map(|s| s.to_string())
            .collect();

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(AmdirtError::Parse("No columns to parse from file".to_string()));
        }

        let mut seen = HashSet::new();
        for header in &headers {
            if !seen.insert(header.as_str()) {
                return Err(AmdirtError::Parse(format!(
                    "Duplicate column name '{}' in header",
                    header
                )));
            }
        }

        // Column -> scalar projection derived from the schema
        let types: Vec<ScalarType> = headers.iter().map(|h| schema.scalar_for(h)).collect();
        let expected_cols = headers.len();

        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result.map_err(|e| AmdirtError::Parse(e.to_string()))?;
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or_else(|| line_number(row_idx));

            if record.len() > expected_cols {
                return Err(AmdirtError::Parse(format!(
                    "Expected {} fields in line {}, saw {}",
                    expected_cols,
                    line,
                    record.len()
                )));
            }

            let mut row = Vec::with_capacity(expected_cols);
            for (col_idx, field) in record.iter().enumerate() {
                let value = CellValue::parse(field, types[col_idx]).map_err(|e| {
                    AmdirtError::Parse(format!(
                        "Unable to parse column '{}' at line {}: {}",
                        headers[col_idx], line, e
                    ))
                })?;
                row.push(value);
            }

            // Pad row if needed
            while row.len() < expected_cols {
                row.push(CellValue::Null);
            }

            rows.push(row);
        }

        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let hash = format!("sha256:{:x}", hasher.finalize());

        debug!(
            table = name,
            rows = rows.len(),
            columns = expected_cols,
            "parsed table"
        );

        let source = SourceMetadata::new(
            name.to_string(),
            location.to_string(),
            hash,
            bytes.len() as u64,
            rows.len(),
            expected_cols,
        );

        Ok(DataTable::new(headers, rows, source))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
