//! Parsed tables and their source metadata.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::value::CellValue;

/// Offset between a zero-based data row index and its line in the file.
pub const LINE_OFFSET: usize = 2;

/// Convert a zero-based data row index to its 1-based file line number.
pub fn line_number(row: usize) -> usize {
    row + LINE_OFFSET
}

/// Metadata about the source data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name (or last URL segment).
    pub file: String,
    /// Path or URL the table was read from.
    pub location: String,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the table was read.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    pub fn new(
        file: String,
        location: String,
        hash: String,
        size_bytes: u64,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        Self {
            file,
            location,
            hash,
            size_bytes,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// Represents parsed, typed tabular data.
#[derive(Debug, Clone)]
pub struct DataTable {
    /// Column headers, in file order.
    pub headers: Vec<String>,
    /// Typed rows (row-major order, file order).
    pub rows: Vec<Vec<CellValue>>,
    /// Where the table came from.
    pub source: SourceMetadata,
}

impl DataTable {
    /// Create a new data table.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>, source: SourceMetadata) -> Self {
        Self {
            headers,
            rows,
            source,
        }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &CellValue> {
        self.rows
            .iter()
            .map(move |row| row.get(index).unwrap_or(&CellValue::Null))
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Group row indices by the values of one column, in first-seen order.
    pub fn group_by(&self, column: usize) -> IndexMap<&CellValue, Vec<usize>> {
        let mut groups: IndexMap<&CellValue, Vec<usize>> = IndexMap::new();
        for (row_idx, value) in self.column_values(column).enumerate() {
            groups.entry(value).or_default().push(row_idx);
        }
        groups
    }

    /// JSON mirror of the table: an array of per-row objects.
    pub fn to_json(&self) -> Value {
        Value::Array(
            self.rows
                .iter()
                .map(|row| {
                    let record: Map<String, Value> = self
                        .headers
                        .iter()
                        .zip(row.iter())
                        .map(|(header, cell)| (header.clone(), cell.to_json()))
                        .collect();
                    Value::Object(record)
                })
                .collect(),
        )
    }
}

/// Split a comma-joined multi-value cell into its sub-values.
pub fn split_multi_value(cell: &str) -> impl Iterator<Item = &str> {
    cell.split(',')
}
