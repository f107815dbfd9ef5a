//! Table-level schema definition.

use indexmap::IndexMap;
use serde_json::Value;

use super::types::{ColumnSpec, ScalarType};

/// Schema for one tabular record type.
#[derive(Debug, Clone)]
pub struct TableSchema {
    /// Human-readable name (file name or last URL segment).
    pub name: String,
    /// Columns that must be present.
    pub required: Vec<String>,
    /// Declared columns, in schema order.
    pub columns: IndexMap<String, ColumnSpec>,
    /// The document as loaded.
    pub raw: Value,
    /// The document handed to the JSON-Schema validator, column `$ref`s inlined.
    pub compiled: Value,
}

impl TableSchema {
    /// Get a column by name.
    pub fn get_column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.get(name)
    }

    /// Get all column names, in schema order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(|k| k.as_str()).collect()
    }

    /// Scalar type to parse a column with. Undeclared columns read as strings.
    pub fn scalar_for(&self, column: &str) -> ScalarType {
        self.columns
            .get(column)
            .map(|c| c.scalar)
            .unwrap_or(ScalarType::String)
    }

    /// Documentation link attached to a column, if any.
    pub fn doc_link(&self, column: &str) -> Option<&str> {
        self.columns.get(column).and_then(|c| c.doc_link.as_deref())
    }
}
