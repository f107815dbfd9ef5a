//! Core type definitions for schema representation.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Scalar type a column's values are parsed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
    /// Text values.
    String,
    /// Whole numbers.
    Integer,
    /// Floating-point numbers.
    Number,
}

impl ScalarType {
    /// Map a JSON-Schema type name to a scalar type.
    ///
    /// Returns `None` for `"null"` and for types tabular data cannot carry.
    pub fn from_json_type(name: &str) -> Option<Self> {
        match name {
            "string" => Some(ScalarType::String),
            "integer" => Some(ScalarType::Integer),
            "number" => Some(ScalarType::Number),
            _ => None,
        }
    }

    /// The JSON-Schema name of this type.
    pub fn json_name(&self) -> &'static str {
        match self {
            ScalarType::String => "string",
            ScalarType::Integer => "integer",
            ScalarType::Number => "number",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.json_name())
    }
}

/// Declared shape of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name.
    pub name: String,
    /// Type values are parsed into.
    pub scalar: ScalarType,
    /// Whether the schema also admits `null`.
    pub nullable: bool,
    /// Enumerated allowed values, when the column is an enum.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<Value>>,
    /// Documentation link (the property's `$ref`), used in enum messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_link: Option<String>,
}

impl ColumnSpec {
    /// Whether the column is an enumeration.
    pub fn is_enum(&self) -> bool {
        self.allowed.is_some()
    }
}
