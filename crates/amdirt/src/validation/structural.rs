//! Column-set, duplicate-row and multi-value checks.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::json;

use crate::input::{line_number, split_multi_value, CellValue, DataTable};
use crate::schema::TableSchema;

use super::record::{ErrorKind, ValidationError};

/// A check over a parsed table.
pub trait Check {
    /// Run the check and return the problems found.
    fn run(&self, table: &DataTable, schema: &TableSchema) -> Vec<ValidationError>;
}

/// Error for a column a check needs but the dataset lacks.
pub(crate) fn missing_column(column: &str, purpose: &str) -> ValidationError {
    ValidationError::new(
        ErrorKind::ColumnDifferenceError,
        column,
        format!("Column '{}' needed for {} is missing from dataset", column, purpose),
    )
    .with_column(column)
}

/// Dataset columns must equal the schema's required columns.
pub struct ColumnCheck;

impl Check for ColumnCheck {
    fn run(&self, table: &DataTable, schema: &TableSchema) -> Vec<ValidationError> {
        let required: HashSet<&str> = schema.required.iter().map(String::as_str).collect();
        let present: HashSet<&str> = table.headers.iter().map(String::as_str).collect();

        let mut errors = Vec::new();

        for header in &table.headers {
            if !required.contains(header.as_str()) {
                errors.push(
                    ValidationError::new(
                        ErrorKind::ColumnDifferenceError,
                        header.as_str(),
                        format!("Column '{}' is not among the schema's required columns", header),
                    )
                    .with_column(header.as_str()),
                );
            }
        }

        for column in &schema.required {
            if !present.contains(column.as_str()) {
                errors.push(
                    ValidationError::new(
                        ErrorKind::ColumnDifferenceError,
                        column.as_str(),
                        format!("Required column '{}' is missing from dataset", column),
                    )
                    .with_column(column.as_str()),
                );
            }
        }

        errors
    }
}

/// No two rows may carry identical values in every column.
pub struct DuplicateRowCheck;

impl Check for DuplicateRowCheck {
    fn run(&self, table: &DataTable, _schema: &TableSchema) -> Vec<ValidationError> {
        let mut groups: IndexMap<&[CellValue], Vec<usize>> = IndexMap::new();
        for (row_idx, row) in table.rows.iter().enumerate() {
            groups.entry(row.as_slice()).or_default().push(row_idx);
        }

        groups
            .into_values()
            .filter(|rows| rows.len() > 1)
            .map(|rows| {
                let lines: Vec<usize> = rows.iter().map(|&r| line_number(r)).collect();
                let listed: Vec<String> = lines.iter().map(usize::to_string).collect();
                ValidationError::new(
                    ErrorKind::DuplicateRowError,
                    json!(lines),
                    format!("Rows {} are duplicated", listed.join(", ")),
                )
                .with_rows(rows)
            })
            .collect()
    }
}

/// Comma-joined cells must not repeat a sub-value.
pub struct MultiValueCheck {
    columns: Vec<String>,
}

impl MultiValueCheck {
    pub fn new<S: AsRef<str>>(columns: &[S]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
        }
    }

    /// Sub-values occurring more than once, in first-seen order.
    fn repeated(cell: &str) -> Vec<&str> {
        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for part in split_multi_value(cell) {
            *counts.entry(part).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(part, _)| part)
            .collect()
    }
}

impl Check for MultiValueCheck {
    fn run(&self, table: &DataTable, _schema: &TableSchema) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for column in &self.columns {
            let Some(index) = table.column_index(column) else {
                errors.push(missing_column(column, "multi-value checking"));
                continue;
            };

            for (row_idx, value) in table.column_values(index).enumerate() {
                let Some(cell) = value.as_str() else {
                    continue;
                };
                let repeated = Self::repeated(cell);
                if repeated.is_empty() {
                    continue;
                }
                errors.push(
                    ValidationError::new(
                        ErrorKind::DuplicateEntryError,
                        json!(repeated),
                        format!(
                            "Duplicated entries {} in column '{}'",
                            repeated.join(", "),
                            column
                        ),
                    )
                    .with_column(column.as_str())
                    .with_row(row_idx),
                );
            }
        }

        errors
    }
}
