//! Per-project DOI uniqueness.

use std::collections::HashSet;

use serde_json::Value;

use crate::input::{CellValue, DataTable};
use crate::schema::TableSchema;

use super::record::{ErrorKind, ValidationError};
use super::structural::{missing_column, Check};

/// Each project must cite exactly one DOI.
pub struct DoiCheck {
    project_column: String,
    doi_column: String,
}

impl DoiCheck {
    pub fn new(project_column: impl Into<String>, doi_column: impl Into<String>) -> Self {
        Self {
            project_column: project_column.into(),
            doi_column: doi_column.into(),
        }
    }
}

impl Check for DoiCheck {
    fn run(&self, table: &DataTable, _schema: &TableSchema) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        let project_idx = table.column_index(&self.project_column);
        let doi_idx = table.column_index(&self.doi_column);
        let (Some(project_idx), Some(doi_idx)) = (project_idx, doi_idx) else {
            for (column, index) in [
                (&self.project_column, project_idx),
                (&self.doi_column, doi_idx),
            ] {
                if index.is_none() {
                    errors.push(missing_column(column, "DOI checking"));
                }
            }
            return errors;
        };

        for (project, rows) in table.group_by(project_idx) {
            if project.is_null() {
                continue;
            }
            let dois: Vec<&CellValue> = rows
                .iter()
                .filter_map(|&r| table.get(r, doi_idx))
                .filter(|v| !v.is_null())
                .collect();
            let distinct: HashSet<&CellValue> = dois.iter().copied().collect();
            if distinct.len() > 1 {
                let seen: Vec<Value> = dois.iter().map(|v| v.to_json()).collect();
                errors.push(
                    ValidationError::new(
                        ErrorKind::DuplicatedDoiError,
                        Value::Array(seen),
                        format!(
                            "Duplicate DOI for {} project. Make sure each project has a single DOI",
                            project
                        ),
                    )
                    .with_column(self.doi_column.as_str()),
                );
            }
        }

        errors
    }
}
