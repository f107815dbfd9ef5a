//! Draft-07 JSON-Schema validation of a table's JSON mirror.

use jsonschema::error::ValidationErrorKind;
use jsonschema::Validator;
use serde_json::Value;
use tracing::debug;

use crate::input::DataTable;
use crate::schema::{SchemaLoadError, TableSchema};

use super::record::{display_value, ErrorKind, ValidationError};
use super::structural::Check;

/// Enums longer than this are reported with a documentation link instead of
/// the full list of allowed values.
const ENUM_LISTING_LIMIT: usize = 3;

/// Compiled validator for one table schema.
pub struct SchemaValidator {
    validator: Validator,
}

impl SchemaValidator {
    /// Compile the schema with its column references inlined.
    pub fn new(schema: &TableSchema) -> Result<Self, SchemaLoadError> {
        let validator = jsonschema::draft7::new(&schema.compiled).map_err(|e| SchemaLoadError {
            source_value: schema.name.clone(),
            column: None,
            message: format!("Schema is not a valid draft-07 JSON Schema: {}", e),
        })?;
        Ok(Self { validator })
    }

    /// Validate a table, one record per violation.
    pub fn validate(&self, table: &DataTable, schema: &TableSchema) -> Vec<ValidationError> {
        let instance = table.to_json();
        let errors: Vec<ValidationError> = self
            .validator
            .iter_errors(&instance)
            .map(|e| {
                let path = e.instance_path.to_string();
                let segments = pointer_segments(&path);

                let row = segments.first().and_then(|s| s.parse::<usize>().ok());
                let column = match &e.kind {
                    ValidationErrorKind::Required { property } => {
                        Some(display_value(property))
                    }
                    _ if segments.len() > 1 => segments.last().cloned(),
                    _ => None,
                };

                let message = match (&e.kind, column.as_deref()) {
                    (ValidationErrorKind::Enum { options }, Some(col)) => {
                        enum_message(&e.instance, options, schema.doc_link(col))
                            .unwrap_or_else(|| e.to_string())
                    }
                    _ => e.to_string(),
                };

                let source = match &e.kind {
                    ValidationErrorKind::Required { property } => property.clone(),
                    _ => e.instance.clone().into_owned(),
                };

                let mut record = ValidationError::new(ErrorKind::SchemaValidationError, source, message);
                if let Some(column) = column {
                    record = record.with_column(column);
                }
                if let Some(row) = row {
                    record = record.with_row(row);
                }
                record
            })
            .collect();

        debug!(violations = errors.len(), "schema validation finished");
        errors
    }
}

impl Check for SchemaValidator {
    fn run(&self, table: &DataTable, schema: &TableSchema) -> Vec<ValidationError> {
        self.validate(table, schema)
    }
}

/// Unescaped segments of a JSON pointer.
fn pointer_segments(pointer: &str) -> Vec<String> {
    pointer
        .split('/')
        .skip(1)
        .map(|s| s.replace("~1", "/").replace("~0", "~"))
        .collect()
}

/// Short message for long enums, when the column links to its vocabulary.
fn enum_message(instance: &Value, options: &Value, doc_link: Option<&str>) -> Option<String> {
    let count = options.as_array().map(Vec::len).unwrap_or(0);
    if count <= ENUM_LISTING_LIMIT {
        return None;
    }
    doc_link.map(|link| {
        format!(
            "'{}' is not an accepted value. Please check {}",
            display_value(instance),
            link
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    use crate::input::Parser;
    use crate::schema::SchemaLoader;

    const MATERIALS: &str = r#"{"enum": ["bone", "tooth", "dental calculus", "sediment"]}"#;

    const SCHEMA: &str = r#"{
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "sample": {"type": "string"},
                "weight": {"type": "integer", "minimum": 0},
                "material": {"type": "string", "$ref": "MATERIAL_REF"},
                "sex": {"type": ["string", "null"], "enum": ["M", "F", null]}
            },
            "required": ["sample", "weight", "material", "sex"]
        }
    }"#;

    /// Validate `tsv` with the material vocabulary in its own document.
    fn run_with_link(tsv: &str) -> (Vec<ValidationError>, String) {
        let mut vocabulary = NamedTempFile::new().unwrap();
        vocabulary.write_all(MATERIALS.as_bytes()).unwrap();
        let link = format!("file://{}", vocabulary.path().display());

        let schema = SchemaLoader::from_str("schema.json", &SCHEMA.replace("MATERIAL_REF", &link))
            .unwrap();
        let table = Parser::new().parse_str("t.tsv", tsv, &schema).unwrap();
        let errors = SchemaValidator::new(&schema).unwrap().validate(&table, &schema);
        (errors, link)
    }

    fn run(tsv: &str) -> Vec<ValidationError> {
        run_with_link(tsv).0
    }

    #[test]
    fn test_valid_table() {
        let errors = run("sample\tweight\tmaterial\tsex\nS1\t3\tbone\tM\nS2\t4\ttooth\t\n");
        assert!(errors.is_empty(), "{:?}", errors);
    }

    #[test]
    fn test_row_and_column_provenance() {
        let errors = run("sample\tweight\tmaterial\tsex\nS1\t3\tbone\tM\nS2\t-1\ttooth\tF\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rows, vec![1]);
        assert_eq!(errors[0].column.as_deref(), Some("weight"));
        assert_eq!(errors[0].line_numbers(), vec![3]);
    }

    #[test]
    fn test_long_enum_links_documentation() {
        let (errors, link) = run_with_link("sample\tweight\tmaterial\tsex\nS1\t3\tantler\tM\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].column.as_deref(), Some("material"));
        assert_eq!(
            errors[0].message,
            format!("'antler' is not an accepted value. Please check {}", link)
        );
    }

    #[test]
    fn test_referenced_vocabulary_accepts_listed_values() {
        let errors = run("sample\tweight\tmaterial\tsex\nS1\t3\tdental calculus\tF\n");
        assert!(errors.is_empty(), "{:?}", errors);
    }

    #[test]
    fn test_short_enum_keeps_listing() {
        let errors = run("sample\tweight\tmaterial\tsex\nS1\t3\tbone\tX\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].column.as_deref(), Some("sex"));
        assert!(!errors[0].message.contains("Please check"));
    }

    #[test]
    fn test_null_in_non_nullable_column() {
        let errors = run("sample\tweight\tmaterial\tsex\nS1\tNA\tbone\tM\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].column.as_deref(), Some("weight"));
    }

    #[test]
    fn test_pointer_segments() {
        assert_eq!(pointer_segments("/0/weight"), vec!["0", "weight"]);
        assert_eq!(pointer_segments("/3/a~1b"), vec!["3", "a/b"]);
        assert!(pointer_segments("").is_empty());
    }
}
