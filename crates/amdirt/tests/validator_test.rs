//! Integration tests for the dataset validator.

use std::io::Write;
use tempfile::NamedTempFile;

use amdirt::{AmdirtError, DatasetValidator, ErrorKind, Location};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

fn validator_for(schema: &str, dataset: &str) -> (DatasetValidator, NamedTempFile, NamedTempFile) {
    let schema_file = create_test_file(schema);
    let dataset_file = create_test_file(dataset);
    let validator = DatasetValidator::new(
        &Location::from(schema_file.path()),
        &Location::from(dataset_file.path()),
    );
    (validator, schema_file, dataset_file)
}

const WEIGHT_SCHEMA: &str = r#"{
    "type": "array",
    "items": {
        "type": "object",
        "properties": {
            "sample": {"type": "string"},
            "weight": {"type": ["integer", "null"]}
        },
        "required": ["sample", "weight"]
    }
}"#;

const PROJECT_SCHEMA: &str = r#"{
    "type": "array",
    "items": {
        "type": "object",
        "properties": {
            "project_name": {"type": "string"},
            "publication_doi": {"type": ["string", "null"]},
            "archive": {"type": "string", "enum": ["ENA", "SRA", "OSF"]},
            "archive_project": {"type": "string"},
            "archive_accession": {"type": "string"}
        },
        "required": ["project_name", "publication_doi", "archive", "archive_project", "archive_accession"]
    }
}"#;

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_weight_scenario() {
    let (mut v, _s, _d) = validator_for(
        WEIGHT_SCHEMA,
        "sample\tweight\n\
         bone1\t10\n\
         bone1\t10\n\
         bone2\t\n",
    );
    assert!(v.parsing_ok());

    assert!(!v.check_duplicate_rows());
    assert_eq!(v.errors().len(), 1);
    assert_eq!(v.errors()[0].kind, ErrorKind::DuplicateRowError);
    assert_eq!(v.errors()[0].rows, vec![0, 1]);

    assert!(v.validate_schema());
    assert!(v.check_columns());
    assert_eq!(v.errors().len(), 1);
}

#[test]
fn test_doi_scenario() {
    let (mut v, _s, _d) = validator_for(
        PROJECT_SCHEMA,
        "project_name\tpublication_doi\tarchive\tarchive_project\tarchive_accession\n\
         A\t10.1/x\tENA\tPRJEB1\tERS1\n\
         A\t10.1/y\tENA\tPRJEB1\tERS2\n\
         B\t10.1/z\tENA\tPRJEB2\tERS3\n",
    );

    assert!(!v.check_duplicate_dois());
    assert_eq!(v.errors().len(), 1);
    let error = &v.errors()[0];
    assert_eq!(error.kind, ErrorKind::DuplicatedDoiError);
    assert!(error.message.contains("A project"));
    let dois = error.source_values();
    assert!(dois.len() >= 2);
    assert!(dois.contains(&"10.1/x".to_string()));
    assert!(dois.contains(&"10.1/y".to_string()));
}

#[test]
fn test_multi_value_scenario() {
    let (mut v, _s, _d) = validator_for(
        PROJECT_SCHEMA,
        "project_name\tpublication_doi\tarchive\tarchive_project\tarchive_accession\n\
         A\t10.1/x\tENA\tPRJEB1\tA,B,A\n\
         A\t10.1/x\tENA\tPRJEB1\tA,B,C\n",
    );

    assert!(!v.check_multi_values(&["archive_accession"]));
    assert_eq!(v.errors().len(), 1);
    assert_eq!(v.errors()[0].kind, ErrorKind::DuplicateEntryError);
    assert_eq!(v.errors()[0].source_values(), vec!["A"]);
    assert_eq!(v.errors()[0].rows, vec![0]);
}

#[test]
fn test_multi_value_clean() {
    let (mut v, _s, _d) = validator_for(
        PROJECT_SCHEMA,
        "project_name\tpublication_doi\tarchive\tarchive_project\tarchive_accession\n\
         A\t10.1/x\tENA\tPRJEB1\tA,B,C\n",
    );
    assert!(v.check_multi_values(&["archive_accession"]));
    assert!(v.errors().is_empty());
}

// =============================================================================
// Containment and Idempotence
// =============================================================================

#[test]
fn test_parsing_containment() {
    let (mut v, _s, _d) = validator_for(WEIGHT_SCHEMA, "sample\tweight\nbone1\theavy\n");

    assert!(!v.parsing_ok());
    assert_eq!(v.errors().len(), 1);
    assert_eq!(v.errors()[0].kind, ErrorKind::ParsingError);

    assert!(!v.check_columns());
    assert!(!v.check_duplicate_rows());
    assert!(!v.check_multi_values(&["sample"]));
    assert!(!v.check_duplicate_dois());
    assert!(!v.validate_schema());
    assert_eq!(v.errors().len(), 1);
}

#[test]
fn test_schema_with_mixed_types() {
    let schema = r#"{"items": {"properties": {
        "weight": {"type": ["integer", "string"]}
    }, "required": ["weight"]}}"#;
    let (v, _s, _d) = validator_for(schema, "weight\n1\n");

    assert!(!v.parsing_ok());
    assert_eq!(v.errors()[0].kind, ErrorKind::SchemaError);
    assert_eq!(v.errors()[0].column.as_deref(), Some("weight"));
    assert!(v.errors()[0].message.contains("no mixed types"));
}

#[test]
fn test_schema_with_null_first() {
    let schema = r#"{"items": {"properties": {
        "weight": {"type": ["null", "integer"]}
    }, "required": ["weight"]}}"#;
    let (v, _s, _d) = validator_for(schema, "weight\n1\n");

    assert!(!v.parsing_ok());
    assert_eq!(v.errors()[0].kind, ErrorKind::SchemaError);
}

#[test]
fn test_missing_schema_file() {
    let dataset = create_test_file("sample\tweight\nbone1\t1\n");
    let v = DatasetValidator::new(
        &Location::parse("/nonexistent/schema.json"),
        &Location::from(dataset.path()),
    );
    assert!(!v.parsing_ok());
    assert_eq!(v.errors()[0].kind, ErrorKind::SchemaError);
}

#[test]
fn test_checks_append_again() {
    let (mut v, _s, _d) = validator_for(WEIGHT_SCHEMA, "sample\tweight\nbone1\t1\nbone1\t1\n");

    assert!(!v.check_duplicate_rows());
    assert!(!v.check_duplicate_rows());
    assert_eq!(v.errors().len(), 2);
    assert_eq!(v.errors()[0], v.errors()[1]);
}

// =============================================================================
// Columns and Schema
// =============================================================================

#[test]
fn test_extra_and_missing_columns() {
    let (mut v, _s, _d) = validator_for(WEIGHT_SCHEMA, "sample\tcolour\nbone1\tred\n");

    assert!(!v.check_columns());
    let columns: Vec<_> = v
        .errors()
        .iter()
        .map(|e| e.column.clone().unwrap_or_default())
        .collect();
    assert_eq!(columns, vec!["colour", "weight"]);
}

#[test]
fn test_schema_violation_line_number() {
    let (mut v, _s, _d) = validator_for(
        PROJECT_SCHEMA,
        "project_name\tpublication_doi\tarchive\tarchive_project\tarchive_accession\n\
         A\t10.1/x\tENA\tPRJEB1\tERS1\n\
         A\t10.1/x\tDDBJ\tPRJEB1\tERS2\n",
    );

    assert!(!v.validate_schema());
    assert_eq!(v.errors().len(), 1);
    let error = &v.errors()[0];
    assert_eq!(error.kind, ErrorKind::SchemaValidationError);
    assert_eq!(error.column.as_deref(), Some("archive"));
    assert_eq!(error.line_numbers(), vec![3]);
}

#[test]
fn test_vocabulary_behind_ref_is_enforced() {
    let vocabulary =
        create_test_file(r#"{"enum": ["bone", "tooth", "dental calculus", "sediment"]}"#);
    let link = format!("file://{}", vocabulary.path().display());
    let schema = format!(
        r#"{{
            "type": "array",
            "items": {{
                "type": "object",
                "properties": {{
                    "sample": {{"type": "string"}},
                    "material": {{"type": "string", "$ref": "{}"}}
                }},
                "required": ["sample", "material"]
            }}
        }}"#,
        link
    );

    let (mut v, _s, _d) = validator_for(&schema, "sample\tmaterial\nS1\tbone\nS2\tantler\n");

    assert!(!v.validate_schema());
    assert_eq!(v.errors().len(), 1);
    let error = &v.errors()[0];
    assert_eq!(error.column.as_deref(), Some("material"));
    assert_eq!(error.line_numbers(), vec![3]);
    assert_eq!(
        error.message,
        format!("'antler' is not an accepted value. Please check {}", link)
    );
}

// =============================================================================
// Reports
// =============================================================================

#[test]
fn test_reports_fail_on_errors() {
    let (mut v, _s, _d) = validator_for(WEIGHT_SCHEMA, "sample\tweight\nbone1\t1\nbone1\t1\n");
    v.check_duplicate_rows();

    let mut console = Vec::new();
    let result = v.to_console_report(&mut console);
    assert!(matches!(result, Err(AmdirtError::InvalidDataset { errors: 1, .. })));
    let console = String::from_utf8(console).unwrap();
    assert!(console.contains("AMDirT Validation Report of"));
    assert!(console.contains("Duplicated Row Error"));

    let mut markdown = Vec::new();
    assert!(v.to_markdown_report(&mut markdown).is_err());
    let markdown = String::from_utf8(markdown).unwrap();
    assert!(markdown.starts_with("Invalid dataset `"));
    assert!(markdown.contains("| Duplicated Row Error |"));
    assert!(markdown.contains("| 2, 3 |"));

    let mut json = Vec::new();
    assert!(v.to_json_report(&mut json).is_err());
    let json: serde_json::Value = serde_json::from_slice(&json).unwrap();
    assert_eq!(json["errors"].as_array().unwrap().len(), 1);
}

#[test]
fn test_reports_pass_when_clean() {
    let (mut v, _s, _d) = validator_for(WEIGHT_SCHEMA, "sample\tweight\nbone1\t1\nbone2\t\n");
    assert!(v.validate_schema());
    assert!(v.check_duplicate_rows());
    assert!(v.check_columns());

    let mut out = Vec::new();
    v.to_console_report(&mut out).unwrap();
    v.to_markdown_report(&mut out).unwrap();
    v.to_json_report(&mut out).unwrap();
    assert!(out.is_empty());
}

#[test]
fn test_report_order_follows_checks() {
    let (mut v, _s, _d) = validator_for(
        WEIGHT_SCHEMA,
        "sample\tweight\textra\nbone1\t1\tx\nbone1\t1\tx\n",
    );
    v.check_columns();
    v.check_duplicate_rows();

    let kinds: Vec<_> = v.errors().iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![ErrorKind::ColumnDifferenceError, ErrorKind::DuplicateRowError]
    );
}
