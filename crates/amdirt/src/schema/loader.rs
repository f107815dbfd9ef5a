//! Loading and normalizing table schemas.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::input::Location;

use super::table::TableSchema;
use super::types::{ColumnSpec, ScalarType};

/// Why a schema could not be turned into a [`TableSchema`].
///
/// The validator records this as a single `SchemaError` entry.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct SchemaLoadError {
    /// The offending value (schema name, or the rejected type declaration).
    pub source_value: String,
    /// Column the problem was found in, when column-specific.
    pub column: Option<String>,
    /// Human-readable description.
    pub message: String,
}

impl SchemaLoadError {
    fn new(source_value: impl Into<String>, column: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            source_value: source_value.into(),
            column: column.map(str::to_string),
            message: message.into(),
        }
    }
}

/// Loads JSON schemas of the shape `{"items": {"properties": {...}, "required": [...]}}`.
pub struct SchemaLoader;

impl SchemaLoader {
    /// Load a schema from a path or URL.
    pub fn load(location: &Location) -> Result<TableSchema, SchemaLoadError> {
        let name = location.name();
        let text = location
            .read_to_string()
            .map_err(|e| SchemaLoadError::new(&name, None, format!("Unable to read schema: {}", e)))?;
        let raw = parse_json(&name, &text)?;
        Self::build(&name, raw, Some(location))
    }

    /// Parse a schema from JSON text.
    ///
    /// Relative column `$ref`s resolve against the working directory.
    pub fn from_str(name: &str, text: &str) -> Result<TableSchema, SchemaLoadError> {
        let raw = parse_json(name, text)?;
        Self::build(name, raw, None)
    }

    /// Build a schema from an already-parsed JSON document.
    pub fn from_value(name: &str, raw: Value) -> Result<TableSchema, SchemaLoadError> {
        Self::build(name, raw, None)
    }

    fn build(name: &str, raw: Value, base: Option<&Location>) -> Result<TableSchema, SchemaLoadError> {
        let compiled = inline_column_refs(&raw, base);

        let items = raw
            .get("items")
            .and_then(Value::as_object)
            .ok_or_else(|| SchemaLoadError::new(name, None, "Schema has no 'items' object"))?;

        let properties = items
            .get("properties")
            .and_then(Value::as_object)
            .ok_or_else(|| {
                SchemaLoadError::new(name, None, "Schema has no 'items.properties' object")
            })?;

        let mut columns = IndexMap::with_capacity(properties.len());
        for (column, definition) in properties {
            let effective = &compiled["items"]["properties"][column.as_str()];
            let spec = column_spec(column, definition, effective)?;
            columns.insert(column.clone(), spec);
        }

        let required = match items.get("required") {
            None => Vec::new(),
            Some(Value::Array(values)) => values
                .iter()
                .map(|v| {
                    v.as_str().map(str::to_string).ok_or_else(|| {
                        SchemaLoadError::new(
                            v.to_string(),
                            None,
                            "Entries of 'items.required' must be column names",
                        )
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => {
                return Err(SchemaLoadError::new(
                    other.to_string(),
                    None,
                    "'items.required' must be an array",
                ));
            }
        };

        debug!(
            schema = name,
            columns = columns.len(),
            required = required.len(),
            "loaded schema"
        );

        Ok(TableSchema {
            name: name.to_string(),
            required,
            columns,
            raw,
            compiled,
        })
    }
}

fn parse_json(name: &str, text: &str) -> Result<Value, SchemaLoadError> {
    serde_json::from_str(text).map_err(|e| {
        SchemaLoadError::new(
            name,
            None,
            format!(
                "Invalid JSON in schema at line {}, column {}: {}",
                e.line(),
                e.column(),
                e
            ),
        )
    })
}

/// Interpret one property definition.
///
/// `effective` is the definition after `$ref` resolution; it decides the enum.
fn column_spec(
    column: &str,
    definition: &Value,
    effective: &Value,
) -> Result<ColumnSpec, SchemaLoadError> {
    let declared = definition.get("type").ok_or_else(|| {
        SchemaLoadError::new(column, Some(column), "Column has no declared type in schema")
    })?;

    let names: Vec<&str> = match declared {
        Value::String(name) => vec![name.as_str()],
        Value::Array(entries) => entries
            .iter()
            .map(|e| {
                e.as_str().ok_or_else(|| {
                    SchemaLoadError::new(declared.to_string(), Some(column), "Type entries must be strings")
                })
            })
            .collect::<Result<Vec<_>, _>>()?,
        _ => {
            return Err(SchemaLoadError::new(
                declared.to_string(),
                Some(column),
                "Column type must be a string or a list of strings",
            ));
        }
    };

    match names.first() {
        None => {
            return Err(SchemaLoadError::new(
                declared.to_string(),
                Some(column),
                "Column type list is empty",
            ));
        }
        Some(&"null") => {
            return Err(SchemaLoadError::new(
                declared.to_string(),
                Some(column),
                "Default/first type of column in schema can not be null",
            ));
        }
        Some(_) => {}
    }

    let non_null: Vec<&str> = names.iter().copied().filter(|n| *n != "null").collect();
    if non_null.len() > 1 {
        return Err(SchemaLoadError::new(
            declared.to_string(),
            Some(column),
            "Column can only have one non-null type, no mixed types allowed",
        ));
    }

    let scalar = ScalarType::from_json_type(non_null[0]).ok_or_else(|| {
        SchemaLoadError::new(
            non_null[0],
            Some(column),
            format!("Unsupported column type '{}'", non_null[0]),
        )
    })?;

    Ok(ColumnSpec {
        name: column.to_string(),
        scalar,
        nullable: names.contains(&"null"),
        allowed: effective.get("enum").and_then(Value::as_array).cloned(),
        doc_link: definition
            .get("$ref")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

/// Copy of the schema with each column `$ref` replaced by the document it names.
///
/// A resolved `$ref` replaces its sibling keywords, as in draft-07. A reference
/// that cannot be fetched or parsed is dropped and the siblings stay in force.
/// Fragment-only references are left for the validator.
fn inline_column_refs(raw: &Value, base: Option<&Location>) -> Value {
    let mut compiled = raw.clone();
    let Some(properties) = compiled
        .get_mut("items")
        .and_then(|items| items.get_mut("properties"))
        .and_then(Value::as_object_mut)
    else {
        return compiled;
    };

    let mut fetched: HashMap<String, Option<Value>> = HashMap::new();
    for (column, definition) in properties.iter_mut() {
        let Some(obj) = definition.as_object_mut() else {
            continue;
        };
        let Some(reference) = obj.get("$ref").and_then(Value::as_str).map(str::to_string) else {
            continue;
        };
        if reference.starts_with('#') {
            continue;
        }

        let (document, fragment) = match reference.split_once('#') {
            Some((document, fragment)) => (document.to_string(), fragment.to_string()),
            None => (reference.clone(), String::new()),
        };
        let resolved = fetched
            .entry(document.clone())
            .or_insert_with(|| fetch_ref(&document, base))
            .as_ref()
            .and_then(|doc| if fragment.is_empty() { Some(doc) } else { doc.pointer(&fragment) })
            .and_then(Value::as_object)
            .cloned();

        match resolved {
            Some(mut target) => {
                target.remove("$id");
                target.remove("$schema");
                debug!(column = column.as_str(), reference = reference.as_str(), "inlined column reference");
                *obj = target;
            }
            None => {
                warn!(
                    column = column.as_str(),
                    reference = reference.as_str(),
                    "column reference could not be resolved, using inline keywords"
                );
                obj.remove("$ref");
            }
        }
    }
    compiled
}

fn fetch_ref(document: &str, base: Option<&Location>) -> Option<Value> {
    let location = match base {
        Some(base) => base.join(document),
        None => Location::parse(document),
    };
    let text = match location.read_to_string() {
        Ok(text) => text,
        Err(e) => {
            debug!(reference = document, error = %e, "reference fetch failed");
            return None;
        }
    };
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(reference = document, error = %e, "reference is not JSON");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn enum_document(values: Value) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        let doc = json!({"$id": "material.json", "title": "Material", "enum": values});
        file.write_all(doc.to_string().as_bytes()).unwrap();
        file
    }

    fn schema_with(properties: Value) -> Value {
        json!({
            "items": {
                "properties": properties,
                "required": ["sample"]
            }
        })
    }

    #[test]
    fn test_scalar_and_nullable_columns() {
        let schema = SchemaLoader::from_value(
            "schema.json",
            schema_with(json!({
                "sample": {"type": "string"},
                "weight": {"type": ["integer", "null"]},
                "depth": {"type": ["number"]}
            })),
        )
        .unwrap();

        assert_eq!(schema.column_names(), vec!["sample", "weight", "depth"]);
        let weight = schema.get_column("weight").unwrap();
        assert_eq!(weight.scalar, ScalarType::Integer);
        assert!(weight.nullable);
        assert!(!schema.get_column("sample").unwrap().nullable);
        assert_eq!(schema.scalar_for("depth"), ScalarType::Number);
        assert_eq!(schema.scalar_for("undeclared"), ScalarType::String);
        assert_eq!(schema.required, vec!["sample"]);
    }

    #[test]
    fn test_mixed_types_rejected() {
        let err = SchemaLoader::from_value(
            "schema.json",
            schema_with(json!({"weight": {"type": ["integer", "string"]}})),
        )
        .unwrap_err();
        assert_eq!(err.column.as_deref(), Some("weight"));
        assert!(err.message.contains("no mixed types"));
    }

    #[test]
    fn test_null_first_rejected() {
        for declared in [json!("null"), json!(["null", "integer"])] {
            let err = SchemaLoader::from_value(
                "schema.json",
                schema_with(json!({"weight": {"type": declared}})),
            )
            .unwrap_err();
            assert!(err.message.contains("can not be null"));
        }
    }

    #[test]
    fn test_malformed_json_reports_position() {
        let err = SchemaLoader::from_str("schema.json", "{\n  \"items\": {\n    oops\n}").unwrap_err();
        assert_eq!(err.source_value, "schema.json");
        assert!(err.message.contains("line 3"));
    }

    #[test]
    fn test_enum_and_doc_link() {
        let schema = SchemaLoader::from_value(
            "schema.json",
            schema_with(json!({
                "material": {
                    "type": "string",
                    "enum": ["bone", "tooth", "dental calculus", "sediment"],
                    "$ref": "file:///nonexistent/amdirt/enums/material.json"
                }
            })),
        )
        .unwrap();

        let material = schema.get_column("material").unwrap();
        assert!(material.is_enum());
        assert_eq!(
            schema.doc_link("material"),
            Some("file:///nonexistent/amdirt/enums/material.json")
        );
        let compiled = &schema.compiled["items"]["properties"]["material"];
        assert!(compiled.get("$ref").is_none());
        assert_eq!(compiled["enum"].as_array().unwrap().len(), 4);
        assert!(schema.raw["items"]["properties"]["material"].get("$ref").is_some());
    }

    #[test]
    fn test_ref_document_replaces_inline_keywords() {
        let vocabulary = enum_document(json!(["bone", "tooth", "antler", "shell", "hair"]));
        let link = format!("file://{}", vocabulary.path().display());
        let schema = SchemaLoader::from_value(
            "schema.json",
            schema_with(json!({
                "material": {"type": "string", "enum": ["bone"], "$ref": link}
            })),
        )
        .unwrap();

        let compiled = &schema.compiled["items"]["properties"]["material"];
        assert_eq!(compiled["enum"].as_array().unwrap().len(), 5);
        assert!(compiled.get("$id").is_none());
        assert!(compiled.get("$ref").is_none());

        let material = schema.get_column("material").unwrap();
        assert_eq!(material.allowed.as_ref().map(Vec::len), Some(5));
        assert_eq!(material.scalar, ScalarType::String);
        assert_eq!(schema.doc_link("material"), Some(link.as_str()));
    }

    #[test]
    fn test_ref_fragment_is_followed() {
        let mut file = NamedTempFile::new().unwrap();
        let doc = json!({"definitions": {"sex": {"enum": ["M", "F"]}}});
        file.write_all(doc.to_string().as_bytes()).unwrap();
        let link = format!("{}#/definitions/sex", file.path().display());

        let schema = SchemaLoader::from_value(
            "schema.json",
            schema_with(json!({"sex": {"type": "string", "$ref": link}})),
        )
        .unwrap();
        assert_eq!(
            schema.compiled["items"]["properties"]["sex"]["enum"],
            json!(["M", "F"])
        );
    }

    #[test]
    fn test_relative_ref_resolves_next_to_schema() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("material.json"), r#"{"enum": ["bone", "tooth"]}"#).unwrap();
        let schema_path = dir.path().join("samples.json");
        std::fs::write(
            &schema_path,
            schema_with(json!({"material": {"type": "string", "$ref": "material.json"}})).to_string(),
        )
        .unwrap();

        let schema = SchemaLoader::load(&Location::from(schema_path.as_path())).unwrap();
        assert_eq!(
            schema.get_column("material").unwrap().allowed,
            Some(vec![json!("bone"), json!("tooth")])
        );
    }

    #[test]
    fn test_missing_items() {
        let err = SchemaLoader::from_value("schema.json", json!({"properties": {}})).unwrap_err();
        assert!(err.message.contains("items"));
    }
}
