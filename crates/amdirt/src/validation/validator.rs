//! Dataset validator: one schema, one dataset, one accumulated error list.

use std::io::Write;

use tracing::{debug, info, warn};

use crate::config::ValidatorConfig;
use crate::error::{AmdirtError, Result};
use crate::input::{DataTable, Location, Parser, ParserConfig};
use crate::remote::{reconcile, ArchiveClient};
use crate::report::{write_report, ReportFormat};
use crate::schema::{SchemaLoadError, SchemaLoader, TableSchema};

use super::doi::DoiCheck;
use super::json_schema::SchemaValidator;
use super::record::{ErrorKind, ValidationError};
use super::structural::{Check, ColumnCheck, DuplicateRowCheck, MultiValueCheck};

/// Validates one dataset against one schema.
///
/// Construction never fails: an unusable schema or an unparsable dataset is
/// recorded as a single error and leaves [`DatasetValidator::parsing_ok`]
/// false, after which every check is a no-op returning `false`.
///
/// Each check appends what it finds and returns `true` when it appended
/// nothing. Checks are independent and may be run in any order.
pub struct DatasetValidator {
    dataset_name: String,
    schema_name: String,
    config: ValidatorConfig,
    schema: Option<TableSchema>,
    table: Option<DataTable>,
    json_validator: Option<SchemaValidator>,
    errors: Vec<ValidationError>,
    parsing_ok: bool,
}

impl DatasetValidator {
    /// Load a schema and a dataset from paths or URLs.
    pub fn new(schema: &Location, dataset: &Location) -> Self {
        Self::with_config(schema, dataset, ValidatorConfig::default())
    }

    /// Load with custom column configuration.
    pub fn with_config(schema: &Location, dataset: &Location, config: ValidatorConfig) -> Self {
        info!(dataset = %dataset, schema = %schema, "loading dataset");
        let loaded = SchemaLoader::load(schema);
        Self::build(
            schema.name(),
            dataset.name(),
            loaded,
            |parser, schema| parser.parse_location(dataset, schema),
            config,
        )
    }

    /// Validate in-memory schema and dataset text.
    pub fn from_text(
        schema_name: &str,
        schema_text: &str,
        dataset_name: &str,
        dataset_text: &str,
    ) -> Self {
        Self::from_text_with_config(
            schema_name,
            schema_text,
            dataset_name,
            dataset_text,
            ValidatorConfig::default(),
        )
    }

    /// Validate in-memory text with custom column configuration.
    pub fn from_text_with_config(
        schema_name: &str,
        schema_text: &str,
        dataset_name: &str,
        dataset_text: &str,
        config: ValidatorConfig,
    ) -> Self {
        let loaded = SchemaLoader::from_str(schema_name, schema_text);
        Self::build(
            schema_name.to_string(),
            dataset_name.to_string(),
            loaded,
            |parser, schema| parser.parse_str(dataset_name, dataset_text, schema),
            config,
        )
    }

    /// Validate an already-parsed table.
    pub fn from_parts(schema: TableSchema, table: DataTable, config: ValidatorConfig) -> Self {
        let schema_name = schema.name.clone();
        let dataset_name = table.source.file.clone();
        Self::build(schema_name, dataset_name, Ok(schema), |_, _| Ok(table), config)
    }

    fn build<F>(
        schema_name: String,
        dataset_name: String,
        loaded: std::result::Result<TableSchema, SchemaLoadError>,
        read: F,
        config: ValidatorConfig,
    ) -> Self
    where
        F: FnOnce(&Parser, &TableSchema) -> Result<DataTable>,
    {
        let mut validator = Self {
            dataset_name,
            schema_name,
            config,
            schema: None,
            table: None,
            json_validator: None,
            errors: Vec::new(),
            parsing_ok: false,
        };

        let compiled = loaded.and_then(|schema| {
            let json_validator = SchemaValidator::new(&schema)?;
            Ok((schema, json_validator))
        });
        let (schema, json_validator) = match compiled {
            Ok(pair) => pair,
            Err(e) => {
                warn!(schema = %validator.schema_name, error = %e, "schema could not be loaded");
                let mut record = ValidationError::new(ErrorKind::SchemaError, e.source_value, e.message);
                if let Some(column) = e.column {
                    record = record.with_column(column);
                }
                validator.errors.push(record);
                return validator;
            }
        };

        let parser = Parser::with_config(ParserConfig::default());
        match read(&parser, &schema) {
            Ok(table) => {
                info!(
                    dataset = %validator.dataset_name,
                    rows = table.row_count(),
                    columns = table.column_count(),
                    "dataset parsed"
                );
                validator.table = Some(table);
                validator.parsing_ok = true;
            }
            Err(e) => {
                warn!(dataset = %validator.dataset_name, error = %e, "dataset could not be parsed");
                let message = match e {
                    AmdirtError::Parse(message) => message,
                    other => other.to_string(),
                };
                validator.errors.push(ValidationError::new(
                    ErrorKind::ParsingError,
                    validator.dataset_name.as_str(),
                    message,
                ));
            }
        }

        validator.schema = Some(schema);
        validator.json_validator = Some(json_validator);
        validator
    }

    /// Whether schema loading and dataset parsing both succeeded.
    pub fn parsing_ok(&self) -> bool {
        self.parsing_ok
    }

    /// Errors accumulated so far, in insertion order.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Record an externally produced error.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// True when parsing succeeded and no error has been recorded.
    pub fn is_valid(&self) -> bool {
        self.parsing_ok && self.errors.is_empty()
    }

    /// Name of the dataset, as shown in reports.
    pub fn dataset_name(&self) -> &str {
        &self.dataset_name
    }

    /// Name of the schema, as shown in reports.
    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    /// The loaded schema, if it could be loaded.
    pub fn schema(&self) -> Option<&TableSchema> {
        self.schema.as_ref()
    }

    /// The parsed dataset, if parsing succeeded.
    pub fn table(&self) -> Option<&DataTable> {
        self.table.as_ref()
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Read another table (typically the published reference) under this
    /// validator's schema.
    pub fn load_reference(&self, location: &Location) -> Result<DataTable> {
        let schema = self.schema.as_ref().ok_or_else(|| {
            AmdirtError::Schema(format!("schema {} is not loaded", self.schema_name))
        })?;
        Parser::new().parse_location(location, schema)
    }

    /// Run a check against the parsed table and keep what it finds.
    fn apply<F>(&mut self, name: &str, run: F) -> bool
    where
        F: FnOnce(&Self, &DataTable, &TableSchema) -> Vec<ValidationError>,
    {
        let found = match (&self.table, &self.schema) {
            (Some(table), Some(schema)) if self.parsing_ok => run(self, table, schema),
            _ => {
                warn!(check = name, dataset = %self.dataset_name, "skipped, dataset was not parsed");
                return false;
            }
        };

        debug!(check = name, errors = found.len(), "check finished");
        let clean = found.is_empty();
        self.errors.extend(found);
        clean
    }

    /// Dataset columns must equal the schema's required columns.
    pub fn check_columns(&mut self) -> bool {
        self.apply("columns", |_, table, schema| ColumnCheck.run(table, schema))
    }

    /// No two rows may be identical.
    pub fn check_duplicate_rows(&mut self) -> bool {
        self.apply("duplicate rows", |_, table, schema| {
            DuplicateRowCheck.run(table, schema)
        })
    }

    /// Comma-joined cells of `columns` must not repeat a sub-value.
    pub fn check_multi_values<S: AsRef<str>>(&mut self, columns: &[S]) -> bool {
        let check = MultiValueCheck::new(columns);
        self.apply("multi values", |_, table, schema| check.run(table, schema))
    }

    /// Each project must carry at most one distinct DOI.
    pub fn check_duplicate_dois(&mut self) -> bool {
        self.apply("duplicate DOIs", |v, table, schema| {
            DoiCheck::new(&v.config.project_column, &v.config.doi_column).run(table, schema)
        })
    }

    /// Validate every row against the JSON schema.
    pub fn validate_schema(&mut self) -> bool {
        self.apply("schema", |v, table, schema| {
            v.json_validator
                .as_ref()
                .map(|validator| validator.validate(table, schema))
                .unwrap_or_default()
        })
    }

    /// Check newly added accessions against a sequence archive.
    ///
    /// Accessions already present in `reference` are not looked up. Returns
    /// `Err(ArchiveUnavailable)` when any project could not be reached; the
    /// other projects are still checked and their findings recorded.
    pub fn check_sample_accessions(
        &mut self,
        reference: Option<&DataTable>,
        archive: &dyn ArchiveClient,
    ) -> Result<bool> {
        let mut unreachable = Vec::new();
        let clean = self.apply("sample accessions", |v, table, _| {
            let outcome = reconcile(table, reference, archive, &v.config);
            unreachable = outcome.unreachable;
            outcome.errors
        });

        if unreachable.is_empty() {
            Ok(clean)
        } else {
            Err(AmdirtError::ArchiveUnavailable {
                projects: unreachable,
            })
        }
    }

    fn report(&self, format: ReportFormat, out: &mut dyn Write) -> Result<()> {
        write_report(
            format,
            &self.dataset_name,
            &self.schema_name,
            &self.errors,
            out,
        )
    }

    /// Write the error table for a terminal.
    ///
    /// Returns `Err(InvalidDataset)` when any error was recorded.
    pub fn to_console_report(&self, out: &mut dyn Write) -> Result<()> {
        self.report(ReportFormat::Console, out)
    }

    /// Write the error table as GitHub markdown.
    pub fn to_markdown_report(&self, out: &mut dyn Write) -> Result<()> {
        self.report(ReportFormat::Markdown, out)
    }

    /// Write the error records as JSON.
    pub fn to_json_report(&self, out: &mut dyn Write) -> Result<()> {
        self.report(ReportFormat::Json, out)
    }
}
