//! AMDirT: validation toolkit for ancient metagenome metadata tables.
//!
//! A submitted table (TSV) is checked against its JSON schema and the
//! published reference table before it is merged into the registry.
//!
//! # Core Principles
//!
//! - **Accumulate, don't abort**: dataset problems become [`ValidationError`]
//!   records; only the final report turns them into a failure
//! - **Non-destructive**: input files are never modified
//! - **Provenance**: every record names its source value, column and line
//!
//! # Example
//!
//! ```no_run
//! use amdirt::{DatasetValidator, Location};
//!
//! let schema = Location::parse("ancientmetagenome-hostassociated_samples_schema.json");
//! let dataset = Location::parse("new_samples.tsv");
//!
//! let mut validator = DatasetValidator::new(&schema, &dataset);
//! validator.validate_schema();
//! validator.check_duplicate_rows();
//! validator.check_columns();
//!
//! if validator.to_console_report(&mut std::io::stdout()).is_err() {
//!     std::process::exit(1);
//! }
//! ```

pub mod config;
pub mod error;
pub mod input;
pub mod merge;
pub mod remote;
pub mod report;
pub mod schema;
pub mod validation;

pub use config::{EnaConfig, ValidatorConfig};
pub use error::{AmdirtError, Result};
pub use input::{CellValue, DataTable, Location, SourceMetadata};
pub use merge::merge_datasets;
pub use remote::{sample_diff, ArchiveClient, EnaPortalClient, MockArchive};
pub use report::ReportFormat;
pub use schema::{ColumnSpec, ScalarType, SchemaLoader, TableSchema};
pub use validation::{DatasetValidator, ErrorKind, ValidationError};
