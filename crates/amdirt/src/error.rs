//! Error types for the AMDirT library.
//!
//! Problems found *in* a dataset are never returned as errors; they are
//! accumulated as [`ValidationError`](crate::validation::ValidationError)
//! records. `AmdirtError` covers the failures around them: unreadable
//! resources, unreachable archives, and the final "dataset is invalid" verdict.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for AMDirT operations.
#[derive(Debug, Error)]
pub enum AmdirtError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing a report to its sink.
    #[error("Report output error: {0}")]
    Output(#[from] std::io::Error),

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request for a schema or table failed.
    #[error("HTTP error for '{url}': {message}")]
    Http { url: String, message: String },

    /// The schema could not be loaded.
    #[error("Schema error: {0}")]
    Schema(String),

    /// The dataset could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A single archive lookup failed at the transport level.
    #[error("Archive request for project '{project}' failed: {message}")]
    ArchiveRequest { project: String, message: String },

    /// One or more projects could not be reconciled because the archive was unreachable.
    #[error("Archive unreachable for project(s): {}", projects.join(", "))]
    ArchiveUnavailable { projects: Vec<String> },

    /// The dataset failed validation.
    #[error("Invalid dataset {dataset} ({errors} error(s))")]
    InvalidDataset { dataset: String, errors: usize },
}

/// Result type alias for AMDirT operations.
pub type Result<T> = std::result::Result<T, AmdirtError>;
