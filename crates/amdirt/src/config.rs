//! Configuration for validation and archive access.

use std::time::Duration;

/// Default ENA portal API endpoint.
pub const DEFAULT_ENA_URL: &str = "https://www.ebi.ac.uk/ena/portal/api";

/// Default timeout applied to every outbound HTTP request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Column names the cross-row checks operate on.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Column holding the project (publication) identifier.
    pub project_column: String,
    /// Column holding the publication DOI.
    pub doi_column: String,
    /// Column holding comma-joined archive accessions.
    pub accession_column: String,
    /// Column naming the archive a row was deposited in.
    pub archive_column: String,
    /// Column holding the archive-side project accession.
    pub archive_project_column: String,
    /// Archives whose accessions can be verified remotely (case-sensitive).
    pub supported_archives: Vec<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            project_column: "project_name".to_string(),
            doi_column: "publication_doi".to_string(),
            accession_column: "archive_accession".to_string(),
            archive_column: "archive".to_string(),
            archive_project_column: "archive_project".to_string(),
            supported_archives: vec!["ENA".to_string(), "SRA".to_string()],
        }
    }
}

impl ValidatorConfig {
    /// Use a different accession column.
    pub fn with_accession_column(mut self, column: impl Into<String>) -> Self {
        self.accession_column = column.into();
        self
    }

    /// Check whether `archive` is one of the supported archives.
    pub fn is_supported_archive(&self, archive: &str) -> bool {
        self.supported_archives.iter().any(|a| a == archive)
    }
}

/// Connection settings for the ENA portal API.
#[derive(Debug, Clone)]
pub struct EnaConfig {
    /// Base URL of the portal API, without trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for EnaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ENA_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl EnaConfig {
    /// Build from `AMDIRT_ENA_URL` and `AMDIRT_HTTP_TIMEOUT` (seconds), falling
    /// back to the defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let base_url = std::env::var("AMDIRT_ENA_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_ENA_URL.to_string());

        let timeout = std::env::var("AMDIRT_HTTP_TIMEOUT")
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        Self { base_url, timeout }
    }
}
