//! ENA portal API client.
//!
//! Sample accessions of a project are read from the portal's `filereport`
//! endpoint, one request per project.

use std::collections::HashSet;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::EnaConfig;
use crate::error::{AmdirtError, Result};

use super::archive::ArchiveClient;

/// Result type queried for sample listings.
const RESULT_TYPE: &str = "read_experiment";

/// Field carrying the sample accession submitters cite.
const SAMPLE_FIELD: &str = "secondary_sample_accession";

#[derive(Debug, Deserialize)]
struct FileReportRecord {
    #[serde(default)]
    secondary_sample_accession: Option<String>,
}

/// Client for the ENA portal API.
pub struct EnaPortalClient {
    client: Client,
    config: EnaConfig,
}

impl EnaPortalClient {
    /// Create a client from `AMDIRT_ENA_URL` / `AMDIRT_HTTP_TIMEOUT`.
    pub fn new() -> Result<Self> {
        Self::with_config(EnaConfig::from_env())
    }

    /// Create with custom configuration.
    pub fn with_config(config: EnaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AmdirtError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// The `filereport` endpoint URL.
    pub fn endpoint(&self) -> String {
        format!("{}/filereport", self.config.base_url.trim_end_matches('/'))
    }
}

impl ArchiveClient for EnaPortalClient {
    fn project_accessions(&self, project: &str) -> Result<HashSet<String>> {
        let request_error = |message: String| AmdirtError::ArchiveRequest {
            project: project.to_string(),
            message,
        };

        let response = self
            .client
            .get(self.endpoint())
            .query(&[
                ("accession", project),
                ("result", RESULT_TYPE),
                ("fields", SAMPLE_FIELD),
                ("format", "json"),
            ])
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    request_error(format!("timed out after {:?}", self.config.timeout))
                } else {
                    request_error(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(project, %status, "no results found in ENA");
            return Ok(HashSet::new());
        }

        let body = response
            .text()
            .map_err(|e| request_error(format!("Failed to read ENA response: {}", e)))?;
        let accessions = parse_file_report(&body).map_err(request_error)?;

        debug!(project, samples = accessions.len(), "fetched ENA sample accessions");
        Ok(accessions)
    }

    fn name(&self) -> &str {
        "ENA"
    }
}

/// Sample accessions listed in a JSON `filereport` body.
fn parse_file_report(body: &str) -> std::result::Result<HashSet<String>, String> {
    if body.trim().is_empty() {
        return Ok(HashSet::new());
    }

    let records: Vec<FileReportRecord> = serde_json::from_str(body)
        .map_err(|e| format!("Failed to parse ENA response: {}", e))?;

    Ok(records
        .into_iter()
        .filter_map(|r| r.secondary_sample_accession)
        .flat_map(|s| {
            s.split(';')
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect::<Vec<_>>()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_parse_file_report() {
        let body = r#"[
            {"experiment_accession": "ERX1", "secondary_sample_accession": "ERS1"},
            {"experiment_accession": "ERX2", "secondary_sample_accession": "ERS2"},
            {"experiment_accession": "ERX3", "secondary_sample_accession": "ERS1"},
            {"experiment_accession": "ERX4"}
        ]"#;
        let accessions = parse_file_report(body).unwrap();
        assert_eq!(accessions.len(), 2);
        assert!(accessions.contains("ERS1"));
        assert!(accessions.contains("ERS2"));
    }

    #[test]
    fn test_parse_empty_body() {
        assert!(parse_file_report("").unwrap().is_empty());
        assert!(parse_file_report("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_file_report("<html>oops</html>").is_err());
    }

    #[test]
    fn test_endpoint() {
        let client = EnaPortalClient::with_config(EnaConfig {
            base_url: "http://localhost:9/api/".to_string(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9/api/filereport");
    }

    #[test]
    fn test_unreachable_host_is_transport_error() {
        let client = EnaPortalClient::with_config(EnaConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(2),
        })
        .unwrap();
        let err = client.project_accessions("PRJEB1").unwrap_err();
        assert!(matches!(err, AmdirtError::ArchiveRequest { .. }));
    }
}
