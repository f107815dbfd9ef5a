//! Local-path or URL references to schemas and tables.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;

use crate::config::DEFAULT_TIMEOUT;
use crate::error::{AmdirtError, Result};

/// Where a schema or table lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// A file on the local filesystem.
    Path(PathBuf),
    /// An `http://` or `https://` URL.
    Url(String),
}

impl Location {
    /// Interpret a user-supplied reference.
    pub fn parse(reference: &str) -> Self {
        let trimmed = reference.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Location::Url(trimmed.to_string())
        } else if let Some(path) = trimmed.strip_prefix("file://") {
            Location::Path(PathBuf::from(path))
        } else {
            Location::Path(PathBuf::from(trimmed))
        }
    }

    /// Final path or URL segment, used to name the resource in reports.
    pub fn name(&self) -> String {
        match self {
            Location::Path(path) => path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Location::Url(url) => url
                .split(['?', '#'])
                .next()
                .unwrap_or(url)
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .unwrap_or(url)
                .to_string(),
        }
    }

    /// Resolve `reference` relative to this location.
    ///
    /// Absolute paths and URLs are returned as they are.
    pub fn join(&self, reference: &str) -> Location {
        let target = Location::parse(reference);
        match (&target, self) {
            (Location::Path(path), _) if path.is_absolute() => target,
            (Location::Url(_), _) => target,
            (Location::Path(path), Location::Path(base)) => match base.parent() {
                Some(dir) => Location::Path(dir.join(path)),
                None => target,
            },
            (Location::Path(path), Location::Url(base)) => {
                let dir = base.rsplit_once('/').map(|(dir, _)| dir).unwrap_or(base);
                Location::Url(format!("{}/{}", dir, path.display()))
            }
        }
    }

    /// Read the whole resource as UTF-8 text.
    pub fn read_to_string(&self) -> Result<String> {
        self.read_to_string_with_timeout(DEFAULT_TIMEOUT)
    }

    /// Read the whole resource, bounding remote fetches by `timeout`.
    pub fn read_to_string_with_timeout(&self, timeout: Duration) -> Result<String> {
        match self {
            Location::Path(path) => fs::read_to_string(path).map_err(|e| AmdirtError::Io {
                path: path.clone(),
                source: e,
            }),
            Location::Url(url) => fetch_text(url, timeout),
        }
    }
}

impl From<&Path> for Location {
    fn from(path: &Path) -> Self {
        Location::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for Location {
    fn from(path: PathBuf) -> Self {
        Location::Path(path)
    }
}

impl From<&str> for Location {
    fn from(reference: &str) -> Self {
        Location::parse(reference)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Path(path) => write!(f, "{}", path.display()),
            Location::Url(url) => write!(f, "{}", url),
        }
    }
}

fn fetch_text(url: &str, timeout: Duration) -> Result<String> {
    let http_error = |message: String| AmdirtError::Http {
        url: url.to_string(),
        message,
    };

    let client = Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| http_error(format!("Failed to create HTTP client: {}", e)))?;

    let response = client.get(url).send().map_err(|e| http_error(e.to_string()))?;

    if !response.status().is_success() {
        return Err(http_error(format!("server returned {}", response.status())));
    }

    response.text().map_err(|e| http_error(e.to_string()))
}
