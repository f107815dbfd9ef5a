//! In-memory archive for tests and offline runs.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{AmdirtError, Result};

use super::archive::ArchiveClient;

/// Archive that answers from a fixed project listing.
///
/// Unknown projects return an empty listing, projects marked with
/// [`MockArchive::failing`] return a transport error.
#[derive(Default)]
pub struct MockArchive {
    projects: HashMap<String, HashSet<String>>,
    failing: HashSet<String>,
    calls: AtomicUsize,
}

impl MockArchive {
    /// Create an empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a project and its sample accessions.
    pub fn with_project<I, S>(mut self, project: impl Into<String>, accessions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projects
            .entry(project.into())
            .or_default()
            .extend(accessions.into_iter().map(Into::into));
        self
    }

    /// Make lookups of `project` fail as if the archive were unreachable.
    pub fn failing(mut self, project: impl Into<String>) -> Self {
        self.failing.insert(project.into());
        self
    }

    /// Number of lookups served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ArchiveClient for MockArchive {
    fn project_accessions(&self, project: &str) -> Result<HashSet<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.contains(project) {
            return Err(AmdirtError::ArchiveRequest {
                project: project.to_string(),
                message: "connection refused".to_string(),
            });
        }

        Ok(self.projects.get(project).cloned().unwrap_or_default())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
