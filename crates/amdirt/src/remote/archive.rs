//! Sequence archive lookup trait.

use std::collections::HashSet;

use crate::error::Result;

/// Source of the sample accessions an archive holds for a project.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait ArchiveClient: Send + Sync {
    /// Sample accessions registered under `project`.
    ///
    /// An unknown project or an error reply from the archive yields an empty
    /// set. `Err` is reserved for transport failures (unreachable host,
    /// timeout, undecodable body).
    fn project_accessions(&self, project: &str) -> Result<HashSet<String>>;

    /// Name of the archive, for logging.
    fn name(&self) -> &str;
}
