//! Remote archive access and accession reconciliation.

mod archive;
mod ena;
mod mock;
mod reconcile;

pub use archive::ArchiveClient;
pub use ena::EnaPortalClient;
pub use mock::MockArchive;
pub use reconcile::{reconcile, sample_diff, Reconciliation};
