//! Reconciliation of newly added accessions against an archive.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::config::ValidatorConfig;
use crate::input::{split_multi_value, CellValue, DataTable};
use crate::validation::{missing_column, ErrorKind, ValidationError};

use super::archive::ArchiveClient;

/// Outcome of one reconciliation pass.
#[derive(Debug, Default)]
pub struct Reconciliation {
    /// Records for missing accessions and unreachable projects.
    pub errors: Vec<ValidationError>,
    /// Projects whose lookup failed at the transport level, in lookup order.
    pub unreachable: Vec<String>,
    /// Number of archive lookups performed.
    pub lookups: usize,
}

impl Reconciliation {
    /// True when every submitted accession was found.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Accession sub-values in `local` that `reference` does not contain.
///
/// Cells are split on `,`; results keep first-seen order without repeats. A
/// missing reference, or a reference lacking the column, makes every local
/// value new. A local table lacking the column has nothing to add.
pub fn sample_diff(local: &DataTable, reference: Option<&DataTable>, column: &str) -> Vec<String> {
    let known: HashSet<&str> = reference
        .and_then(|r| r.column_index(column).map(|idx| (r, idx)))
        .map(|(r, idx)| {
            r.column_values(idx)
                .filter_map(|v| v.as_str())
                .flat_map(split_multi_value)
                .collect()
        })
        .unwrap_or_default();

    let Some(idx) = local.column_index(column) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    local
        .column_values(idx)
        .filter_map(|v| v.as_str())
        .flat_map(split_multi_value)
        .filter(|a| !known.contains(a) && seen.insert(*a))
        .map(str::to_string)
        .collect()
}

/// Verify that every added accession of `local` is registered in `archive`.
///
/// Only rows whose archive column names a supported archive take part. One
/// lookup is made per archive project, in first-seen order.
pub fn reconcile(
    local: &DataTable,
    reference: Option<&DataTable>,
    archive: &dyn ArchiveClient,
    config: &ValidatorConfig,
) -> Reconciliation {
    let mut outcome = Reconciliation::default();

    let columns = [
        &config.accession_column,
        &config.archive_column,
        &config.archive_project_column,
    ];
    let indices: Vec<Option<usize>> = columns.iter().map(|c| local.column_index(c)).collect();
    let (Some(accession_idx), Some(archive_idx), Some(project_idx)) =
        (indices[0], indices[1], indices[2])
    else {
        for (column, index) in columns.iter().zip(&indices) {
            if index.is_none() {
                outcome
                    .errors
                    .push(missing_column(column, "accession reconciliation"));
            }
        }
        return outcome;
    };

    let added: HashSet<String> = sample_diff(local, reference, &config.accession_column)
        .into_iter()
        .collect();
    if added.is_empty() {
        debug!("no new accessions to reconcile");
        return outcome;
    }

    // archive project -> (accession, row) pairs still to verify
    let mut by_project: IndexMap<&str, Vec<(&str, usize)>> = IndexMap::new();
    for (row_idx, row) in local.rows.iter().enumerate() {
        let text = move |idx: usize| row.get(idx).and_then(CellValue::as_str);
        if !text(archive_idx).is_some_and(|a| config.is_supported_archive(a)) {
            continue;
        }
        let (Some(project), Some(cell)) = (text(project_idx), text(accession_idx)) else {
            continue;
        };
        for accession in split_multi_value(cell).filter(|a| added.contains(*a)) {
            by_project
                .entry(project)
                .or_default()
                .push((accession, row_idx));
        }
    }

    info!(
        accessions = added.len(),
        projects = by_project.len(),
        archive = archive.name(),
        "reconciling new accessions"
    );

    for (project, submitted) in by_project {
        outcome.lookups += 1;
        match archive.project_accessions(project) {
            Ok(registered) => {
                for (accession, row) in submitted {
                    if registered.contains(accession) {
                        continue;
                    }
                    outcome.errors.push(
                        ValidationError::new(
                            ErrorKind::InvalidAccessionError,
                            accession,
                            format!(
                                "Accession {} is not registered under project {} in {}",
                                accession,
                                project,
                                archive.name()
                            ),
                        )
                        .with_column(config.accession_column.as_str())
                        .with_row(row),
                    );
                }
            }
            Err(e) => {
                warn!(project, error = %e, "archive lookup failed");
                let mut rows: Vec<usize> = submitted.iter().map(|&(_, row)| row).collect();
                rows.dedup();
                outcome.errors.push(
                    ValidationError::new(ErrorKind::NetworkError, project, e.to_string())
                        .with_column(config.archive_project_column.as_str())
                        .with_rows(rows),
                );
                outcome.unreachable.push(project.to_string());
            }
        }
    }

    outcome
}
