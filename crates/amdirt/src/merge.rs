//! Merging a validated submission into its reference table.

use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::{AmdirtError, Result};
use crate::input::{CellValue, DataTable, SourceMetadata};
use crate::validation::DatasetValidator;

/// Concatenate `reference` and `submission` on the submission's header.
///
/// Reference rows come first. Cells for columns a table lacks are null, and
/// exact duplicate rows are dropped, keeping the first occurrence.
pub fn merge_tables(reference: &DataTable, submission: &DataTable) -> DataTable {
    let headers = submission.headers.clone();
    let projection: Vec<Option<usize>> = headers
        .iter()
        .map(|h| reference.column_index(h))
        .collect();

    let reference_rows = reference.rows.iter().map(|row| {
        projection
            .iter()
            .map(|idx| {
                idx.and_then(|i| row.get(i).cloned())
                    .unwrap_or(CellValue::Null)
            })
            .collect::<Vec<_>>()
    });
    let submission_rows = submission.rows.iter().cloned();

    let mut seen = HashSet::new();
    let rows: Vec<Vec<CellValue>> = reference_rows
        .chain(submission_rows)
        .filter(|row| seen.insert(row.clone()))
        .collect();

    let source = SourceMetadata::new(
        submission.source.file.clone(),
        submission.source.location.clone(),
        String::new(),
        0,
        rows.len(),
        headers.len(),
    );
    DataTable::new(headers, rows, source)
}

/// Write a table as TSV, nulls as `NA`.
pub fn write_tsv<W: Write>(table: &DataTable, out: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(out);

    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(CellValue::to_tsv_field))?;
    }
    writer.flush()?;
    Ok(())
}

/// Merge a validated submission into `reference` and write it to `output`.
///
/// The validator must have parsed its dataset and recorded no error. Returns
/// the number of data rows written.
pub fn merge_datasets(
    validator: &DatasetValidator,
    reference: &DataTable,
    output: &Path,
) -> Result<usize> {
    let submission = match validator.table() {
        Some(table) if validator.is_valid() => table,
        _ => {
            return Err(AmdirtError::InvalidDataset {
                dataset: validator.dataset_name().to_string(),
                errors: validator.errors().len(),
            });
        }
    };

    let merged = merge_tables(reference, submission);
    let new_rows = merged.row_count().saturating_sub(reference.row_count());

    let mut buffer = Vec::new();
    write_tsv(&merged, &mut buffer)?;

    let mut file = File::create(output).map_err(|e| AmdirtError::Io {
        path: output.to_path_buf(),
        source: e,
    })?;
    file.write_all(&buffer).map_err(|e| AmdirtError::Io {
        path: output.to_path_buf(),
        source: e,
    })?;

    info!(
        output = %output.display(),
        rows = merged.row_count(),
        new_rows,
        sha256 = %format!("{:x}", Sha256::digest(&buffer)),
        "merged dataset written"
    );

    Ok(merged.row_count())
}
