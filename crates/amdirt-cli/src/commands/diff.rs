//! Diff command - list accessions not yet in the reference table.

use amdirt::{sample_diff, AmdirtError, Location, Result, SchemaLoader};
use amdirt::input::Parser;
use colored::Colorize;

pub fn run(local: &str, remote: &str, schema: &str, column: &str) -> Result<()> {
    let schema = SchemaLoader::load(&Location::parse(schema))
        .map_err(|e| AmdirtError::Schema(e.to_string()))?;

    let parser = Parser::new();
    let local = parser.parse_location(&Location::parse(local), &schema)?;
    let remote = parser.parse_location(&Location::parse(remote), &schema)?;

    if local.column_index(column).is_none() {
        return Err(AmdirtError::Config(format!(
            "Column '{}' not found in {}",
            column, local.source.file
        )));
    }

    let added = sample_diff(&local, Some(&remote), column);

    if added.is_empty() {
        eprintln!("{}", "No new accessions.".yellow());
        return Ok(());
    }

    eprintln!(
        "{} {} new accession(s) in {}",
        "Found".cyan().bold(),
        added.len().to_string().white().bold(),
        local.source.file
    );
    for accession in added {
        println!("{}", accession);
    }

    Ok(())
}
