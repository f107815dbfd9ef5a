//! Merge command - validate a submission and merge it into the reference.

use std::io;
use std::path::Path;

use amdirt::{merge_datasets, DatasetValidator, Location, Result};
use colored::Colorize;

pub fn run(dataset: &str, schema: &str, remote: &str, output: &Path, markdown: bool) -> Result<()> {
    let mut validator = DatasetValidator::new(&Location::parse(schema), &Location::parse(dataset));

    if validator.parsing_ok() {
        validator.validate_schema();
        validator.check_duplicate_rows();
        validator.check_columns();
    }

    if !validator.is_valid() {
        let mut out = io::stdout().lock();
        return if markdown {
            validator.to_markdown_report(&mut out)
        } else {
            validator.to_console_report(&mut out)
        };
    }

    let reference = validator.load_reference(&Location::parse(remote))?;
    let rows = merge_datasets(&validator, &reference, output)?;

    println!(
        "{} {} rows to {}",
        "Merged".green().bold(),
        rows.to_string().white().bold(),
        output.display().to_string().cyan()
    );

    Ok(())
}
