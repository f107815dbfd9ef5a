//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// AMDirT: validate and merge AncientMetagenomeDir submissions
#[derive(Parser)]
#[command(name = "amdirt")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a dataset against its JSON schema
    Validate {
        /// Dataset to validate (TSV path or URL)
        #[arg(value_name = "DATASET")]
        dataset: String,

        /// JSON schema (path or URL)
        #[arg(value_name = "SCHEMA")]
        schema: String,

        /// Validate rows against the JSON schema
        #[arg(short = 's', long)]
        validity: bool,

        /// Check for duplicated rows
        #[arg(short = 'd', long)]
        duplicate: bool,

        /// Check that columns match the schema's required columns
        #[arg(short = 'c', long)]
        columns: bool,

        /// Check that each project has a single DOI
        #[arg(short = 'i', long)]
        doi: bool,

        /// Check a comma-joined column for repeated entries (repeatable)
        #[arg(long = "multi-values", value_name = "COLUMN")]
        multi_values: Vec<String>,

        /// Check newly added accessions against ENA
        #[arg(short = 'a', long)]
        accessions: bool,

        /// Reference (published) table the new accessions are diffed against
        #[arg(long, value_name = "REF")]
        remote: Option<String>,

        /// Write the report as markdown
        #[arg(short = 'm', long, conflicts_with = "json")]
        markdown: bool,

        /// Write the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List accessions present locally but absent from the reference table
    Diff {
        /// Local table (path or URL)
        #[arg(value_name = "LOCAL")]
        local: String,

        /// Reference table (path or URL)
        #[arg(value_name = "REMOTE")]
        remote: String,

        /// JSON schema both tables follow (path or URL)
        #[arg(value_name = "SCHEMA")]
        schema: String,

        /// Column holding the accessions
        #[arg(long, default_value = "archive_accession")]
        column: String,
    },

    /// Validate a submission and merge it into the reference table
    Merge {
        /// New dataset (TSV path or URL)
        #[arg(value_name = "DATASET")]
        dataset: String,

        /// JSON schema (path or URL)
        #[arg(long)]
        schema: String,

        /// Reference table to merge into (path or URL)
        #[arg(long)]
        remote: String,

        /// Output path for the merged table
        #[arg(short, long, default_value = "merged.tsv")]
        output: PathBuf,

        /// Write the report as markdown when the submission is invalid
        #[arg(short = 'm', long)]
        markdown: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_validate_flags() {
        let cli = Cli::parse_from([
            "amdirt",
            "validate",
            "samples.tsv",
            "schema.json",
            "-s",
            "-d",
            "--multi-values",
            "archive_accession",
            "--multi-values",
            "sample_name",
        ]);
        match cli.command {
            Commands::Validate {
                validity,
                duplicate,
                columns,
                multi_values,
                ..
            } => {
                assert!(validity);
                assert!(duplicate);
                assert!(!columns);
                assert_eq!(multi_values, vec!["archive_accession", "sample_name"]);
            }
            _ => panic!("expected validate"),
        }
    }
}
