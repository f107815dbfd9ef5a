//! AMDirT CLI - validation and merging of AncientMetagenomeDir tables.

mod cli;
mod commands;

use std::process::ExitCode;

use amdirt::AmdirtError;
use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Validate {
            dataset,
            schema,
            validity,
            duplicate,
            columns,
            doi,
            multi_values,
            accessions,
            remote,
            markdown,
            json,
        } => commands::validate::run(commands::validate::ValidateArgs {
            dataset,
            schema,
            validity,
            duplicate,
            columns,
            doi,
            multi_values,
            accessions,
            remote,
            markdown,
            json,
        }),

        Commands::Diff {
            local,
            remote,
            schema,
            column,
        } => commands::diff::run(&local, &remote, &schema, &column),

        Commands::Merge {
            dataset,
            schema,
            remote,
            output,
            markdown,
        } => commands::merge::run(&dataset, &schema, &remote, &output, markdown),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            exit_code(&e)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_code(error: &AmdirtError) -> ExitCode {
    match error {
        AmdirtError::InvalidDataset { .. } => ExitCode::from(1),
        AmdirtError::ArchiveUnavailable { .. } | AmdirtError::ArchiveRequest { .. } => {
            ExitCode::from(3)
        }
        _ => ExitCode::from(2),
    }
}
