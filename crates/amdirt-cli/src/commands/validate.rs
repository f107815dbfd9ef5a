//! Validate command - check a dataset against its schema.

use std::io;

use amdirt::{DatasetValidator, EnaPortalClient, Location, Result};
use colored::Colorize;
use tracing::debug;

/// Options of `amdirt validate`.
pub struct ValidateArgs {
    pub dataset: String,
    pub schema: String,
    pub validity: bool,
    pub duplicate: bool,
    pub columns: bool,
    pub doi: bool,
    pub multi_values: Vec<String>,
    pub accessions: bool,
    pub remote: Option<String>,
    pub markdown: bool,
    pub json: bool,
}

pub fn run(args: ValidateArgs) -> Result<()> {
    let dataset = Location::parse(&args.dataset);
    let schema = Location::parse(&args.schema);

    debug!(
        validity = args.validity,
        duplicate = args.duplicate,
        columns = args.columns,
        doi = args.doi,
        accessions = args.accessions,
        "selected checks"
    );

    let mut validator = DatasetValidator::new(&schema, &dataset);

    let mut archive_error = None;
    if validator.parsing_ok() {
        if args.validity {
            validator.validate_schema();
        }
        if args.duplicate {
            validator.check_duplicate_rows();
        }
        if args.columns {
            validator.check_columns();
        }
        if args.doi {
            validator.check_duplicate_dois();
        }
        if !args.multi_values.is_empty() {
            validator.check_multi_values(args.multi_values.as_slice());
        }
        if args.accessions {
            let reference = match &args.remote {
                Some(remote) => Some(validator.load_reference(&Location::parse(remote))?),
                None => None,
            };
            let archive = EnaPortalClient::new()?;
            if let Err(e) = validator.check_sample_accessions(reference.as_ref(), &archive) {
                archive_error = Some(e);
            }
        }
    }

    let mut out = io::stdout().lock();
    let verdict = if args.json {
        validator.to_json_report(&mut out)
    } else if args.markdown {
        validator.to_markdown_report(&mut out)
    } else {
        validator.to_console_report(&mut out)
    };

    if let Some(e) = archive_error {
        return Err(e);
    }

    if verdict.is_ok() && !args.json && !args.markdown {
        println!(
            "{} {}",
            validator.dataset_name().white().bold(),
            "is valid".green().bold()
        );
    }

    verdict
}
