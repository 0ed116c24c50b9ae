//! `validate` command
//!
//! Loads each contract (and optionally a configuration file) without
//! generating anything, and reports what was found.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::{ConfigLoader, finalize};
use crate::contract::{Contract, ContractParser};
use crate::error::{ContractError, ScenarioGenError};

#[derive(Debug, Serialize)]
struct FileReport {
    file: PathBuf,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    operations: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl FileReport {
    fn new(file: &Path, result: &Result<Contract, ContractError>) -> Self {
        match result {
            Ok(contract) => Self {
                file: file.to_path_buf(),
                valid: true,
                title: Some(contract.info.title.clone()),
                operations: Some(contract.len()),
                error: None,
            },
            Err(e) => Self {
                file: file.to_path_buf(),
                valid: false,
                title: None,
                operations: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Validates contract files and an optional configuration file.
///
/// Every contract is checked before failing, so one run reports all
/// broken files.
///
/// # Errors
///
/// Returns the configuration error, or the first contract error found.
pub fn run(args: &ValidateArgs) -> Result<(), ScenarioGenError> {
    if let Some(path) = &args.config {
        let config = ConfigLoader::new(Some(path.clone())).load()?;
        let loaded = finalize(config, &path.display().to_string())?;
        for warning in &loaded.warnings {
            warn!(path = %warning.path, "{}", warning.message);
        }
        info!(file = %path.display(), "configuration valid");
    }

    let mut reports = Vec::with_capacity(args.files.len());
    let mut first_error = None;
    for path in &args.files {
        let result = ContractParser::parse_file(path);
        reports.push(FileReport::new(path, &result));
        if let Err(e) = result {
            first_error.get_or_insert(e);
        }
    }

    match args.format {
        OutputFormat::Human => {
            for report in &reports {
                if report.valid {
                    println!(
                        "ok    {} ({} operations)",
                        report.file.display(),
                        report.operations.unwrap_or_default()
                    );
                } else {
                    println!(
                        "FAIL  {}: {}",
                        report.file.display(),
                        report.error.as_deref().unwrap_or_default()
                    );
                }
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
    }

    first_error.map_or(Ok(()), |e| Err(e.into()))
}
