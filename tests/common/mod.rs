//! Shared integration-test harness: fixture lookup and running the
//! `scenariogen` binary as a child process.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};

use scenariogen::config::StrategyFlags;
use scenariogen::contract::{Contract, ContractParser};
use scenariogen::generator::ScenarioGenerator;
use scenariogen::scenario::Scenario;

/// Environment variables the binary reads; cleared for every spawn so the
/// developer's shell cannot leak into test runs.
const SCENARIOGEN_ENV: &[&str] = &[
    "SCENARIOGEN_CONFIG",
    "SCENARIOGEN_COLOR",
    "SCENARIOGEN_LOG_LEVEL",
    "SCENARIOGEN_GENERATE_HAPPY_PATH",
    "SCENARIOGEN_GENERATE_VALIDATIONS",
    "SCENARIOGEN_GENERATE_ERROR_CASES",
    "SCENARIOGEN_GENERATE_EDGE_CASES",
    "SCENARIOGEN_USE_ENRICHMENT",
    "SCENARIOGEN_PROVIDER",
    "SCENARIOGEN_OLLAMA_URI",
    "SCENARIOGEN_OLLAMA_MODEL",
];

/// Runs the `scenariogen` binary to completion.
pub struct ScenarioGenProcess;

impl ScenarioGenProcess {
    /// Runs `scenariogen <args>` with a clean environment.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn_command(args: &[&str]) -> Output {
        Self::spawn_with_env(args, &[])
    }

    /// Runs `scenariogen <args>` with extra environment variables.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn_with_env(args: &[&str], env: &[(&str, &str)]) -> Output {
        let mut command = Command::new(env!("CARGO_BIN_EXE_scenariogen"));
        for var in SCENARIOGEN_ENV {
            command.env_remove(var);
        }
        command.env("NO_COLOR", "1").args(args);
        for (key, value) in env {
            command.env(key, value);
        }
        command.output().expect("failed to run scenariogen")
    }

    /// Absolute path of a file under `tests/fixtures`.
    pub fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    /// Fixture path as a `&str`-friendly `String`.
    pub fn fixture(name: &str) -> String {
        Self::fixture_path(name).display().to_string()
    }
}

/// Parses a fixture contract.
#[allow(clippy::missing_panics_doc)]
pub fn load_contract(name: &str) -> Contract {
    ContractParser::parse_file(&ScenarioGenProcess::fixture_path(name))
        .unwrap_or_else(|e| panic!("fixture {name} should parse: {e}"))
}

/// Scenarios for every operation of a fixture contract, all strategies on.
pub fn generate_all(name: &str) -> Vec<Scenario> {
    ScenarioGenerator::new(&StrategyFlags::default()).generate_all(&load_contract(name))
}

/// Scenarios of `scenarios` produced for `operation_id`.
pub fn for_operation<'a>(scenarios: &'a [Scenario], operation_id: &str) -> Vec<&'a Scenario> {
    scenarios
        .iter()
        .filter(|s| s.operation_id == operation_id)
        .collect()
}

/// Asserts the process exited with `code`, showing stderr otherwise.
#[allow(clippy::missing_panics_doc)]
pub fn assert_exit(output: &Output, code: i32) {
    assert_eq!(
        output.status.code(),
        Some(code),
        "unexpected exit status; stderr:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );
}
