//! CLI argument definitions
//!
//! All Clap derive structs for `scenariogen` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::observability::LogFormat;
use crate::strategy::StrategyKind;

// ============================================================================
// Root CLI
// ============================================================================

/// Deterministic API test scenario synthesis from OpenAPI contracts.
#[derive(Parser, Debug)]
#[command(name = "scenariogen", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "SCENARIOGEN_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true)]
    pub log_format: LogFormat,
}

// ============================================================================
// Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate test scenarios from a contract.
    Generate(GenerateArgs),

    /// Check that contract files load.
    Validate(ValidateArgs),

    /// Display version information.
    Version(VersionArgs),
}

/// Arguments for `generate`.
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Contract to read (YAML or JSON).
    #[arg(short, long)]
    pub contract: Option<PathBuf>,

    /// Output file; stdout when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to YAML configuration file.
    #[arg(long, env = "SCENARIOGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Run only these strategies (comma-separated).
    #[arg(short, long = "strategy", value_delimiter = ',')]
    pub strategies: Vec<StrategyKind>,

    /// Enable LLM enrichment of rendered scenarios.
    #[arg(long)]
    pub enrich: bool,

    /// Enrichment provider.
    #[arg(long)]
    pub provider: Option<String>,

    /// Output format.
    #[arg(short, long, default_value = "feature")]
    pub format: ScenarioFormat,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Contract files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Also validate this configuration file.
    #[arg(long, env = "SCENARIOGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Format of generated scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ScenarioFormat {
    /// Karate feature file.
    #[default]
    Feature,
    /// JSON plan of scenario descriptors.
    Json,
}

// ============================================================================
// Tests
// ============================================================================
