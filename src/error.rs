//! Error types for `scenariogen`
//!
//! One error enum per domain, aggregated into [`ScenarioGenError`] which maps
//! every failure to a process exit code. Enrichment errors never reach the
//! top level: they are recovered where they occur.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `scenariogen` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Contract error (malformed document, circular schema reference)
    pub const CONTRACT_ERROR: i32 = 4;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `scenariogen` operations.
///
/// Aggregates the domain-specific errors and provides a unified
/// interface for exit code mapping.
#[derive(Debug, Error)]
pub enum ScenarioGenError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Contract ingestion error
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// Invalid command-line usage
    #[error("usage error: {0}")]
    Usage(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScenarioGenError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => ExitCode::CONFIG_ERROR,
            Self::Contract(_) => ExitCode::CONTRACT_ERROR,
            Self::Usage(_) => ExitCode::USAGE_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
            Self::Json(_) => ExitCode::ERROR,
        }
    }
}

// ============================================================================
// Contract Errors
// ============================================================================

/// Errors raised while turning a contract document into a [`Contract`].
///
/// Every variant is fatal for the run: no scenarios are produced from a
/// contract that fails to load.
///
/// [`Contract`]: crate::contract::Contract
#[derive(Debug, Error)]
pub enum ContractError {
    /// The contract file could not be read
    #[error("cannot read contract {path}: {source}")]
    Read {
        /// Path to the contract file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The document is not valid YAML/JSON
    #[error("parse error: {0}")]
    Parse(String),

    /// A required top-level section is absent
    #[error("missing required section '{0}'")]
    MissingSection(&'static str),

    /// A node has the wrong shape or an unusable value
    #[error("malformed contract at {location}: {message}")]
    Malformed {
        /// Location in the document (e.g., "paths./users.post.requestBody")
        location: String,
        /// What was wrong
        message: String,
    },

    /// A `$ref` chain loops back on itself
    #[error("circular schema reference: {}", cycle.join(" -> "))]
    CircularReference {
        /// The chain of schema names forming the cycle
        cycle: Vec<String>,
    },

    /// A `$ref` points at a schema that does not exist
    #[error("unresolved schema reference '{reference}' at {location}")]
    UnresolvedReference {
        /// The reference string
        reference: String,
        /// Where it was used
        location: String,
    },

    /// Two operations share the same identifier
    #[error("duplicate operation id '{0}'")]
    DuplicateOperationId(String),
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the configuration file
        path: PathBuf,
        /// Error message from the parser
        message: String,
    },

    /// Configuration validation failed
    #[error("validation failed for {path}: {}", format_issues(errors))]
    ValidationError {
        /// Path to the configuration file
        path: String,
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
    },

    /// Referenced configuration file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found during configuration validation.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Path to the problematic field (e.g., "enrichment.endpoint")
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Error - validation failure that prevents configuration from being used
    Error,
    /// Warning - potential issue that does not prevent configuration loading
    Warning,
}

// ============================================================================
// Enrichment Errors
// ============================================================================

/// Failures of a single enrichment round trip.
///
/// Callers treat every variant the same way: keep the original scenario.
#[derive(Debug, Error)]
pub enum EnrichError {
    /// Connect or read deadline elapsed
    #[error("enrichment request timed out")]
    Timeout,

    /// Connection refused, DNS failure, or other transport failure
    #[error("network error: {0}")]
    Network(String),

    /// The provider answered with a non-success status
    #[error("provider returned HTTP {0}")]
    HttpStatus(u16),

    /// The provider's body could not be understood
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    /// The replacement text failed structural checks
    #[error("rejected replacement: {0}")]
    Rejected(String),
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `scenariogen` operations.
pub type Result<T> = std::result::Result<T, ScenarioGenError>;

// ============================================================================
// Tests
// ============================================================================
