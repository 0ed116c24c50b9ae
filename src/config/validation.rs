//! Configuration validation
//!
//! Runs on the fully assembled [`AppConfig`] (file, environment, and
//! command line merged). Collects every issue instead of stopping at the
//! first one.

use crate::config::schema::AppConfig;
use crate::enrich::{KNOWN_PROVIDERS, suggest_provider};
use crate::error::{Severity, ValidationIssue};

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent the run).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (logged).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Configuration validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a configuration and returns all issues found.
    pub fn validate(&mut self, config: &AppConfig) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_strategies(config);
        self.validate_enrichment(config);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    fn validate_strategies(&mut self, config: &AppConfig) {
        if !config.strategies.any_enabled() {
            self.add_warning(
                "strategies",
                "No strategy is enabled; the output will contain no scenarios",
            );
        }
    }

    fn validate_enrichment(&mut self, config: &AppConfig) {
        let enrichment = &config.enrichment;

        // Timeouts are checked even when enrichment is off.
        if enrichment.connect_timeout.is_zero() {
            self.add_error("enrichment.connect_timeout", "Connect timeout must be positive");
        }
        if enrichment.read_timeout.is_zero() {
            self.add_error("enrichment.read_timeout", "Read timeout must be positive");
        } else if enrichment.read_timeout <= enrichment.connect_timeout {
            self.add_warning(
                "enrichment.read_timeout",
                "Read timeout is not larger than connect timeout",
            );
        }

        if !enrichment.enabled {
            return;
        }

        let endpoint = enrichment.endpoint.trim();
        if endpoint.is_empty() {
            self.add_error("enrichment.endpoint", "Endpoint is required when enrichment is enabled");
        } else if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            self.add_error(
                "enrichment.endpoint",
                &format!("Endpoint '{endpoint}' must be an http:// or https:// URL"),
            );
        }

        if enrichment.model.trim().is_empty() {
            self.add_error("enrichment.model", "Model is required when enrichment is enabled");
        }

        let provider = enrichment.provider.as_str();
        if !KNOWN_PROVIDERS.contains(&provider) {
            let hint = suggest_provider(provider)
                .map(|s| format!(" (did you mean '{s}'?)"))
                .unwrap_or_default();
            self.add_warning(
                "enrichment.provider",
                &format!("Unknown provider '{provider}'{hint}; enrichment will be skipped"),
            );
        }
    }

    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}
