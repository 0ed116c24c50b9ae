//! Configuration loader
//!
//! Loading pipeline:
//! 1. Read the YAML file (optional; defaults when absent)
//! 2. Deserialize to [`AppConfig`]
//! 3. Apply `SCENARIOGEN_*` environment overrides
//! 4. Caller applies command-line overrides
//! 5. [`finalize`] validates and splits warnings from errors

use std::path::{Path, PathBuf};

use crate::config::schema::AppConfig;
use crate::config::validation::Validator;
use crate::error::{ConfigError, ValidationIssue};

/// Environment overrides, as `(variable, config field)`.
pub const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("SCENARIOGEN_GENERATE_HAPPY_PATH", "strategies.happy_path"),
    ("SCENARIOGEN_GENERATE_VALIDATIONS", "strategies.validations"),
    ("SCENARIOGEN_GENERATE_ERROR_CASES", "strategies.error_cases"),
    ("SCENARIOGEN_GENERATE_EDGE_CASES", "strategies.edge_cases"),
    ("SCENARIOGEN_USE_ENRICHMENT", "enrichment.enabled"),
    ("SCENARIOGEN_PROVIDER", "enrichment.provider"),
    ("SCENARIOGEN_OLLAMA_URI", "enrichment.endpoint"),
    ("SCENARIOGEN_OLLAMA_MODEL", "enrichment.model"),
];

/// A validated configuration plus the warnings found on the way.
#[derive(Debug)]
pub struct LoadResult {
    /// The validated configuration
    pub config: AppConfig,

    /// Non-fatal validation issues
    pub warnings: Vec<ValidationIssue>,
}

/// Reads configuration from a file and the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Loader for `path`, or defaults only when `None`.
    #[must_use]
    pub const fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// The configuration file in use, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Loads the file and applies overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] if the file cannot be read,
    /// [`ConfigError::ParseError`] if it is not a valid configuration, and
    /// [`ConfigError::InvalidValue`] for unparsable environment values.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        self.load_with_env(|name| std::env::var(name).ok())
    }

    /// Like [`ConfigLoader::load`] with an explicit environment lookup.
    ///
    /// # Errors
    ///
    /// See [`ConfigLoader::load`].
    pub fn load_with_env(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<AppConfig, ConfigError> {
        let mut config = match &self.path {
            Some(path) => read_file(path)?,
            None => AppConfig::default(),
        };
        apply_env(&mut config, lookup)?;
        Ok(config)
    }
}

fn read_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
        path: path.to_path_buf(),
    })?;
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(&raw);

    if raw.trim().is_empty() {
        return Err(ConfigError::ParseError {
            path: path.to_path_buf(),
            message: "Configuration file is empty".to_string(),
        });
    }

    serde_yaml::from_str(raw).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Applies every `SCENARIOGEN_*` override that `lookup` resolves.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if a boolean override does not
/// parse.
pub fn apply_env(
    config: &mut AppConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    for &(var, field) in ENV_OVERRIDES {
        let Some(value) = lookup(var) else { continue };
        match field {
            "strategies.happy_path" => config.strategies.happy_path = parse_bool(var, &value)?,
            "strategies.validations" => config.strategies.validations = parse_bool(var, &value)?,
            "strategies.error_cases" => config.strategies.error_cases = parse_bool(var, &value)?,
            "strategies.edge_cases" => config.strategies.edge_cases = parse_bool(var, &value)?,
            "enrichment.enabled" => config.enrichment.enabled = parse_bool(var, &value)?,
            "enrichment.provider" => config.enrichment.provider = value,
            "enrichment.endpoint" => config.enrichment.endpoint = value,
            "enrichment.model" => config.enrichment.model = value,
            _ => {}
        }
        tracing::debug!(var, field, "applied environment override");
    }
    Ok(())
}

/// Validates a fully assembled configuration.
///
/// # Errors
///
/// Returns [`ConfigError::ValidationError`] listing every error-severity
/// issue. `source` names the configuration in the message.
pub fn finalize(config: AppConfig, source: &str) -> Result<LoadResult, ConfigError> {
    let result = Validator::new().validate(&config);
    if result.has_errors() {
        return Err(ConfigError::ValidationError {
            path: source.to_string(),
            errors: result.errors,
        });
    }
    Ok(LoadResult {
        config,
        warnings: result.warnings,
    })
}

fn parse_bool(var: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: var.to_string(),
            value: value.to_string(),
            expected: "a boolean (true/false)".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn no_file_no_env_is_default() {
        let config = ConfigLoader::new(None).load_with_env(env(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "enrichment:\n  model: llama3\n  enabled: false").unwrap();

        let config = ConfigLoader::new(Some(file.path().to_path_buf()))
            .load_with_env(env(&[
                ("SCENARIOGEN_USE_ENRICHMENT", "true"),
                ("SCENARIOGEN_GENERATE_EDGE_CASES", "0"),
                ("SCENARIOGEN_OLLAMA_URI", "http://gpu-box:11434/api/generate"),
            ]))
            .unwrap();
        assert!(config.enrichment.enabled);
        assert_eq!(config.enrichment.model, "llama3");
        assert_eq!(config.enrichment.endpoint, "http://gpu-box:11434/api/generate");
        assert!(!config.strategies.edge_cases);
        assert!(config.strategies.happy_path);
    }

    #[test]
    fn invalid_boolean_env_is_rejected() {
        let err = ConfigLoader::new(None)
            .load_with_env(env(&[("SCENARIOGEN_GENERATE_HAPPY_PATH", "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "SCENARIOGEN_GENERATE_HAPPY_PATH"));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = ConfigLoader::new(Some(PathBuf::from("/nonexistent/scenariogen.yaml")))
            .load_with_env(env(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { .. }));
    }

    #[test]
    fn empty_file_is_a_parse_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = ConfigLoader::new(Some(file.path().to_path_buf()))
            .load_with_env(env(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { ref message, .. } if message.contains("empty")));
    }

    #[test]
    fn unknown_shape_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "strategies: [happy]").unwrap();
        let err = ConfigLoader::new(Some(file.path().to_path_buf()))
            .load_with_env(env(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn finalize_rejects_errors_and_keeps_warnings() {
        let mut config = AppConfig::default();
        config.strategies = crate::config::StrategyFlags::only(&[]);
        let result = finalize(config, "test").unwrap();
        assert_eq!(result.warnings.len(), 1);

        let mut config = AppConfig::default();
        config.enrichment.model.clear();
        let err = finalize(config, "test").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }
}
