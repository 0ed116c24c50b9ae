//! Configuration schema types.
//!
//! Deserialized from an optional YAML file. Every field has a default, so
//! an empty mapping is a complete configuration. Keys are `snake_case`;
//! the legacy `ContractPath` / `OutputPath` / `Generate*` / `UseIA` / `IA` /
//! `Ollama*` property names are accepted as aliases.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::PathBuf;
use std::time::Duration;

use crate::strategy::StrategyKind;

/// Default provider selector.
pub const DEFAULT_PROVIDER: &str = "mistral";

/// Default Ollama generate endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/generate";

/// Default model name.
pub const DEFAULT_MODEL: &str = "mistral";

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(100);

/// Default read timeout.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(300);

// ============================================================================
// Top-Level Configuration
// ============================================================================

/// Root configuration for a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct AppConfig {
    /// Contract to read
    #[serde(alias = "ContractPath", skip_serializing_if = "Option::is_none")]
    pub contract: Option<PathBuf>,

    /// Where to write the generated feature; stdout when absent
    #[serde(alias = "OutputPath", skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Which strategies run
    pub strategies: StrategyFlags,

    /// Optional LLM rewrite of rendered scenarios
    pub enrichment: EnrichmentConfig,
}

// ============================================================================
// Strategies
// ============================================================================

/// On/off switch per strategy. All on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
#[allow(clippy::struct_excessive_bools)]
pub struct StrategyFlags {
    /// Happy path scenarios
    #[serde(alias = "GenerateHappyPath")]
    pub happy_path: bool,

    /// Missing/empty input scenarios
    #[serde(alias = "GenerateValidations")]
    pub validations: bool,

    /// Declared error response scenarios
    #[serde(alias = "GenerateErrorCases")]
    pub error_cases: bool,

    /// Boundary value scenarios
    #[serde(alias = "GenerateEdgeCases")]
    pub edge_cases: bool,
}

impl Default for StrategyFlags {
    fn default() -> Self {
        Self {
            happy_path: true,
            validations: true,
            error_cases: true,
            edge_cases: true,
        }
    }
}

impl StrategyFlags {
    /// Flags with only `kinds` enabled.
    #[must_use]
    pub fn only(kinds: &[StrategyKind]) -> Self {
        let mut flags = Self {
            happy_path: false,
            validations: false,
            error_cases: false,
            edge_cases: false,
        };
        for kind in kinds {
            *flags.flag_mut(*kind) = true;
        }
        flags
    }

    /// Whether `kind` is enabled.
    #[must_use]
    pub const fn is_enabled(&self, kind: StrategyKind) -> bool {
        match kind {
            StrategyKind::HappyPath => self.happy_path,
            StrategyKind::Validation => self.validations,
            StrategyKind::Error => self.error_cases,
            StrategyKind::EdgeCase => self.edge_cases,
        }
    }

    /// Whether at least one strategy is enabled.
    #[must_use]
    pub const fn any_enabled(&self) -> bool {
        self.happy_path || self.validations || self.error_cases || self.edge_cases
    }

    pub(crate) const fn flag_mut(&mut self, kind: StrategyKind) -> &mut bool {
        match kind {
            StrategyKind::HappyPath => &mut self.happy_path,
            StrategyKind::Validation => &mut self.validations,
            StrategyKind::Error => &mut self.error_cases,
            StrategyKind::EdgeCase => &mut self.edge_cases,
        }
    }
}

// ============================================================================
// Enrichment
// ============================================================================

/// LLM enrichment settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct EnrichmentConfig {
    /// Whether enrichment runs at all
    #[serde(alias = "UseIA")]
    pub enabled: bool,

    /// Provider selector (`mistral` or `ollama`)
    #[serde(alias = "IA")]
    pub provider: String,

    /// Generate endpoint URL
    #[serde(alias = "OllamaURI")]
    pub endpoint: String,

    /// Model name sent with every request
    #[serde(alias = "OllamaModel")]
    pub model: String,

    /// TCP connect deadline, e.g. `100s`
    #[serde(with = "humantime_duration")]
    pub connect_timeout: Duration,

    /// Deadline for sending the request and reading the whole response
    #[serde(with = "humantime_duration")]
    pub read_timeout: Duration,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: DEFAULT_PROVIDER.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

/// Durations written as `humantime` strings (`90s`, `5m`, `1m 30s`).
/// Bare integers are read as seconds.
mod humantime_duration {
    use super::{Deserialize, Deserializer, Duration, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Seconds(u64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Seconds(secs) => Ok(Duration::from_secs(secs)),
            Raw::Text(text) => humantime::parse_duration(text.trim())
                .map_err(|e| serde::de::Error::custom(format!("invalid duration '{text}': {e}"))),
        }
    }
}
