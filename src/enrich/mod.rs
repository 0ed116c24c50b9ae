//! Optional LLM enrichment of rendered scenarios.
//!
//! Enrichment is best effort. Every scenario gets one attempt, in order,
//! and any failure keeps the scenario as rendered. A replacement is
//! accepted only if it parses as a single Karate scenario with at least one
//! step; its name, tags, and operation id are taken from the original.

pub mod ollama;
pub mod prompt;

pub use ollama::OllamaEnricher;
pub use prompt::PromptBuilder;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::EnrichmentConfig;
use crate::contract::Contract;
use crate::error::EnrichError;
use crate::render::{DOC_STRING, RenderedScenario};

/// Provider selectors understood by [`ScenarioEnricher::from_config`].
pub const KNOWN_PROVIDERS: &[&str] = &["mistral", "ollama"];

const STEP_KEYWORDS: &[&str] = &["Given ", "When ", "Then ", "And ", "But ", "* "];

/// Closest known provider to `name`, if any is reasonably close.
#[must_use]
pub fn suggest_provider(name: &str) -> Option<&'static str> {
    let name = name.to_lowercase();
    KNOWN_PROVIDERS
        .iter()
        .map(|candidate| (*candidate, strsim::levenshtein(&name, candidate)))
        .filter(|(_, distance)| *distance <= 2)
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// A text-completion backend.
#[async_trait]
pub trait Enricher: Send + Sync {
    /// Sends `prompt` and returns the model's raw answer.
    ///
    /// # Errors
    ///
    /// Returns an [`EnrichError`] for transport, status, or decoding
    /// failures.
    async fn complete(&self, prompt: &str) -> Result<String, EnrichError>;
}

/// Applies an [`Enricher`] to every rendered scenario.
pub struct ScenarioEnricher {
    backend: Option<Box<dyn Enricher>>,
    prompts: PromptBuilder,
}

impl std::fmt::Debug for ScenarioEnricher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioEnricher")
            .field("active", &self.backend.is_some())
            .finish()
    }
}

impl ScenarioEnricher {
    /// An enricher that returns its input unchanged.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            backend: None,
            prompts: PromptBuilder,
        }
    }

    /// An enricher driven by `backend`.
    #[must_use]
    pub fn with_backend(backend: Box<dyn Enricher>) -> Self {
        Self {
            backend: Some(backend),
            prompts: PromptBuilder,
        }
    }

    /// Resolves the configured provider.
    ///
    /// Disabled enrichment, unknown providers, and client construction
    /// failures all yield a pass-through enricher.
    #[must_use]
    pub fn from_config(config: &EnrichmentConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        let provider = config.provider.trim().to_lowercase();
        if !KNOWN_PROVIDERS.contains(&provider.as_str()) {
            match suggest_provider(&provider) {
                Some(hint) => warn!(
                    provider = %config.provider,
                    "unknown enrichment provider (did you mean '{hint}'?); scenarios left unchanged"
                ),
                None => warn!(
                    provider = %config.provider,
                    "unknown enrichment provider; scenarios left unchanged"
                ),
            }
            return Self::disabled();
        }
        match OllamaEnricher::new(config) {
            Ok(client) => Self::with_backend(Box::new(client)),
            Err(e) => {
                warn!(error = %e, "cannot create enrichment client; scenarios left unchanged");
                Self::disabled()
            }
        }
    }

    /// Whether a backend is configured.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.backend.is_some()
    }

    /// Enriches `scenarios` in order, one request at a time.
    pub async fn enrich(
        &self,
        scenarios: Vec<RenderedScenario>,
        contract: &Contract,
    ) -> Vec<RenderedScenario> {
        let Some(backend) = self.backend.as_deref() else {
            debug!("enrichment disabled");
            return scenarios;
        };

        let total = scenarios.len();
        info!(total, "enriching scenarios");

        let mut accepted = 0usize;
        let mut out = Vec::with_capacity(total);
        for (index, scenario) in scenarios.into_iter().enumerate() {
            debug!(index = index + 1, total, name = %scenario.name, "enriching scenario");
            match self.enrich_one(backend, &scenario, contract).await {
                Ok(enriched) => {
                    accepted += 1;
                    out.push(enriched);
                }
                Err(e) => {
                    warn!(name = %scenario.name, error = %e, "enrichment failed, keeping scenario");
                    out.push(scenario);
                }
            }
        }

        info!(total, accepted, "enrichment complete");
        out
    }

    async fn enrich_one(
        &self,
        backend: &dyn Enricher,
        scenario: &RenderedScenario,
        contract: &Contract,
    ) -> Result<RenderedScenario, EnrichError> {
        let op = contract.operation(&scenario.operation_id).ok_or_else(|| {
            EnrichError::Rejected(format!("unknown operation '{}'", scenario.operation_id))
        })?;
        let prompt = self.prompts.build(scenario, op);
        let answer = backend.complete(&prompt).await?;
        parse_replacement(&answer, scenario)
    }
}

/// Parses a model answer into a replacement for `original`.
///
/// Markdown fences, blank lines, comments, and tag lines before the header
/// are skipped. The first remaining line must be a `Scenario:` header.
/// Step lines start with a Gherkin keyword or `*`; doc-string blocks are
/// attached to the step before them. Parsing stops at a second header.
///
/// # Errors
///
/// Returns [`EnrichError::Rejected`] when no header, no step, or an
/// unterminated doc-string is found.
pub fn parse_replacement(
    text: &str,
    original: &RenderedScenario,
) -> Result<RenderedScenario, EnrichError> {
    let mut lines = text.lines();

    let header = lines
        .by_ref()
        .map(str::trim)
        .find(|line| !is_preamble(line))
        .ok_or_else(|| EnrichError::Rejected("empty answer".to_string()))?;
    if !header.starts_with("Scenario:") {
        return Err(EnrichError::Rejected(format!(
            "answer does not start with a Scenario header: '{header}'"
        )));
    }

    let mut steps: Vec<String> = Vec::new();
    let mut doc_indent: Option<usize> = None;

    for line in lines {
        let trimmed = line.trim();

        if let Some(indent) = doc_indent {
            let Some(step) = steps.last_mut() else {
                return Err(EnrichError::Rejected("doc-string without step".to_string()));
            };
            step.push('\n');
            if trimmed == DOC_STRING {
                step.push_str(DOC_STRING);
                doc_indent = None;
            } else {
                step.push_str(dedent(line, indent));
            }
            continue;
        }

        if trimmed == DOC_STRING {
            let Some(step) = steps.last_mut() else {
                return Err(EnrichError::Rejected("doc-string without step".to_string()));
            };
            step.push('\n');
            step.push_str(DOC_STRING);
            doc_indent = Some(line.len() - line.trim_start().len());
        } else if trimmed.starts_with("Scenario:") || trimmed.starts_with("Scenario Outline:") {
            break;
        } else if STEP_KEYWORDS.iter().any(|k| trimmed.starts_with(k)) {
            steps.push(trimmed.to_string());
        }
    }

    if doc_indent.is_some() {
        return Err(EnrichError::Rejected("unterminated doc-string".to_string()));
    }
    if steps.is_empty() {
        return Err(EnrichError::Rejected("answer contains no steps".to_string()));
    }

    Ok(RenderedScenario {
        name: original.name.clone(),
        operation_id: original.operation_id.clone(),
        tags: original.tags.clone(),
        steps,
    })
}

fn is_preamble(line: &str) -> bool {
    line.is_empty() || line.starts_with("```") || line.starts_with('@') || line.starts_with('#')
}

/// Strips up to `indent` leading whitespace characters.
fn dedent(line: &str, indent: usize) -> &str {
    let strip = line
        .char_indices()
        .take(indent)
        .take_while(|(_, c)| c.is_whitespace())
        .last()
        .map_or(0, |(i, c)| i + c.len_utf8());
    &line[strip..]
}
