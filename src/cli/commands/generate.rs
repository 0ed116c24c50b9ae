//! `generate` command
//!
//! Pipeline: configuration → contract → scenarios → rendering →
//! (optional) enrichment → output.

use tracing::{info, warn};

use crate::cli::args::{GenerateArgs, ScenarioFormat};
use crate::config::{ConfigLoader, LoadResult, StrategyFlags, finalize};
use crate::contract::ContractParser;
use crate::enrich::ScenarioEnricher;
use crate::error::ScenarioGenError;
use crate::generator::ScenarioGenerator;
use crate::render::{KarateRenderer, render_feature, render_plan};
use crate::writer::write_output;

/// Generates scenarios and writes them to the configured output.
///
/// # Errors
///
/// Returns a configuration error for invalid settings, a usage error when
/// no contract is given, a contract error when the contract does not load,
/// and an I/O error when the output cannot be written.
pub async fn run(args: &GenerateArgs) -> Result<(), ScenarioGenError> {
    let LoadResult { config, warnings } = resolve_config(args, |name| std::env::var(name).ok())?;
    for warning in &warnings {
        warn!(path = %warning.path, "{}", warning.message);
    }

    let contract_path = config.contract.as_deref().ok_or_else(|| {
        ScenarioGenError::Usage(
            "no contract given (use --contract or set `contract` in the configuration)".to_string(),
        )
    })?;
    let contract = ContractParser::parse_file(contract_path)?;
    info!(
        title = %contract.info.title,
        operations = contract.len(),
        "contract loaded"
    );

    let generator = ScenarioGenerator::new(&config.strategies);
    let scenarios = generator.generate_all(&contract);

    let text = match args.format {
        ScenarioFormat::Json => {
            if config.enrichment.enabled {
                warn!("enrichment applies to feature output only; skipped for JSON plan");
            }
            render_plan(&contract, &scenarios)?
        }
        ScenarioFormat::Feature => {
            let rendered = KarateRenderer.render_all(&scenarios);
            let rendered = ScenarioEnricher::from_config(&config.enrichment)
                .enrich(rendered, &contract)
                .await;
            render_feature(&contract, &rendered)
        }
    };

    write_output(config.output.as_deref(), &text)?;
    info!(scenarios = scenarios.len(), "generation finished");
    Ok(())
}

/// Assembles the run configuration: file, then environment, then flags.
///
/// # Errors
///
/// Returns a [`ConfigError`](crate::error::ConfigError) when loading or
/// validation fails.
pub fn resolve_config(
    args: &GenerateArgs,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<LoadResult, ScenarioGenError> {
    let loader = ConfigLoader::new(args.config.clone());
    let mut config = loader.load_with_env(lookup)?;

    if let Some(contract) = &args.contract {
        config.contract = Some(contract.clone());
    }
    if let Some(output) = &args.output {
        config.output = Some(output.clone());
    }
    if !args.strategies.is_empty() {
        config.strategies = StrategyFlags::only(&args.strategies);
    }
    if args.enrich {
        config.enrichment.enabled = true;
    }
    if let Some(provider) = &args.provider {
        config.enrichment.provider.clone_from(provider);
    }

    let source = loader
        .path()
        .map_or_else(|| "<defaults>".to_string(), |p| p.display().to_string());
    finalize(config, &source).map_err(Into::into)
}
