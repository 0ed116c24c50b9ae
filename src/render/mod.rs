//! Rendering of scenario descriptors.
//!
//! [`KarateRenderer`] is the only place that knows Karate syntax. A feature
//! file is assembled from already-rendered scenarios so that enrichment can
//! replace individual scenarios between rendering and assembly. The JSON
//! plan serializes the descriptors themselves.

pub mod karate;

pub use karate::{DOC_STRING, KarateRenderer};

use regex::Regex;
use serde::Serialize;
use std::fmt::Write as _;
use std::sync::LazyLock;

use crate::contract::Contract;
use crate::scenario::Scenario;

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

/// Base URL expression used when the contract declares no server.
pub const BASE_URL_PROPERTY: &str = "karate.properties['baseUrl']";

/// A scenario rendered to Karate step text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedScenario {
    /// Scenario title
    pub name: String,
    /// Operation the scenario exercises
    pub operation_id: String,
    /// Tags including the leading `@`
    pub tags: Vec<String>,
    /// Step text; a step may span several lines (doc-strings)
    pub steps: Vec<String>,
}

impl RenderedScenario {
    /// Scenario block as it appears in a feature file, without trailing
    /// blank line.
    #[must_use]
    pub fn to_feature_text(&self) -> String {
        let mut out = String::new();
        if !self.tags.is_empty() {
            let _ = writeln!(out, "  {}", self.tags.join(" "));
        }
        let _ = writeln!(out, "  Scenario: {}", self.name);
        for step in &self.steps {
            for line in step.lines() {
                let _ = writeln!(out, "    {line}");
            }
        }
        out
    }
}

/// Feature-level tag derived from a title: lowercase, runs of anything
/// else than `[a-z0-9]` collapsed to `-`, trimmed.
#[must_use]
pub fn feature_tag(title: &str) -> String {
    let lowered = title.to_lowercase();
    let tag = NON_ALPHANUMERIC.replace_all(&lowered, "-");
    let tag = tag.trim_matches('-');
    if tag.is_empty() {
        "api".to_string()
    } else {
        tag.to_string()
    }
}

/// Assembles a complete Karate feature.
#[must_use]
pub fn render_feature(contract: &Contract, scenarios: &[RenderedScenario]) -> String {
    let info = &contract.info;
    let mut out = String::new();

    let _ = writeln!(out, "@{}", feature_tag(&info.title));
    let _ = writeln!(out, "Feature: {}", info.title);
    if let Some(description) = info.description.as_deref().map(str::trim) {
        if !description.is_empty() {
            for line in description.lines() {
                let _ = writeln!(out, "  {line}");
            }
        }
    }
    out.push('\n');

    let base_url = contract.base_url.as_deref().map_or_else(
        || BASE_URL_PROPERTY.to_string(),
        |url| format!("'{}'", url.replace('\'', "\\'")),
    );
    out.push_str("  Background:\n");
    out.push_str("    * def config = read('classpath:karate-config.js')\n");
    let _ = writeln!(out, "    * def baseUrl = {base_url}");
    out.push_str("    * def token = config.token\n");
    out.push_str("    * header Content-Type = 'application/json'\n");
    out.push_str("    * header Accept = 'application/json'\n");

    for scenario in scenarios {
        out.push('\n');
        out.push_str(&scenario.to_feature_text());
    }
    out
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Plan<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    base_url: Option<&'a str>,
    scenarios: &'a [Scenario],
}

/// Serializes the scenario descriptors as a pretty-printed JSON plan.
///
/// # Errors
///
/// Returns a serialization error if a value cannot be represented.
pub fn render_plan(contract: &Contract, scenarios: &[Scenario]) -> Result<String, serde_json::Error> {
    let plan = Plan {
        title: &contract.info.title,
        version: contract.info.version.as_deref(),
        base_url: contract.base_url.as_deref(),
        scenarios,
    };
    let mut text = serde_json::to_string_pretty(&plan)?;
    text.push('\n');
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::ContractInfo;
    use crate::scenario::{Step, Tag};

    fn contract(base_url: Option<&str>) -> Contract {
        Contract::new(
            ContractInfo {
                title: "Users API".to_string(),
                version: Some("1.0.0".to_string()),
                description: Some("User management".to_string()),
            },
            base_url.map(str::to_string),
            Vec::new(),
        )
        .unwrap()
    }

    fn rendered() -> RenderedScenario {
        RenderedScenario {
            name: "Create user - Happy path".to_string(),
            operation_id: "createUser".to_string(),
            tags: vec!["@smoke".to_string(), "@regression".to_string()],
            steps: vec![
                "Given url baseUrl + '/users'".to_string(),
                "* def requestBody =\n\"\"\"\n{}\n\"\"\"".to_string(),
                "Then status 201".to_string(),
            ],
        }
    }

    #[test]
    fn feature_tags() {
        assert_eq!(feature_tag("Users API"), "users-api");
        assert_eq!(feature_tag("  Pet Store (v2)!"), "pet-store-v2");
        assert_eq!(feature_tag("???"), "api");
    }

    #[test]
    fn feature_has_background_and_scenarios() {
        let text = render_feature(&contract(Some("https://api.example.com")), &[rendered()]);
        let expected = "\
@users-api
Feature: Users API
  User management

  Background:
    * def config = read('classpath:karate-config.js')
    * def baseUrl = 'https://api.example.com'
    * def token = config.token
    * header Content-Type = 'application/json'
    * header Accept = 'application/json'

  @smoke @regression
  Scenario: Create user - Happy path
    Given url baseUrl + '/users'
    * def requestBody =
    \"\"\"
    {}
    \"\"\"
    Then status 201
";
        assert_eq!(text, expected);
    }

    #[test]
    fn missing_server_falls_back_to_property() {
        let text = render_feature(&contract(None), &[]);
        assert!(text.contains("* def baseUrl = karate.properties['baseUrl']"));
        assert!(!text.contains("Scenario:"));
    }

    #[test]
    fn plan_serializes_descriptors() {
        let scenario = Scenario {
            name: "List users - Happy path".to_string(),
            operation_id: "listUsers".to_string(),
            tags: vec![Tag::Smoke],
            steps: vec![Step::AssertStatus { status: 200 }],
        };
        let text = render_plan(&contract(None), &[scenario]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["title"], "Users API");
        assert!(value.get("baseUrl").is_none());
        assert_eq!(value["scenarios"][0]["operationId"], "listUsers");
        assert_eq!(value["scenarios"][0]["steps"][0]["step"], "assertStatus");
    }
}
