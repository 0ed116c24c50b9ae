//! Karate step rendering.

use serde_json::Value;

use crate::contract::ValueType;
use crate::scenario::{BodySource, HeaderValue, Scenario, Step};

use super::RenderedScenario;

/// Delimiter of a Gherkin doc-string block.
pub const DOC_STRING: &str = "\"\"\"";

/// Turns scenario descriptors into Karate step lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct KarateRenderer;

impl KarateRenderer {
    /// Renders one scenario.
    ///
    /// A body step renders as a multi-line string (definition plus
    /// doc-string block); every other step is a single line.
    #[must_use]
    pub fn render(&self, scenario: &Scenario) -> RenderedScenario {
        let mut steps = Vec::with_capacity(scenario.steps.len() + 1);
        for step in &scenario.steps {
            match step {
                Step::SetBody { body } => {
                    steps.push(body_definition(body));
                    steps.push("And request requestBody".to_string());
                }
                other => steps.push(step_line(other)),
            }
        }
        RenderedScenario {
            name: scenario.name.clone(),
            operation_id: scenario.operation_id.clone(),
            tags: scenario.tags.iter().map(|t| format!("@{}", t.as_str())).collect(),
            steps,
        }
    }

    /// Renders every scenario, preserving order.
    #[must_use]
    pub fn render_all(&self, scenarios: &[Scenario]) -> Vec<RenderedScenario> {
        scenarios.iter().map(|s| self.render(s)).collect()
    }
}

fn step_line(step: &Step) -> String {
    match step {
        Step::SetUrl { path } => format!("Given url baseUrl + '{}'", escape(path)),
        Step::SetHeader {
            name,
            value: HeaderValue::Session,
        } => format!("And header {name} = 'Bearer ' + token"),
        Step::SetHeader {
            name,
            value: HeaderValue::Bearer(token),
        } => format!("And header {name} = 'Bearer {}'", escape(token)),
        Step::SetPathParam { name, value } => {
            format!("And path '{}' = {}", escape(name), literal(value))
        }
        Step::SetQueryParam { name, value } => {
            format!("And param '{}' = {}", escape(name), literal(value))
        }
        Step::SetBody { body } => body_definition(body),
        Step::Invoke { method } => format!("When method {method}"),
        Step::AssertStatus { status } => format!("Then status {status}"),
        Step::AssertFieldType { path, value_type } => {
            format!(
                "And match {} == '#{}'",
                response_field(path),
                type_marker(*value_type)
            )
        }
        Step::AssertFieldFormat { path, format } => {
            format!("And match {} == '#{format}'", response_field(path))
        }
        Step::AssertFieldContains { path, substring } => {
            format!(
                "And match {} contains '{}'",
                response_field(path),
                escape(substring)
            )
        }
    }
}

/// `response.name`, or `response['created-at']` when the name is not a
/// JavaScript identifier.
fn response_field(path: &str) -> String {
    let mut chars = path.chars();
    let identifier = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if identifier {
        format!("response.{path}")
    } else {
        format!("response['{}']", escape(path))
    }
}

fn body_definition(body: &BodySource) -> String {
    match body {
        BodySource::Fixture(name) => format!("* def requestBody = {name}"),
        BodySource::Literal(value) => {
            let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
            format!("* def requestBody =\n{DOC_STRING}\n{json}\n{DOC_STRING}")
        }
    }
}

const fn type_marker(value_type: ValueType) -> &'static str {
    match value_type {
        ValueType::String => "string",
        ValueType::Number => "number",
        ValueType::Boolean => "boolean",
        ValueType::Array => "array",
        ValueType::Object => "object",
        ValueType::Present => "present",
    }
}

/// Karate expression for a parameter value: strings single-quoted,
/// everything else as JSON.
fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", escape(s)),
        other => other.to_string(),
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "\\'")
}
