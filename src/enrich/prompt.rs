//! Enrichment prompt construction.

use std::fmt::Write as _;

use crate::contract::Operation;
use crate::render::RenderedScenario;

/// Builds the natural-language instruction sent to the model.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    /// Prompt asking the model to improve one rendered scenario.
    #[must_use]
    pub fn build(&self, scenario: &RenderedScenario, op: &Operation) -> String {
        let mut out = String::from(
            "You are an expert in API testing and in the Karate test framework.\n\n",
        );

        out.push_str("ENDPOINT:\n");
        let _ = writeln!(out, "- Path: {}", op.path);
        let _ = writeln!(out, "- Method: {}", op.method);
        let _ = writeln!(
            out,
            "- Description: {}",
            op.summary.as_deref().unwrap_or("(none)")
        );
        if let Some(fields) = body_fields(op) {
            let _ = writeln!(out, "- Request fields: {fields}");
        }
        out.push('\n');

        out.push_str("BASE SCENARIO:\n");
        out.push_str(&scenario.to_feature_text());
        out.push('\n');

        out.push_str(
            "TASK:\n\
             Improve this Karate scenario following these rules:\n\n\
             1. ASSERTIONS: add a match for every important response field\n   \
             Example: And match response.id == '#string'\n\n\
             2. TYPES: use the Karate type markers '#string', '#number', \
             '#boolean', '#array', '#uuid', '#email'\n\n\
             3. LOGS: for important scenarios add a useful print step\n   \
             Example: And print 'User created with ID:', response.id\n\n\
             4. VARIABLES: capture identifiers for later use when relevant\n   \
             Example: * def userId = response.id\n\n",
        );

        out.push_str(
            "CONSTRAINTS:\n\
             - Do NOT change the overall structure of the scenario\n\
             - Do NOT invent fields that the endpoint does not have\n\
             - Use only valid Karate syntax\n\
             - Return ONLY the improved scenario, without explanations\n\
             - Do NOT use markdown code fences\n\n",
        );

        out.push_str(
            "OUTPUT FORMAT:\n\
             Return the complete scenario from the 'Scenario:' line to the last step.\n",
        );
        out
    }
}

/// Comma-separated request body properties, required ones marked with `*`.
fn body_fields(op: &Operation) -> Option<String> {
    let body = op.request_body.as_ref()?;
    let properties = body.properties().filter(|p| !p.is_empty())?;
    let fields: Vec<_> = properties
        .iter()
        .map(|(name, schema)| {
            let marker = if body.required().contains(name) {
                "*"
            } else {
                ""
            };
            format!("{name}{marker} ({})", schema.type_name())
        })
        .collect();
    Some(fields.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{HttpMethod, Schema};
    use crate::render::KarateRenderer;
    use crate::scenario::{Scenario, Step, Tag};

    fn rendered() -> RenderedScenario {
        KarateRenderer.render(&Scenario {
            name: "Create user - Happy path".to_string(),
            operation_id: "createUser".to_string(),
            tags: vec![Tag::Smoke],
            steps: vec![Step::AssertStatus { status: 201 }],
        })
    }

    #[test]
    fn prompt_describes_endpoint_and_scenario() {
        let op = Operation::new(HttpMethod::Post, "/users")
            .with_operation_id("createUser")
            .with_summary("Create user");
        let prompt = PromptBuilder.build(&rendered(), &op);
        assert!(prompt.contains("- Path: /users"));
        assert!(prompt.contains("- Method: POST"));
        assert!(prompt.contains("- Description: Create user"));
        assert!(prompt.contains("  Scenario: Create user - Happy path"));
        assert!(prompt.contains("    Then status 201"));
        assert!(prompt.ends_with("to the last step.\n"));
    }

    #[test]
    fn prompt_lists_body_fields() {
        let body = Schema::object()
            .with_property("email", Schema::string())
            .with_property("age", Schema::integer())
            .with_required("email");
        let op = Operation::new(HttpMethod::Post, "/users").with_request_body(body);
        let prompt = PromptBuilder.build(&rendered(), &op);
        assert!(prompt.contains("- Request fields: email* (string), age (integer)"));
    }

    #[test]
    fn missing_summary_is_marked() {
        let op = Operation::new(HttpMethod::Get, "/health");
        let prompt = PromptBuilder.build(&rendered(), &op);
        assert!(prompt.contains("- Description: (none)"));
        assert!(!prompt.contains("Request fields"));
    }
}
