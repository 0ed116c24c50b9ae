//! Missing and empty inputs.

use crate::contract::{Operation, ParamLocation, Schema};
use crate::scenario::{Scenario, Tag};
use crate::synth::{Role, synthesize};

use super::{ScenarioBuilder, ScenarioStrategy, object_body};

const TAGS: &[Tag] = &[Tag::Validation, Tag::Regression];
const BAD_REQUEST: u16 = 400;

/// Emits 400 scenarios for missing required body fields, empty string
/// fields, and missing required path or query parameters, in that order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationStrategy;

impl ScenarioStrategy for ValidationStrategy {
    fn name(&self) -> &'static str {
        "validation"
    }

    fn generate(&self, op: &Operation) -> Vec<Scenario> {
        let mut scenarios = Vec::new();

        if let Some(body) = &op.request_body {
            scenarios.extend(missing_fields(op, body));
            scenarios.extend(empty_fields(op, body));
        }
        scenarios.extend(missing_params(op));

        scenarios
    }
}

fn missing_fields<'a>(op: &'a Operation, body: &'a Schema) -> impl Iterator<Item = Scenario> + 'a {
    body.required().iter().map(move |field| {
        ScenarioBuilder::new(op, format_args!("Missing required field {field}"), TAGS)
            .session_auth()
            .valid_params()
            .body(object_body(body, Some((field.as_str(), None))))
            .expect_status(BAD_REQUEST)
            .expect_message_contains(field)
            .build()
    })
}

fn empty_fields<'a>(op: &'a Operation, body: &'a Schema) -> impl Iterator<Item = Scenario> + 'a {
    body.properties()
        .into_iter()
        .flatten()
        .filter(|(_, property)| property.is_string())
        .map(move |(field, property)| {
            let empty = synthesize(property, Role::Empty).into_value();
            ScenarioBuilder::new(op, format_args!("Empty field {field}"), TAGS)
                .session_auth()
                .valid_params()
                .body(object_body(body, Some((field.as_str(), empty))))
                .expect_status(BAD_REQUEST)
                .expect_message_contains(field)
                .build()
        })
}

fn missing_params(op: &Operation) -> impl Iterator<Item = Scenario> + '_ {
    op.parameters
        .iter()
        .filter(|p| p.required && matches!(p.location, ParamLocation::Path | ParamLocation::Query))
        .map(move |target| {
            ScenarioBuilder::new(op, format_args!("Missing parameter {}", target.name), TAGS)
                .session_auth()
                .params_except(|p| p.name == target.name && p.location == target.location)
                .valid_body()
                .expect_status(BAD_REQUEST)
                .expect_message_contains(&target.name)
                .build()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{HttpMethod, Parameter, StringFormat};
    use crate::scenario::Step;
    use serde_json::json;

    fn create_user() -> Operation {
        Operation::new(HttpMethod::Post, "/teams/{teamId}/users")
            .with_summary("Create user")
            .with_parameter(Parameter::new("teamId", ParamLocation::Path, Schema::string()).required())
            .with_parameter(Parameter::new("dryRun", ParamLocation::Query, Schema::boolean()))
            .with_parameter(Parameter::new("X-Trace", ParamLocation::Header, Schema::string()).required())
            .with_request_body(
                Schema::object()
                    .with_property(
                        "email",
                        Schema::string()
                            .with_format(StringFormat::Email)
                            .with_max_length(50),
                    )
                    .with_property("nickname", Schema::string())
                    .with_property("age", Schema::integer())
                    .with_required("email")
                    .with_required("age"),
            )
    }

    #[test]
    fn ordering_is_missing_then_empty_then_params() {
        let names: Vec<_> = ValidationStrategy
            .generate(&create_user())
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(
            names,
            [
                "Create user - Missing required field email",
                "Create user - Missing required field age",
                "Create user - Empty field email",
                "Create user - Empty field nickname",
                "Create user - Missing parameter teamId",
            ]
        );
    }

    #[test]
    fn missing_field_body_lacks_the_key() {
        let scenarios = ValidationStrategy.generate(&create_user());
        let body = scenarios[0].body().unwrap();
        assert!(body.get("email").is_none());
        assert_eq!(body, &json!({"nickname": "test-value", "age": 123}));
        assert_eq!(scenarios[0].expected_status(), Some(400));
        assert_eq!(
            scenarios[0].steps.last(),
            Some(&Step::AssertFieldContains {
                path: "message".to_string(),
                substring: "email".to_string()
            })
        );
    }

    #[test]
    fn empty_field_body_sets_blank_string() {
        let scenarios = ValidationStrategy.generate(&create_user());
        let body = scenarios[3].body().unwrap();
        assert_eq!(body["nickname"], json!(""));
        assert_eq!(body["email"], json!("user@example.com"));
    }

    #[test]
    fn missing_param_omits_only_that_param_and_keeps_body() {
        let scenario = ValidationStrategy.generate(&create_user()).pop().unwrap();
        assert!(!scenario.steps.iter().any(
            |s| matches!(s, Step::SetPathParam { name, .. } if name == "teamId")
        ));
        assert!(scenario.steps.iter().any(
            |s| matches!(s, Step::SetQueryParam { name, .. } if name == "dryRun")
        ));
        assert!(scenario.body().is_some());
    }

    #[test]
    fn no_body_and_no_required_params_yields_nothing() {
        let op = Operation::new(HttpMethod::Get, "/health");
        assert!(ValidationStrategy.generate(&op).is_empty());
    }
}
