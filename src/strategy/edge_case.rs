//! Boundary values of request body fields.

use serde_json::Value;

use crate::contract::{Operation, Schema};
use crate::scenario::{Scenario, Tag};
use crate::synth::{Role, SPECIAL_CHARACTERS, synthesize};

use super::{ScenarioBuilder, ScenarioStrategy, object_body};

const TAGS: &[Tag] = &[Tag::EdgeCase, Tag::Regression];
const ACCEPTED: u16 = 200;
const REJECTED: u16 = 400;

/// Emits boundary scenarios for each top-level property of an object
/// request body. Operations without one yield nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeCaseStrategy;

impl ScenarioStrategy for EdgeCaseStrategy {
    fn name(&self) -> &'static str {
        "edge_case"
    }

    fn generate(&self, op: &Operation) -> Vec<Scenario> {
        let Some(body) = &op.request_body else {
            return Vec::new();
        };
        let Some(properties) = body.properties() else {
            return Vec::new();
        };

        let mut scenarios = Vec::new();
        for (field, property) in properties {
            for case in field_cases(property) {
                scenarios.push(
                    ScenarioBuilder::new(op, format_args!("{field} {}", case.label), TAGS)
                        .session_auth()
                        .valid_params()
                        .body(object_body(body, Some((field.as_str(), Some(case.value)))))
                        .expect_status(case.status)
                        .build(),
                );
            }
        }
        scenarios
    }
}

struct EdgeCase {
    value: Value,
    label: &'static str,
    status: u16,
}

impl EdgeCase {
    fn synthesized(property: &Schema, role: Role, label: &'static str, status: u16) -> Option<Self> {
        synthesize(property, role)
            .into_value()
            .map(|value| Self { value, label, status })
    }
}

fn field_cases(property: &Schema) -> Vec<EdgeCase> {
    let mut cases = Vec::new();
    if property.is_string() {
        if property.max_length().is_some() {
            cases.extend(EdgeCase::synthesized(
                property,
                Role::BoundaryMax,
                "at max length",
                ACCEPTED,
            ));
        }
        // Formatted strings included.
        cases.push(EdgeCase {
            value: Value::from(SPECIAL_CHARACTERS),
            label: "with special characters",
            status: REJECTED,
        });
    } else if property.is_numeric() {
        if property.minimum().is_some() {
            cases.extend(EdgeCase::synthesized(
                property,
                Role::BoundaryMin,
                "at minimum value",
                ACCEPTED,
            ));
        }
        if property.maximum().is_some() {
            cases.extend(EdgeCase::synthesized(
                property,
                Role::BoundaryMax,
                "at maximum value",
                ACCEPTED,
            ));
        }
        cases.extend(EdgeCase::synthesized(
            property,
            Role::Invalid,
            "with negative value",
            REJECTED,
        ));
    }
    cases
}
