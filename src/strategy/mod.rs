//! Scenario strategies.
//!
//! Each strategy is a stateless rule set that turns one [`Operation`] into
//! zero or more [`Scenario`]s. Strategies are held as trait objects by the
//! [`ScenarioGenerator`](crate::generator::ScenarioGenerator) and run in
//! registration order.
//!
//! | Strategy | Emits |
//! |----------|-------|
//! | [`HappyPathStrategy`] | one nominal request per operation |
//! | [`ValidationStrategy`] | missing and empty inputs, expecting 400 |
//! | [`ErrorStrategy`] | one scenario per declared 4xx/5xx response |
//! | [`EdgeCaseStrategy`] | length and numeric boundaries of body fields |

mod edge_case;
mod error_cases;
mod happy_path;
mod validation;

pub use edge_case::EdgeCaseStrategy;
pub use error_cases::ErrorStrategy;
pub use happy_path::HappyPathStrategy;
pub use validation::ValidationStrategy;

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::contract::{Operation, Parameter, Schema, StringFormat, ValueType};
use crate::scenario::{BodySource, HeaderValue, Scenario, Step, Tag};
use crate::synth::{Role, synthesize, valid_value};

/// Name of the header carrying credentials.
pub const AUTHORIZATION: &str = "Authorization";

/// Response field checked by validation and error scenarios.
pub const MESSAGE_FIELD: &str = "message";

// ============================================================================
// Core Trait
// ============================================================================

/// A rule set mapping one operation to scenarios.
///
/// Implementations must be deterministic: the same operation always yields
/// the same scenarios in the same order.
pub trait ScenarioStrategy: Send + Sync + fmt::Debug {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Scenarios for `op`, possibly none.
    fn generate(&self, op: &Operation) -> Vec<Scenario>;
}

/// The built-in strategies, in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// [`HappyPathStrategy`]
    HappyPath,
    /// [`ValidationStrategy`]
    Validation,
    /// [`ErrorStrategy`]
    Error,
    /// [`EdgeCaseStrategy`]
    EdgeCase,
}

impl StrategyKind {
    /// All kinds in registration order.
    pub const ALL: [Self; 4] = [Self::HappyPath, Self::Validation, Self::Error, Self::EdgeCase];

    /// Name as accepted on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HappyPath => "happy-path",
            Self::Validation => "validation",
            Self::Error => "error",
            Self::EdgeCase => "edge-case",
        }
    }

    /// Creates the strategy for this kind.
    #[must_use]
    pub fn create(self) -> Box<dyn ScenarioStrategy> {
        match self {
            Self::HappyPath => Box::new(HappyPathStrategy),
            Self::Validation => Box::new(ValidationStrategy),
            Self::Error => Box::new(ErrorStrategy),
            Self::EdgeCase => Box::new(EdgeCaseStrategy),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "happy-path" | "happy" => Ok(Self::HappyPath),
            "validation" | "validations" => Ok(Self::Validation),
            "error" | "errors" | "error-cases" => Ok(Self::Error),
            "edge-case" | "edge-cases" | "edge" => Ok(Self::EdgeCase),
            _ => Err(format!(
                "unknown strategy '{s}' (expected one of: happy-path, validation, error, edge-case)"
            )),
        }
    }
}

// ============================================================================
// Scenario Builder
// ============================================================================

/// Accumulates the steps of one scenario for an operation.
pub(crate) struct ScenarioBuilder<'a> {
    op: &'a Operation,
    name: String,
    tags: &'static [Tag],
    steps: Vec<Step>,
}

impl<'a> ScenarioBuilder<'a> {
    /// Starts a scenario named `"<display name> - <suffix>"` with its URL set.
    pub(crate) fn new(op: &'a Operation, suffix: impl fmt::Display, tags: &'static [Tag]) -> Self {
        Self {
            op,
            name: format!("{} - {suffix}", op.display_name()),
            tags,
            steps: vec![Step::SetUrl {
                path: op.path.clone(),
            }],
        }
    }

    /// Sends the session credential when the operation requires auth.
    pub(crate) fn session_auth(mut self) -> Self {
        if self.op.requires_auth() {
            self.steps.push(Step::SetHeader {
                name: AUTHORIZATION.to_string(),
                value: HeaderValue::Session,
            });
        }
        self
    }

    /// Sends a fixed bearer token.
    pub(crate) fn bearer(mut self, token: &str) -> Self {
        self.steps.push(Step::SetHeader {
            name: AUTHORIZATION.to_string(),
            value: HeaderValue::Bearer(token.to_string()),
        });
        self
    }

    /// Binds every path and query parameter at `Valid`, except those for
    /// which `skip` returns true.
    pub(crate) fn params_except(mut self, skip: impl Fn(&Parameter) -> bool) -> Self {
        let op = self.op;
        for param in op.path_params().filter(|p| !skip(p)) {
            self.steps.push(Step::SetPathParam {
                name: param.name.clone(),
                value: valid_value(&param.schema),
            });
        }
        for param in op.query_params().filter(|p| !skip(p)) {
            self.steps.push(Step::SetQueryParam {
                name: param.name.clone(),
                value: valid_value(&param.schema),
            });
        }
        self
    }

    /// Binds every path and query parameter at `Valid`.
    pub(crate) fn valid_params(self) -> Self {
        self.params_except(|_| false)
    }

    /// Binds a path parameter to an explicit value.
    pub(crate) fn path_param(mut self, name: &str, value: Value) -> Self {
        self.steps.push(Step::SetPathParam {
            name: name.to_string(),
            value,
        });
        self
    }

    /// Attaches a literal body.
    pub(crate) fn body(mut self, body: Value) -> Self {
        self.steps.push(Step::SetBody {
            body: BodySource::Literal(body),
        });
        self
    }

    /// Attaches the valid body when the operation declares one.
    pub(crate) fn valid_body(self) -> Self {
        match self.op.request_body.as_ref().map(valid_request_body) {
            Some(body) => self.body(body),
            None => self,
        }
    }

    /// Attaches a harness-provided fixture as the body.
    pub(crate) fn fixture(mut self, name: &str) -> Self {
        self.steps.push(Step::SetBody {
            body: BodySource::Fixture(name.to_string()),
        });
        self
    }

    /// Sends the request.
    pub(crate) fn invoke(mut self) -> Self {
        self.steps.push(Step::Invoke {
            method: self.op.method,
        });
        self
    }

    /// Sends the request and expects `status`.
    pub(crate) fn expect_status(mut self, status: u16) -> Self {
        self = self.invoke();
        self.steps.push(Step::AssertStatus { status });
        self
    }

    /// Expects `path` to hold a value of `value_type`.
    pub(crate) fn expect_type(mut self, path: &str, value_type: ValueType) -> Self {
        self.steps.push(Step::AssertFieldType {
            path: path.to_string(),
            value_type,
        });
        self
    }

    /// Expects `path` to match `format`.
    pub(crate) fn expect_format(mut self, path: &str, format: StringFormat) -> Self {
        self.steps.push(Step::AssertFieldFormat {
            path: path.to_string(),
            format,
        });
        self
    }

    /// Expects the `message` field to mention `text`.
    pub(crate) fn expect_message_contains(mut self, text: &str) -> Self {
        self.steps.push(Step::AssertFieldContains {
            path: MESSAGE_FIELD.to_string(),
            substring: text.to_string(),
        });
        self
    }

    pub(crate) fn build(self) -> Scenario {
        Scenario {
            name: self.name,
            operation_id: self.op.id().into_owned(),
            tags: self.tags.to_vec(),
            steps: self.steps,
        }
    }
}

// ============================================================================
// Body construction
// ============================================================================

/// The nominal request body.
///
/// The declared example verbatim; otherwise each top-level property at
/// `Valid` for object bodies; otherwise the `Valid` value of the schema.
pub(crate) fn valid_request_body(schema: &Schema) -> Value {
    if let Some(example) = &schema.example {
        return example.clone();
    }
    if schema.properties().is_some() {
        return object_body(schema, None);
    }
    valid_value(schema)
}

/// Builds an object body from top-level properties at `Valid`.
///
/// With `Some((field, value))`, `field` is set to `value`, or left out
/// entirely when `value` is `None`.
pub(crate) fn object_body(schema: &Schema, replace: Option<(&str, Option<Value>)>) -> Value {
    let mut body = Map::new();
    let Some(properties) = schema.properties() else {
        return Value::Object(body);
    };
    for (name, property) in properties {
        match replace {
            Some((field, ref value)) if field == name.as_str() => {
                if let Some(value) = value {
                    body.insert(name.clone(), value.clone());
                }
            }
            _ => {
                if let Some(value) = synthesize(property, Role::Valid).into_value() {
                    body.insert(name.clone(), value);
                }
            }
        }
    }
    Value::Object(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{HttpMethod, ParamLocation};
    use serde_json::json;

    fn create_user() -> Operation {
        Operation::new(HttpMethod::Post, "/users")
            .with_summary("Create user")
            .with_request_body(
                Schema::object()
                    .with_property("email", Schema::string().with_format(StringFormat::Email))
                    .with_property("age", Schema::integer())
                    .with_required("email"),
            )
    }

    #[test]
    fn strategy_kind_parses_aliases() {
        assert_eq!("happy_path".parse::<StrategyKind>().unwrap(), StrategyKind::HappyPath);
        assert_eq!("Edge-Cases".parse::<StrategyKind>().unwrap(), StrategyKind::EdgeCase);
        assert!("fuzz".parse::<StrategyKind>().is_err());
    }

    #[test]
    fn strategy_kind_creates_named_strategies() {
        let names: Vec<_> = StrategyKind::ALL.iter().map(|k| k.create().name()).collect();
        assert_eq!(names, ["happy_path", "validation", "error", "edge_case"]);
    }

    #[test]
    fn object_body_follows_property_order() {
        let body = valid_request_body(create_user().request_body.as_ref().unwrap());
        assert_eq!(body, json!({"email": "user@example.com", "age": 123}));
        let keys: Vec<_> = body.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["email", "age"]);
    }

    #[test]
    fn object_body_can_omit_or_replace() {
        let op = create_user();
        let schema = op.request_body.as_ref().unwrap();
        assert_eq!(object_body(schema, Some(("email", None))), json!({"age": 123}));
        assert_eq!(
            object_body(schema, Some(("age", Some(json!(-1))))),
            json!({"email": "user@example.com", "age": -1})
        );
    }

    #[test]
    fn body_example_is_used_verbatim() {
        let schema = Schema::object()
            .with_property("name", Schema::string())
            .with_example(json!({"name": "Ada"}));
        assert_eq!(valid_request_body(&schema), json!({"name": "Ada"}));
    }

    #[test]
    fn builder_skips_auth_when_not_required() {
        let scenario = ScenarioBuilder::new(&create_user(), "Probe", &[Tag::Smoke])
            .session_auth()
            .expect_status(200)
            .build();
        assert_eq!(scenario.name, "Create user - Probe");
        assert_eq!(scenario.operation_id, "POST /users");
        assert!(
            !scenario
                .steps
                .iter()
                .any(|s| matches!(s, Step::SetHeader { .. }))
        );
    }

    #[test]
    fn builder_binds_params_in_location_order() {
        let op = Operation::new(HttpMethod::Get, "/a/{x}")
            .with_parameter(Parameter::new("q", ParamLocation::Query, Schema::string()))
            .with_parameter(Parameter::new("x", ParamLocation::Path, Schema::integer()).required());
        let scenario = ScenarioBuilder::new(&op, "Probe", &[]).valid_params().build();
        assert_eq!(
            scenario.steps[1..],
            [
                Step::SetPathParam {
                    name: "x".to_string(),
                    value: json!(123)
                },
                Step::SetQueryParam {
                    name: "q".to_string(),
                    value: json!("test-value")
                },
            ]
        );
    }
}
