//! Scenario descriptors.
//!
//! A [`Scenario`] is the output unit of every strategy: a name, a
//! back-reference to its operation, tags, and an ordered list of abstract
//! [`Step`]s. Steps know nothing about any test framework; the renderer is
//! the only place that turns them into text.

use serde::Serialize;
use serde_json::Value;

use crate::contract::{HttpMethod, StringFormat, ValueType};

/// Classification tags attached to scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Tag {
    /// Quick sanity run
    Smoke,
    /// Nominal behavior
    HappyPath,
    /// Part of the regression suite
    Regression,
    /// Input validation
    Validation,
    /// Declared error responses
    Error,
    /// Boundary values
    EdgeCase,
}

impl Tag {
    /// Tag name as emitted in feature files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Smoke => "smoke",
            Self::HappyPath => "happyPath",
            Self::Regression => "regression",
            Self::Validation => "validation",
            Self::Error => "error",
            Self::EdgeCase => "edgeCase",
        }
    }
}

/// Value of an `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "token")]
pub enum HeaderValue {
    /// The session credential acquired by the test harness
    Session,
    /// A fixed bearer token
    Bearer(String),
}

/// Source of a request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BodySource {
    /// Inline JSON literal
    Literal(Value),
    /// Named fixture supplied by the test harness
    Fixture(String),
}

/// One abstract test step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "step")]
pub enum Step {
    /// Target URL path (relative to the base URL)
    SetUrl {
        /// Path template
        path: String,
    },
    /// Request header
    SetHeader {
        /// Header name
        name: String,
        /// Header value
        value: HeaderValue,
    },
    /// Path placeholder binding
    SetPathParam {
        /// Placeholder name
        name: String,
        /// Bound value
        value: Value,
    },
    /// Query string binding
    SetQueryParam {
        /// Parameter name
        name: String,
        /// Bound value
        value: Value,
    },
    /// Request body
    SetBody {
        /// Literal or fixture
        body: BodySource,
    },
    /// Send the request
    Invoke {
        /// HTTP method
        method: HttpMethod,
    },
    /// Expected status code
    AssertStatus {
        /// Status code
        status: u16,
    },
    /// Expected JSON type of a response field
    AssertFieldType {
        /// Field path within the response body
        path: String,
        /// Expected type
        #[serde(rename = "type")]
        value_type: ValueType,
    },
    /// Expected string format of a response field
    AssertFieldFormat {
        /// Field path within the response body
        path: String,
        /// Expected format
        format: StringFormat,
    },
    /// Response field must contain a substring
    AssertFieldContains {
        /// Field path within the response body
        path: String,
        /// Substring
        substring: String,
    },
}

/// A synthesized test scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    /// Human-readable name
    pub name: String,
    /// Identifier of the operation under test
    pub operation_id: String,
    /// Tags in emission order
    pub tags: Vec<Tag>,
    /// Steps in execution order
    pub steps: Vec<Step>,
}

impl Scenario {
    /// The status code asserted by this scenario, if any.
    #[must_use]
    pub fn expected_status(&self) -> Option<u16> {
        self.steps.iter().find_map(|step| match step {
            Step::AssertStatus { status } => Some(*status),
            _ => None,
        })
    }

    /// The literal request body, if one is attached.
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        self.steps.iter().find_map(|step| match step {
            Step::SetBody {
                body: BodySource::Literal(value),
            } => Some(value),
            _ => None,
        })
    }

    /// Whether the scenario carries `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }
}
