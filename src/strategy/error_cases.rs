//! Declared error responses.

use serde_json::Value;

use crate::contract::{Operation, Response, ValueType};
use crate::scenario::{Scenario, Tag};

use super::{MESSAGE_FIELD, ScenarioBuilder, ScenarioStrategy};

const TAGS: &[Tag] = &[Tag::Error, Tag::Regression];

/// Bearer token sent to provoke a 401.
pub const INVALID_TOKEN: &str = "invalid-token";

/// Identifier bound to provoke a 404.
pub const NONEXISTENT_ID: &str = "nonexistent-id";

/// Fixture holding an already-persisted resource, sent to provoke a 409.
pub const EXISTING_DATA_FIXTURE: &str = "existingData";

/// Emits one scenario per declared response with status 400 or above.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorStrategy;

impl ScenarioStrategy for ErrorStrategy {
    fn name(&self) -> &'static str {
        "error"
    }

    fn generate(&self, op: &Operation) -> Vec<Scenario> {
        op.responses
            .values()
            .filter(|r| r.status >= 400)
            .map(|r| error_scenario(op, r))
            .collect()
    }
}

/// Reason phrase embedded in the scenario name.
#[must_use]
pub const fn status_label(status: u16) -> &'static str {
    match status {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        409 => "Conflict",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        _ => "Error",
    }
}

fn error_scenario(op: &Operation, response: &Response) -> Scenario {
    let status = response.status;
    let mut builder = ScenarioBuilder::new(
        op,
        format_args!("Error {status} {}", status_label(status)),
        TAGS,
    );

    builder = if status == 401 {
        builder.bearer(INVALID_TOKEN)
    } else {
        builder.session_auth()
    };

    // The resource identifier is the last placeholder of the template.
    let missing_resource = (status == 404)
        .then(|| op.path_params().last())
        .flatten();
    builder = match missing_resource {
        Some(target) => builder
            .params_except(|p| p.name == target.name && p.location == target.location)
            .path_param(&target.name, Value::from(NONEXISTENT_ID)),
        None => builder.valid_params(),
    };

    builder = if status == 409 && op.has_request_body() {
        builder.fixture(EXISTING_DATA_FIXTURE)
    } else {
        builder.valid_body()
    };

    builder = builder.expect_status(status);
    if response.description.is_some() {
        builder = builder.expect_type(MESSAGE_FIELD, ValueType::String);
    }
    builder.build()
}
