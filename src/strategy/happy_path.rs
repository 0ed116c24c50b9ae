//! Nominal request per operation.

use crate::contract::{Operation, StringFormat};
use crate::scenario::{Scenario, Tag};

use super::{ScenarioBuilder, ScenarioStrategy};

/// Success statuses, in the order they are looked up.
const SUCCESS_STATUSES: [u16; 3] = [200, 201, 204];

/// Status asserted when no success response is declared.
const DEFAULT_SUCCESS: u16 = 200;

const TAGS: &[Tag] = &[Tag::Smoke, Tag::HappyPath, Tag::Regression];

/// Emits exactly one scenario per operation: valid parameters, valid body,
/// and the declared success status with a response shape check.
#[derive(Debug, Clone, Copy, Default)]
pub struct HappyPathStrategy;

impl ScenarioStrategy for HappyPathStrategy {
    fn name(&self) -> &'static str {
        "happy_path"
    }

    fn generate(&self, op: &Operation) -> Vec<Scenario> {
        let success = SUCCESS_STATUSES
            .iter()
            .find_map(|status| op.response(*status));
        let status = success.map_or(DEFAULT_SUCCESS, |r| r.status);

        let mut builder = ScenarioBuilder::new(op, "Happy Path", TAGS)
            .session_auth()
            .valid_params()
            .valid_body()
            .expect_status(status);

        if let Some(properties) = success
            .and_then(|r| r.schema.as_ref())
            .and_then(|s| s.properties())
        {
            for (name, property) in properties {
                builder = builder.expect_type(name, property.value_type());
                if let Some(format @ (StringFormat::Email | StringFormat::Uuid)) = property.format() {
                    builder = builder.expect_format(name, format.clone());
                }
            }
        }

        vec![builder.build()]
    }
}
