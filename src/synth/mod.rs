//! Schema-aware value synthesis.
//!
//! [`synthesize`] maps a [`Schema`] and a [`Role`] to a literal JSON value.
//! The rules form a fixed catalog keyed on schema kind and declared
//! constraints; the same inputs always produce the same output.
//!
//! | Kind | Valid | BoundaryMin / Max | Invalid | Empty |
//! |------|-------|-------------------|---------|-------|
//! | string + email/uuid/date-time | canonical literal | length-bound string, else literal | `not-a-…` | `""` |
//! | string | `test-value` | length-bound string | [`SPECIAL_CHARACTERS`] | `""` |
//! | integer / number | 123 clamped | `minimum` / `maximum` | -1 or `minimum - 1` | n/a |
//! | boolean | `true` | n/a | n/a | n/a |
//! | array / object | `[]` / `{}` | n/a | n/a | `[]` / `{}` |
//! | unknown | `"test"` | n/a | n/a | n/a |
//!
//! The synthesizer never recurses into children. Strategies build object
//! bodies property by property.

use serde_json::{Number, Value, json};

use crate::contract::schema::{NumericConstraints, Schema, SchemaKind, StringConstraints, StringFormat};

/// Special-character payload used for invalid plain strings.
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*()";

/// Valid value for a plain string.
pub const PLAIN_STRING: &str = "test-value";

/// Valid value for a schema of unknown kind.
pub const UNKNOWN_VALUE: &str = "test";

/// Canonical well-formed email.
pub const CANONICAL_EMAIL: &str = "user@example.com";

/// Canonical well-formed UUID.
pub const CANONICAL_UUID: &str = "123e4567-e89b-12d3-a456-426614174000";

/// Canonical well-formed RFC 3339 timestamp.
pub const CANONICAL_DATE_TIME: &str = "2025-01-20T10:30:00Z";

const EMAIL_DOMAIN: &str = "@example.com";
const VALID_NUMBER: i64 = 123;

/// What the caller needs a value for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// A value every validator accepts
    Valid,
    /// The smallest accepted value (or shortest accepted string)
    BoundaryMin,
    /// The largest accepted value (or longest accepted string)
    BoundaryMax,
    /// A value a validator rejects
    Invalid,
    /// The empty value of the kind
    Empty,
    /// The field is left out
    Missing,
}

/// Outcome of [`synthesize`].
#[derive(Debug, Clone, PartialEq)]
pub enum Synthesized {
    /// Use this literal
    Value(Value),
    /// Leave the field out of the request entirely
    Omit,
    /// The kind has no such variant; callers skip the scenario
    NotApplicable,
}

impl Synthesized {
    /// The literal, if one was produced.
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Value(v) => Some(v),
            Self::Omit | Self::NotApplicable => None,
        }
    }
}

/// Produces the literal for `schema` in `role`.
#[must_use]
pub fn synthesize(schema: &Schema, role: Role) -> Synthesized {
    if role == Role::Missing {
        return Synthesized::Omit;
    }
    if role == Role::Valid {
        if let Some(example) = &schema.example {
            return Synthesized::Value(example.clone());
        }
    }

    match &schema.kind {
        SchemaKind::String(c) => string_value(c, role),
        SchemaKind::Integer(c) | SchemaKind::Number(c) => numeric_value(c, role),
        SchemaKind::Boolean => match role {
            Role::Valid => Synthesized::Value(Value::Bool(true)),
            _ => Synthesized::NotApplicable,
        },
        SchemaKind::Array { .. } => match role {
            Role::Valid | Role::Empty => Synthesized::Value(json!([])),
            _ => Synthesized::NotApplicable,
        },
        SchemaKind::Object(_) => match role {
            Role::Valid | Role::Empty => Synthesized::Value(json!({})),
            _ => Synthesized::NotApplicable,
        },
        SchemaKind::Unknown(_) => match role {
            Role::Valid => Synthesized::Value(Value::from(UNKNOWN_VALUE)),
            _ => Synthesized::NotApplicable,
        },
    }
}

/// Shorthand for the `Valid` literal, falling back to `null` for kinds
/// that cannot produce one.
#[must_use]
pub fn valid_value(schema: &Schema) -> Value {
    synthesize(schema, Role::Valid)
        .into_value()
        .unwrap_or(Value::Null)
}

// ============================================================================
// Strings
// ============================================================================

fn string_value(c: &StringConstraints, role: Role) -> Synthesized {
    let format = c.format.as_ref().filter(|f| canonical_literal(f).is_some());
    let text = match (role, format) {
        (Role::Empty, _) => Some(String::new()),
        (Role::Valid, Some(f)) => canonical_literal(f).map(str::to_string),
        (Role::Valid, None) => Some(PLAIN_STRING.to_string()),
        (Role::Invalid, Some(f)) => invalid_literal(f).map(str::to_string),
        (Role::Invalid, None) => Some(SPECIAL_CHARACTERS.to_string()),
        (Role::BoundaryMin | Role::BoundaryMax, _) => {
            let bound = if role == Role::BoundaryMin {
                c.min_length
            } else {
                c.max_length
            };
            match (bound, format) {
                (Some(len), Some(StringFormat::Email)) => Some(email_of_length(len)),
                (Some(len), _) => Some("a".repeat(len)),
                (None, Some(f)) => canonical_literal(f).map(str::to_string),
                (None, None) => None,
            }
        }
        (Role::Missing, _) => return Synthesized::Omit,
    };
    text.map_or(Synthesized::NotApplicable, |t| Synthesized::Value(Value::String(t)))
}

const fn canonical_literal(format: &StringFormat) -> Option<&'static str> {
    match format {
        StringFormat::Email => Some(CANONICAL_EMAIL),
        StringFormat::Uuid => Some(CANONICAL_UUID),
        StringFormat::DateTime => Some(CANONICAL_DATE_TIME),
        StringFormat::Other(_) => None,
    }
}

const fn invalid_literal(format: &StringFormat) -> Option<&'static str> {
    match format {
        StringFormat::Email => Some("not-an-email"),
        StringFormat::Uuid => Some("not-a-uuid"),
        StringFormat::DateTime => Some("not-a-date-time"),
        StringFormat::Other(_) => None,
    }
}

/// An email address of exactly `len` characters when `len` leaves room
/// for a one-character local part; otherwise `len` filler characters.
fn email_of_length(len: usize) -> String {
    if len > EMAIL_DOMAIN.len() {
        let mut email = "a".repeat(len - EMAIL_DOMAIN.len());
        email.push_str(EMAIL_DOMAIN);
        email
    } else {
        "a".repeat(len)
    }
}

// ============================================================================
// Numbers
// ============================================================================

fn numeric_value(c: &NumericConstraints, role: Role) -> Synthesized {
    let value = match role {
        Role::Valid => Some(clamped_valid(c)),
        Role::BoundaryMin => c.minimum.clone(),
        Role::BoundaryMax => c.maximum.clone(),
        Role::Invalid => Some(invalid_number(c)),
        Role::Empty => None,
        Role::Missing => return Synthesized::Omit,
    };
    value.map_or(Synthesized::NotApplicable, |n| Synthesized::Value(Value::Number(n)))
}

fn clamped_valid(c: &NumericConstraints) -> Number {
    let all_integral = [&c.minimum, &c.maximum]
        .into_iter()
        .flatten()
        .all(|n| n.as_i64().is_some());

    if all_integral {
        let mut value = VALID_NUMBER;
        if let Some(max) = c.maximum.as_ref().and_then(Number::as_i64) {
            value = value.min(max);
        }
        if let Some(min) = c.minimum.as_ref().and_then(Number::as_i64) {
            value = value.max(min);
        }
        return Number::from(value);
    }

    #[allow(clippy::cast_precision_loss)]
    let mut value = VALID_NUMBER as f64;
    if let Some(max) = c.maximum.as_ref().and_then(Number::as_f64) {
        value = value.min(max);
    }
    if let Some(min) = c.minimum.as_ref().and_then(Number::as_f64) {
        value = value.max(min);
    }
    float_number(value)
}

fn invalid_number(c: &NumericConstraints) -> Number {
    match &c.minimum {
        Some(min) if min.as_i64().is_some_and(|m| m < 0) => {
            min.as_i64()
                .and_then(|m| m.checked_sub(1))
                .map_or_else(|| Number::from(-1), Number::from)
        }
        Some(min) if min.as_f64().is_some_and(|m| m < 0.0) => {
            float_number(min.as_f64().unwrap_or(0.0) - 1.0)
        }
        _ => Number::from(-1),
    }
}

fn float_number(value: f64) -> Number {
    Number::from_f64(value).unwrap_or_else(|| Number::from(VALID_NUMBER))
}
