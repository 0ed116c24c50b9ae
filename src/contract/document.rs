//! Raw OpenAPI document types.
//!
//! These mirror the subset of OpenAPI 3.x the parser reads and are
//! deserialized directly from YAML or JSON. They are deliberately lenient
//! (most fields optional, scalars accepted in several shapes) so that an
//! imperfect contract still yields a best-effort model.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value as JsonValue};
use serde_yaml::Value;

/// Top-level OpenAPI document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocument {
    /// `info` block
    #[serde(default)]
    pub info: Option<RawInfo>,

    /// `servers` list
    #[serde(default)]
    pub servers: Vec<RawServer>,

    /// `paths` map; each item is kept untyped so method order survives
    #[serde(default)]
    pub paths: Option<IndexMap<String, Value>>,

    /// `components` block
    #[serde(default)]
    pub components: Option<RawComponents>,
}

/// `info` block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInfo {
    /// API title
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,

    /// API version (often written as a bare number)
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: Option<String>,

    /// API description
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
}

/// Entry of the `servers` list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawServer {
    /// Server URL
    #[serde(default)]
    pub url: Option<String>,
}

/// `components` block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawComponents {
    /// Reusable schemas, addressed by `#/components/schemas/<name>`
    #[serde(default)]
    pub schemas: IndexMap<String, RawSchema>,

    /// Reusable parameters, addressed by `#/components/parameters/<name>`
    #[serde(default)]
    pub parameters: IndexMap<String, RawParameter>,
}

/// An operation object under a path item.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOperation {
    /// Short summary
    #[serde(default, deserialize_with = "lenient_string")]
    pub summary: Option<String>,

    /// Long description
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,

    /// `operationId`
    #[serde(default, deserialize_with = "lenient_string")]
    pub operation_id: Option<String>,

    /// Tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Operation-level parameters
    #[serde(default)]
    pub parameters: Vec<RawParameter>,

    /// Request body
    #[serde(default)]
    pub request_body: Option<RawMediaHolder>,

    /// Responses keyed by status; keys may be integers or strings
    #[serde(default)]
    pub responses: IndexMap<Value, RawResponse>,
}

/// A parameter object, inline or by reference.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawParameter {
    /// `$ref` to `#/components/parameters/<name>`
    #[serde(default, rename = "$ref")]
    pub reference: Option<String>,

    /// Parameter name
    #[serde(default)]
    pub name: Option<String>,

    /// Location (`path`, `query`, `header`, `cookie`)
    #[serde(default, rename = "in")]
    pub location: Option<String>,

    /// Required flag
    #[serde(default)]
    pub required: Option<bool>,

    /// Description
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,

    /// Parameter schema
    #[serde(default)]
    pub schema: Option<RawSchema>,

    /// Parameter-level example, used when the schema has none
    #[serde(default)]
    pub example: Option<JsonValue>,
}

/// A request body or response, both of which wrap a `content` map.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMediaHolder {
    /// Description
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,

    /// Media types
    #[serde(default)]
    pub content: IndexMap<String, RawMediaType>,
}

/// A response object.
pub type RawResponse = RawMediaHolder;

/// Entry of a `content` map.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMediaType {
    /// Body schema
    #[serde(default)]
    pub schema: Option<RawSchema>,
}

/// A schema object, inline or by reference.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSchema {
    /// `$ref` to `#/components/schemas/<name>`
    #[serde(default, rename = "$ref")]
    pub reference: Option<String>,

    /// `type`, a single name or (OpenAPI 3.1) a list of names
    #[serde(default, rename = "type")]
    pub type_: Option<RawType>,

    /// `format`
    #[serde(default)]
    pub format: Option<String>,

    /// `pattern`
    #[serde(default)]
    pub pattern: Option<String>,

    /// `minLength`
    #[serde(default)]
    pub min_length: Option<u64>,

    /// `maxLength`
    #[serde(default)]
    pub max_length: Option<u64>,

    /// `minimum`
    #[serde(default)]
    pub minimum: Option<Number>,

    /// `maximum`
    #[serde(default)]
    pub maximum: Option<Number>,

    /// `required` property names; anything but a list of strings is ignored
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub required: Vec<String>,

    /// `properties`
    #[serde(default)]
    pub properties: IndexMap<String, RawSchema>,

    /// `items`
    #[serde(default)]
    pub items: Option<Box<RawSchema>>,

    /// `example`
    #[serde(default)]
    pub example: Option<JsonValue>,

    /// `description`
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
}

/// The `type` keyword.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawType {
    /// `type: string`
    Single(String),
    /// `type: [string, "null"]`
    Many(Vec<String>),
}

impl RawType {
    /// The effective type name: the first entry that is not `null`.
    #[must_use]
    pub fn primary(&self) -> Option<&str> {
        match self {
            Self::Single(name) => Some(name),
            Self::Many(names) => names.iter().map(String::as_str).find(|n| *n != "null"),
        }
    }
}

/// Accepts strings, numbers, and booleans as a string.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }))
}

/// Accepts a list of strings; any other shape becomes an empty list.
fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Sequence(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_version_is_accepted() {
        let info: RawInfo = serde_yaml::from_str("title: Shop\nversion: 1.0\n").unwrap();
        assert_eq!(info.version.as_deref(), Some("1.0"));
    }

    #[test]
    fn type_list_picks_first_non_null() {
        let schema: RawSchema = serde_yaml::from_str("type: [\"null\", integer]\n").unwrap();
        assert_eq!(schema.type_.unwrap().primary(), Some("integer"));
    }

    #[test]
    fn boolean_required_on_property_is_ignored() {
        let schema: RawSchema = serde_yaml::from_str("type: string\nrequired: true\n").unwrap();
        assert!(schema.required.is_empty());
    }

    #[test]
    fn integer_response_keys_deserialize() {
        let op: RawOperation = serde_yaml::from_str(
            "responses:\n  200:\n    description: ok\n  '404':\n    description: missing\n",
        )
        .unwrap();
        assert_eq!(op.responses.len(), 2);
    }
}
