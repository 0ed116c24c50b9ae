//! Contract model
//!
//! Typed, immutable representation of an API surface. A [`Contract`] is
//! built once per run by the [`parser`] and only queried afterwards.

pub mod document;
pub mod parser;
pub mod schema;

pub use parser::{ContractParser, MAX_SCHEMA_DEPTH, MAX_STRING_LENGTH};
pub use schema::{
    NumericConstraints, ObjectSchema, Schema, SchemaKind, StringConstraints, StringFormat,
    ValueType,
};

use indexmap::IndexMap;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::ContractError;

// ============================================================================
// Contract
// ============================================================================

/// Descriptive metadata from the contract's `info` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractInfo {
    /// API title
    pub title: String,
    /// API version
    pub version: Option<String>,
    /// API description
    pub description: Option<String>,
}

/// A parsed API contract.
///
/// Operations keep contract declaration order and are indexed by
/// [`Operation::id`] for constant-time lookup.
#[derive(Debug, Clone)]
pub struct Contract {
    /// Title, version, description
    pub info: ContractInfo,

    /// URL of the first declared server
    pub base_url: Option<String>,

    operations: IndexMap<String, Operation>,
}

impl Contract {
    /// Builds a contract from its operations.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::DuplicateOperationId`] if two operations
    /// resolve to the same identifier.
    pub fn new(
        info: ContractInfo,
        base_url: Option<String>,
        operations: Vec<Operation>,
    ) -> Result<Self, ContractError> {
        let mut indexed = IndexMap::with_capacity(operations.len());
        for operation in operations {
            let id = operation.id().into_owned();
            if indexed.contains_key(&id) {
                return Err(ContractError::DuplicateOperationId(id));
            }
            indexed.insert(id, operation);
        }
        Ok(Self {
            info,
            base_url,
            operations: indexed,
        })
    }

    /// Operations in declaration order.
    pub fn operations(&self) -> impl ExactSizeIterator<Item = &Operation> {
        self.operations.values()
    }

    /// Looks up an operation by identifier.
    #[must_use]
    pub fn operation(&self, id: &str) -> Option<&Operation> {
        self.operations.get(id)
    }

    /// Number of operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if the contract declares no operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

// ============================================================================
// Operation
// ============================================================================

/// HTTP methods an operation can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
    /// HEAD
    Head,
    /// OPTIONS
    Options,
    /// TRACE
    Trace,
}

impl HttpMethod {
    /// Uppercase method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    /// Parses a method name case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            "TRACE" => Ok(Self::Trace),
            _ => Err(format!("unsupported HTTP method '{s}'")),
        }
    }
}

/// One HTTP method bound to one path template.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// HTTP method
    pub method: HttpMethod,
    /// Path template, may contain `{param}` placeholders
    pub path: String,
    /// Declared `operationId`
    pub operation_id: Option<String>,
    /// Short summary
    pub summary: Option<String>,
    /// Long description
    pub description: Option<String>,
    /// Parameters in declaration order
    pub parameters: Vec<Parameter>,
    /// JSON request body schema
    pub request_body: Option<Schema>,
    /// Responses keyed by status code, in declaration order
    pub responses: IndexMap<u16, Response>,
    /// Free-form tags
    pub tags: Vec<String>,
}

impl Operation {
    /// Creates an operation with no parameters, body, or responses.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            operation_id: None,
            summary: None,
            description: None,
            parameters: Vec::new(),
            request_body: None,
            responses: IndexMap::new(),
            tags: Vec::new(),
        }
    }

    /// Sets the `operationId`.
    #[must_use]
    pub fn with_operation_id(mut self, id: impl Into<String>) -> Self {
        self.operation_id = Some(id.into());
        self
    }

    /// Sets the summary.
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Appends a parameter.
    #[must_use]
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Sets the request body schema.
    #[must_use]
    pub fn with_request_body(mut self, schema: Schema) -> Self {
        self.request_body = Some(schema);
        self
    }

    /// Adds a response under its own status code.
    #[must_use]
    pub fn with_response(mut self, response: Response) -> Self {
        self.responses.insert(response.status, response);
        self
    }

    /// Identifier used to back-reference this operation.
    ///
    /// The declared `operationId`, or `"<METHOD> <path>"` when absent.
    #[must_use]
    pub fn id(&self) -> Cow<'_, str> {
        self.operation_id.as_deref().map_or_else(
            || Cow::Owned(format!("{} {}", self.method, self.path)),
            Cow::Borrowed,
        )
    }

    /// Human-readable label used as the stem of scenario names.
    #[must_use]
    pub fn display_name(&self) -> Cow<'_, str> {
        match self.summary.as_deref() {
            Some(summary) if !summary.trim().is_empty() => Cow::Borrowed(summary.trim()),
            _ => self.id(),
        }
    }

    /// Parameters located in the path.
    pub fn path_params(&self) -> impl Iterator<Item = &Parameter> {
        self.params_in(ParamLocation::Path)
    }

    /// Parameters located in the query string.
    pub fn query_params(&self) -> impl Iterator<Item = &Parameter> {
        self.params_in(ParamLocation::Query)
    }

    /// Parameters located in headers.
    pub fn header_params(&self) -> impl Iterator<Item = &Parameter> {
        self.params_in(ParamLocation::Header)
    }

    fn params_in(&self, location: ParamLocation) -> impl Iterator<Item = &Parameter> {
        self.parameters
            .iter()
            .filter(move |p| p.location == location)
    }

    /// Whether scenarios must send the session credential.
    ///
    /// True when a header parameter is named `Authorization` (ASCII
    /// case-insensitive). Security schemes are not consulted.
    #[must_use]
    pub fn requires_auth(&self) -> bool {
        self.header_params()
            .any(|p| p.name.eq_ignore_ascii_case("Authorization"))
    }

    /// Whether a JSON request body is declared.
    #[must_use]
    pub const fn has_request_body(&self) -> bool {
        self.request_body.is_some()
    }

    /// Response declared for `status`.
    #[must_use]
    pub fn response(&self, status: u16) -> Option<&Response> {
        self.responses.get(&status)
    }
}

// ============================================================================
// Parameter
// ============================================================================

/// Where a parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    /// Path template placeholder
    Path,
    /// Query string
    Query,
    /// Request header
    Header,
    /// Cookie; kept in the model, never bound by strategies
    Cookie,
}

impl FromStr for ParamLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "path" => Ok(Self::Path),
            "query" => Ok(Self::Query),
            "header" => Ok(Self::Header),
            "cookie" => Ok(Self::Cookie),
            other => Err(format!("unknown parameter location '{other}'")),
        }
    }
}

/// A path, query, header, or cookie parameter.
///
/// Type, format, example, and length bounds live in [`Parameter::schema`]
/// so parameters go through the same value synthesis as body fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Location
    pub location: ParamLocation,
    /// Whether the contract marks it required
    pub required: bool,
    /// Description
    pub description: Option<String>,
    /// Primitive type and constraints
    pub schema: Schema,
}

impl Parameter {
    /// Creates an optional parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, location: ParamLocation, schema: Schema) -> Self {
        Self {
            name: name.into(),
            location,
            required: false,
            description: None,
            schema,
        }
    }

    /// Marks the parameter required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

// ============================================================================
// Response
// ============================================================================

/// A declared response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Status code
    pub status: u16,
    /// Description
    pub description: Option<String>,
    /// JSON body schema
    pub schema: Option<Schema>,
}

impl Response {
    /// Creates a response with no description or body.
    #[must_use]
    pub const fn new(status: u16) -> Self {
        Self {
            status,
            description: None,
            schema: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the body schema.
    #[must_use]
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_order() -> Operation {
        Operation::new(HttpMethod::Get, "/orders/{id}")
            .with_operation_id("getOrder")
            .with_parameter(Parameter::new("id", ParamLocation::Path, Schema::string()).required())
            .with_parameter(Parameter::new("expand", ParamLocation::Query, Schema::boolean()))
            .with_parameter(Parameter::new(
                "authorization",
                ParamLocation::Header,
                Schema::string(),
            ))
    }

    #[test]
    fn filtered_parameter_views() {
        let op = get_order();
        assert_eq!(op.path_params().count(), 1);
        assert_eq!(op.query_params().next().unwrap().name, "expand");
        assert_eq!(op.header_params().count(), 1);
    }

    #[test]
    fn requires_auth_follows_header_name() {
        assert!(get_order().requires_auth());
        let op = Operation::new(HttpMethod::Get, "/health").with_parameter(Parameter::new(
            "Authorization",
            ParamLocation::Query,
            Schema::string(),
        ));
        assert!(!op.requires_auth(), "query parameter must not count");
    }

    #[test]
    fn id_falls_back_to_method_and_path() {
        assert_eq!(get_order().id(), "getOrder");
        let op = Operation::new(HttpMethod::Delete, "/users/{id}");
        assert_eq!(op.id(), "DELETE /users/{id}");
    }

    #[test]
    fn display_name_prefers_summary() {
        let op = get_order().with_summary("  Fetch one order ");
        assert_eq!(op.display_name(), "Fetch one order");
        assert_eq!(get_order().display_name(), "getOrder");
    }

    #[test]
    fn response_status_is_self_describing() {
        let op = get_order().with_response(Response::new(404).with_description("missing"));
        let response = op.response(404).unwrap();
        assert_eq!(response.status, 404);
        assert!(op.response(200).is_none());
    }

    #[test]
    fn contract_lookup_and_order() {
        let contract = Contract::new(
            ContractInfo {
                title: "Shop".to_string(),
                ..ContractInfo::default()
            },
            None,
            vec![
                Operation::new(HttpMethod::Post, "/orders"),
                get_order(),
            ],
        )
        .unwrap();
        assert_eq!(contract.len(), 2);
        assert!(contract.operation("getOrder").is_some());
        assert!(contract.operation("POST /orders").is_some());
        let paths: Vec<_> = contract.operations().map(|o| o.path.as_str()).collect();
        assert_eq!(paths, ["/orders", "/orders/{id}"]);
    }

    #[test]
    fn contract_rejects_duplicate_ids() {
        let err = Contract::new(
            ContractInfo::default(),
            None,
            vec![get_order(), get_order()],
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::DuplicateOperationId(id) if id == "getOrder"));
    }

    #[test]
    fn http_method_parses_case_insensitively() {
        assert_eq!("patch".parse::<HttpMethod>().unwrap(), HttpMethod::Patch);
        assert!("connect".parse::<HttpMethod>().is_err());
        assert_eq!(HttpMethod::Options.to_string(), "OPTIONS");
    }
}
