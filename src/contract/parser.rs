//! Contract ingestion.
//!
//! Turns an OpenAPI 3.x document (YAML or JSON) into a [`Contract`]:
//!
//! 1. Deserialize into the lenient [`RawDocument`] types
//! 2. Require a `paths` section
//! 3. Walk path items in declaration order, merging path-level parameters
//!    into each operation
//! 4. Resolve `#/components/...` references, rejecting cycles
//! 5. Freeze into a [`Contract`] (rejects duplicate operation ids)

use std::path::Path;

use indexmap::IndexMap;
use serde_yaml::Value;
use tracing::{debug, info, warn};

use crate::contract::document::{
    RawComponents, RawDocument, RawMediaHolder, RawOperation, RawParameter, RawSchema,
};
use crate::contract::schema::{
    NumericConstraints, ObjectSchema, Schema, SchemaKind, StringConstraints, StringFormat,
};
use crate::contract::{Contract, ContractInfo, HttpMethod, Operation, ParamLocation, Parameter, Response};
use crate::error::ContractError;

/// Maximum inline schema nesting before the document is considered malformed.
pub const MAX_SCHEMA_DEPTH: usize = 64;

/// Largest `minLength`/`maxLength` accepted; boundary values are built at
/// full length.
pub const MAX_STRING_LENGTH: usize = 65_536;

const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";
const PARAMETER_REF_PREFIX: &str = "#/components/parameters/";
const JSON_MEDIA_TYPE: &str = "application/json";

/// Parses contract documents into [`Contract`] values.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContractParser;

impl ContractParser {
    /// Reads and parses a contract file.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Read`] if the file cannot be read, or any
    /// error of [`ContractParser::parse_str`].
    pub fn parse_file(path: &Path) -> Result<Contract, ContractError> {
        info!(contract = %path.display(), "parsing contract");
        let text = std::fs::read_to_string(path).map_err(|source| ContractError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_str(&text)
    }

    /// Parses a contract from YAML or JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Parse`] for syntax errors,
    /// [`ContractError::MissingSection`] when `paths` is absent, and
    /// [`ContractError::Malformed`], [`ContractError::CircularReference`],
    /// [`ContractError::UnresolvedReference`], or
    /// [`ContractError::DuplicateOperationId`] for structural problems.
    pub fn parse_str(text: &str) -> Result<Contract, ContractError> {
        let document: RawDocument =
            serde_yaml::from_str(text).map_err(|e| ContractError::Parse(e.to_string()))?;
        let paths = document
            .paths
            .as_ref()
            .ok_or(ContractError::MissingSection("paths"))?;

        let empty = RawComponents::default();
        let components = document.components.as_ref().unwrap_or(&empty);

        let mut operations = Vec::new();
        for (path, item) in paths {
            operations.extend(parse_path_item(path, item, components)?);
        }

        let info = document.info.clone().unwrap_or_default();
        let contract = Contract::new(
            ContractInfo {
                title: info.title.unwrap_or_else(|| "API".to_string()),
                version: info.version,
                description: info.description,
            },
            document.servers.first().and_then(|s| s.url.clone()),
            operations,
        )?;

        info!(operations = contract.len(), "contract parsed");
        Ok(contract)
    }
}

fn length_bound(
    value: Option<u64>,
    key: &str,
    location: &str,
) -> Result<Option<usize>, ContractError> {
    let Some(value) = value else { return Ok(None) };
    match usize::try_from(value) {
        Ok(length) if length <= MAX_STRING_LENGTH => Ok(Some(length)),
        _ => Err(ContractError::Malformed {
            location: format!("{location}.{key}"),
            message: format!("{key} {value} exceeds the supported maximum of {MAX_STRING_LENGTH}"),
        }),
    }
}

// ============================================================================
// Path items and operations
// ============================================================================

fn parse_path_item(
    path: &str,
    item: &Value,
    components: &RawComponents,
) -> Result<Vec<Operation>, ContractError> {
    let Value::Mapping(map) = item else {
        return Err(ContractError::Malformed {
            location: format!("paths.{path}"),
            message: "path item must be a mapping".to_string(),
        });
    };

    let shared: Vec<RawParameter> = match map.get("parameters") {
        Some(value) => serde_yaml::from_value(value.clone()).map_err(|e| ContractError::Malformed {
            location: format!("paths.{path}.parameters"),
            message: e.to_string(),
        })?,
        None => Vec::new(),
    };

    let mut operations = Vec::new();
    for (key, value) in map {
        let Some(key) = key.as_str() else { continue };
        let Ok(method) = key.parse::<HttpMethod>() else {
            continue;
        };
        let location = format!("paths.{path}.{key}");
        let raw: RawOperation =
            serde_yaml::from_value(value.clone()).map_err(|e| ContractError::Malformed {
                location: location.clone(),
                message: e.to_string(),
            })?;
        let operation = build_operation(method, path, &raw, &shared, components, &location)?;
        debug!(method = %operation.method, path = %operation.path, "parsed operation");
        operations.push(operation);
    }
    Ok(operations)
}

fn build_operation(
    method: HttpMethod,
    path: &str,
    raw: &RawOperation,
    shared: &[RawParameter],
    components: &RawComponents,
    location: &str,
) -> Result<Operation, ContractError> {
    let mut operation = Operation::new(method, path);
    operation.operation_id.clone_from(&raw.operation_id);
    operation.summary.clone_from(&raw.summary);
    operation.description.clone_from(&raw.description);
    operation.tags.clone_from(&raw.tags);

    let mut parameters = Vec::new();
    for (index, raw_param) in raw.parameters.iter().enumerate() {
        parameters.push(build_parameter(
            raw_param,
            components,
            &format!("{location}.parameters[{index}]"),
        )?);
    }
    // Path-level parameters apply unless the operation redefines them.
    for (index, raw_param) in shared.iter().enumerate() {
        let param = build_parameter(
            raw_param,
            components,
            &format!("paths.{path}.parameters[{index}]"),
        )?;
        let overridden = parameters
            .iter()
            .any(|p| p.name == param.name && p.location == param.location);
        if !overridden {
            parameters.push(param);
        }
    }
    operation.parameters = parameters;

    if let Some(body) = &raw.request_body {
        operation.request_body = json_schema(body, components, &format!("{location}.requestBody"))?;
    }

    for (key, raw_response) in &raw.responses {
        let Some(status) = status_code(key) else {
            warn!(
                location,
                key = ?key,
                "skipping response without a numeric status code"
            );
            continue;
        };
        let mut response = Response::new(status);
        response.description.clone_from(&raw_response.description);
        response.schema = json_schema(
            raw_response,
            components,
            &format!("{location}.responses.{status}"),
        )?;
        operation.responses.insert(status, response);
    }

    Ok(operation)
}

fn status_code(key: &Value) -> Option<u16> {
    match key {
        Value::Number(n) => n.as_u64().and_then(|v| u16::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn json_schema(
    holder: &RawMediaHolder,
    components: &RawComponents,
    location: &str,
) -> Result<Option<Schema>, ContractError> {
    let Some(schema) = holder
        .content
        .get(JSON_MEDIA_TYPE)
        .and_then(|media| media.schema.as_ref())
    else {
        return Ok(None);
    };
    SchemaResolver::new(&components.schemas)
        .resolve(schema, location, 0)
        .map(Some)
}

fn build_parameter(
    raw: &RawParameter,
    components: &RawComponents,
    location: &str,
) -> Result<Parameter, ContractError> {
    let raw = match raw.reference.as_deref() {
        Some(reference) => {
            let name = reference.strip_prefix(PARAMETER_REF_PREFIX).ok_or_else(|| {
                ContractError::UnresolvedReference {
                    reference: reference.to_string(),
                    location: location.to_string(),
                }
            })?;
            components
                .parameters
                .get(name)
                .ok_or_else(|| ContractError::UnresolvedReference {
                    reference: reference.to_string(),
                    location: location.to_string(),
                })?
        }
        None => raw,
    };

    let name = raw.name.clone().ok_or_else(|| ContractError::Malformed {
        location: location.to_string(),
        message: "parameter has no name".to_string(),
    })?;
    let param_location: ParamLocation = raw
        .location
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|message| ContractError::Malformed {
            location: location.to_string(),
            message,
        })?;

    let mut schema = match &raw.schema {
        Some(schema) => SchemaResolver::new(&components.schemas).resolve(
            schema,
            &format!("{location}.schema"),
            0,
        )?,
        None => Schema::new(SchemaKind::Unknown(None)),
    };
    if schema.example.is_none() {
        schema.example.clone_from(&raw.example);
    }

    Ok(Parameter {
        name,
        location: param_location,
        required: raw.required.unwrap_or(false),
        description: raw.description.clone(),
        schema,
    })
}

// ============================================================================
// Schema resolution
// ============================================================================

/// Converts raw schemas into [`Schema`] trees, following component
/// references and tracking the reference chain to detect cycles.
struct SchemaResolver<'a> {
    components: &'a IndexMap<String, RawSchema>,
    chain: Vec<String>,
}

impl<'a> SchemaResolver<'a> {
    const fn new(components: &'a IndexMap<String, RawSchema>) -> Self {
        Self {
            components,
            chain: Vec::new(),
        }
    }

    fn resolve(
        &mut self,
        raw: &RawSchema,
        location: &str,
        depth: usize,
    ) -> Result<Schema, ContractError> {
        if depth > MAX_SCHEMA_DEPTH {
            return Err(ContractError::Malformed {
                location: location.to_string(),
                message: format!("schema nesting exceeds {MAX_SCHEMA_DEPTH} levels"),
            });
        }

        if let Some(reference) = raw.reference.as_deref() {
            return self.resolve_reference(reference, location, depth);
        }

        let type_name = raw.type_.as_ref().and_then(|t| t.primary());
        let inferred = match type_name {
            Some(name) => Some(name),
            None if !raw.properties.is_empty() => Some("object"),
            None if raw.items.is_some() => Some("array"),
            None => None,
        };

        let kind = match inferred {
            Some("string") => SchemaKind::String(StringConstraints {
                format: raw.format.as_deref().map(StringFormat::parse),
                min_length: length_bound(raw.min_length, "minLength", location)?,
                max_length: length_bound(raw.max_length, "maxLength", location)?,
                pattern: raw.pattern.clone(),
            }),
            Some("integer") => SchemaKind::Integer(numeric(raw)),
            Some("number") => SchemaKind::Number(numeric(raw)),
            Some("boolean") => SchemaKind::Boolean,
            Some("array") => SchemaKind::Array {
                items: match &raw.items {
                    Some(items) => Some(Box::new(self.resolve(
                        items,
                        &format!("{location}.items"),
                        depth + 1,
                    )?)),
                    None => None,
                },
            },
            Some("object") => {
                let mut properties = IndexMap::with_capacity(raw.properties.len());
                for (name, child) in &raw.properties {
                    let child =
                        self.resolve(child, &format!("{location}.properties.{name}"), depth + 1)?;
                    properties.insert(name.clone(), child);
                }
                SchemaKind::Object(ObjectSchema {
                    properties,
                    required: raw.required.clone(),
                })
            }
            other => SchemaKind::Unknown(other.map(str::to_string)),
        };

        Ok(Schema {
            kind,
            example: raw.example.clone(),
            description: raw.description.clone(),
        })
    }

    fn resolve_reference(
        &mut self,
        reference: &str,
        location: &str,
        depth: usize,
    ) -> Result<Schema, ContractError> {
        let unresolved = || ContractError::UnresolvedReference {
            reference: reference.to_string(),
            location: location.to_string(),
        };
        let name = reference.strip_prefix(SCHEMA_REF_PREFIX).ok_or_else(unresolved)?;

        if let Some(start) = self.chain.iter().position(|n| n == name) {
            let mut cycle = self.chain[start..].to_vec();
            cycle.push(name.to_string());
            return Err(ContractError::CircularReference { cycle });
        }

        let target = self.components.get(name).ok_or_else(unresolved)?;
        self.chain.push(name.to_string());
        let resolved = self.resolve(target, &format!("components.schemas.{name}"), depth + 1);
        self.chain.pop();
        resolved
    }
}

fn numeric(raw: &RawSchema) -> NumericConstraints {
    NumericConstraints {
        minimum: raw.minimum.clone(),
        maximum: raw.maximum.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const USERS_API: &str = r"
openapi: 3.0.3
info:
  title: Users API
  version: 1.2.0
servers:
  - url: https://api.example.com/v1
paths:
  /users:
    post:
      summary: Create user
      operationId: createUser
      parameters:
        - name: Authorization
          in: header
          required: true
          schema:
            type: string
      requestBody:
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/NewUser'
      responses:
        201:
          description: created
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/User'
        '400':
          description: invalid
        default:
          description: unexpected
  /users/{id}:
    parameters:
      - name: id
        in: path
        required: true
        schema:
          type: string
          format: uuid
    get:
      operationId: getUser
      responses:
        '200':
          description: ok
    delete:
      operationId: deleteUser
      parameters:
        - $ref: '#/components/parameters/Force'
      responses:
        '204':
          description: gone
components:
  parameters:
    Force:
      name: force
      in: query
      schema:
        type: boolean
  schemas:
    NewUser:
      type: object
      required: [email]
      properties:
        email:
          type: string
          format: email
          maxLength: 50
        age:
          type: integer
          minimum: 18
    User:
      type: object
      properties:
        id:
          type: string
          format: uuid
        email:
          type: string
          format: email
";

    #[test]
    fn parses_metadata_and_operations_in_order() {
        let contract = ContractParser::parse_str(USERS_API).unwrap();
        assert_eq!(contract.info.title, "Users API");
        assert_eq!(contract.info.version.as_deref(), Some("1.2.0"));
        assert_eq!(contract.base_url.as_deref(), Some("https://api.example.com/v1"));
        let ids: Vec<_> = contract.operations().map(|o| o.id().into_owned()).collect();
        assert_eq!(ids, ["createUser", "getUser", "deleteUser"]);
    }

    #[test]
    fn resolves_request_body_reference() {
        let contract = ContractParser::parse_str(USERS_API).unwrap();
        let op = contract.operation("createUser").unwrap();
        assert!(op.requires_auth());
        let body = op.request_body.as_ref().unwrap();
        assert_eq!(body.required(), ["email"]);
        let email = &body.properties().unwrap()["email"];
        assert_eq!(email.format(), Some(&StringFormat::Email));
        assert_eq!(email.max_length(), Some(50));
        assert_eq!(json!(body.properties().unwrap()["age"].minimum()), json!(18));
    }

    #[test]
    fn skips_non_numeric_response_keys() {
        let contract = ContractParser::parse_str(USERS_API).unwrap();
        let op = contract.operation("createUser").unwrap();
        let codes: Vec<_> = op.responses.keys().copied().collect();
        assert_eq!(codes, [201, 400]);
        assert!(op.response(201).unwrap().schema.is_some());
    }

    #[test]
    fn merges_path_level_parameters() {
        let contract = ContractParser::parse_str(USERS_API).unwrap();
        let get = contract.operation("getUser").unwrap();
        let id = get.path_params().next().unwrap();
        assert_eq!(id.name, "id");
        assert!(id.required);
        assert_eq!(id.schema.format(), Some(&StringFormat::Uuid));

        let delete = contract.operation("deleteUser").unwrap();
        let names: Vec<_> = delete.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["force", "id"]);
    }

    #[test]
    fn operation_parameter_overrides_path_parameter() {
        let text = r"
paths:
  /items/{id}:
    parameters:
      - {name: id, in: path, required: true, schema: {type: string}}
    get:
      parameters:
        - {name: id, in: path, required: true, schema: {type: integer}}
      responses: {}
";
        let contract = ContractParser::parse_str(text).unwrap();
        let op = contract.operations().next().unwrap();
        assert_eq!(op.parameters.len(), 1);
        assert_eq!(op.parameters[0].schema.type_name(), "integer");
    }

    #[test]
    fn missing_paths_is_fatal() {
        let err = ContractParser::parse_str("info:\n  title: Empty\n").unwrap_err();
        assert!(matches!(err, ContractError::MissingSection("paths")));
    }

    #[test]
    fn circular_reference_is_rejected() {
        let text = r"
paths:
  /nodes:
    post:
      requestBody:
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/Node'
      responses: {}
components:
  schemas:
    Node:
      type: object
      properties:
        child:
          $ref: '#/components/schemas/Child'
    Child:
      type: object
      properties:
        parent:
          $ref: '#/components/schemas/Node'
";
        let err = ContractParser::parse_str(text).unwrap_err();
        match err {
            ContractError::CircularReference { cycle } => {
                assert_eq!(cycle, ["Node", "Child", "Node"]);
            }
            other => panic!("expected circular reference, got {other}"),
        }
    }

    #[test]
    fn shared_reference_without_cycle_is_fine() {
        let text = r"
paths:
  /pairs:
    post:
      requestBody:
        content:
          application/json:
            schema:
              type: object
              properties:
                left: {$ref: '#/components/schemas/Point'}
                right: {$ref: '#/components/schemas/Point'}
      responses: {}
components:
  schemas:
    Point:
      type: object
      properties:
        x: {type: integer}
";
        let contract = ContractParser::parse_str(text).unwrap();
        let body = contract.operations().next().unwrap().request_body.clone().unwrap();
        assert_eq!(body.properties().unwrap().len(), 2);
    }

    #[test]
    fn unresolved_reference_is_reported() {
        let text = r"
paths:
  /x:
    post:
      requestBody:
        content:
          application/json:
            schema: {$ref: '#/components/schemas/Nope'}
      responses: {}
";
        let err = ContractParser::parse_str(text).unwrap_err();
        assert!(matches!(err, ContractError::UnresolvedReference { .. }));
    }

    #[test]
    fn non_json_bodies_are_ignored() {
        let text = r"
paths:
  /upload:
    post:
      requestBody:
        content:
          multipart/form-data:
            schema: {type: object}
      responses: {}
";
        let contract = ContractParser::parse_str(text).unwrap();
        assert!(!contract.operations().next().unwrap().has_request_body());
    }

    #[test]
    fn infers_object_from_properties() {
        let text = r"
paths:
  /x:
    put:
      requestBody:
        content:
          application/json:
            schema:
              properties:
                name: {type: string}
      responses: {}
";
        let contract = ContractParser::parse_str(text).unwrap();
        let body = contract.operations().next().unwrap().request_body.clone().unwrap();
        assert_eq!(body.type_name(), "object");
    }

    #[test]
    fn duplicate_operation_ids_are_rejected() {
        let text = r"
paths:
  /a:
    get: {operationId: same, responses: {}}
  /b:
    get: {operationId: same, responses: {}}
";
        let err = ContractParser::parse_str(text).unwrap_err();
        assert!(matches!(err, ContractError::DuplicateOperationId(_)));
    }

    #[test]
    fn accepts_json_documents() {
        let text = r#"{"paths": {"/ping": {"get": {"responses": {"200": {"description": "pong"}}}}}}"#;
        let contract = ContractParser::parse_str(text).unwrap();
        assert_eq!(contract.info.title, "API");
        assert!(contract.operation("GET /ping").is_some());
    }

    #[test]
    fn parameter_without_name_is_malformed() {
        let text = r"
paths:
  /a:
    get:
      parameters:
        - {in: query}
      responses: {}
";
        let err = ContractParser::parse_str(text).unwrap_err();
        assert!(matches!(err, ContractError::Malformed { .. }));
    }

    fn body_with_max_length(max_length: u64) -> String {
        format!(
            "
paths:
  /things:
    post:
      requestBody:
        content:
          application/json:
            schema:
              type: object
              properties:
                name: {{type: string, maxLength: {max_length}}}
      responses: {{}}
"
        )
    }

    #[test]
    fn oversized_length_bound_is_malformed() {
        let err = ContractParser::parse_str(&body_with_max_length(1_000_000_000_000_000_000))
            .unwrap_err();
        let ContractError::Malformed { location, message } = &err else {
            panic!("expected malformed contract, got {err:?}");
        };
        assert!(location.ends_with("properties.name.maxLength"), "{location}");
        assert!(message.contains("maxLength"), "{message}");
    }

    #[test]
    fn length_bound_at_limit_is_accepted() {
        let limit = u64::try_from(MAX_STRING_LENGTH).unwrap();
        let contract = ContractParser::parse_str(&body_with_max_length(limit)).unwrap();
        let body = contract.operations().next().unwrap().request_body.clone().unwrap();
        assert_eq!(
            body.properties().unwrap()["name"].max_length(),
            Some(MAX_STRING_LENGTH)
        );
        assert!(matches!(
            ContractParser::parse_str(&body_with_max_length(limit + 1)),
            Err(ContractError::Malformed { .. })
        ));
    }
}
