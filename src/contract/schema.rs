//! Recursive schema tree.
//!
//! A [`Schema`] is a tagged sum over its kind: each variant carries only
//! the constraints meaningful for that kind. Children are owned values, so a
//! schema is always a finite tree; cyclic `$ref` chains are rejected by the
//! parser before a `Schema` is ever built.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Number, Value};
use std::fmt;

/// A structural type for a body, response, or parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    /// Kind and kind-specific constraints.
    pub kind: SchemaKind,

    /// Example value declared by the contract.
    pub example: Option<Value>,

    /// Free-form description.
    pub description: Option<String>,
}

/// Kind of a [`Schema`] with its constraints.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    /// `type: string`
    String(StringConstraints),
    /// `type: integer`
    Integer(NumericConstraints),
    /// `type: number`
    Number(NumericConstraints),
    /// `type: boolean`
    Boolean,
    /// `type: array`
    Array {
        /// Element schema, when declared.
        items: Option<Box<Schema>>,
    },
    /// `type: object`
    Object(ObjectSchema),
    /// Missing or unrecognized `type`; holds the declared name if any.
    Unknown(Option<String>),
}

/// Constraints for string schemas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringConstraints {
    /// Declared `format`.
    pub format: Option<StringFormat>,
    /// `minLength`
    pub min_length: Option<usize>,
    /// `maxLength`
    pub max_length: Option<usize>,
    /// `pattern`
    pub pattern: Option<String>,
}

/// Constraints for integer and number schemas.
///
/// Bounds keep their JSON representation so an integer bound is emitted
/// as an integer literal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericConstraints {
    /// `minimum`
    pub minimum: Option<Number>,
    /// `maximum`
    pub maximum: Option<Number>,
}

/// Properties and required list of an object schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    /// Child schemas in declaration order.
    pub properties: IndexMap<String, Schema>,
    /// Names listed under `required`, in declaration order.
    pub required: Vec<String>,
}

/// String formats the synthesizer knows canonical literals for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringFormat {
    /// `email`
    Email,
    /// `uuid`
    Uuid,
    /// `date-time`
    DateTime,
    /// Any other declared format, kept verbatim.
    Other(String),
}

impl StringFormat {
    /// Parses a declared `format` value.
    #[must_use]
    pub fn parse(format: &str) -> Self {
        match format {
            "email" => Self::Email,
            "uuid" => Self::Uuid,
            "date-time" => Self::DateTime,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the format name as written in a contract.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Email => "email",
            Self::Uuid => "uuid",
            Self::DateTime => "date-time",
            Self::Other(name) => name,
        }
    }
}

impl Serialize for StringFormat {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for StringFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON type of a value, used by type assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// JSON string
    String,
    /// JSON number (integer or floating point)
    Number,
    /// JSON boolean
    Boolean,
    /// JSON array
    Array,
    /// JSON object
    Object,
    /// Any value, as long as it is present
    Present,
}

impl ValueType {
    /// Lowercase name of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Present => "present",
        }
    }
}

impl Schema {
    /// Creates a schema of the given kind with no example or description.
    #[must_use]
    pub const fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            example: None,
            description: None,
        }
    }

    /// An unconstrained string schema.
    #[must_use]
    pub fn string() -> Self {
        Self::new(SchemaKind::String(StringConstraints::default()))
    }

    /// An unconstrained integer schema.
    #[must_use]
    pub fn integer() -> Self {
        Self::new(SchemaKind::Integer(NumericConstraints::default()))
    }

    /// An unconstrained number schema.
    #[must_use]
    pub fn number() -> Self {
        Self::new(SchemaKind::Number(NumericConstraints::default()))
    }

    /// A boolean schema.
    #[must_use]
    pub const fn boolean() -> Self {
        Self::new(SchemaKind::Boolean)
    }

    /// An array schema with the given element schema.
    #[must_use]
    pub fn array(items: Option<Self>) -> Self {
        Self::new(SchemaKind::Array {
            items: items.map(Box::new),
        })
    }

    /// An object schema with no properties.
    #[must_use]
    pub fn object() -> Self {
        Self::new(SchemaKind::Object(ObjectSchema::default()))
    }

    /// Sets the example value.
    #[must_use]
    pub fn with_example(mut self, example: Value) -> Self {
        self.example = Some(example);
        self
    }

    /// Sets the string format. No effect on non-string schemas.
    #[must_use]
    pub fn with_format(mut self, format: StringFormat) -> Self {
        if let SchemaKind::String(ref mut c) = self.kind {
            c.format = Some(format);
        }
        self
    }

    /// Sets `minLength`. No effect on non-string schemas.
    #[must_use]
    pub fn with_min_length(mut self, len: usize) -> Self {
        if let SchemaKind::String(ref mut c) = self.kind {
            c.min_length = Some(len);
        }
        self
    }

    /// Sets `maxLength`. No effect on non-string schemas.
    #[must_use]
    pub fn with_max_length(mut self, len: usize) -> Self {
        if let SchemaKind::String(ref mut c) = self.kind {
            c.max_length = Some(len);
        }
        self
    }

    /// Sets `minimum`. No effect on non-numeric schemas.
    #[must_use]
    pub fn with_minimum(mut self, minimum: impl Into<Number>) -> Self {
        if let Some(c) = self.numeric_mut() {
            c.minimum = Some(minimum.into());
        }
        self
    }

    /// Sets `maximum`. No effect on non-numeric schemas.
    #[must_use]
    pub fn with_maximum(mut self, maximum: impl Into<Number>) -> Self {
        if let Some(c) = self.numeric_mut() {
            c.maximum = Some(maximum.into());
        }
        self
    }

    /// Adds a property. No effect on non-object schemas.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, schema: Self) -> Self {
        if let SchemaKind::Object(ref mut o) = self.kind {
            o.properties.insert(name.into(), schema);
        }
        self
    }

    /// Marks a property as required. No effect on non-object schemas.
    #[must_use]
    pub fn with_required(mut self, name: impl Into<String>) -> Self {
        if let SchemaKind::Object(ref mut o) = self.kind {
            o.required.push(name.into());
        }
        self
    }

    const fn numeric_mut(&mut self) -> Option<&mut NumericConstraints> {
        match self.kind {
            SchemaKind::Integer(ref mut c) | SchemaKind::Number(ref mut c) => Some(c),
            _ => None,
        }
    }

    /// Returns `true` for `type: string`.
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self.kind, SchemaKind::String(_))
    }

    /// Returns `true` for `type: integer` and `type: number`.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self.kind, SchemaKind::Integer(_) | SchemaKind::Number(_))
    }

    /// String constraints, when this is a string schema.
    #[must_use]
    pub const fn string_constraints(&self) -> Option<&StringConstraints> {
        match &self.kind {
            SchemaKind::String(c) => Some(c),
            _ => None,
        }
    }

    /// Numeric constraints, when this is an integer or number schema.
    #[must_use]
    pub const fn numeric_constraints(&self) -> Option<&NumericConstraints> {
        match &self.kind {
            SchemaKind::Integer(c) | SchemaKind::Number(c) => Some(c),
            _ => None,
        }
    }

    /// Declared string format.
    #[must_use]
    pub fn format(&self) -> Option<&StringFormat> {
        self.string_constraints().and_then(|c| c.format.as_ref())
    }

    /// Declared `maxLength`.
    #[must_use]
    pub fn max_length(&self) -> Option<usize> {
        self.string_constraints().and_then(|c| c.max_length)
    }

    /// Declared `minimum`.
    #[must_use]
    pub fn minimum(&self) -> Option<&Number> {
        self.numeric_constraints().and_then(|c| c.minimum.as_ref())
    }

    /// Declared `maximum`.
    #[must_use]
    pub fn maximum(&self) -> Option<&Number> {
        self.numeric_constraints().and_then(|c| c.maximum.as_ref())
    }

    /// Object properties, when this is an object schema.
    #[must_use]
    pub const fn properties(&self) -> Option<&IndexMap<String, Self>> {
        match &self.kind {
            SchemaKind::Object(o) => Some(&o.properties),
            _ => None,
        }
    }

    /// Required property names; empty for non-object schemas.
    #[must_use]
    pub fn required(&self) -> &[String] {
        match &self.kind {
            SchemaKind::Object(o) => &o.required,
            _ => &[],
        }
    }

    /// JSON type a conforming value has.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self.kind {
            SchemaKind::String(_) => ValueType::String,
            SchemaKind::Integer(_) | SchemaKind::Number(_) => ValueType::Number,
            SchemaKind::Boolean => ValueType::Boolean,
            SchemaKind::Array { .. } => ValueType::Array,
            SchemaKind::Object(_) => ValueType::Object,
            SchemaKind::Unknown(_) => ValueType::Present,
        }
    }

    /// Type name as written in a contract.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match &self.kind {
            SchemaKind::String(_) => "string",
            SchemaKind::Integer(_) => "integer",
            SchemaKind::Number(_) => "number",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Array { .. } => "array",
            SchemaKind::Object(_) => "object",
            SchemaKind::Unknown(name) => name.as_deref().unwrap_or("unknown"),
        }
    }
}
