//! Schema type definitions
//!
//! Supported field types:
//! - string: non-empty UTF-8 string
//! - int: non-negative integer (population-like counts)
//! - measurement: string-formatted number such as "1T USD" or "4,751 sq mi"

use serde::Serialize;
use serde_json::Value;

/// Name of the identifier field assigned by the database gateway.
pub const ID_FIELD: &str = "id";

/// Supported field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Non-empty string
    String,
    /// Non-negative integer. String-encoded numbers are rejected.
    Int,
    /// Non-empty string carrying at least one digit
    Measurement,
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "non-negative int",
            FieldType::Measurement => "measurement",
        }
    }
}

/// Field definition: name, type and whether the field must be present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDef {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
}

impl FieldDef {
    pub const fn required(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: false,
        }
    }
}

/// Declarative schema for one entity kind.
///
/// Fields are held in declaration order. The validator walks them in that
/// order, so the first failing field is always the same for a given input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntitySchema {
    /// Entity name used in error messages ("country", "county", ...)
    pub entity: &'static str,
    pub fields: Vec<FieldDef>,
}

impl EntitySchema {
    pub fn new(entity: &'static str, fields: Vec<FieldDef>) -> Self {
        Self { entity, fields }
    }

    /// Looks up a field definition by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of required fields, in declaration order
    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter(|f| f.required).map(|f| f.name)
    }
}

/// Returns a short JSON type name for a value
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
