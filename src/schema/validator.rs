//! Schema validator for entity documents
//!
//! Validation semantics:
//! - Input must be a JSON object
//! - Required fields are present, non-null and non-empty
//! - Field types match exactly (no coercion: "19870000" is not an int)
//! - Fields are checked in schema declaration order; the first failure wins
//! - `id` is owned by the database and may never be supplied
//!
//! Fields outside the schema are not rejected.

use serde_json::{Map, Value};

use super::errors::{SchemaError, SchemaResult};
use super::types::{json_type_name, EntitySchema, FieldDef, FieldType, ID_FIELD};

/// Validator bound to one entity schema.
///
/// Validation is pure and deterministic. The validator never mutates input.
pub struct SchemaValidator<'a> {
    schema: &'a EntitySchema,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(schema: &'a EntitySchema) -> Self {
        Self { schema }
    }

    /// Validates a complete candidate record before it is created.
    ///
    /// Returns the record viewed as an object on success.
    pub fn validate_document<'v>(&self, input: &'v Value) -> SchemaResult<&'v Map<String, Value>> {
        let obj = self.as_object(input)?;
        self.reject_reserved(obj)?;

        for field in &self.schema.fields {
            match obj.get(field.name) {
                Some(value) => self.validate_value(field, value)?,
                None if field.required => {
                    return Err(SchemaError::missing_field(self.schema.entity, field.name));
                }
                None => {}
            }
        }

        Ok(obj)
    }

    /// Validates a partial update.
    ///
    /// Only the supplied fields are checked; absent fields are left alone.
    pub fn validate_partial<'v>(&self, input: &'v Value) -> SchemaResult<&'v Map<String, Value>> {
        let obj = self.as_object(input)?;
        if obj.is_empty() {
            return Err(SchemaError::empty_update(self.schema.entity));
        }
        self.reject_reserved(obj)?;

        for field in &self.schema.fields {
            if let Some(value) = obj.get(field.name) {
                self.validate_value(field, value)?;
            }
        }

        Ok(obj)
    }

    fn as_object<'v>(&self, input: &'v Value) -> SchemaResult<&'v Map<String, Value>> {
        input
            .as_object()
            .ok_or_else(|| SchemaError::invalid_input_type(self.schema.entity, json_type_name(input)))
    }

    fn reject_reserved(&self, obj: &Map<String, Value>) -> SchemaResult<()> {
        if obj.contains_key(ID_FIELD) {
            return Err(SchemaError::reserved_field(self.schema.entity, ID_FIELD));
        }
        Ok(())
    }

    /// Validates a present value against its field definition.
    fn validate_value(&self, field: &FieldDef, value: &Value) -> SchemaResult<()> {
        let entity = self.schema.entity;

        if value.is_null() {
            return Err(SchemaError::empty_value(entity, field.name, "null"));
        }

        match field.field_type {
            FieldType::String => {
                self.non_empty_str(field, value)?;
            }
            FieldType::Int => {
                if value.is_u64() {
                    return Ok(());
                }
                if let Some(n) = value.as_i64() {
                    return Err(SchemaError::negative_value(entity, field.name, n));
                }
                return Err(SchemaError::type_mismatch(
                    entity,
                    field.name,
                    field.field_type.type_name(),
                    json_type_name(value),
                ));
            }
            FieldType::Measurement => {
                let s = self.non_empty_str(field, value)?;
                if !s.chars().any(|c| c.is_ascii_digit()) {
                    return Err(SchemaError::type_mismatch(
                        entity,
                        field.name,
                        field.field_type.type_name(),
                        format!("'{}'", s),
                    ));
                }
            }
        }

        Ok(())
    }

    fn non_empty_str<'v>(&self, field: &FieldDef, value: &'v Value) -> SchemaResult<&'v str> {
        let s = value.as_str().ok_or_else(|| {
            SchemaError::type_mismatch(
                self.schema.entity,
                field.name,
                field.field_type.type_name(),
                json_type_name(value),
            )
        })?;
        if s.trim().is_empty() {
            return Err(SchemaError::empty_value(self.schema.entity, field.name, "empty string"));
        }
        Ok(s)
    }
}
