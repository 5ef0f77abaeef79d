//! Schema error types
//!
//! Error codes:
//! - GEO_INVALID_INPUT_TYPE (input is not a mapping)
//! - GEO_MISSING_FIELD
//! - GEO_EMPTY_VALUE
//! - GEO_TYPE_MISMATCH
//! - GEO_NEGATIVE_VALUE
//! - GEO_RESERVED_FIELD
//! - GEO_EMPTY_UPDATE

use std::fmt;

use thiserror::Error;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Input is not a JSON object
    InvalidInputType,
    /// Required field absent
    MissingField,
    /// Field present but empty (or null)
    EmptyValue,
    /// Field present with the wrong type
    TypeMismatch,
    /// Count field below zero
    NegativeValue,
    /// Client tried to supply a gateway-owned field
    ReservedField,
    /// Partial update carried no fields
    EmptyUpdate,
}

impl SchemaErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::InvalidInputType => "GEO_INVALID_INPUT_TYPE",
            SchemaErrorCode::MissingField => "GEO_MISSING_FIELD",
            SchemaErrorCode::EmptyValue => "GEO_EMPTY_VALUE",
            SchemaErrorCode::TypeMismatch => "GEO_TYPE_MISMATCH",
            SchemaErrorCode::NegativeValue => "GEO_NEGATIVE_VALUE",
            SchemaErrorCode::ReservedField => "GEO_RESERVED_FIELD",
            SchemaErrorCode::EmptyUpdate => "GEO_EMPTY_UPDATE",
        }
    }

    /// True for the TypeError-class failure (input was not a mapping at all)
    pub fn is_type_error(&self) -> bool {
        matches!(self, SchemaErrorCode::InvalidInputType)
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Validation failure details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetails {
    /// Offending field ("$root" for the input itself)
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(field, "field to be present", "missing")
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field '{}': expected {}, got {}",
            self.field, self.expected, self.actual
        )
    }
}

/// Schema error with full context
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {entity} {details}")]
pub struct SchemaError {
    code: SchemaErrorCode,
    entity: String,
    details: ValidationDetails,
}

impl SchemaError {
    pub fn new(code: SchemaErrorCode, entity: impl Into<String>, details: ValidationDetails) -> Self {
        Self {
            code,
            entity: entity.into(),
            details,
        }
    }

    pub fn invalid_input_type(entity: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(
            SchemaErrorCode::InvalidInputType,
            entity,
            ValidationDetails::new("$root", "object", actual),
        )
    }

    pub fn missing_field(entity: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(
            SchemaErrorCode::MissingField,
            entity,
            ValidationDetails::missing_field(field),
        )
    }

    pub fn empty_value(entity: impl Into<String>, field: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(
            SchemaErrorCode::EmptyValue,
            entity,
            ValidationDetails::new(field, "non-empty value", actual),
        )
    }

    pub fn type_mismatch(
        entity: impl Into<String>,
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::new(
            SchemaErrorCode::TypeMismatch,
            entity,
            ValidationDetails::new(field, expected, actual),
        )
    }

    pub fn negative_value(entity: impl Into<String>, field: impl Into<String>, actual: i64) -> Self {
        Self::new(
            SchemaErrorCode::NegativeValue,
            entity,
            ValidationDetails::new(field, "value >= 0", actual.to_string()),
        )
    }

    pub fn reserved_field(entity: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(
            SchemaErrorCode::ReservedField,
            entity,
            ValidationDetails::new(field, "field to be assigned by the database", "client value"),
        )
    }

    pub fn empty_update(entity: impl Into<String>) -> Self {
        Self::new(
            SchemaErrorCode::EmptyUpdate,
            entity,
            ValidationDetails::new("$root", "at least one field", "empty object"),
        )
    }

    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Name of the field that failed validation
    pub fn field(&self) -> &str {
        &self.details.field
    }

    pub fn details(&self) -> &ValidationDetails {
        &self.details
    }
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchemaErrorCode::InvalidInputType.code(), "GEO_INVALID_INPUT_TYPE");
        assert_eq!(SchemaErrorCode::MissingField.code(), "GEO_MISSING_FIELD");
        assert_eq!(SchemaErrorCode::NegativeValue.code(), "GEO_NEGATIVE_VALUE");
        assert!(SchemaErrorCode::InvalidInputType.is_type_error());
        assert!(!SchemaErrorCode::TypeMismatch.is_type_error());
    }

    #[test]
    fn test_display_names_the_field() {
        let err = SchemaError::type_mismatch("state", "population", "non-negative int", "string");
        let display = err.to_string();
        assert!(display.starts_with("GEO_TYPE_MISMATCH"));
        assert!(display.contains("state"));
        assert!(display.contains("'population'"));
        assert_eq!(err.field(), "population");
    }
}
