//! Schema validation for geographic entities
//!
//! Each entity kind declares its schema as an ordered list of field
//! definitions; one validator evaluates all of them uniformly.
//!
//! # Rules
//!
//! - Validation happens before any gateway call
//! - No coercion, no defaults, no nulls
//! - Deterministic: same input, same first failing field

mod errors;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, ValidationDetails};
pub use types::{json_type_name, EntitySchema, FieldDef, FieldType, ID_FIELD};
pub use validator::SchemaValidator;
