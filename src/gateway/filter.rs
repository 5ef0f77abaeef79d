//! Equality filters over flat documents

use serde::Serialize;
use serde_json::{Map, Value};

use crate::schema::ID_FIELD;

/// A flat document: field name to primitive value
pub type Document = Map<String, Value>;

/// Conjunction of field equality conditions.
///
/// A condition on `id` matches the gateway-assigned identifier rather than
/// a stored field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter matching a single identifier
    pub fn by_id(id: impl Into<String>) -> Self {
        Self::new().with_eq(ID_FIELD, Value::String(id.into()))
    }

    /// Adds an equality condition
    pub fn with_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    pub fn conditions(&self) -> &[(String, Value)] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Matches a stored document whose identifier is held separately.
    pub fn matches_stored(&self, id: &str, doc: &Document) -> bool {
        self.conditions.iter().all(|(field, expected)| {
            if field == ID_FIELD {
                expected.as_str() == Some(id)
            } else {
                doc.get(field) == Some(expected)
            }
        })
    }

    /// Matches a record that already carries its `id` field.
    pub fn matches_record(&self, record: &Document) -> bool {
        self.conditions
            .iter()
            .all(|(field, expected)| record.get(field) == Some(expected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_id_condition_matches_stored_identifier() {
        let stored = doc(json!({"name": "Loudoun"}));
        assert!(Filter::by_id("abc").matches_stored("abc", &stored));
        assert!(!Filter::by_id("abc").matches_stored("xyz", &stored));
    }

    #[test]
    fn test_compound_filter() {
        let stored = doc(json!({"name": "Loudoun", "state_code": "VA"}));
        let filter = Filter::new().with_eq("name", "Loudoun").with_eq("state_code", "VA");
        assert!(filter.matches_stored("1", &stored));

        let filter = Filter::new().with_eq("name", "Loudoun").with_eq("state_code", "MD");
        assert!(!filter.matches_stored("1", &stored));
    }

    #[test]
    fn test_matches_record() {
        let record = doc(json!({"id": "7", "name": "Albany"}));
        assert!(Filter::by_id("7").matches_record(&record));
        assert!(Filter::new().with_eq("name", "Albany").matches_record(&record));
        assert!(!Filter::new().with_eq("name", "Troy").matches_record(&record));
    }
}
