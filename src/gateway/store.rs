//! Collection tables shared by the in-memory and file-backed gateways
//!
//! Documents are stored without their identifier; the identifier is the
//! table key (the database-internal `_id`). Records handed out carry it
//! under `id`.

use std::collections::BTreeMap;

use serde_json::Value;
use uuid::Uuid;

use super::filter::{Document, Filter};
use crate::schema::ID_FIELD;

/// Database-internal identifier field, never exposed to callers
pub const INTERNAL_ID_FIELD: &str = "_id";

/// One collection: internal id to stored document
pub type Table = BTreeMap<String, Document>;

/// Strips identifier fields a caller must not control.
fn strip_ids(doc: &mut Document) {
    doc.remove(ID_FIELD);
    doc.remove(INTERNAL_ID_FIELD);
}

/// Converts a stored document into a record carrying `id`.
pub fn to_record(id: &str, doc: &Document) -> Document {
    let mut record = doc.clone();
    record.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    record
}

/// Inserts a document under a freshly assigned identifier.
pub fn insert(table: &mut Table, mut doc: Document) -> String {
    strip_ids(&mut doc);
    let id = Uuid::new_v4().to_string();
    table.insert(id.clone(), doc);
    id
}

pub fn all(table: &Table) -> Vec<Document> {
    table.iter().map(|(id, doc)| to_record(id, doc)).collect()
}

fn first_match<'t>(table: &'t Table, filter: &Filter) -> Option<&'t String> {
    table
        .iter()
        .find(|(id, doc)| filter.matches_stored(id, doc))
        .map(|(id, _)| id)
}

pub fn find_one(table: &Table, filter: &Filter) -> Option<Document> {
    table
        .iter()
        .find(|(id, doc)| filter.matches_stored(id, doc))
        .map(|(id, doc)| to_record(id, doc))
}

/// Merges `fields` into the first matching document.
///
/// Returns the number of matched documents (0 or 1).
pub fn update_one(table: &mut Table, filter: &Filter, mut fields: Document) -> u64 {
    strip_ids(&mut fields);
    let Some(id) = first_match(table, filter).cloned() else {
        return 0;
    };
    if let Some(doc) = table.get_mut(&id) {
        for (k, v) in fields {
            doc.insert(k, v);
        }
    }
    1
}

/// Removes the first matching document. Returns the deleted count (0 or 1).
pub fn delete_one(table: &mut Table, filter: &Filter) -> u64 {
    match first_match(table, filter).cloned() {
        Some(id) => {
            table.remove(&id);
            1
        }
        None => 0,
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
    fn test_insert_ignores_caller_ids() {
        let mut table = Table::new();
        let id = insert(&mut table, doc(json!({"id": "mine", "_id": "x", "name": "A"})));
        assert_ne!(id, "mine");
        let stored = &table[&id];
        assert!(!stored.contains_key("id"));
        assert!(!stored.contains_key("_id"));
    }

    #[test]
    fn test_update_and_delete_touch_first_match_only() {
        let mut table = Table::new();
        insert(&mut table, doc(json!({"name": "Twin"})));
        insert(&mut table, doc(json!({"name": "Twin"})));

        let filter = Filter::new().with_eq("name", "Twin");
        assert_eq!(update_one(&mut table, &filter, doc(json!({"population": 3}))), 1);
        let patched = table.values().filter(|d| d.contains_key("population")).count();
        assert_eq!(patched, 1);

        assert_eq!(delete_one(&mut table, &filter), 1);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_no_match_counts_zero() {
        let mut table = Table::new();
        let filter = Filter::by_id("missing");
        assert_eq!(update_one(&mut table, &filter, Document::new()), 0);
        assert_eq!(delete_one(&mut table, &filter), 0);
        assert!(find_one(&table, &filter).is_none());
    }
}
