//! Entity identity: opaque gateway ids versus compound natural keys

use std::fmt;

use serde_json::Value;

use crate::gateway::{Document, Filter};

use super::kind::{NAME, STATE_CODE};

/// Minimum length of a valid opaque id
pub const MIN_ID_LEN: usize = 1;

/// How records of one entity kind are addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    /// Addressed by the id the gateway assigned at creation
    OpaqueId,
    /// Addressed by a compound of record fields
    NaturalKey(&'static [&'static str]),
}

impl Identity {
    /// Fields forming the natural key; empty for opaque ids
    pub fn key_fields(&self) -> &'static [&'static str] {
        match self {
            Identity::OpaqueId => &[],
            Identity::NaturalKey(fields) => fields,
        }
    }

    /// Whether `key` has the shape this identity expects
    pub fn accepts(&self, key: &EntityKey) -> bool {
        match (self, key) {
            (Identity::OpaqueId, EntityKey::Id(id)) => is_valid_id(id),
            (Identity::NaturalKey(fields), EntityKey::Natural(parts)) => {
                parts.len() == fields.len()
                    && fields.iter().zip(parts).all(|(expected, (field, value))| {
                        expected == field && !value.trim().is_empty()
                    })
            }
            _ => false,
        }
    }

    /// Builds a key from URL path segments.
    ///
    /// Opaque ids take one segment; natural keys take one segment per key
    /// field, in declaration order. `None` when the segment count is wrong.
    pub fn key_from_segments(&self, segments: &[&str]) -> Option<EntityKey> {
        match self {
            Identity::OpaqueId => match segments {
                [id] => Some(EntityKey::id(*id)),
                _ => None,
            },
            Identity::NaturalKey(fields) if fields.len() == segments.len() => Some(
                EntityKey::natural(fields.iter().copied().zip(segments.iter().copied())),
            ),
            Identity::NaturalKey(_) => None,
        }
    }

    /// Describes the expected key shape for error messages
    pub fn describe(&self) -> String {
        match self {
            Identity::OpaqueId => "an id".to_string(),
            Identity::NaturalKey(fields) => fields.join(" + "),
        }
    }
}

/// Opaque ids must be non-empty strings
pub fn is_valid_id(id: &str) -> bool {
    id.len() >= MIN_ID_LEN
}

/// Identifies one record within a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKey {
    Id(String),
    /// Field/value pairs in natural-key declaration order
    Natural(Vec<(&'static str, String)>),
}

impl EntityKey {
    pub fn id(id: impl Into<String>) -> Self {
        EntityKey::Id(id.into())
    }

    pub fn natural<V: Into<String>>(parts: impl IntoIterator<Item = (&'static str, V)>) -> Self {
        EntityKey::Natural(parts.into_iter().map(|(f, v)| (f, v.into())).collect())
    }

    /// Natural key of a county
    pub fn county(name: impl Into<String>, state_code: impl Into<String>) -> Self {
        EntityKey::Natural(vec![(STATE_CODE, state_code.into()), (NAME, name.into())])
    }

    /// Gateway filter selecting the keyed record
    pub fn to_filter(&self) -> Filter {
        match self {
            EntityKey::Id(id) => Filter::by_id(id.clone()),
            EntityKey::Natural(parts) => parts.iter().fold(Filter::new(), |filter, (field, value)| {
                filter.with_eq(*field, Value::String(value.clone()))
            }),
        }
    }

    /// Whether a cached record carries this key
    pub fn matches(&self, record: &Document) -> bool {
        self.to_filter().matches_record(record)
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKey::Id(id) => write!(f, "{}", id),
            EntityKey::Natural(parts) => {
                let rendered: Vec<String> = parts
                    .iter()
                    .map(|(field, value)| format!("{}={}", field, value))
                    .collect();
                write!(f, "{}", rendered.join(", "))
            }
        }
    }
}
