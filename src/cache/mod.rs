//! Per-collection entity cache
//!
//! A best-effort mirror of one collection, keyed by record id:
//! - Lazily populated from the gateway on the first read, and again
//!   whenever it is found empty
//! - Never refreshed by time; trusted until mutated through the
//!   service's own write paths
//! - May be stale, but never keeps an id deleted through the service
//!
//! All access is serialized by one mutex per collection. Population runs
//! under that mutex, so it cannot interleave with a concurrent write.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::entity::EntityKey;
use crate::gateway::Document;
use crate::schema::ID_FIELD;

/// Cache statistics for observability
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Keyed lookups answered from the cache
    pub hits: u64,
    /// Keyed lookups that found nothing
    pub misses: u64,
    /// Times the cache was (re)built from the gateway
    pub populations: u64,
}

#[derive(Debug, Default)]
struct CacheState {
    populated: bool,
    entries: BTreeMap<String, Document>,
    stats: CacheStats,
}

/// Mirror of one collection's records
#[derive(Debug)]
pub struct EntityCache {
    collection: &'static str,
    state: Mutex<CacheState>,
}

/// Extracts the id a record is indexed by; string or integer ids only.
fn record_id(record: &Document) -> Option<String> {
    match record.get(ID_FIELD)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl EntityCache {
    pub fn new(collection: &'static str) -> Self {
        Self {
            collection,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn collection(&self) -> &'static str {
        self.collection
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        // the mirror stays usable after a panicking writer
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Rebuilds the entries from `load` if never populated or empty.
    ///
    /// Loader errors propagate untouched and leave the cache as it was.
    fn ensure_populated<E>(
        &self,
        state: &mut CacheState,
        load: impl FnOnce() -> Result<Vec<Document>, E>,
    ) -> Result<(), E> {
        if state.populated && !state.entries.is_empty() {
            return Ok(());
        }

        let docs = load()?;
        let mut entries = BTreeMap::new();
        let mut skipped = 0usize;
        for doc in docs {
            match record_id(&doc) {
                Some(id) => {
                    entries.insert(id, doc);
                }
                None => skipped += 1,
            }
        }

        state.entries = entries;
        state.populated = true;
        state.stats.populations += 1;
        debug!(
            collection = self.collection,
            records = state.entries.len(),
            skipped,
            "populated entity cache"
        );
        Ok(())
    }

    /// Returns every cached record, populating first if needed.
    pub fn get_all<E>(
        &self,
        load: impl FnOnce() -> Result<Vec<Document>, E>,
    ) -> Result<Vec<Document>, E> {
        let mut state = self.lock();
        self.ensure_populated(&mut state, load)?;
        Ok(state.entries.values().cloned().collect())
    }

    /// Number of cached records. Populates the cache as a side effect.
    pub fn count<E>(&self, load: impl FnOnce() -> Result<Vec<Document>, E>) -> Result<usize, E> {
        let mut state = self.lock();
        self.ensure_populated(&mut state, load)?;
        Ok(state.entries.len())
    }

    /// Looks up one record by key, populating first if needed.
    pub fn get<E>(
        &self,
        key: &EntityKey,
        load: impl FnOnce() -> Result<Vec<Document>, E>,
    ) -> Result<Option<Document>, E> {
        let mut state = self.lock();
        self.ensure_populated(&mut state, load)?;

        let found = match key {
            EntityKey::Id(id) => state.entries.get(id).cloned(),
            EntityKey::Natural(_) => state.entries.values().find(|r| key.matches(r)).cloned(),
        };

        if found.is_some() {
            state.stats.hits += 1;
        } else {
            state.stats.misses += 1;
        }
        Ok(found)
    }

    /// Unconditionally stores `record` under `id`, stamping the id into it.
    pub fn put(&self, id: &str, mut record: Document) {
        record.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        self.lock().entries.insert(id.to_string(), record);
    }

    /// Merges `fields` into the cached record. No-op when absent.
    pub fn patch(&self, id: &str, fields: &Document) -> bool {
        let mut state = self.lock();
        match state.entries.get_mut(id) {
            Some(record) => {
                merge(record, fields);
                true
            }
            None => false,
        }
    }

    /// Merges `fields` into the first cached record carrying `key`.
    pub fn patch_matching(&self, key: &EntityKey, fields: &Document) -> bool {
        if let EntityKey::Id(id) = key {
            return self.patch(id, fields);
        }
        let mut state = self.lock();
        match state.entries.values_mut().find(|r| key.matches(r)) {
            Some(record) => {
                merge(record, fields);
                true
            }
            None => false,
        }
    }

    /// Removes the entry if present. Never fails.
    pub fn evict(&self, id: &str) -> bool {
        self.lock().entries.remove(id).is_some()
    }

    /// Removes the first cached record carrying `key`.
    pub fn evict_matching(&self, key: &EntityKey) -> bool {
        if let EntityKey::Id(id) = key {
            return self.evict(id);
        }
        let mut state = self.lock();
        let id = state
            .entries
            .iter()
            .find(|(_, r)| key.matches(r))
            .map(|(id, _)| id.clone());
        match id {
            Some(id) => state.entries.remove(&id).is_some(),
            None => false,
        }
    }

    /// Drops every entry and returns to the unpopulated state.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.populated = false;
    }

    /// Entries currently held, without populating
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_populated(&self) -> bool {
        self.lock().populated
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }
}

fn merge(record: &mut Document, fields: &Document) {
    for (k, v) in fields {
        if k != ID_FIELD {
            record.insert(k.clone(), v.clone());
        }
    }
}
