//! Collection service: validator + cache + gateway for one entity kind
//!
//! Operations run to completion on the calling thread. Ordering rules:
//! - Validation always precedes any gateway call
//! - The gateway is written first; the cache is touched only after the
//!   gateway confirms the write
//! - A delete evicts only when the gateway reports a deleted row
//! - Every gateway write, and the cache change that mirrors it, runs under
//!   one per-collection write guard. A single-record cache miss takes the
//!   same guard, so a fetched record cannot be put back after a delete.

use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;
use tracing::{debug, info};

use crate::cache::EntityCache;
use crate::entity::{is_valid_id, EntityKey, EntityKind};
use crate::gateway::{Document, DocumentGateway, GatewayError, GatewayResult};
use crate::schema::{EntitySchema, SchemaValidator, ID_FIELD};

use super::errors::{ServiceError, ServiceResult};

/// CRUD operations for one entity kind
pub struct CollectionService {
    kind: EntityKind,
    schema: EntitySchema,
    cache: EntityCache,
    gateway: Arc<dyn DocumentGateway>,
    writes: Mutex<()>,
}

impl CollectionService {
    pub fn new(kind: EntityKind, gateway: Arc<dyn DocumentGateway>) -> Self {
        Self {
            kind,
            schema: kind.schema(),
            cache: EntityCache::new(kind.collection()),
            gateway,
            writes: Mutex::new(()),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn schema(&self) -> &EntitySchema {
        &self.schema
    }

    pub fn cache(&self) -> &EntityCache {
        &self.cache
    }

    fn collection(&self) -> &'static str {
        self.kind.collection()
    }

    fn load(&self) -> impl FnOnce() -> GatewayResult<Vec<Document>> + '_ {
        move || self.gateway.read(self.collection())
    }

    fn write_guard(&self) -> MutexGuard<'_, ()> {
        // guards no data, so a poisoned lock is still usable
        self.writes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_key(&self, key: &EntityKey) -> ServiceResult<()> {
        let identity = self.kind.identity();
        if identity.accepts(key) {
            Ok(())
        } else {
            Err(ServiceError::InvalidKey {
                entity: self.kind.name(),
                expected: identity.describe(),
            })
        }
    }

    /// Validates and persists a new record; returns the gateway-assigned id.
    pub fn create(&self, fields: &Value) -> ServiceResult<String> {
        let record = SchemaValidator::new(&self.schema).validate_document(fields)?;

        let _guard = self.write_guard();
        let id = self.gateway.create(self.collection(), record.clone())?;
        if !is_valid_id(&id) {
            return Err(ServiceError::Persistence(GatewayError::backend(
                "gateway returned an empty id",
            )));
        }

        self.cache.put(&id, record.clone());
        info!(collection = self.collection(), id = %id, "created record");
        Ok(id)
    }

    /// Returns every record, populating the cache on first use.
    pub fn read(&self) -> ServiceResult<Vec<Document>> {
        let records = self.cache.get_all(self.load())?;
        debug!(collection = self.collection(), records = records.len(), "read all");
        Ok(records)
    }

    /// Returns one record.
    ///
    /// Served from the cache when present; on a miss the gateway is asked
    /// directly and a found record is mirrored into the cache.
    pub fn read_one(&self, key: &EntityKey) -> ServiceResult<Document> {
        self.check_key(key)?;

        if let Some(record) = self.cache.get(key, self.load())? {
            return Ok(record);
        }

        let _guard = self.write_guard();
        match self.gateway.read_one(self.collection(), &key.to_filter())? {
            Some(record) => {
                if let Some(id) = record.get(ID_FIELD).and_then(Value::as_str) {
                    self.cache.put(id, record.clone());
                }
                debug!(collection = self.collection(), key = %key, "cache miss served by gateway");
                Ok(record)
            }
            None => {
                self.cache.evict_matching(key);
                Err(ServiceError::not_found(self.kind.label(), key))
            }
        }
    }

    /// Applies a partial update.
    ///
    /// Only the supplied fields are validated and written. An invalid update
    /// never reaches the gateway.
    pub fn update(&self, key: &EntityKey, fields: &Value) -> ServiceResult<()> {
        self.check_key(key)?;
        let changes = SchemaValidator::new(&self.schema).validate_partial(fields)?;

        let _guard = self.write_guard();
        let matched = self
            .gateway
            .update(self.collection(), &key.to_filter(), changes.clone())?;
        if matched == 0 {
            return Err(ServiceError::not_found(self.kind.label(), key));
        }

        self.cache.patch_matching(key, changes);
        info!(collection = self.collection(), key = %key, "updated record");
        Ok(())
    }

    /// Deletes one record. Deleting the same key twice fails the second time.
    pub fn delete(&self, key: &EntityKey) -> ServiceResult<()> {
        self.check_key(key)?;

        let _guard = self.write_guard();
        let deleted = self.gateway.delete(self.collection(), &key.to_filter())?;
        if deleted == 0 {
            return Err(ServiceError::not_found(self.kind.label(), key));
        }

        self.cache.evict_matching(key);
        info!(collection = self.collection(), key = %key, "deleted record");
        Ok(())
    }

    /// Number of records known to the cache.
    ///
    /// This is a read with a side effect: it populates the cache when it is
    /// unpopulated or empty.
    pub fn count(&self) -> ServiceResult<usize> {
        Ok(self.cache.count(self.load())?)
    }
}
