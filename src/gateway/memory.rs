//! In-memory document gateway
//!
//! Process-local store used by tests and by `storage = "memory"`.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::errors::{GatewayError, GatewayResult};
use super::filter::{Document, Filter};
use super::store::{self, Table};
use super::DocumentGateway;

/// Document gateway holding every collection in memory
#[derive(Debug, Default)]
pub struct MemoryGateway {
    collections: RwLock<HashMap<String, Table>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_guard(&self) -> GatewayResult<RwLockReadGuard<'_, HashMap<String, Table>>> {
        self.collections
            .read()
            .map_err(|e| GatewayError::backend(format!("store lock poisoned: {}", e)))
    }

    fn write_guard(&self) -> GatewayResult<RwLockWriteGuard<'_, HashMap<String, Table>>> {
        self.collections
            .write()
            .map_err(|e| GatewayError::backend(format!("store lock poisoned: {}", e)))
    }
}

impl DocumentGateway for MemoryGateway {
    fn create(&self, collection: &str, doc: Document) -> GatewayResult<String> {
        let mut collections = self.write_guard()?;
        let table = collections.entry(collection.to_string()).or_default();
        Ok(store::insert(table, doc))
    }

    fn read(&self, collection: &str) -> GatewayResult<Vec<Document>> {
        let collections = self.read_guard()?;
        Ok(collections.get(collection).map(store::all).unwrap_or_default())
    }

    fn read_one(&self, collection: &str, filter: &Filter) -> GatewayResult<Option<Document>> {
        let collections = self.read_guard()?;
        Ok(collections
            .get(collection)
            .and_then(|table| store::find_one(table, filter)))
    }

    fn update(&self, collection: &str, filter: &Filter, fields: Document) -> GatewayResult<u64> {
        let mut collections = self.write_guard()?;
        Ok(collections
            .get_mut(collection)
            .map(|table| store::update_one(table, filter, fields))
            .unwrap_or(0))
    }

    fn delete(&self, collection: &str, filter: &Filter) -> GatewayResult<u64> {
        let mut collections = self.write_guard()?;
        Ok(collections
            .get_mut(collection)
            .map(|table| store::delete_one(table, filter))
            .unwrap_or(0))
    }
}
