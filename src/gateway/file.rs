//! File-backed document gateway
//!
//! Layout:
//!
//! ```text
//! <data_dir>/<database>/<collection>.json
//! ```
//!
//! Each collection file holds a JSON object of internal id to document.
//! A collection is loaded on first touch and rewritten atomically
//! (temp file + rename) after every mutation.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use super::errors::{GatewayError, GatewayResult};
use super::filter::{Document, Filter};
use super::store::{self, Table};
use super::DocumentGateway;

/// Document gateway persisting each collection to its own JSON file
#[derive(Debug)]
pub struct FileGateway {
    root: PathBuf,
    tables: Mutex<HashMap<String, Table>>,
}

impl FileGateway {
    /// Opens an existing database directory.
    ///
    /// A missing directory is a connection failure: the database has not
    /// been initialized.
    pub fn open(data_dir: &Path, database: &str) -> GatewayResult<Self> {
        let root = data_dir.join(database);
        if !root.is_dir() {
            return Err(GatewayError::connection(format!(
                "database directory {} does not exist",
                root.display()
            )));
        }
        Ok(Self {
            root,
            tables: Mutex::new(HashMap::new()),
        })
    }

    /// Creates the database directory if needed.
    pub fn create_database(data_dir: &Path, database: &str) -> GatewayResult<PathBuf> {
        let root = data_dir.join(database);
        fs::create_dir_all(&root)
            .map_err(|e| GatewayError::from_io("create database directory", e))?;
        Ok(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_path(&self, collection: &str) -> GatewayResult<PathBuf> {
        let valid = !collection.is_empty()
            && collection
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(GatewayError::backend(format!(
                "invalid collection name '{}'",
                collection
            )));
        }
        Ok(self.root.join(format!("{}.json", collection)))
    }

    fn guard(&self) -> GatewayResult<MutexGuard<'_, HashMap<String, Table>>> {
        self.tables
            .lock()
            .map_err(|e| GatewayError::backend(format!("store lock poisoned: {}", e)))
    }

    /// Returns the loaded table for a collection, reading it from disk on first use.
    fn table<'g>(
        &self,
        tables: &'g mut HashMap<String, Table>,
        collection: &str,
    ) -> GatewayResult<&'g mut Table> {
        if !tables.contains_key(collection) {
            let loaded = self.load(collection)?;
            tables.insert(collection.to_string(), loaded);
        }
        tables
            .get_mut(collection)
            .ok_or_else(|| GatewayError::backend(format!("collection '{}' not loaded", collection)))
    }

    fn load(&self, collection: &str) -> GatewayResult<Table> {
        let path = self.collection_path(collection)?;
        if !path.exists() {
            return Ok(Table::new());
        }
        let content =
            fs::read_to_string(&path).map_err(|e| GatewayError::from_io("read collection", e))?;
        let table: Table = serde_json::from_str(&content)?;
        debug!(collection, documents = table.len(), "loaded collection file");
        Ok(table)
    }

    fn persist(&self, collection: &str, table: &Table) -> GatewayResult<()> {
        let path = self.collection_path(collection)?;
        let tmp = path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(table)?;
        fs::write(&tmp, body).map_err(|e| GatewayError::from_io("write collection", e))?;
        fs::rename(&tmp, &path).map_err(|e| GatewayError::from_io("replace collection", e))?;
        Ok(())
    }
}

impl DocumentGateway for FileGateway {
    fn create(&self, collection: &str, doc: Document) -> GatewayResult<String> {
        let mut tables = self.guard()?;
        let table = self.table(&mut tables, collection)?;
        let id = store::insert(table, doc);
        if let Err(e) = self.persist(collection, table) {
            table.remove(&id);
            return Err(e);
        }
        Ok(id)
    }

    fn read(&self, collection: &str) -> GatewayResult<Vec<Document>> {
        let mut tables = self.guard()?;
        let table = self.table(&mut tables, collection)?;
        Ok(store::all(table))
    }

    fn read_one(&self, collection: &str, filter: &Filter) -> GatewayResult<Option<Document>> {
        let mut tables = self.guard()?;
        let table = self.table(&mut tables, collection)?;
        Ok(store::find_one(table, filter))
    }

    fn update(&self, collection: &str, filter: &Filter, fields: Document) -> GatewayResult<u64> {
        let mut tables = self.guard()?;
        let table = self.table(&mut tables, collection)?;
        let before = table.clone();
        let matched = store::update_one(table, filter, fields);
        if matched > 0 {
            if let Err(e) = self.persist(collection, table) {
                *table = before;
                return Err(e);
            }
        }
        Ok(matched)
    }

    fn delete(&self, collection: &str, filter: &Filter) -> GatewayResult<u64> {
        let mut tables = self.guard()?;
        let table = self.table(&mut tables, collection)?;
        let before = table.clone();
        let deleted = store::delete_one(table, filter);
        if deleted > 0 {
            if let Err(e) = self.persist(collection, table) {
                *table = before;
                return Err(e);
            }
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_open_requires_database_directory() {
        let tmp = TempDir::new().unwrap();
        let err = FileGateway::open(tmp.path(), "seDB").unwrap_err();
        assert!(matches!(err, GatewayError::Connection(_)));
    }

    #[test]
    fn test_documents_survive_reopen() {
        let tmp = TempDir::new().unwrap();
        FileGateway::create_database(tmp.path(), "seDB").unwrap();

        let id = {
            let gateway = FileGateway::open(tmp.path(), "seDB").unwrap();
            gateway.create("counties", doc(json!({"name": "Loudoun"}))).unwrap()
        };

        let gateway = FileGateway::open(tmp.path(), "seDB").unwrap();
        let records = gateway.read("counties").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["id"], json!(id));
        assert!(gateway.root().join("counties.json").exists());
    }

    #[test]
    fn test_delete_is_persisted() {
        let tmp = TempDir::new().unwrap();
        FileGateway::create_database(tmp.path(), "seDB").unwrap();

        let gateway = FileGateway::open(tmp.path(), "seDB").unwrap();
        let id = gateway.create("cities", doc(json!({"name": "Troy"}))).unwrap();
        assert_eq!(gateway.delete("cities", &Filter::by_id(&id)).unwrap(), 1);
        drop(gateway);

        let gateway = FileGateway::open(tmp.path(), "seDB").unwrap();
        assert!(gateway.read("cities").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_path_like_collection_names() {
        let tmp = TempDir::new().unwrap();
        FileGateway::create_database(tmp.path(), "seDB").unwrap();
        let gateway = FileGateway::open(tmp.path(), "seDB").unwrap();
        assert!(gateway.read("../escape").is_err());
    }
}
