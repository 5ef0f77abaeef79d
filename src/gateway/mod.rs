//! Database gateway
//!
//! All document database access goes through [`DocumentGateway`]. The
//! gateway owns identifier assignment and strips the database-internal
//! `_id` before records reach callers.
//!
//! Composition used by the server:
//!
//! ```text
//! RetryingGateway -> LazyGateway -> FileGateway | MemoryGateway
//! ```

mod errors;
mod file;
mod filter;
mod lazy;
mod memory;
mod retry;
mod store;

use std::sync::Arc;

pub use errors::{GatewayError, GatewayResult};
pub use file::FileGateway;
pub use filter::{Document, Filter};
pub use lazy::LazyGateway;
pub use memory::MemoryGateway;
pub use retry::{RetryingGateway, DEFAULT_MAX_ATTEMPTS};
pub use store::INTERNAL_ID_FIELD;

/// Operations against named collections of one logical database.
///
/// `update` and `delete` affect at most the first matching document and
/// return the number of documents matched.
pub trait DocumentGateway: Send + Sync {
    /// Inserts a document and returns its newly assigned id.
    fn create(&self, collection: &str, doc: Document) -> GatewayResult<String>;

    /// Returns every document in the collection, each carrying `id`.
    fn read(&self, collection: &str) -> GatewayResult<Vec<Document>>;

    /// Returns the first document matching `filter`.
    fn read_one(&self, collection: &str, filter: &Filter) -> GatewayResult<Option<Document>>;

    /// Merges `fields` into the first matching document.
    fn update(&self, collection: &str, filter: &Filter, fields: Document) -> GatewayResult<u64>;

    /// Deletes the first matching document.
    fn delete(&self, collection: &str, filter: &Filter) -> GatewayResult<u64>;
}

impl<G: DocumentGateway + ?Sized> DocumentGateway for Arc<G> {
    fn create(&self, collection: &str, doc: Document) -> GatewayResult<String> {
        (**self).create(collection, doc)
    }

    fn read(&self, collection: &str) -> GatewayResult<Vec<Document>> {
        (**self).read(collection)
    }

    fn read_one(&self, collection: &str, filter: &Filter) -> GatewayResult<Option<Document>> {
        (**self).read_one(collection, filter)
    }

    fn update(&self, collection: &str, filter: &Filter, fields: Document) -> GatewayResult<u64> {
        (**self).update(collection, filter, fields)
    }

    fn delete(&self, collection: &str, filter: &Filter) -> GatewayResult<u64> {
        (**self).delete(collection, filter)
    }
}
