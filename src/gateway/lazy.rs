//! Lazily established gateway connection
//!
//! The backend is opened on the first operation and shared by every later
//! call. A failed connect is reported as-is and attempted again on the next
//! call.

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::info;

use super::errors::{GatewayError, GatewayResult};
use super::filter::{Document, Filter};
use super::DocumentGateway;

type Connector<G> = Box<dyn Fn() -> GatewayResult<G> + Send + Sync>;

/// Gateway that connects to its backend on first use
pub struct LazyGateway<G> {
    connect: Connector<G>,
    connection: Mutex<Option<Arc<G>>>,
}

impl<G: DocumentGateway> LazyGateway<G> {
    pub fn new(connect: impl Fn() -> GatewayResult<G> + Send + Sync + 'static) -> Self {
        Self {
            connect: Box::new(connect),
            connection: Mutex::new(None),
        }
    }

    /// Whether the backend has been established
    pub fn is_connected(&self) -> bool {
        self.connection
            .lock()
            .map(|conn| conn.is_some())
            .unwrap_or(false)
    }

    fn handle(&self) -> GatewayResult<Arc<G>> {
        let mut conn = self
            .connection
            .lock()
            .map_err(|e| GatewayError::backend(format!("connection lock poisoned: {}", e)))?;

        if let Some(existing) = conn.as_ref() {
            return Ok(Arc::clone(existing));
        }

        let established = Arc::new((self.connect)()?);
        info!("database connection established");
        *conn = Some(Arc::clone(&established));
        Ok(established)
    }
}

impl<G> fmt::Debug for LazyGateway<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let connected = self
            .connection
            .lock()
            .map(|conn| conn.is_some())
            .unwrap_or(false);
        f.debug_struct("LazyGateway")
            .field("connected", &connected)
            .finish()
    }
}

impl<G: DocumentGateway> DocumentGateway for LazyGateway<G> {
    fn create(&self, collection: &str, doc: Document) -> GatewayResult<String> {
        self.handle()?.create(collection, doc)
    }

    fn read(&self, collection: &str) -> GatewayResult<Vec<Document>> {
        self.handle()?.read(collection)
    }

    fn read_one(&self, collection: &str, filter: &Filter) -> GatewayResult<Option<Document>> {
        self.handle()?.read_one(collection, filter)
    }

    fn update(&self, collection: &str, filter: &Filter, fields: Document) -> GatewayResult<u64> {
        self.handle()?.update(collection, filter, fields)
    }

    fn delete(&self, collection: &str, filter: &Filter) -> GatewayResult<u64> {
        self.handle()?.delete(collection, filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_connects_once_on_first_use() {
        let connects = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&connects);
        let gateway = LazyGateway::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(MemoryGateway::new())
        });

        assert!(!gateway.is_connected());
        gateway.read("states").unwrap();
        gateway.read("cities").unwrap();
        assert!(gateway.is_connected());
        assert_eq!(connects.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_connect_failure_surfaces_and_is_not_cached() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&attempts);
        let gateway: LazyGateway<MemoryGateway> = LazyGateway::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(GatewayError::connection("no database"))
        });

        assert!(matches!(gateway.read("states"), Err(GatewayError::Connection(_))));
        assert!(matches!(gateway.read("states"), Err(GatewayError::Connection(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert!(!gateway.is_connected());
    }
}
