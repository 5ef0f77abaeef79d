//! Bounded retry of transient gateway failures
//!
//! Retries are immediate (no backoff). Connection and backend errors are
//! returned on the first attempt. After the last attempt the error is
//! propagated unchanged.

use tracing::warn;

use super::errors::GatewayResult;
use super::filter::{Document, Filter};
use super::DocumentGateway;

/// Default number of attempts per operation
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Gateway decorator retrying transient failures
#[derive(Debug)]
pub struct RetryingGateway<G> {
    inner: G,
    max_attempts: u32,
}

impl<G: DocumentGateway> RetryingGateway<G> {
    pub fn new(inner: G) -> Self {
        Self::with_attempts(inner, DEFAULT_MAX_ATTEMPTS)
    }

    /// `max_attempts` is clamped to at least one.
    pub fn with_attempts(inner: G, max_attempts: u32) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }

    fn with_retry<T>(
        &self,
        operation: &'static str,
        collection: &str,
        mut f: impl FnMut(&G) -> GatewayResult<T>,
    ) -> GatewayResult<T> {
        let mut attempt = 1;
        loop {
            match f(&self.inner) {
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    warn!(operation, collection, attempt, error = %e, "retrying gateway call");
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

impl<G: DocumentGateway> DocumentGateway for RetryingGateway<G> {
    fn create(&self, collection: &str, doc: Document) -> GatewayResult<String> {
        self.with_retry("create", collection, |g| g.create(collection, doc.clone()))
    }

    fn read(&self, collection: &str) -> GatewayResult<Vec<Document>> {
        self.with_retry("read", collection, |g| g.read(collection))
    }

    fn read_one(&self, collection: &str, filter: &Filter) -> GatewayResult<Option<Document>> {
        self.with_retry("read_one", collection, |g| g.read_one(collection, filter))
    }

    fn update(&self, collection: &str, filter: &Filter, fields: Document) -> GatewayResult<u64> {
        self.with_retry("update", collection, |g| {
            g.update(collection, filter, fields.clone())
        })
    }

    fn delete(&self, collection: &str, filter: &Filter) -> GatewayResult<u64> {
        self.with_retry("delete", collection, |g| g.delete(collection, filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayError, MemoryGateway};
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails the first `failures` reads with the given error.
    struct Flaky {
        inner: MemoryGateway,
        failures: u32,
        error: GatewayError,
        calls: AtomicU32,
    }

    impl Flaky {
        fn new(failures: u32, error: GatewayError) -> Self {
            Self {
                inner: MemoryGateway::new(),
                failures,
                error,
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl DocumentGateway for Flaky {
        fn create(&self, collection: &str, doc: Document) -> GatewayResult<String> {
            self.inner.create(collection, doc)
        }

        fn read(&self, collection: &str) -> GatewayResult<Vec<Document>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                return Err(self.error.clone());
            }
            self.inner.read(collection)
        }

        fn read_one(&self, collection: &str, filter: &Filter) -> GatewayResult<Option<Document>> {
            self.inner.read_one(collection, filter)
        }

        fn update(&self, collection: &str, filter: &Filter, fields: Document) -> GatewayResult<u64> {
            self.inner.update(collection, filter, fields)
        }

        fn delete(&self, collection: &str, filter: &Filter) -> GatewayResult<u64> {
            self.inner.delete(collection, filter)
        }
    }

    #[test]
    fn test_transient_failure_recovers_within_budget() {
        let gateway = RetryingGateway::new(Flaky::new(2, GatewayError::transient("reset")));
        assert!(gateway.read("states").is_ok());
        assert_eq!(gateway.inner().calls(), 3);
    }

    #[test]
    fn test_exhausted_budget_propagates_last_error() {
        let gateway = RetryingGateway::new(Flaky::new(5, GatewayError::transient("reset")));
        let err = gateway.read("states").unwrap_err();
        assert_eq!(err, GatewayError::transient("reset"));
        assert_eq!(gateway.inner().calls(), DEFAULT_MAX_ATTEMPTS);
    }

    #[test]
    fn test_connection_error_not_retried() {
        let gateway = RetryingGateway::new(Flaky::new(5, GatewayError::connection("down")));
        assert!(matches!(gateway.read("states"), Err(GatewayError::Connection(_))));
        assert_eq!(gateway.inner().calls(), 1);
    }

    #[test]
    fn test_attempts_clamped_to_one() {
        let gateway = RetryingGateway::with_attempts(MemoryGateway::new(), 0);
        assert_eq!(gateway.max_attempts(), 1);
    }
}
