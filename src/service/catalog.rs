//! The set of collection services served by one process

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use crate::entity::{sample, EntityKind};
use crate::gateway::DocumentGateway;

use super::collection::CollectionService;
use super::errors::ServiceResult;

/// One service per entity kind, all sharing a gateway.
///
/// Built once at startup and injected into the HTTP layer; each service owns
/// its cache.
pub struct Catalog {
    services: Vec<CollectionService>,
}

impl Catalog {
    pub fn new(gateway: Arc<dyn DocumentGateway>) -> Self {
        let services = EntityKind::ALL
            .into_iter()
            .map(|kind| CollectionService::new(kind, Arc::clone(&gateway)))
            .collect();
        Self { services }
    }

    pub fn service(&self, kind: EntityKind) -> &CollectionService {
        // ALL order is construction order
        &self.services[kind as usize]
    }

    /// Looks up a service by collection name ("countries", ...)
    pub fn by_collection(&self, collection: &str) -> Option<&CollectionService> {
        EntityKind::from_collection(collection).map(|kind| self.service(kind))
    }

    pub fn services(&self) -> impl Iterator<Item = &CollectionService> {
        self.services.iter()
    }

    /// Record counts per collection. Populates every cache.
    pub fn stats(&self) -> ServiceResult<BTreeMap<&'static str, usize>> {
        let mut counts = BTreeMap::new();
        for svc in &self.services {
            counts.insert(svc.kind().collection(), svc.count()?);
        }
        Ok(counts)
    }

    /// Inserts the sample record into every empty collection.
    ///
    /// Returns the number of records created.
    pub fn seed_samples(&self) -> ServiceResult<usize> {
        let mut created = 0;
        for svc in &self.services {
            if svc.count()? == 0 {
                svc.create(&sample(svc.kind()))?;
                created += 1;
            }
        }
        info!(created, "seeded sample records");
        Ok(created)
    }

    /// Drops every cache back to the unpopulated state.
    pub fn clear_caches(&self) {
        for svc in &self.services {
            svc.cache().clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;

    #[test]
    fn test_service_lookup_matches_kind() {
        let catalog = Catalog::new(Arc::new(MemoryGateway::new()));
        for kind in EntityKind::ALL {
            assert_eq!(catalog.service(kind).kind(), kind);
            assert_eq!(catalog.by_collection(kind.collection()).unwrap().kind(), kind);
        }
        assert!(catalog.by_collection("planets").is_none());
    }

    #[test]
    fn test_seed_is_idempotent() {
        let catalog = Catalog::new(Arc::new(MemoryGateway::new()));
        assert_eq!(catalog.seed_samples().unwrap(), 4);
        assert_eq!(catalog.seed_samples().unwrap(), 0);

        let stats = catalog.stats().unwrap();
        assert_eq!(stats.len(), 4);
        assert!(stats.values().all(|&n| n == 1));
    }

    #[test]
    fn test_caches_share_one_gateway() {
        let gateway = Arc::new(MemoryGateway::new());
        let first = Catalog::new(gateway.clone());
        first.seed_samples().unwrap();

        let second = Catalog::new(gateway);
        assert_eq!(second.service(EntityKind::City).count().unwrap(), 1);
    }
}
