//! In-process projection cache backed by `moka`.

use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use tracing::{debug, trace};

use super::service::{LinkProjectionCache, ProjectionCacheConfig};
use crate::domain::entities::LinkProjection;

/// Bounded projection cache with least-recently-used eviction.
///
/// Entries expire after [`ProjectionCacheConfig::ttl`] without a read. The cache is
/// local to the process; other instances keep their own copies.
pub struct MokaProjectionCache {
    inner: Cache<String, LinkProjection>,
}

impl MokaProjectionCache {
    pub fn new(config: ProjectionCacheConfig) -> Self {
        debug!(
            "Link projection cache: {} entries, {:?} idle TTL",
            config.capacity, config.ttl
        );

        let inner = Cache::builder()
            .max_capacity(config.capacity)
            .time_to_idle(config.ttl)
            .eviction_policy(EvictionPolicy::lru())
            .build();

        Self { inner }
    }

    /// Approximate number of live entries.
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Applies pending evictions and expirations immediately.
    pub fn run_pending_tasks(&self) {
        self.inner.run_pending_tasks();
    }
}

impl Default for MokaProjectionCache {
    fn default() -> Self {
        Self::new(ProjectionCacheConfig::default())
    }
}

impl LinkProjectionCache for MokaProjectionCache {
    fn get(&self, code: &str) -> Option<LinkProjection> {
        let hit = self.inner.get(code);
        trace!(code, hit = hit.is_some(), "projection cache lookup");
        hit
    }

    fn set(&self, code: &str, projection: LinkProjection) {
        trace!(code, id = projection.id, "projection cache set");
        self.inner.insert(code.to_string(), projection);
    }

    fn delete(&self, code: &str) {
        trace!(code, "projection cache delete");
        self.inner.invalidate(code);
    }
}
