//! Projection cache trait.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::LinkProjection;

/// Sizing of the in-process projection cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionCacheConfig {
    /// Maximum number of entries before least-recently-used eviction.
    pub capacity: u64,
    /// Idle lifetime; every read resets an entry's age.
    pub ttl: Duration,
}

impl Default for ProjectionCacheConfig {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            ttl: Duration::from_secs(300),
        }
    }
}

/// Short code → [`LinkProjection`] store.
///
/// Synchronous and infallible: no I/O happens here, a miss is `None`, never an error.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::MokaProjectionCache`] - Bounded LRU with idle TTL
/// - [`crate::infrastructure::cache::NullProjectionCache`] - No-op implementation for disabled caching
pub trait LinkProjectionCache: Send + Sync {
    /// Returns the projection cached under `code`, refreshing its recency.
    fn get(&self, code: &str) -> Option<LinkProjection>;

    /// Stores `projection` under `code`, replacing any previous entry.
    fn set(&self, code: &str, projection: LinkProjection);

    /// Removes the entry for `code`, if any.
    fn delete(&self, code: &str);
}

impl<C: LinkProjectionCache + ?Sized> LinkProjectionCache for Arc<C> {
    fn get(&self, code: &str) -> Option<LinkProjection> {
        (**self).get(code)
    }

    fn set(&self, code: &str, projection: LinkProjection) {
        (**self).set(code, projection)
    }

    fn delete(&self, code: &str) {
        (**self).delete(code)
    }
}
