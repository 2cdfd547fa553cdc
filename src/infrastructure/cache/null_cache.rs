//! No-op projection cache for disabled caching.

use super::service::LinkProjectionCache;
use crate::domain::entities::LinkProjection;
use tracing::debug;

/// A projection cache that stores nothing.
///
/// Selected when `LINK_CACHE_CAPACITY=0`. Every lookup misses, so the cache-backed
/// index degrades to plain short-code queries against the store.
pub struct NullProjectionCache;

impl NullProjectionCache {
    /// Creates a new NullProjectionCache instance.
    pub fn new() -> Self {
        debug!("Using NullProjectionCache (caching disabled)");
        Self
    }
}

impl Default for NullProjectionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkProjectionCache for NullProjectionCache {
    fn get(&self, _code: &str) -> Option<LinkProjection> {
        None
    }

    fn set(&self, _code: &str, _projection: LinkProjection) {}

    fn delete(&self, _code: &str) {}
}
