//! Projection cache used as a short code → primary key index.
//!
//! Provides a [`LinkProjectionCache`] trait with two implementations:
//! - [`MokaProjectionCache`] - Bounded in-process LRU cache
//! - [`NullProjectionCache`] - No-op implementation for disabled caching

mod moka_cache;
mod null_cache;
mod service;

use std::sync::Arc;

pub use moka_cache::MokaProjectionCache;
pub use null_cache::NullProjectionCache;
pub use service::{LinkProjectionCache, ProjectionCacheConfig};

/// Builds the cache selected by configuration; `None` disables caching.
pub fn build_projection_cache(config: Option<ProjectionCacheConfig>) -> Arc<dyn LinkProjectionCache> {
    match config {
        Some(config) => Arc::new(MokaProjectionCache::new(config)),
        None => Arc::new(NullProjectionCache::new()),
    }
}
