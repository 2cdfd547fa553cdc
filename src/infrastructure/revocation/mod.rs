//! Storage behind token revocation.
//!
//! Provides a [`RevocationBackend`] trait with two implementations:
//! - [`RedisRevocationBackend`] - Shared Redis backend using `MULTI` transactions
//! - [`InMemoryRevocationBackend`] - Process-local fallback and test double

mod backend;
mod memory_backend;
mod redis_backend;

use std::sync::Arc;

pub use backend::RevocationBackend;
pub use memory_backend::InMemoryRevocationBackend;
pub use redis_backend::RedisRevocationBackend;

use crate::error::AppError;

/// Connects to Redis when a URL is configured, otherwise keeps revocations in-process.
///
/// # Errors
///
/// Returns the connection error when Redis is configured but unreachable; revocation
/// never silently degrades to a per-instance store.
pub async fn build_revocation_backend(
    redis_url: Option<&str>,
) -> Result<Arc<dyn RevocationBackend>, AppError> {
    match redis_url {
        Some(url) => Ok(Arc::new(RedisRevocationBackend::connect(url).await?)),
        None => {
            tracing::warn!("REDIS_URL not set: token revocations are local to this process");
            Ok(Arc::new(InMemoryRevocationBackend::new()))
        }
    }
}
