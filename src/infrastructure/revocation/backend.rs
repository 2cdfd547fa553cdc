//! Key-value backend contract used by token revocation.

use async_trait::async_trait;

use crate::error::AppError;

/// Minimal key-value surface needed to revoke tokens.
///
/// Keys carry their own TTL. Sets are unordered string sets. Every method that
/// touches more than one key is atomic on the backend.
///
/// # Implementations
///
/// - [`crate::infrastructure::revocation::RedisRevocationBackend`] - Shared Redis backend
/// - [`crate::infrastructure::revocation::InMemoryRevocationBackend`] - Process-local backend
#[async_trait]
pub trait RevocationBackend: Send + Sync {
    /// Writes a marker key that expires after `ttl_seconds`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the backend is unreachable.
    async fn set_flag(&self, key: &str, ttl_seconds: u64) -> Result<(), AppError>;

    /// Returns whether `key` exists and has not expired.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the backend is unreachable.
    async fn exists(&self, key: &str) -> Result<bool, AppError>;

    /// Adds `member` to the set at `key` and resets the set's TTL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the backend is unreachable.
    async fn add_to_set(&self, key: &str, member: &str, ttl_seconds: u64)
    -> Result<(), AppError>;

    /// Removes `member` from the set at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the backend is unreachable.
    async fn remove_from_set(&self, key: &str, member: &str) -> Result<(), AppError>;

    /// Flags every member of the set at `set_key` and deletes the set, as one atomic step.
    ///
    /// Each member `m` gets a marker key `{flag_prefix}{m}` expiring after `ttl_seconds`.
    /// Returns the flagged members. On error nothing is written and the set is left
    /// as it was, so the call can be retried. Members added afterwards land in a
    /// fresh set.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the backend is unreachable.
    async fn flag_and_clear_set(
        &self,
        set_key: &str,
        flag_prefix: &str,
        ttl_seconds: u64,
    ) -> Result<Vec<String>, AppError>;

    /// Checks if the backend is reachable.
    async fn health_check(&self) -> bool;
}
