//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Contract of the authoritative link store.
///
/// The store must enforce uniqueness of `short_code`; that constraint, not the
/// uniqueness probe, is what ultimately prevents two links sharing a code.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::CachedLinkRepository`] - Cache-aware decorator
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Finds a link by primary key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError>;

    /// Finds a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_short_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Returns whether any link already uses `code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn exists_by_code(&self, code: &str) -> Result<bool, AppError>;

    /// Persists a new link and returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn save(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Writes every mutable field of `link` back to the store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no row has `link.id`.
    /// Returns [`AppError::Internal`] on database errors.
    async fn update(&self, link: Link) -> Result<Link, AppError>;

    /// Deletes a link by primary key.
    ///
    /// Returns `Ok(false)` when nothing was deleted; a missing link is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Lists a user's links, newest first.
    ///
    /// # Arguments
    ///
    /// - `page` - Page number (1-indexed)
    /// - `page_size` - Number of items per page
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_by_user(
        &self,
        user_id: i64,
        page: i64,
        page_size: i64,
    ) -> Result<Vec<Link>, AppError>;

    /// Counts a user's links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_by_user(&self, user_id: i64) -> Result<i64, AppError>;

    /// Returns up to `limit` links whose expiry is at or before `now`, active or not,
    /// oldest expiry first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_expired(&self, now: DateTime<Utc>, limit: i64) -> Result<Vec<Link>, AppError>;
}
