//! Cache-aware decorator over any [`LinkRepository`].
//!
//! The projection cache is used as a short code → primary key index: a hit is
//! confirmed by re-reading the row by id, so the returned link always comes from the
//! store. Writes go through to the store first and then refresh the cache.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::LinkProjectionCache;

/// Link repository that consults the projection cache on short code lookups.
///
/// Store errors propagate unchanged; the cache itself never fails.
pub struct CachedLinkRepository<L: LinkRepository + ?Sized> {
    inner: Arc<L>,
    cache: Arc<dyn LinkProjectionCache>,
}

impl<L: LinkRepository + ?Sized> CachedLinkRepository<L> {
    pub fn new(inner: Arc<L>, cache: Arc<dyn LinkProjectionCache>) -> Self {
        Self { inner, cache }
    }

    fn remember(&self, link: &Link) {
        self.cache.set(&link.short_code, link.projection());
    }
}

#[async_trait]
impl<L: LinkRepository + ?Sized> LinkRepository for CachedLinkRepository<L> {
    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_short_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        if let Some(cached) = self.cache.get(code) {
            if let Some(link) = self.inner.find_by_id(cached.id).await? {
                metrics::counter!("link_cache_hits_total").increment(1);
                debug!(code, id = link.id, "link cache hit");
                return Ok(Some(link));
            }

            warn!(code, id = cached.id, "cached link id no longer exists");
            self.cache.delete(code);
        }

        metrics::counter!("link_cache_misses_total").increment(1);
        debug!(code, "link cache miss");

        let link = self.inner.find_by_short_code(code).await?;
        if let Some(link) = &link {
            self.remember(link);
        }

        Ok(link)
    }

    async fn exists_by_code(&self, code: &str) -> Result<bool, AppError> {
        self.inner.exists_by_code(code).await
    }

    async fn save(&self, new_link: NewLink) -> Result<Link, AppError> {
        let link = self.inner.save(new_link).await?;
        self.remember(&link);
        Ok(link)
    }

    async fn update(&self, link: Link) -> Result<Link, AppError> {
        let link = self.inner.update(link).await?;
        self.remember(&link);
        Ok(link)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        if let Some(link) = self.inner.find_by_id(id).await? {
            debug!(code = %link.short_code, id, "evicting deleted link");
            self.cache.delete(&link.short_code);
        }

        self.inner.delete(id).await
    }

    async fn list_by_user(
        &self,
        user_id: i64,
        page: i64,
        page_size: i64,
    ) -> Result<Vec<Link>, AppError> {
        self.inner.list_by_user(user_id, page, page_size).await
    }

    async fn count_by_user(&self, user_id: i64) -> Result<i64, AppError> {
        self.inner.count_by_user(user_id).await
    }

    async fn find_expired(&self, now: DateTime<Utc>, limit: i64) -> Result<Vec<Link>, AppError> {
        self.inner.find_expired(now, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::infrastructure::cache::{MokaProjectionCache, NullProjectionCache};
    use serde_json::json;

    fn create_test_link(id: i64, code: &str) -> Link {
        let now = Utc::now();
        Link {
            id,
            short_code: code.to_string(),
            original_url: format!("https://example.com/{code}"),
            user_id: None,
            is_active: true,
            expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn repo_with(
        mock: MockLinkRepository,
    ) -> (CachedLinkRepository<MockLinkRepository>, Arc<MokaProjectionCache>) {
        let cache = Arc::new(MokaProjectionCache::default());
        (CachedLinkRepository::new(Arc::new(mock), cache.clone()), cache)
    }

    #[tokio::test]
    async fn test_save_warms_cache() {
        let mut mock = MockLinkRepository::new();
        mock.expect_save()
            .times(1)
            .returning(|new_link| Ok(create_test_link(7, &new_link.short_code)));

        let (repo, cache) = repo_with(mock);
        repo.save(NewLink {
            short_code: "abc123".to_string(),
            original_url: "https://example.com/abc123".to_string(),
            user_id: None,
            expires_at: None,
        })
        .await
        .unwrap();

        let cached = cache.get("abc123").unwrap();
        assert_eq!(cached.id, 7);
        assert_eq!(cached.original_url, "https://example.com/abc123");
    }

    #[tokio::test]
    async fn test_hit_refetches_by_id() {
        let mut mock = MockLinkRepository::new();
        mock.expect_find_by_id()
            .withf(|id| *id == 7)
            .times(1)
            .returning(|id| Ok(Some(create_test_link(id, "abc123"))));
        mock.expect_find_by_short_code().times(0);

        let (repo, cache) = repo_with(mock);
        cache.set("abc123", create_test_link(7, "abc123").projection());

        let link = repo.find_by_short_code("abc123").await.unwrap().unwrap();

        assert_eq!(link.id, 7);
    }

    #[tokio::test]
    async fn test_miss_populates_cache() {
        let mut mock = MockLinkRepository::new();
        mock.expect_find_by_id().times(0);
        mock.expect_find_by_short_code()
            .times(1)
            .returning(|code| Ok(Some(create_test_link(3, code))));

        let (repo, cache) = repo_with(mock);

        let link = repo.find_by_short_code("xyz789").await.unwrap().unwrap();

        assert_eq!(link.id, 3);
        assert_eq!(cache.get("xyz789").unwrap().id, 3);
    }

    #[tokio::test]
    async fn test_unknown_code_is_not_cached() {
        let mut mock = MockLinkRepository::new();
        mock.expect_find_by_short_code()
            .times(1)
            .returning(|_| Ok(None));

        let (repo, cache) = repo_with(mock);

        assert!(repo.find_by_short_code("nope12").await.unwrap().is_none());
        assert!(cache.get("nope12").is_none());
    }

    #[tokio::test]
    async fn test_stale_id_falls_through_to_code_lookup() {
        let mut mock = MockLinkRepository::new();
        mock.expect_find_by_id()
            .withf(|id| *id == 1)
            .times(1)
            .returning(|_| Ok(None));
        mock.expect_find_by_short_code()
            .times(1)
            .returning(|code| Ok(Some(create_test_link(2, code))));

        let (repo, cache) = repo_with(mock);
        cache.set("abc123", create_test_link(1, "abc123").projection());

        let link = repo.find_by_short_code("abc123").await.unwrap().unwrap();

        assert_eq!(link.id, 2);
        assert_eq!(cache.get("abc123").unwrap().id, 2);
    }

    #[tokio::test]
    async fn test_stale_id_for_deleted_link_returns_none() {
        let mut mock = MockLinkRepository::new();
        mock.expect_find_by_id().returning(|_| Ok(None));
        mock.expect_find_by_short_code().returning(|_| Ok(None));

        let (repo, cache) = repo_with(mock);
        cache.set("gone12", create_test_link(1, "gone12").projection());

        assert!(repo.find_by_short_code("gone12").await.unwrap().is_none());
        assert!(cache.get("gone12").is_none());
    }

    #[tokio::test]
    async fn test_update_writes_through() {
        let mut mock = MockLinkRepository::new();
        mock.expect_update().times(1).returning(Ok);

        let (repo, cache) = repo_with(mock);
        cache.set("abc123", create_test_link(7, "abc123").projection());

        let mut link = create_test_link(7, "abc123");
        link.is_active = false;
        repo.update(link).await.unwrap();

        assert!(!cache.get("abc123").unwrap().is_active);
    }

    #[tokio::test]
    async fn test_delete_by_id_evicts_code() {
        let mut mock = MockLinkRepository::new();
        mock.expect_find_by_id()
            .withf(|id| *id == 7)
            .times(1)
            .returning(|id| Ok(Some(create_test_link(id, "abc123"))));
        mock.expect_delete()
            .withf(|id| *id == 7)
            .times(1)
            .returning(|_| Ok(true));

        let (repo, cache) = repo_with(mock);
        cache.set("abc123", create_test_link(7, "abc123").projection());

        assert!(repo.delete(7).await.unwrap());
        assert!(cache.get("abc123").is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_link_still_calls_store() {
        let mut mock = MockLinkRepository::new();
        mock.expect_find_by_id().times(1).returning(|_| Ok(None));
        mock.expect_delete().times(1).returning(|_| Ok(false));

        let (repo, _cache) = repo_with(mock);

        assert!(!repo.delete(99).await.unwrap());
    }

    #[tokio::test]
    async fn test_store_errors_propagate_and_leave_cache_alone() {
        let mut mock = MockLinkRepository::new();
        mock.expect_save()
            .times(1)
            .returning(|_| Err(AppError::conflict("Short code already exists", json!({}))));
        mock.expect_find_by_short_code()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let (repo, cache) = repo_with(mock);

        let save = repo
            .save(NewLink {
                short_code: "dup123".to_string(),
                original_url: "https://example.com".to_string(),
                user_id: None,
                expires_at: None,
            })
            .await;
        assert!(matches!(save.unwrap_err(), AppError::Conflict { .. }));
        assert!(cache.get("dup123").is_none());

        let lookup = repo.find_by_short_code("dup123").await;
        assert!(matches!(lookup.unwrap_err(), AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_pass_through_operations() {
        let mut mock = MockLinkRepository::new();
        mock.expect_exists_by_code()
            .times(1)
            .returning(|code| Ok(code == "taken1"));
        mock.expect_count_by_user()
            .withf(|user_id| *user_id == 42)
            .times(1)
            .returning(|_| Ok(3));
        mock.expect_list_by_user()
            .times(1)
            .returning(|_, _, _| Ok(vec![create_test_link(1, "abc123")]));
        mock.expect_find_expired()
            .withf(|_, limit| *limit == 50)
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let (repo, cache) = repo_with(mock);

        assert!(repo.exists_by_code("taken1").await.unwrap());
        assert_eq!(repo.count_by_user(42).await.unwrap(), 3);
        assert_eq!(repo.list_by_user(42, 1, 10).await.unwrap().len(), 1);
        assert!(repo.find_expired(Utc::now(), 50).await.unwrap().is_empty());
        assert!(cache.get("abc123").is_none());
    }

    #[tokio::test]
    async fn test_disabled_cache_always_reads_store() {
        let mut mock = MockLinkRepository::new();
        mock.expect_save()
            .returning(|new_link| Ok(create_test_link(1, &new_link.short_code)));
        mock.expect_find_by_id().times(0);
        mock.expect_find_by_short_code()
            .times(2)
            .returning(|code| Ok(Some(create_test_link(1, code))));

        let repo = CachedLinkRepository::new(Arc::new(mock), Arc::new(NullProjectionCache::new()));
        repo.save(NewLink {
            short_code: "abc123".to_string(),
            original_url: "https://example.com".to_string(),
            user_id: None,
            expires_at: None,
        })
        .await
        .unwrap();

        repo.find_by_short_code("abc123").await.unwrap();
        repo.find_by_short_code("abc123").await.unwrap();
    }
}
