#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use url_shortener_core::domain::entities::{Link, NewLink, ShortCodeConfig};
use url_shortener_core::domain::repositories::LinkRepository;
use url_shortener_core::error::AppError;
use url_shortener_core::infrastructure::cache::{MokaProjectionCache, ProjectionCacheConfig};
use url_shortener_core::infrastructure::persistence::CachedLinkRepository;

/// Link store kept in memory, with per-operation call counters.
///
/// Enforces short code uniqueness the way the `links_short_code_key` constraint does.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: RwLock<HashMap<i64, Link>>,
    next_id: AtomicI64,
    pub find_by_id_calls: AtomicUsize,
    pub find_by_short_code_calls: AtomicUsize,
    pub exists_calls: AtomicUsize,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a link directly, bypassing any decorator.
    pub async fn seed(&self, code: &str, url: &str) -> Link {
        self.save(NewLink {
            short_code: code.to_string(),
            original_url: url.to_string(),
            user_id: None,
            expires_at: None,
        })
        .await
        .unwrap()
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.links.read().await.len()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        self.find_by_id_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.links.read().await.get(&id).cloned())
    }

    async fn find_by_short_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        self.find_by_short_code_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .links
            .read()
            .await
            .values()
            .find(|link| link.short_code == code)
            .cloned())
    }

    async fn exists_by_code(&self, code: &str) -> Result<bool, AppError> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .links
            .read()
            .await
            .values()
            .any(|link| link.short_code == code))
    }

    async fn save(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut links = self.links.write().await;

        if links.values().any(|link| link.short_code == new_link.short_code) {
            return Err(AppError::conflict(
                "Short code already exists",
                json!({ "constraint": "links_short_code_key" }),
            ));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        let link = Link {
            id,
            short_code: new_link.short_code,
            original_url: new_link.original_url,
            user_id: new_link.user_id,
            is_active: true,
            expires_at: new_link.expires_at,
            created_at: now,
            updated_at: now,
        };

        links.insert(id, link.clone());
        Ok(link)
    }

    async fn update(&self, link: Link) -> Result<Link, AppError> {
        let mut links = self.links.write().await;

        match links.get_mut(&link.id) {
            Some(stored) => {
                stored.original_url = link.original_url;
                stored.is_active = link.is_active;
                stored.expires_at = link.expires_at;
                stored.updated_at = Utc::now();
                Ok(stored.clone())
            }
            None => Err(AppError::not_found("Link not found", json!({ "id": link.id }))),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.links.write().await.remove(&id).is_some())
    }

    async fn list_by_user(
        &self,
        user_id: i64,
        page: i64,
        page_size: i64,
    ) -> Result<Vec<Link>, AppError> {
        let mut owned: Vec<Link> = self
            .links
            .read()
            .await
            .values()
            .filter(|link| link.user_id == Some(user_id))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(owned
            .into_iter()
            .skip((page - 1).saturating_mul(page_size) as usize)
            .take(page_size as usize)
            .collect())
    }

    async fn count_by_user(&self, user_id: i64) -> Result<i64, AppError> {
        Ok(self
            .links
            .read()
            .await
            .values()
            .filter(|link| link.user_id == Some(user_id))
            .count() as i64)
    }

    async fn find_expired(&self, now: DateTime<Utc>, limit: i64) -> Result<Vec<Link>, AppError> {
        let mut expired: Vec<Link> = self
            .links
            .read()
            .await
            .values()
            .filter(|link| link.expires_at.is_some_and(|e| e <= now))
            .cloned()
            .collect();
        expired.sort_by_key(|link| link.expires_at);
        expired.truncate(limit as usize);
        Ok(expired)
    }
}

/// An in-memory store behind a real projection cache.
pub struct CachedStore {
    pub store: Arc<InMemoryLinkRepository>,
    pub cache: Arc<MokaProjectionCache>,
    pub index: Arc<CachedLinkRepository<InMemoryLinkRepository>>,
}

pub fn cached_store() -> CachedStore {
    let store = Arc::new(InMemoryLinkRepository::new());
    let cache = Arc::new(MokaProjectionCache::new(ProjectionCacheConfig::default()));
    let index = Arc::new(CachedLinkRepository::new(store.clone(), cache.clone()));

    CachedStore {
        store,
        cache,
        index,
    }
}

pub fn short_code_config() -> ShortCodeConfig {
    ShortCodeConfig::default()
}
