//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A shortened URL as stored in the authoritative link store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Link {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    pub user_id: Option<i64>,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Link {
    /// Returns true if the link has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|e| Utc::now() >= e)
    }

    /// Returns true if the link may currently be redirected.
    pub fn is_redirectable(&self) -> bool {
        self.is_active && !self.is_expired()
    }

    /// Applies a partial update in place and bumps `updated_at`.
    pub fn apply(&mut self, patch: LinkPatch) {
        if let Some(url) = patch.original_url {
            self.original_url = url;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        if let Some(expires_at) = patch.expires_at {
            self.expires_at = expires_at;
        }
        self.updated_at = Utc::now();
    }

    /// Narrow view used by the projection cache.
    pub fn projection(&self) -> LinkProjection {
        LinkProjection {
            id: self.id,
            original_url: self.original_url.clone(),
            is_active: self.is_active,
            expires_at: self.expires_at,
        }
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLink {
    pub short_code: String,
    pub original_url: String,
    pub user_id: Option<i64>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Partial update for an existing link.
///
/// `None` fields are left unchanged.
/// `expires_at: Some(None)` clears the expiry; `Some(Some(t))` sets it.
#[derive(Debug, Clone, Default)]
pub struct LinkPatch {
    pub original_url: Option<String>,
    pub is_active: Option<bool>,
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

/// Cache payload: only what is needed to locate the row and decide on a redirect.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkProjection {
    pub id: i64,
    pub original_url: String,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_link() -> Link {
        let now = Utc::now();
        Link {
            id: 1,
            short_code: "abc123".to_string(),
            original_url: "https://example.com".to_string(),
            user_id: Some(42),
            is_active: true,
            expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_active_link_without_expiry_is_redirectable() {
        let link = sample_link();
        assert!(!link.is_expired());
        assert!(link.is_redirectable());
    }

    #[test]
    fn test_link_is_expired() {
        let mut link = sample_link();
        link.expires_at = Some(Utc::now() - Duration::seconds(1));
        assert!(link.is_expired());
        assert!(!link.is_redirectable());
    }

    #[test]
    fn test_inactive_link_is_not_redirectable() {
        let mut link = sample_link();
        link.is_active = false;
        assert!(!link.is_redirectable());
    }

    #[test]
    fn test_apply_patch() {
        let mut link = sample_link();
        let before = link.updated_at;
        let expiry = Utc::now() + Duration::hours(1);

        link.apply(LinkPatch {
            original_url: Some("https://rust-lang.org".to_string()),
            is_active: Some(false),
            expires_at: Some(Some(expiry)),
        });

        assert_eq!(link.original_url, "https://rust-lang.org");
        assert!(!link.is_active);
        assert_eq!(link.expires_at, Some(expiry));
        assert!(link.updated_at >= before);
    }

    #[test]
    fn test_apply_patch_clears_expiry() {
        let mut link = sample_link();
        link.expires_at = Some(Utc::now());

        link.apply(LinkPatch {
            expires_at: Some(None),
            ..Default::default()
        });

        assert!(link.expires_at.is_none());
        assert_eq!(link.original_url, "https://example.com");
    }

    #[test]
    fn test_projection_copies_redirect_fields() {
        let mut link = sample_link();
        link.expires_at = Some(Utc::now());

        let projection = link.projection();

        assert_eq!(projection.id, link.id);
        assert_eq!(projection.original_url, link.original_url);
        assert_eq!(projection.is_active, link.is_active);
        assert_eq!(projection.expires_at, link.expires_at);
    }
}
