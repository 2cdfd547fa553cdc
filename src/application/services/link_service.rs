//! Link creation, resolution and management service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use url::Url;

use crate::application::services::ShortCodeProbe;
use crate::domain::entities::{Link, LinkPatch, NewLink, ShortCode, ShortCodeConfig};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{CodeGenerator, RandomCodeGenerator, validate_custom_code};

const MAX_PAGE_SIZE: i64 = 100;

/// One page of a user's links.
#[derive(Debug, Clone, Serialize)]
pub struct LinkPage {
    pub items: Vec<Link>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
}

/// Service for creating and resolving shortened links.
///
/// `L` is normally the cache-backed repository so that redirects hit the projection
/// cache and writes keep it warm.
pub struct LinkService<L: LinkRepository + ?Sized, G: CodeGenerator = RandomCodeGenerator> {
    repository: Arc<L>,
    probe: ShortCodeProbe<L, G>,
    config: ShortCodeConfig,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a service that generates codes from the operating-system RNG.
    pub fn new(repository: Arc<L>, config: ShortCodeConfig) -> Self {
        Self::with_generator(repository, RandomCodeGenerator::new(config), config)
    }
}

impl<L: LinkRepository + ?Sized, G: CodeGenerator> LinkService<L, G> {
    pub fn with_generator(repository: Arc<L>, generator: G, config: ShortCodeConfig) -> Self {
        let probe = ShortCodeProbe::new(repository.clone(), generator, config.max_attempts);
        Self {
            repository,
            probe,
            config,
        }
    }

    /// Creates a short link.
    ///
    /// # Arguments
    ///
    /// - `original_url` - Absolute `http` or `https` URL to redirect to
    /// - `user_id` - Owner, if any
    /// - `expires_at` - Optional expiry; must be in the future
    /// - `custom_code` - Optional custom short code (validated if provided)
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL, expiry or custom code is invalid.
    /// Returns [`AppError::Conflict`] if the custom code is taken, or if a generated code
    /// lost an insert race.
    /// Returns [`AppError::GenerationExhausted`] if no free code was found.
    pub async fn create_link(
        &self,
        original_url: String,
        user_id: Option<i64>,
        expires_at: Option<DateTime<Utc>>,
        custom_code: Option<String>,
    ) -> Result<Link, AppError> {
        let original_url = validate_url(&original_url)?;

        if let Some(expires_at) = expires_at
            && expires_at <= Utc::now()
        {
            return Err(AppError::bad_request(
                "Expiry must be in the future",
                json!({ "expires_at": expires_at }),
            ));
        }

        let code = match custom_code {
            Some(custom) => {
                let code = validate_custom_code(&custom, self.config.max_length)?;

                if self.repository.exists_by_code(code.as_str()).await? {
                    return Err(AppError::conflict(
                        "Custom code already exists",
                        json!({ "code": code.as_str() }),
                    ));
                }

                code
            }
            None => self.probe.generate_unique_code().await?,
        };

        let new_link = NewLink {
            short_code: code.into_inner(),
            original_url,
            user_id,
            expires_at,
        };

        self.repository.save(new_link).await
    }

    /// Resolves a short code to a link that may be redirected to.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a malformed code.
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::Gone`] if the link is disabled or expired.
    pub async fn resolve(&self, code: &str) -> Result<Link, AppError> {
        let code = ShortCode::parse(code, self.config.max_length)?;

        let link = self
            .repository
            .find_by_short_code(code.as_str())
            .await?
            .ok_or_else(|| {
                AppError::not_found("Short link not found", json!({ "code": code.as_str() }))
            })?;

        if !link.is_active {
            return Err(AppError::gone(
                "Short link is disabled",
                json!({ "code": code.as_str() }),
            ));
        }

        if link.is_expired() {
            return Err(AppError::gone(
                "Short link has expired",
                json!({ "code": code.as_str(), "expired_at": link.expires_at }),
            ));
        }

        Ok(link)
    }

    /// Applies a partial update to a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist.
    /// Returns [`AppError::Validation`] if a new URL is invalid.
    pub async fn update_link(&self, id: i64, mut patch: LinkPatch) -> Result<Link, AppError> {
        if let Some(url) = patch.original_url.take() {
            patch.original_url = Some(validate_url(&url)?);
        }

        let mut link = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))?;

        link.apply(patch);
        self.repository.update(link).await
    }

    /// Deletes a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist.
    pub async fn delete_link(&self, id: i64) -> Result<(), AppError> {
        if self.repository.delete(id).await? {
            Ok(())
        } else {
            Err(AppError::not_found("Link not found", json!({ "id": id })))
        }
    }

    /// Lists a user's links, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `page` is below 1 or `page_size` is outside
    /// `1..=100`.
    pub async fn list_links(
        &self,
        user_id: i64,
        page: i64,
        page_size: i64,
    ) -> Result<LinkPage, AppError> {
        let in_range = page >= 1
            && (1..=MAX_PAGE_SIZE).contains(&page_size)
            && (page - 1).checked_mul(page_size).is_some();
        if !in_range {
            return Err(AppError::bad_request(
                "Invalid pagination parameters",
                json!({ "page": page, "page_size": page_size, "max_page_size": MAX_PAGE_SIZE }),
            ));
        }

        let items = self
            .repository
            .list_by_user(user_id, page, page_size)
            .await?;
        let total = self.repository.count_by_user(user_id).await?;

        Ok(LinkPage {
            items,
            page,
            page_size,
            total,
        })
    }
}

/// Parses and normalises a redirect target.
fn validate_url(raw: &str) -> Result<String, AppError> {
    let parsed = Url::parse(raw.trim()).map_err(|e| {
        AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::bad_request(
            "Only http and https URLs can be shortened",
            json!({ "scheme": parsed.scheme() }),
        ));
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(AppError::bad_request(
            "URL must have a host",
            json!({ "url": raw }),
        ));
    }

    Ok(parsed.to_string())
}
