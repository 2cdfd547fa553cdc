//! # URL Shortener Core
//!
//! The redirect hot path of a URL shortening service: short code generation,
//! a cache-backed link index over PostgreSQL, and Redis-backed token revocation.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Core entities and the link repository contract
//! - **Application Layer** ([`application`]) - Uniqueness probe, revocation store and services
//! - **Infrastructure Layer** ([`infrastructure`]) - PostgreSQL, projection cache and Redis
//!
//! HTTP handlers are not part of this crate; [`AppError::status`] and
//! [`AppError::body`] give adapters what they need to render errors.
//!
//! ## Wiring
//!
//! ```no_run
//! use std::sync::Arc;
//! use url_shortener_core::prelude::*;
//! use url_shortener_core::infrastructure::cache::build_projection_cache;
//! use url_shortener_core::infrastructure::revocation::build_revocation_backend;
//!
//! # async fn run(pool: sqlx::PgPool) -> Result<(), AppError> {
//! let config = Config::from_env().map_err(|e| AppError::internal(e.to_string(), serde_json::json!({})))?;
//!
//! let store = Arc::new(PgLinkRepository::new(Arc::new(pool)));
//! let cache = build_projection_cache(config.cache_config());
//! let links = LinkService::new(
//!     Arc::new(CachedLinkRepository::new(store, cache)),
//!     config.short_code_config(),
//! );
//!
//! let backend = build_revocation_backend(config.redis_url.as_deref()).await?;
//! let auth = AuthService::new(Arc::new(TokenRevocationStore::new(
//!     backend,
//!     config.revocation_config(),
//! )));
//!
//! let link = links.resolve("abc123").await?;
//! auth.ensure_not_revoked("token").await?;
//! # let _ = link;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod telemetry;
pub mod utils;

pub use error::AppError;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        AuthService, LinkPage, LinkService, RevocationConfig, ShortCodeProbe,
        TokenRevocationStore,
    };
    pub use crate::config::Config;
    pub use crate::domain::entities::{
        Link, LinkPatch, LinkProjection, NewLink, ShortCode, ShortCodeConfig,
    };
    pub use crate::domain::repositories::LinkRepository;
    pub use crate::error::AppError;
    pub use crate::infrastructure::cache::{
        LinkProjectionCache, MokaProjectionCache, NullProjectionCache, ProjectionCacheConfig,
    };
    pub use crate::infrastructure::persistence::{CachedLinkRepository, PgLinkRepository};
    pub use crate::infrastructure::revocation::{
        InMemoryRevocationBackend, RedisRevocationBackend, RevocationBackend,
    };
    pub use crate::utils::code_generator::{CodeGenerator, RandomCodeGenerator};
}
