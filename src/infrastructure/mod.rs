//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence, caching and token revocation.
//!
//! # Modules
//!
//! - [`cache`] - Projection cache (moka and no-op implementations)
//! - [`persistence`] - PostgreSQL repository and its cache-aware decorator
//! - [`revocation`] - Revocation backends (Redis and in-memory)

pub mod cache;
pub mod persistence;
pub mod revocation;
