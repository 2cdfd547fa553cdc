//! Link repository implementations.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - PostgreSQL link store
//! - [`CachedLinkRepository`] - Projection-cache decorator over any link store

pub mod cached_link_repository;
pub mod pg_link_repository;

pub use cached_link_repository::CachedLinkRepository;
pub use pg_link_repository::PgLinkRepository;
