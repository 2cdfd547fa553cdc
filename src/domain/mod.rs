//! Domain layer: entities and the repository contracts implemented by infrastructure.
//!
//! - [`entities`] - Links, projections and short codes
//! - [`repositories`] - Data access trait definitions
//!
//! The domain layer has no dependencies on infrastructure or application code.

pub mod entities;
pub mod repositories;
