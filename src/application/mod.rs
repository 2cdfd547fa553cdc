//! Application layer services implementing business logic.
//!
//! Services consume repository and backend traits and expose the use cases the
//! redirect path and the session flows need.
//!
//! # Available Services
//!
//! - [`services::ShortCodeProbe`] - Picks a short code not yet in the link store
//! - [`services::TokenRevocationStore`] - Blacklist and per-user tracked tokens
//! - [`services::LinkService`] - Link creation, resolution and management
//! - [`services::AuthService`] - Logout and revocation checks

pub mod services;
