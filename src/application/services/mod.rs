//! Business logic services for the application layer.

pub mod auth_service;
pub mod link_service;
pub mod short_code_probe;
pub mod token_revocation;

pub use auth_service::AuthService;
pub use link_service::{LinkPage, LinkService};
pub use short_code_probe::ShortCodeProbe;
pub use token_revocation::{RevocationConfig, TokenRevocationStore};
