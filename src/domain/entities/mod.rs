//! Core domain entities.
//!
//! - [`Link`] - A shortened URL mapping, with [`NewLink`] for inserts and [`LinkPatch`]
//!   for partial updates
//! - [`LinkProjection`] - The narrow view of a link kept in the projection cache
//! - [`ShortCode`] - A validated short code, shaped by [`ShortCodeConfig`]

pub mod link;
pub mod short_code;

pub use link::{Link, LinkPatch, LinkProjection, NewLink};
pub use short_code::{ALPHABET, ShortCode, ShortCodeConfig};
