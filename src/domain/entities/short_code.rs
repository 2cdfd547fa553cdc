//! Validated short code value type.

use std::fmt;

use serde_json::json;

use crate::error::AppError;

/// Alphabet every short code is drawn from.
pub const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Shape of generated and accepted short codes.
///
/// Passed explicitly to the generator and the uniqueness probe, so different
/// configurations can coexist in one process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortCodeConfig {
    /// Length of generated codes.
    pub length: usize,
    /// Longest code accepted by [`ShortCode::parse`].
    pub max_length: usize,
    /// Uniqueness probe bound.
    pub max_attempts: usize,
}

impl ShortCodeConfig {
    /// Upper bound for `max_length`, matching the `short_code` column width.
    pub const HARD_MAX_LENGTH: usize = 64;
}

impl Default for ShortCodeConfig {
    fn default() -> Self {
        Self {
            length: 6,
            max_length: 16,
            max_attempts: 10,
        }
    }
}

/// A short code: `1..=max_length` characters of `[A-Za-z0-9]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShortCode(String);

impl ShortCode {
    /// Validates `value` against the alphabet and `max_length`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] when the code is empty, longer than
    /// `max_length`, or contains characters outside `[A-Za-z0-9]`. Input is never truncated.
    pub fn parse(value: impl Into<String>, max_length: usize) -> Result<Self, AppError> {
        let value = value.into();

        if value.is_empty() {
            return Err(AppError::bad_request(
                "Short code must not be empty",
                json!({}),
            ));
        }

        if value.len() > max_length {
            return Err(AppError::bad_request(
                format!("Short code must be at most {max_length} characters"),
                json!({ "provided_length": value.len(), "max_length": max_length }),
            ));
        }

        if !value.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(AppError::bad_request(
                "Short code can only contain letters and digits",
                json!({ "code": value }),
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ShortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
