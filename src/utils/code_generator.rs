//! Short code generation and validation utilities.
//!
//! Codes are drawn from [`ALPHABET`] one secure random byte at a time. Bytes at or
//! above [`MAX_VALID_BYTE`] are rejected so that `byte % 62` is uniform over the
//! alphabet instead of favouring its first symbols.

use std::sync::Arc;

use crate::domain::entities::{ALPHABET, ShortCode, ShortCodeConfig};
use crate::error::AppError;
use serde_json::json;

/// Largest multiple of the alphabet size that fits in a byte (248 for 62 symbols).
pub const MAX_VALID_BYTE: usize = 256 - (256 % ALPHABET.len());

/// Reserved codes that cannot be used as custom short links.
///
/// These collide with endpoints served next to the redirect route.
const RESERVED_CODES: &[&str] = &[
    "stats", "health", "admin", "api", "dashboard", "login", "logout", "register",
];

/// Source of random bytes.
pub trait ByteSource: Send + Sync {
    /// Returns the next random byte.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the underlying source is unavailable.
    fn next_byte(&self) -> Result<u8, AppError>;
}

/// Operating-system CSPRNG via `getrandom`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsByteSource;

impl ByteSource for OsByteSource {
    fn next_byte(&self) -> Result<u8, AppError> {
        let mut buffer = [0u8; 1];

        getrandom::fill(&mut buffer).map_err(|e| {
            AppError::internal(
                "Secure random source unavailable",
                json!({ "reason": e.to_string() }),
            )
        })?;

        Ok(buffer[0])
    }
}

/// Produces candidate short codes.
///
/// The uniqueness probe depends on this trait rather than on [`RandomCodeGenerator`]
/// so tests can script the exact sequence of candidates.
pub trait CodeGenerator: Send + Sync {
    /// Returns a fresh candidate code.
    ///
    /// # Errors
    ///
    /// Propagates random source failures.
    fn generate(&self) -> Result<ShortCode, AppError>;
}

impl<G: CodeGenerator + ?Sized> CodeGenerator for Arc<G> {
    fn generate(&self) -> Result<ShortCode, AppError> {
        (**self).generate()
    }
}

/// Unbiased alphanumeric code generator.
pub struct RandomCodeGenerator<S: ByteSource = OsByteSource> {
    source: S,
    config: ShortCodeConfig,
}

impl RandomCodeGenerator<OsByteSource> {
    /// Creates a generator backed by the operating-system RNG.
    pub fn new(config: ShortCodeConfig) -> Self {
        Self::with_source(OsByteSource, config)
    }
}

impl<S: ByteSource> RandomCodeGenerator<S> {
    pub fn with_source(source: S, config: ShortCodeConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &ShortCodeConfig {
        &self.config
    }

    /// Generates a code of exactly `length` characters.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `length` is 0 or exceeds `max_length`.
    /// Returns [`AppError::Internal`] if the byte source fails.
    pub fn generate_with_length(&self, length: usize) -> Result<ShortCode, AppError> {
        if length == 0 || length > self.config.max_length {
            return Err(AppError::bad_request(
                format!(
                    "Code length must be between 1 and {}",
                    self.config.max_length
                ),
                json!({ "requested_length": length }),
            ));
        }

        let mut code = String::with_capacity(length);

        while code.len() < length {
            let byte = usize::from(self.source.next_byte()?);
            if byte >= MAX_VALID_BYTE {
                continue;
            }
            code.push(char::from(ALPHABET[byte % ALPHABET.len()]));
        }

        ShortCode::parse(code, self.config.max_length)
    }
}

impl<S: ByteSource> CodeGenerator for RandomCodeGenerator<S> {
    fn generate(&self) -> Result<ShortCode, AppError> {
        self.generate_with_length(self.config.length)
    }
}

/// Validates a user-provided custom short code.
///
/// # Rules
///
/// - Same shape as generated codes: 1 to `max_length` letters and digits
/// - Cannot be a reserved system path (case-insensitive)
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str, max_length: usize) -> Result<ShortCode, AppError> {
    let code = ShortCode::parse(code, max_length)?;

    if RESERVED_CODES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(code.as_str()))
    {
        return Err(AppError::bad_request(
            "This code is reserved",
            json!({ "code": code.as_str() }),
        ));
    }

    Ok(code)
}
