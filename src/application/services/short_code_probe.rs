//! Bounded retry loop that picks a short code not yet used by the link store.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::entities::ShortCode;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::CodeGenerator;

/// Generates codes until the link store reports one as unused.
///
/// This only lowers the collision probability. Two writers can still pick the same
/// code concurrently; the store's unique constraint rejects the second insert.
pub struct ShortCodeProbe<L: LinkRepository + ?Sized, G: CodeGenerator> {
    repository: Arc<L>,
    generator: G,
    max_attempts: usize,
}

impl<L: LinkRepository + ?Sized, G: CodeGenerator> ShortCodeProbe<L, G> {
    pub fn new(repository: Arc<L>, generator: G, max_attempts: usize) -> Self {
        Self {
            repository,
            generator,
            max_attempts,
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Returns the first generated code the store does not know.
    ///
    /// Makes at most `max_attempts` calls to [`LinkRepository::exists_by_code`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::GenerationExhausted`] if every attempt collided.
    /// Generator and store errors propagate unchanged.
    pub async fn generate_unique_code(&self) -> Result<ShortCode, AppError> {
        for attempt in 1..=self.max_attempts {
            let candidate = self.generator.generate()?;

            if !self.repository.exists_by_code(candidate.as_str()).await? {
                return Ok(candidate);
            }

            debug!(attempt, code = %candidate, "short code collision");
        }

        warn!(
            attempts = self.max_attempts,
            "short code space looks crowded: every candidate collided"
        );
        metrics::counter!("short_code_generation_exhausted_total").increment(1);

        Err(AppError::GenerationExhausted {
            attempts: self.max_attempts,
        })
    }
}
