//! Token blacklisting backed by a shared key-value store.
//!
//! Access tokens are signed, not stored, so there is no server-side list of live
//! tokens. Every issued token is recorded in a per-user set whose TTL bounds its
//! growth; revoking "everything" for a user turns that set into blacklist entries.
//!
//! | Key | Value | TTL |
//! |---|---|---|
//! | `blacklist:<token>` | marker | remaining token lifetime |
//! | `user-tokens:<user_id>` | set of tokens | multiplier × access-token lifetime |

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};

use crate::error::AppError;
use crate::infrastructure::revocation::RevocationBackend;

/// Token lifetimes that size revocation records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevocationConfig {
    pub access_token_ttl_seconds: u64,
    pub tracked_token_ttl_multiplier: u64,
}

impl RevocationConfig {
    /// TTL applied to a user's tracked-token set on every track.
    pub fn tracked_set_ttl_seconds(&self) -> u64 {
        self.access_token_ttl_seconds
            .saturating_mul(self.tracked_token_ttl_multiplier)
    }
}

impl Default for RevocationConfig {
    fn default() -> Self {
        Self {
            access_token_ttl_seconds: 900,
            tracked_token_ttl_multiplier: 2,
        }
    }
}

const BLACKLIST_PREFIX: &str = "blacklist:";

pub fn blacklist_key(token: &str) -> String {
    format!("{BLACKLIST_PREFIX}{token}")
}

pub fn tracked_set_key(user_id: i64) -> String {
    format!("user-tokens:{user_id}")
}

/// Single-token and per-user token revocation.
pub struct TokenRevocationStore {
    backend: Arc<dyn RevocationBackend>,
    config: RevocationConfig,
}

impl TokenRevocationStore {
    pub fn new(backend: Arc<dyn RevocationBackend>, config: RevocationConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &RevocationConfig {
        &self.config
    }

    /// Blacklists `token` for `ttl_seconds`, its remaining lifetime.
    ///
    /// A zero TTL means the token has already expired, so nothing is written.
    ///
    /// # Errors
    ///
    /// Backend failures propagate.
    pub async fn add_token(&self, token: &str, ttl_seconds: u64) -> Result<(), AppError> {
        if ttl_seconds == 0 {
            debug!("token already expired, not blacklisting");
            return Ok(());
        }

        self.backend
            .set_flag(&blacklist_key(token), ttl_seconds)
            .await?;
        metrics::counter!("tokens_revoked_total").increment(1);
        Ok(())
    }

    /// Returns whether `token` has been revoked.
    ///
    /// # Errors
    ///
    /// Backend failures propagate; callers must not treat them as "not revoked".
    pub async fn is_blacklisted(&self, token: &str) -> Result<bool, AppError> {
        self.backend.exists(&blacklist_key(token)).await
    }

    /// Records `token` as issued to `user_id` and refreshes the set's TTL.
    ///
    /// # Errors
    ///
    /// Backend failures propagate.
    pub async fn track_user_token(&self, user_id: i64, token: &str) -> Result<(), AppError> {
        self.backend
            .add_to_set(
                &tracked_set_key(user_id),
                token,
                self.config.tracked_set_ttl_seconds(),
            )
            .await
    }

    /// Stops tracking `token` for `user_id`.
    ///
    /// # Errors
    ///
    /// Backend failures propagate.
    pub async fn remove_user_token(&self, user_id: i64, token: &str) -> Result<(), AppError> {
        self.backend
            .remove_from_set(&tracked_set_key(user_id), token)
            .await
    }

    /// Blacklists every token tracked for `user_id` and clears the tracked set.
    ///
    /// Returns how many tokens were revoked; `0` when nothing was tracked.
    ///
    /// Blacklisting the members and deleting the set happen in one atomic backend
    /// step. If that step fails nothing changes, every token stays tracked and a
    /// retry revokes them. A token tracked afterwards belongs to the next bulk revoke.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `ttl_seconds` is 0. Backend failures propagate.
    pub async fn add_user_tokens(&self, user_id: i64, ttl_seconds: u64) -> Result<usize, AppError> {
        if ttl_seconds == 0 {
            return Err(AppError::bad_request(
                "Revocation TTL must be greater than 0",
                json!({ "user_id": user_id }),
            ));
        }

        let revoked = self
            .backend
            .flag_and_clear_set(&tracked_set_key(user_id), BLACKLIST_PREFIX, ttl_seconds)
            .await?
            .len();
        if revoked == 0 {
            debug!(user_id, "no tracked tokens to revoke");
            return Ok(0);
        }

        metrics::counter!("tokens_revoked_total").increment(revoked as u64);
        info!(user_id, revoked, "revoked all tracked tokens");

        Ok(revoked)
    }
}
