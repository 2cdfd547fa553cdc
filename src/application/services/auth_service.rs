//! Session revocation flows for access tokens.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::info;

use crate::application::services::TokenRevocationStore;
use crate::error::AppError;

/// Whole seconds until `expires_at`, rounded up so the blacklist entry never
/// expires before the token does. `0` once the token has expired.
fn remaining_ttl_seconds(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    u64::try_from((expires_at - now).num_milliseconds()).map_or(0, |millis| millis.div_ceil(1000))
}

/// Service for checking and revoking access tokens.
///
/// Tokens themselves are issued and verified elsewhere; this service only keeps
/// the bookkeeping needed to revoke them before they expire.
pub struct AuthService {
    revocation: Arc<TokenRevocationStore>,
}

impl AuthService {
    pub fn new(revocation: Arc<TokenRevocationStore>) -> Self {
        Self { revocation }
    }

    /// Records a freshly issued token so that [`Self::logout_everywhere`] can revoke it.
    ///
    /// # Errors
    ///
    /// Backend failures propagate.
    pub async fn register_issued_token(&self, user_id: i64, token: &str) -> Result<(), AppError> {
        self.revocation.track_user_token(user_id, token).await
    }

    /// Rejects revoked tokens.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token has been revoked.
    /// Returns [`AppError::Internal`] if the backend cannot be queried.
    pub async fn ensure_not_revoked(&self, token: &str) -> Result<(), AppError> {
        if self.revocation.is_blacklisted(token).await? {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Token has been revoked" }),
            ));
        }

        Ok(())
    }

    /// Revokes a single token for the rest of its lifetime and stops tracking it.
    ///
    /// A token that has already expired is only untracked.
    ///
    /// # Errors
    ///
    /// Backend failures propagate.
    pub async fn logout(
        &self,
        user_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let remaining = remaining_ttl_seconds(expires_at, Utc::now());

        self.revocation.add_token(token, remaining).await?;
        self.revocation.remove_user_token(user_id, token).await?;

        info!(user_id, "user logged out");
        Ok(())
    }

    /// Revokes every tracked token of `user_id`.
    ///
    /// Entries live for a full access-token lifetime, which outlasts any token
    /// issued before the call.
    ///
    /// # Errors
    ///
    /// Backend failures propagate.
    pub async fn logout_everywhere(&self, user_id: i64) -> Result<usize, AppError> {
        let ttl = self.revocation.config().access_token_ttl_seconds;
        self.revocation.add_user_tokens(user_id, ttl).await
    }
}
