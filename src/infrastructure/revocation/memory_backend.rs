//! Process-local revocation backend.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use super::backend::RevocationBackend;
use crate::error::AppError;

#[derive(Default)]
struct State {
    flags: HashMap<String, Instant>,
    sets: HashMap<String, TrackedSet>,
}

struct TrackedSet {
    members: HashSet<String>,
    expires_at: Instant,
}

impl State {
    fn prune(&mut self, now: Instant) {
        self.flags.retain(|_, expires_at| *expires_at > now);
        self.sets.retain(|_, set| set.expires_at > now);
    }
}

/// Revocation backend kept in process memory.
///
/// Used when Redis is not configured and in tests. Revocations are not shared
/// between instances and do not survive a restart. Expiry follows the tokio clock,
/// so paused-time tests can advance past TTLs.
#[derive(Default)]
pub struct InMemoryRevocationBackend {
    state: RwLock<State>,
}

impl InMemoryRevocationBackend {
    pub fn new() -> Self {
        debug!("Using InMemoryRevocationBackend (revocations are process-local)");
        Self::default()
    }

    /// Number of live members in the set at `key`.
    pub async fn set_len(&self, key: &str) -> usize {
        let now = Instant::now();
        self.state
            .read()
            .await
            .sets
            .get(key)
            .filter(|set| set.expires_at > now)
            .map_or(0, |set| set.members.len())
    }
}

fn deadline(ttl_seconds: u64) -> Instant {
    Instant::now() + Duration::from_secs(ttl_seconds)
}

#[async_trait]
impl RevocationBackend for InMemoryRevocationBackend {
    async fn set_flag(&self, key: &str, ttl_seconds: u64) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        state.prune(Instant::now());
        state.flags.insert(key.to_string(), deadline(ttl_seconds));
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, AppError> {
        let now = Instant::now();
        Ok(self
            .state
            .read()
            .await
            .flags
            .get(key)
            .is_some_and(|expires_at| *expires_at > now))
    }

    async fn add_to_set(
        &self,
        key: &str,
        member: &str,
        ttl_seconds: u64,
    ) -> Result<(), AppError> {
        let expires_at = deadline(ttl_seconds);
        let mut state = self.state.write().await;
        state.prune(Instant::now());

        let set = state
            .sets
            .entry(key.to_string())
            .or_insert_with(|| TrackedSet {
                members: HashSet::new(),
                expires_at,
            });
        set.members.insert(member.to_string());
        set.expires_at = expires_at;
        Ok(())
    }

    async fn remove_from_set(&self, key: &str, member: &str) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        if let Some(set) = state.sets.get_mut(key) {
            set.members.remove(member);
            if set.members.is_empty() {
                state.sets.remove(key);
            }
        }
        Ok(())
    }

    async fn flag_and_clear_set(
        &self,
        set_key: &str,
        flag_prefix: &str,
        ttl_seconds: u64,
    ) -> Result<Vec<String>, AppError> {
        let now = Instant::now();
        let expires_at = deadline(ttl_seconds);
        let mut state = self.state.write().await;
        state.prune(now);

        let members: Vec<String> = state
            .sets
            .remove(set_key)
            .map(|set| set.members.into_iter().collect())
            .unwrap_or_default();
        for member in &members {
            state.flags.insert(format!("{flag_prefix}{member}"), expires_at);
        }
        Ok(members)
    }

    async fn health_check(&self) -> bool {
        true
    }
}
