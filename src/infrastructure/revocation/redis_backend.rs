//! Redis-backed revocation backend.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client, Script, aio::ConnectionManager};
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info};

use super::backend::RevocationBackend;
use crate::error::AppError;

/// Marker value stored under revocation keys.
const FLAG: &str = "1";

/// Connection attempts made before giving up at startup.
const CONNECT_RETRIES: usize = 3;

/// KEYS[1] = tracked set, ARGV[1] = flag key prefix, ARGV[2] = TTL in seconds.
///
/// Executes atomically: no client observes the set deleted while a member is unflagged.
static FLAG_AND_CLEAR_SET: LazyLock<Script> = LazyLock::new(|| {
    Script::new(
        r"
        local members = redis.call('SMEMBERS', KEYS[1])
        for _, member in ipairs(members) do
            redis.call('SET', ARGV[1] .. member, '1', 'EX', ARGV[2])
        end
        redis.call('DEL', KEYS[1])
        return members
        ",
    )
});

/// Revocation backend shared by every service instance.
///
/// Uses `ConnectionManager`, which reconnects on its own after connection loss.
/// Unlike the projection cache, failures here are returned to the caller.
#[derive(Clone)]
pub struct RedisRevocationBackend {
    client: ConnectionManager,
}

impl RedisRevocationBackend {
    /// Connects to Redis with a short exponential backoff (100ms, 200ms, 400ms) and validates the
    /// connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the URL is invalid or Redis stays unreachable.
    pub async fn connect(redis_url: &str) -> Result<Self, AppError> {
        info!("Connecting revocation backend to Redis");

        let client = Client::open(redis_url)?;

        let strategy = ExponentialBackoff::from_millis(2)
            .factor(50)
            .max_delay(Duration::from_secs(2))
            .map(jitter)
            .take(CONNECT_RETRIES);
        let manager = Retry::start(strategy, || ConnectionManager::new(client.clone())).await?;

        let mut test_conn = manager.clone();
        test_conn.ping::<()>().await?;

        info!("✓ Revocation backend connected");

        Ok(Self { client: manager })
    }
}

fn expire_seconds(ttl_seconds: u64) -> i64 {
    i64::try_from(ttl_seconds).unwrap_or(i64::MAX)
}

#[async_trait]
impl RevocationBackend for RedisRevocationBackend {
    async fn set_flag(&self, key: &str, ttl_seconds: u64) -> Result<(), AppError> {
        let mut conn = self.client.clone();
        conn.set_ex::<_, _, ()>(key, FLAG, ttl_seconds).await?;
        debug!("SET {} EX {}", key, ttl_seconds);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, AppError> {
        let mut conn = self.client.clone();
        Ok(conn.exists::<_, bool>(key).await?)
    }

    async fn add_to_set(
        &self,
        key: &str,
        member: &str,
        ttl_seconds: u64,
    ) -> Result<(), AppError> {
        let mut conn = self.client.clone();
        redis::pipe()
            .atomic()
            .sadd(key, member)
            .ignore()
            .expire(key, expire_seconds(ttl_seconds))
            .ignore()
            .query_async::<()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn remove_from_set(&self, key: &str, member: &str) -> Result<(), AppError> {
        let mut conn = self.client.clone();
        conn.srem::<_, _, ()>(key, member).await?;
        Ok(())
    }

    async fn flag_and_clear_set(
        &self,
        set_key: &str,
        flag_prefix: &str,
        ttl_seconds: u64,
    ) -> Result<Vec<String>, AppError> {
        let mut conn = self.client.clone();
        let members: Vec<String> = FLAG_AND_CLEAR_SET
            .key(set_key)
            .arg(flag_prefix)
            .arg(ttl_seconds)
            .invoke_async(&mut conn)
            .await?;
        debug!("EVALSHA flag_and_clear_set {} -> {} members", set_key, members.len());
        Ok(members)
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
