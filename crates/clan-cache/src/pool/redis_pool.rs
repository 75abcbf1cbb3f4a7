//! deadpool-redis pool shared by the sync lease store and readiness checks.

use std::time::Duration;

use clan_common::RedisConfig;
use deadpool_redis::{Config, Pool, PoolConfig, Runtime, Timeouts};

/// Lease calls are issued while a sync request is waiting, so a pool
/// checkout must not hang longer than this.
const CHECKOUT_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, thiserror::Error)]
pub enum RedisPoolError {
    #[error("Failed to create Redis pool: {0}")]
    CreatePool(String),

    #[error("Redis unavailable: {0}")]
    GetConnection(#[from] deadpool_redis::PoolError),

    #[error("Redis command error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Unexpected PING reply: {0}")]
    UnexpectedReply(String),
}

pub type RedisResult<T> = Result<T, RedisPoolError>;

/// Cloneable handle to the pool
#[derive(Clone)]
pub struct RedisPool {
    pool: Pool,
}

impl std::fmt::Debug for RedisPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.pool.status();
        f.debug_struct("RedisPool")
            .field("size", &status.size)
            .field("available", &status.available)
            .finish()
    }
}

impl RedisPool {
    pub fn from_config(config: &RedisConfig) -> RedisResult<Self> {
        let mut cfg = Config::from_url(&config.url);
        let mut pool_config = PoolConfig::new(config.max_connections.max(1) as usize);
        pool_config.timeouts = Timeouts {
            wait: Some(CHECKOUT_TIMEOUT),
            create: Some(CHECKOUT_TIMEOUT),
            recycle: Some(CHECKOUT_TIMEOUT),
        };
        cfg.pool = Some(pool_config);

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| RedisPoolError::CreatePool(e.to_string()))?;

        tracing::info!(
            url = %redacted_url(&config.url),
            max_connections = config.max_connections,
            "Redis pool created"
        );
        Ok(Self { pool })
    }

    pub async fn get(&self) -> RedisResult<deadpool_redis::Connection> {
        Ok(self.pool.get().await?)
    }

    /// PING round trip, used by `/health/ready`
    pub async fn health_check(&self) -> RedisResult<()> {
        let mut conn = self.get().await?;
        let reply: String = redis::cmd("PING").query_async(&mut conn).await?;
        if reply == "PONG" {
            Ok(())
        } else {
            Err(RedisPoolError::UnexpectedReply(reply))
        }
    }
}

/// Host part of a Redis URL, without scheme credentials
fn redacted_url(url: &str) -> &str {
    url.rsplit_once('@').map_or(url, |(_, host)| host)
}
