//! Per-group sync lease stored in Redis.
//!
//! `SET key token NX PX ttl` takes the lease; release runs a compare-and-delete
//! script so a holder whose lease already expired cannot drop someone else's.

use async_trait::async_trait;
use clan_core::error::DomainError;
use clan_core::traits::{GroupLock, LockToken, RepoResult};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::pool::{RedisPool, RedisPoolError};

/// Key prefix for sync leases
const SYNC_LOCK_PREFIX: &str = "sync_lock:";

const RELEASE_SCRIPT: &str = r"
if redis.call('GET', KEYS[1]) == ARGV[1] then
    return redis.call('DEL', KEYS[1])
else
    return 0
end
";

/// Redis-backed [`GroupLock`]
#[derive(Debug, Clone)]
pub struct SyncLockStore {
    pool: RedisPool,
    ttl: Duration,
}

impl SyncLockStore {
    /// `ttl` bounds how long a crashed holder can block a group
    pub fn new(pool: RedisPool, ttl: Duration) -> Self {
        Self { pool, ttl }
    }

    fn key(group_id: &str) -> String {
        format!("{SYNC_LOCK_PREFIX}{group_id}")
    }

    fn ttl_millis(&self) -> u64 {
        u64::try_from(self.ttl.as_millis()).unwrap_or(u64::MAX).max(1)
    }
}

fn cache_error(e: RedisPoolError) -> DomainError {
    DomainError::CacheError(e.to_string())
}

#[async_trait]
impl GroupLock for SyncLockStore {
    #[instrument(skip(self))]
    async fn try_acquire(&self, group_id: &str) -> RepoResult<Option<LockToken>> {
        let token = uuid::Uuid::new_v4().to_string();
        let mut conn = self.pool.get().await.map_err(cache_error)?;

        let reply: Option<String> = redis::cmd("SET")
            .arg(Self::key(group_id))
            .arg(&token)
            .arg("NX")
            .arg("PX")
            .arg(self.ttl_millis())
            .query_async(&mut conn)
            .await
            .map_err(|e| cache_error(e.into()))?;

        if reply.is_some() {
            debug!("Sync lock acquired");
            Ok(Some(LockToken(token)))
        } else {
            debug!("Sync lock held elsewhere");
            Ok(None)
        }
    }

    #[instrument(skip(self, token))]
    async fn release(&self, group_id: &str, token: &LockToken) -> RepoResult<()> {
        let mut conn = self.pool.get().await.map_err(cache_error)?;

        let deleted: i64 = redis::Script::new(RELEASE_SCRIPT)
            .key(Self::key(group_id))
            .arg(token.as_str())
            .invoke_async(&mut conn)
            .await
            .map_err(|e| cache_error(e.into()))?;

        if deleted == 0 {
            warn!("Sync lock expired before release");
        }
        Ok(())
    }
}
