//! In-process group lock
//!
//! Used when no Redis is configured. Leases expire like the Redis ones, so a
//! sync cancelled mid-flight cannot wedge its group.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use clan_core::traits::{GroupLock, LockToken, RepoResult};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

const DEFAULT_TTL: Duration = Duration::from_secs(120);

#[derive(Debug)]
struct Lease {
    token: LockToken,
    expires_at: Instant,
}

/// Lease table keyed by community group id
#[derive(Debug)]
pub struct LocalGroupLocks {
    leases: DashMap<String, Lease>,
    ttl: Duration,
}

impl LocalGroupLocks {
    pub fn new(ttl: Duration) -> Self {
        Self {
            leases: DashMap::new(),
            ttl,
        }
    }
}

impl Default for LocalGroupLocks {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[async_trait]
impl GroupLock for LocalGroupLocks {
    async fn try_acquire(&self, group_id: &str) -> RepoResult<Option<LockToken>> {
        let now = Instant::now();
        let lease = Lease {
            token: LockToken(Uuid::new_v4().to_string()),
            expires_at: now + self.ttl,
        };
        let token = lease.token.clone();

        match self.leases.entry(group_id.to_string()) {
            Entry::Occupied(mut held) => {
                if held.get().expires_at > now {
                    return Ok(None);
                }
                held.insert(lease);
            }
            Entry::Vacant(slot) => {
                slot.insert(lease);
            }
        }

        Ok(Some(token))
    }

    async fn release(&self, group_id: &str, token: &LockToken) -> RepoResult<()> {
        self.leases.remove_if(group_id, |_, lease| lease.token == *token);
        Ok(())
    }
}
