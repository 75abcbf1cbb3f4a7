use async_trait::async_trait;

use crate::traits::RepoResult;

/// Proof of lock ownership, required to release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockToken(pub String);

impl LockToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Mutual exclusion for syncs of the same community group
#[async_trait]
pub trait GroupLock: Send + Sync {
    /// Try to take the lock without waiting
    ///
    /// Returns `None` when another holder owns it.
    async fn try_acquire(&self, group_id: &str) -> RepoResult<Option<LockToken>>;

    /// Release the lock if `token` still owns it
    async fn release(&self, group_id: &str, token: &LockToken) -> RepoResult<()>;
}
