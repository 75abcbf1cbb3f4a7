//! Roster sync service
//!
//! Reconciles one platform group's live roster into one community's stored
//! memberships: joiners are created, existing members refreshed in place and
//! leavers removed.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use clan_core::traits::{GroupLock, LockToken};
use clan_core::{parse_user, DomainError, Membership, RosterMember, Snowflake};
use futures::future;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use super::context::ServiceContext;

const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Upserts in flight at once within one sync
const UPSERT_CONCURRENCY: usize = 8;

/// One member whose row could not be written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberFailure {
    pub member_id: Snowflake,
    pub error: String,
}

/// What one sync run did
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    pub community_id: String,
    /// Live members processed
    pub count: usize,
    pub upserted: usize,
    pub removed: u64,
    pub failed: Vec<MemberFailure>,
}

impl SyncOutcome {
    pub fn is_partial(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Sync errors
#[derive(Debug, Error)]
pub enum SyncError {
    /// The roster could not be fetched; nothing was written
    #[error("Roster source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Sync already running for community {0}")]
    Busy(String),

    /// Some member rows failed; the rest were written and leavers removed
    #[error("Partially synced {}: {} of {} members failed", .0.community_id, .0.failed.len(), .0.count)]
    Partial(SyncOutcome),

    /// Lock or store failure outside the per-member writes
    #[error(transparent)]
    Store(DomainError),
}

impl SyncError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::SourceUnavailable(_) => 502,
            Self::Busy(_) => 409,
            Self::Partial(_) => 207,
            Self::Store(e) => clan_common::domain_status_code(e),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SourceUnavailable(_) => "SOURCE_UNAVAILABLE",
            Self::Busy(_) => "SYNC_BUSY",
            Self::Partial(_) => "PARTIALLY_SYNCED",
            Self::Store(e) => e.code(),
        }
    }

    /// The run's outcome, when one was produced
    pub fn outcome(&self) -> Option<&SyncOutcome> {
        match self {
            Self::Partial(outcome) => Some(outcome),
            _ => None,
        }
    }
}

/// Sync service
pub struct SyncService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SyncService<'a> {
    /// Create a new SyncService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Mirror `external_group_id`'s roster into `community_id`
    ///
    /// Serialized per community through the group lock. Returns
    /// [`SyncError::Partial`] when any member row failed.
    #[instrument(skip(self))]
    pub async fn sync_group(&self, external_group_id: Snowflake, community_id: &str) -> Result<SyncOutcome, SyncError> {
        let guard = self.acquire_lock(community_id).await?;

        let result = self.reconcile(external_group_id, community_id).await;
        guard.release().await;

        let outcome = result?;
        if outcome.is_partial() {
            warn!(
                community_id = %community_id,
                count = outcome.count,
                failed = outcome.failed.len(),
                removed = outcome.removed,
                "Roster partially synced"
            );
            return Err(SyncError::Partial(outcome));
        }

        info!(
            community_id = %community_id,
            count = outcome.count,
            removed = outcome.removed,
            "Roster synced"
        );
        Ok(outcome)
    }

    /// Poll the group lock until it is free or the wait budget runs out
    async fn acquire_lock(&self, community_id: &str) -> Result<LockGuard, SyncError> {
        let deadline = Instant::now() + self.ctx.settings().lock_wait;

        loop {
            let acquired = self
                .ctx
                .group_lock()
                .try_acquire(community_id)
                .await
                .map_err(SyncError::Store)?;
            if let Some(token) = acquired {
                return Ok(LockGuard {
                    lock: self.ctx.shared_group_lock(),
                    community_id: community_id.to_string(),
                    token: Some(token),
                });
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(SyncError::Busy(community_id.to_string()));
            }
            debug!(community_id = %community_id, "Sync lock held, waiting");
            tokio::time::sleep(LOCK_POLL_INTERVAL.min(deadline - now)).await;
        }
    }

    async fn reconcile(&self, external_group_id: Snowflake, community_id: &str) -> Result<SyncOutcome, SyncError> {
        let roster = self
            .ctx
            .roster()
            .list_members(external_group_id)
            .await
            .map_err(|e| match e {
                DomainError::SourceUnavailable(msg) => SyncError::SourceUnavailable(msg),
                other => SyncError::SourceUnavailable(other.to_string()),
            })?;

        let memberships: Vec<Membership> = roster.iter().map(|member| to_membership(community_id, member)).collect();
        let shared_repo = self.ctx.shared_membership_repo();
        // Only owned captures: sweeps run this inside spawned tasks
        let failed: Vec<MemberFailure> = stream::iter(memberships)
            .map(move |membership| {
                let repo = shared_repo.clone();
                async move {
                    repo.upsert(&membership).await.map_err(|e| {
                        warn!(
                            community_id = %membership.community_id,
                            member_id = %membership.member_id,
                            error = %e,
                            "Membership upsert failed"
                        );
                        MemberFailure {
                            member_id: membership.member_id,
                            error: e.to_string(),
                        }
                    })
                }
            })
            .buffer_unordered(UPSERT_CONCURRENCY)
            .filter_map(|result| future::ready(result.err()))
            .collect()
            .await;

        // Built from the fetched roster, not from what was written
        let live_ids: Vec<Snowflake> = roster
            .iter()
            .map(|member| member.member_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let removed = self
            .ctx
            .membership_repo()
            .delete_not_in(community_id, &live_ids)
            .await
            .map_err(SyncError::Store)?;

        Ok(SyncOutcome {
            community_id: community_id.to_string(),
            count: roster.len(),
            upserted: roster.len() - failed.len(),
            removed,
            failed,
        })
    }
}

/// A held group lock
///
/// Released explicitly at the end of a sync. If the sync is cancelled first
/// the release is spawned from `drop` instead of waiting out the lease.
struct LockGuard {
    lock: Arc<dyn GroupLock>,
    community_id: String,
    token: Option<LockToken>,
}

impl LockGuard {
    async fn release(mut self) {
        if let Some(token) = self.token.take() {
            release_lock(self.lock.as_ref(), &self.community_id, &token).await;
        }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let Some(token) = self.token.take() else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(community_id = %self.community_id, "No runtime to release sync lock, leaving it to expire");
            return;
        };

        debug!(community_id = %self.community_id, "Sync cancelled, releasing lock");
        let lock = self.lock.clone();
        let community_id = std::mem::take(&mut self.community_id);
        runtime.spawn(async move {
            release_lock(lock.as_ref(), &community_id, &token).await;
        });
    }
}

async fn release_lock(lock: &dyn GroupLock, community_id: &str, token: &LockToken) {
    if let Err(e) = lock.release(community_id, token).await {
        warn!(community_id = %community_id, error = %e, "Failed to release sync lock");
    }
}

/// Stored row for one live roster entry
pub(crate) fn to_membership(community_id: &str, member: &RosterMember) -> Membership {
    Membership::new(
        community_id,
        member.member_id,
        Some(display_name_for(member)),
        member.handle.clone(),
        member.rank,
    )
}

/// Parsed profile name, or the handle when the profile has no usable name
fn display_name_for(member: &RosterMember) -> String {
    let Some(profile_name) = member.profile_name.as_deref().filter(|name| !name.trim().is_empty()) else {
        return member.handle.clone();
    };

    let parsed = parse_user(Some(profile_name));
    let name = parsed.clean_name.trim();
    if name.is_empty() {
        member.handle.clone()
    } else {
        name.to_string()
    }
}
