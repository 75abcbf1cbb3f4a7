//! In-memory fakes for the port traits, shared by the service tests

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use clan_core::traits::{GroupLock, MembershipRepository, RepoResult, RosterSource};
use clan_core::{DomainError, Membership, Rank, RosterMember, Snowflake};

use crate::services::{LocalGroupLocks, ServiceContext, SyncSettings};

#[derive(Default)]
pub struct FakeMembershipRepo {
    rows: Mutex<BTreeMap<(String, Snowflake), Membership>>,
    failing_upserts: Mutex<HashSet<Snowflake>>,
}

impl FakeMembershipRepo {
    pub fn with_rows(rows: impl IntoIterator<Item = Membership>) -> Self {
        let repo = Self::default();
        {
            let mut stored = repo.rows.lock().unwrap();
            for row in rows {
                stored.insert((row.community_id.clone(), row.member_id), row);
            }
        }
        repo
    }

    pub fn fail_upserts_for(&self, member_id: Snowflake) {
        self.failing_upserts.lock().unwrap().insert(member_id);
    }

    /// Rows of one community, by member id
    pub fn rows(&self, community_id: &str) -> Vec<Membership> {
        self.rows
            .lock()
            .unwrap()
            .values()
            .filter(|row| row.community_id == community_id)
            .cloned()
            .collect()
    }

    pub fn ids(&self, community_id: &str) -> Vec<i64> {
        self.rows(community_id)
            .iter()
            .map(|row| row.member_id.into_inner())
            .collect()
    }
}

#[async_trait]
impl MembershipRepository for FakeMembershipRepo {
    async fn upsert(&self, membership: &Membership) -> RepoResult<()> {
        if self.failing_upserts.lock().unwrap().contains(&membership.member_id) {
            return Err(DomainError::DatabaseError("connection reset".to_string()));
        }
        self.rows.lock().unwrap().insert(
            (membership.community_id.clone(), membership.member_id),
            membership.clone(),
        );
        Ok(())
    }

    async fn delete_not_in(&self, community_id: &str, keep: &[Snowflake]) -> RepoResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|(community, member), _| community != community_id || keep.contains(member));
        Ok((before - rows.len()) as u64)
    }

    async fn update_rank(&self, community_id: &str, member_id: Snowflake, rank: Rank) -> RepoResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&(community_id.to_string(), member_id)) {
            Some(row) => {
                row.set_rank(rank);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn find(&self, community_id: &str, member_id: Snowflake) -> RepoResult<Option<Membership>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&(community_id.to_string(), member_id))
            .cloned())
    }

    async fn find_by_community(&self, community_id: &str) -> RepoResult<Vec<Membership>> {
        let mut rows = self.rows(community_id);
        rows.sort_by(|a, b| {
            a.rank
                .cmp(&b.rank)
                .then_with(|| a.effective_name().cmp(b.effective_name()))
                .then_with(|| a.member_id.cmp(&b.member_id))
        });
        Ok(rows)
    }
}

#[derive(Default)]
pub struct FakeRoster {
    rosters: Mutex<HashMap<Snowflake, Vec<RosterMember>>>,
    unavailable: Mutex<HashSet<Snowflake>>,
    delays: Mutex<HashMap<Snowflake, Duration>>,
    unmanageable: Mutex<HashSet<Snowflake>>,
    forbidden_writes: Mutex<HashSet<Snowflake>>,
    failing_writes: Mutex<HashSet<Snowflake>>,
    renames: Mutex<Vec<(Snowflake, Snowflake, String)>>,
}

impl FakeRoster {
    pub fn set_roster(&self, group_id: Snowflake, members: Vec<RosterMember>) {
        self.rosters.lock().unwrap().insert(group_id, members);
    }

    pub fn set_unavailable(&self, group_id: Snowflake) {
        self.unavailable.lock().unwrap().insert(group_id);
    }

    pub fn set_delay(&self, group_id: Snowflake, delay: Duration) {
        self.delays.lock().unwrap().insert(group_id, delay);
    }

    pub fn deny_manage(&self, member_id: Snowflake) {
        self.unmanageable.lock().unwrap().insert(member_id);
    }

    pub fn forbid_write(&self, member_id: Snowflake) {
        self.forbidden_writes.lock().unwrap().insert(member_id);
    }

    pub fn fail_write(&self, member_id: Snowflake) {
        self.failing_writes.lock().unwrap().insert(member_id);
    }

    /// `(group, member, new name)` for every successful write-back
    pub fn renames(&self) -> Vec<(Snowflake, Snowflake, String)> {
        self.renames.lock().unwrap().clone()
    }
}

#[async_trait]
impl RosterSource for FakeRoster {
    async fn list_members(&self, group_id: Snowflake) -> RepoResult<Vec<RosterMember>> {
        let delay = self.delays.lock().unwrap().get(&group_id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.unavailable.lock().unwrap().contains(&group_id) {
            return Err(DomainError::SourceUnavailable("platform returned 503".to_string()));
        }

        Ok(self
            .rosters
            .lock()
            .unwrap()
            .get(&group_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn can_manage(&self, _group_id: Snowflake, member_id: Snowflake) -> RepoResult<bool> {
        Ok(!self.unmanageable.lock().unwrap().contains(&member_id))
    }

    async fn set_profile_name(&self, group_id: Snowflake, member_id: Snowflake, name: &str) -> RepoResult<()> {
        if self.forbidden_writes.lock().unwrap().contains(&member_id) {
            return Err(DomainError::InsufficientPrivilege(member_id));
        }
        if self.failing_writes.lock().unwrap().contains(&member_id) {
            return Err(DomainError::SourceUnavailable("request timed out".to_string()));
        }
        self.renames
            .lock()
            .unwrap()
            .push((group_id, member_id, name.to_string()));
        Ok(())
    }
}

pub fn roster_member(id: i64, handle: &str, profile_name: Option<&str>, rank: Rank) -> RosterMember {
    RosterMember {
        member_id: Snowflake::new(id),
        handle: handle.to_string(),
        profile_name: profile_name.map(String::from),
        rank,
    }
}

pub fn test_settings() -> SyncSettings {
    SyncSettings {
        lock_wait: Duration::from_millis(100),
        ..SyncSettings::default()
    }
}

pub fn context(repo: &Arc<FakeMembershipRepo>, roster: &Arc<FakeRoster>) -> ServiceContext {
    context_with(repo, roster, Arc::new(LocalGroupLocks::default()), test_settings())
}

pub fn context_with(
    repo: &Arc<FakeMembershipRepo>,
    roster: &Arc<FakeRoster>,
    lock: Arc<dyn GroupLock>,
    settings: SyncSettings,
) -> ServiceContext {
    ServiceContext::new(repo.clone(), roster.clone(), lock, settings)
}

/// Poll until `community_id` can be locked again
///
/// The release after a cancelled sync runs on its own task.
pub async fn wait_for_free_lock(locks: &LocalGroupLocks, community_id: &str) -> bool {
    for _ in 0..50 {
        if locks.try_acquire(community_id).await.unwrap().is_some() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
