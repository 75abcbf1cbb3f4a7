//! Service context - dependency container for services
//!
//! Holds the membership store, the roster source, the group lock and the
//! sync tuning knobs.

use std::sync::Arc;
use std::time::Duration;

use clan_common::{SyncConfig, SyncGroup};
use clan_core::traits::{GroupLock, MembershipRepository, RosterSource};

use super::error::{ServiceError, ServiceResult};

/// Sync and sweep tuning, derived from [`SyncConfig`]
#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Groups covered by a sweep
    pub groups: Vec<SyncGroup>,
    /// Syncs running at once during a sweep
    pub sweep_concurrency: usize,
    /// Upper bound for a whole sweep
    pub sweep_deadline: Duration,
    /// How long a sync waits for a held group lock before giving up
    pub lock_wait: Duration,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            sweep_concurrency: 4,
            sweep_deadline: Duration::from_secs(300),
            lock_wait: Duration::from_secs(30),
        }
    }
}

impl From<&SyncConfig> for SyncSettings {
    fn from(config: &SyncConfig) -> Self {
        Self {
            groups: config.groups.clone(),
            sweep_concurrency: config.sweep_concurrency.max(1),
            sweep_deadline: config.sweep_deadline(),
            lock_wait: config.lock_wait(),
        }
    }
}

/// Service context containing all dependencies
///
/// Cheap to clone; every dependency sits behind an `Arc`.
#[derive(Clone)]
pub struct ServiceContext {
    membership_repo: Arc<dyn MembershipRepository>,
    roster: Arc<dyn RosterSource>,
    group_lock: Arc<dyn GroupLock>,
    settings: Arc<SyncSettings>,
}

impl ServiceContext {
    pub fn new(
        membership_repo: Arc<dyn MembershipRepository>,
        roster: Arc<dyn RosterSource>,
        group_lock: Arc<dyn GroupLock>,
        settings: SyncSettings,
    ) -> Self {
        Self {
            membership_repo,
            roster,
            group_lock,
            settings: Arc::new(settings),
        }
    }

    /// Get the membership repository
    pub fn membership_repo(&self) -> &dyn MembershipRepository {
        self.membership_repo.as_ref()
    }

    /// Get the platform roster source
    pub fn roster(&self) -> &dyn RosterSource {
        self.roster.as_ref()
    }

    /// Get the per-group sync lock
    pub fn group_lock(&self) -> &dyn GroupLock {
        self.group_lock.as_ref()
    }

    pub(crate) fn shared_membership_repo(&self) -> Arc<dyn MembershipRepository> {
        self.membership_repo.clone()
    }

    pub(crate) fn shared_group_lock(&self) -> Arc<dyn GroupLock> {
        self.group_lock.clone()
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("membership_repo", &"MembershipRepository")
            .field("roster", &"RosterSource")
            .field("group_lock", &"GroupLock")
            .field("settings", &self.settings)
            .finish()
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    membership_repo: Option<Arc<dyn MembershipRepository>>,
    roster: Option<Arc<dyn RosterSource>>,
    group_lock: Option<Arc<dyn GroupLock>>,
    settings: Option<SyncSettings>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn membership_repo(mut self, repo: Arc<dyn MembershipRepository>) -> Self {
        self.membership_repo = Some(repo);
        self
    }

    pub fn roster(mut self, roster: Arc<dyn RosterSource>) -> Self {
        self.roster = Some(roster);
        self
    }

    pub fn group_lock(mut self, lock: Arc<dyn GroupLock>) -> Self {
        self.group_lock = Some(lock);
        self
    }

    pub fn settings(mut self, settings: SyncSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Build the ServiceContext
    ///
    /// Settings fall back to [`SyncSettings::default`].
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.membership_repo
                .ok_or_else(|| ServiceError::validation("membership_repo is required"))?,
            self.roster
                .ok_or_else(|| ServiceError::validation("roster is required"))?,
            self.group_lock
                .ok_or_else(|| ServiceError::validation("group_lock is required"))?,
            self.settings.unwrap_or_default(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::LocalGroupLocks;
    use crate::testing::{FakeMembershipRepo, FakeRoster};

    #[test]
    fn test_builder_requires_dependencies() {
        let err = ServiceContextBuilder::new()
            .roster(Arc::new(FakeRoster::default()))
            .build()
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("membership_repo"));
    }

    #[test]
    fn test_builder_defaults_settings() {
        let ctx = ServiceContextBuilder::new()
            .membership_repo(Arc::new(FakeMembershipRepo::default()))
            .roster(Arc::new(FakeRoster::default()))
            .group_lock(Arc::new(LocalGroupLocks::default()))
            .build()
            .unwrap();

        assert_eq!(ctx.settings().sweep_concurrency, 4);
        assert!(ctx.settings().groups.is_empty());
    }

    #[test]
    fn test_settings_from_config_clamps_concurrency() {
        let config = SyncConfig {
            groups: vec![],
            interval_secs: 60,
            sweep_concurrency: 0,
            sweep_deadline_secs: 10,
            lock_ttl_secs: 5,
            lock_wait_secs: 2,
        };

        let settings = SyncSettings::from(&config);
        assert_eq!(settings.sweep_concurrency, 1);
        assert_eq!(settings.sweep_deadline, Duration::from_secs(10));
        assert_eq!(settings.lock_wait, Duration::from_secs(2));
    }
}
