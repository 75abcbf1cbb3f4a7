//! Sweep service
//!
//! Syncs every configured group with bounded parallelism under one overall
//! deadline. Each group runs as its own task, so a failing group never stops
//! the others. Groups still running at the deadline are aborted, which
//! releases their locks.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use clan_common::SyncGroup;
use clan_core::Snowflake;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, instrument, warn};

use super::context::ServiceContext;
use super::sync::{MemberFailure, SyncError, SyncOutcome, SyncService};

/// How one group fared in a sweep
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SweepStatus {
    Synced {
        count: usize,
        removed: u64,
    },
    Partial {
        count: usize,
        removed: u64,
        failed: Vec<MemberFailure>,
    },
    Failed {
        code: String,
        error: String,
    },
    /// Still running when the sweep deadline passed
    TimedOut,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupSweepResult {
    pub external_group_id: Snowflake,
    pub community_id: String,
    #[serde(flatten)]
    pub status: SweepStatus,
}

impl GroupSweepResult {
    fn from_sync(group: &SyncGroup, result: Result<SyncOutcome, SyncError>) -> Self {
        let status = match result {
            Ok(outcome) => SweepStatus::Synced {
                count: outcome.count,
                removed: outcome.removed,
            },
            Err(SyncError::Partial(outcome)) => SweepStatus::Partial {
                count: outcome.count,
                removed: outcome.removed,
                failed: outcome.failed,
            },
            Err(e) => {
                warn!(community_id = %group.internal_id, error = %e, "Group sync failed during sweep");
                SweepStatus::Failed {
                    code: e.error_code().to_string(),
                    error: e.to_string(),
                }
            }
        };

        Self {
            external_group_id: group.external_id,
            community_id: group.internal_id.clone(),
            status,
        }
    }

    /// No result came back: cut off by the deadline, or the task panicked
    fn unfinished(group: &SyncGroup, deadline_hit: bool) -> Self {
        let status = if deadline_hit {
            SweepStatus::TimedOut
        } else {
            SweepStatus::Failed {
                code: "INTERNAL_ERROR".to_string(),
                error: "sync task stopped without a result".to_string(),
            }
        };

        Self {
            external_group_id: group.external_id,
            community_id: group.internal_id.clone(),
            status,
        }
    }
}

/// Aggregate result of one sweep, groups in configuration order
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub deadline_hit: bool,
    pub groups: Vec<GroupSweepResult>,
}

impl SweepReport {
    fn count(&self, pred: impl Fn(&SweepStatus) -> bool) -> usize {
        self.groups.iter().filter(|g| pred(&g.status)).count()
    }

    pub fn synced(&self) -> usize {
        self.count(|s| matches!(s, SweepStatus::Synced { .. }))
    }

    /// Groups that did not sync cleanly
    pub fn degraded(&self) -> usize {
        self.groups.len() - self.synced()
    }
}

/// Sweep service
pub struct SweepService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SweepService<'a> {
    /// Create a new SweepService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Sweep every configured group
    pub async fn sweep(&self) -> SweepReport {
        self.sweep_groups(&self.ctx.settings().groups).await
    }

    #[instrument(skip_all, fields(groups = groups.len()))]
    pub async fn sweep_groups(&self, groups: &[SyncGroup]) -> SweepReport {
        let started_at = Utc::now();
        let settings = self.ctx.settings();
        let permits = Arc::new(Semaphore::new(settings.sweep_concurrency.max(1)));

        let mut tasks = JoinSet::new();
        for (index, group) in groups.iter().cloned().enumerate() {
            let ctx = self.ctx.clone();
            let permits = permits.clone();
            tasks.spawn(async move {
                let _permit = permits.acquire_owned().await;
                let result = SyncService::new(&ctx)
                    .sync_group(group.external_id, &group.internal_id)
                    .await;
                (index, GroupSweepResult::from_sync(&group, result))
            });
        }

        let mut slots: Vec<Option<GroupSweepResult>> = vec![None; groups.len()];
        let collect = async {
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((index, result)) => slots[index] = Some(result),
                    Err(e) => warn!(error = %e, "Group sync task failed"),
                }
            }
        };
        let deadline_hit = tokio::time::timeout(settings.sweep_deadline, collect).await.is_err();
        if deadline_hit {
            // Dropping the aborted syncs releases their group locks
            tasks.shutdown().await;
        }

        let groups: Vec<GroupSweepResult> = slots
            .into_iter()
            .zip(groups)
            .map(|(slot, group)| slot.unwrap_or_else(|| GroupSweepResult::unfinished(group, deadline_hit)))
            .collect();

        let report = SweepReport {
            started_at,
            finished_at: Utc::now(),
            deadline_hit,
            groups,
        };

        if deadline_hit {
            warn!(
                deadline_secs = settings.sweep_deadline.as_secs(),
                timed_out = report.count(|s| matches!(s, SweepStatus::TimedOut)),
                "Sweep deadline reached"
            );
        }
        info!(
            synced = report.synced(),
            degraded = report.degraded(),
            "Sweep finished"
        );

        report
    }
}
