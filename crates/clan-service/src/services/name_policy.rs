//! Name policy service
//!
//! Flag emoji are not allowed in group nicknames. Every profile change is
//! checked and offending names are rewritten on the platform.

use clan_core::{sanitize_display_name, DomainError, ProfileChangedEvent, Snowflake};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::context::ServiceContext;

/// Why a non-compliant name was left alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Role hierarchy or missing nickname permission
    NotPermitted,
}

/// What handling one event did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WatchOutcome {
    /// Name already compliant
    Clean,
    Renamed { from: String, to: String },
    Skipped { reason: SkipReason },
    Failed { error: String },
}

/// Name policy service
pub struct NamePolicyService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> NamePolicyService<'a> {
    /// Create a new NamePolicyService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Enforce the policy for one profile change
    ///
    /// Never returns an error; platform failures end up in
    /// [`WatchOutcome::Failed`] after being logged.
    #[instrument(skip_all, fields(group_id = %event.group_id, member_id = %event.member_id))]
    pub async fn handle_profile_change(&self, event: &ProfileChangedEvent) -> WatchOutcome {
        let current = event.new_profile.effective_name();
        let Some(sanitized) = sanitize_display_name(current) else {
            debug!("Name is compliant");
            return WatchOutcome::Clean;
        };

        match self.ctx.roster().can_manage(event.group_id, event.member_id).await {
            Ok(true) => {}
            Ok(false) | Err(DomainError::InsufficientPrivilege(_)) => return skipped(event.member_id),
            Err(e) => return failed(&e),
        }

        match self
            .ctx
            .roster()
            .set_profile_name(event.group_id, event.member_id, &sanitized)
            .await
        {
            Ok(()) => {
                info!(from = %current, to = %sanitized, "Stripped flags from nickname");
                WatchOutcome::Renamed {
                    from: current.to_string(),
                    to: sanitized,
                }
            }
            Err(DomainError::InsufficientPrivilege(_)) => skipped(event.member_id),
            Err(e) => failed(&e),
        }
    }
}

fn skipped(member_id: Snowflake) -> WatchOutcome {
    info!(member_id = %member_id, "Cannot rename member, skipping");
    WatchOutcome::Skipped {
        reason: SkipReason::NotPermitted,
    }
}

fn failed(err: &DomainError) -> WatchOutcome {
    warn!(error = %err, "Nickname write-back failed");
    WatchOutcome::Failed {
        error: err.to_string(),
    }
}
