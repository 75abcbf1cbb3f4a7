//! Profile change events - produced by the gateway, consumed by the name policy

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::MemberProfile;
use crate::value_objects::Snowflake;

/// A member's group profile changed (or the member just joined)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileChangedEvent {
    pub group_id: Snowflake,
    pub member_id: Snowflake,
    /// Last profile seen for this member, if any
    pub old_profile: Option<MemberProfile>,
    pub new_profile: MemberProfile,
    pub received_at: DateTime<Utc>,
}

impl ProfileChangedEvent {
    pub fn new(group_id: Snowflake, old_profile: Option<MemberProfile>, new_profile: MemberProfile) -> Self {
        Self {
            group_id,
            member_id: new_profile.member_id,
            old_profile,
            new_profile,
            received_at: Utc::now(),
        }
    }

    /// True if the effective name differs from the previous profile
    ///
    /// Joins (no previous profile) always count as a change.
    pub fn name_changed(&self) -> bool {
        self.old_profile
            .as_ref()
            .is_none_or(|old| old.effective_name() != self.new_profile.effective_name())
    }
}
