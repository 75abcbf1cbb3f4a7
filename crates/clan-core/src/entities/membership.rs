//! Membership entity - one person's persisted standing in one community group

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{Rank, Snowflake};

/// Persisted membership row, unique on `(community_id, member_id)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    /// Internal community identifier (not the platform group id)
    pub community_id: String,
    pub member_id: Snowflake,
    pub display_name: Option<String>,
    pub handle: String,
    pub rank: Rank,
    pub updated_at: DateTime<Utc>,
}

impl Membership {
    /// Create a membership stamped with the current time
    pub fn new(
        community_id: impl Into<String>,
        member_id: Snowflake,
        display_name: Option<String>,
        handle: impl Into<String>,
        rank: Rank,
    ) -> Self {
        Self {
            community_id: community_id.into(),
            member_id,
            display_name,
            handle: handle.into(),
            rank,
            updated_at: Utc::now(),
        }
    }

    /// Name to show for this member (display name if set, otherwise handle)
    pub fn effective_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.handle)
    }

    /// Set the rank and bump `updated_at`
    pub fn set_rank(&mut self, rank: Rank) {
        self.rank = rank;
        self.updated_at = Utc::now();
    }
}
