//! Membership database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the memberships table
#[derive(Debug, Clone, FromRow)]
pub struct MembershipModel {
    pub community_id: String,
    pub member_id: i64,
    pub display_name: Option<String>,
    pub handle: String,
    pub rank: String,
    pub updated_at: DateTime<Utc>,
}
