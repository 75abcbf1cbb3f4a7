//! Wire types for the platform REST API and gateway
//!
//! Only the fields the bot reads are modelled; everything else is ignored.

use clan_core::{MemberProfile, Permissions, Rank, RosterMember, Snowflake};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Account as embedded in member objects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiUser {
    pub id: Snowflake,
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

/// Group member object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMember {
    pub user: ApiUser,
    #[serde(default)]
    pub nick: Option<String>,
    #[serde(default)]
    pub roles: Vec<Snowflake>,
}

/// Role object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiRole {
    pub id: Snowflake,
    pub name: String,
    pub position: i32,
    #[serde(default)]
    pub permissions: Permissions,
}

/// Group object (only the parts needed for hierarchy checks)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiGuild {
    pub id: Snowflake,
    pub owner_id: Snowflake,
    #[serde(default)]
    pub roles: Vec<ApiRole>,
}

/// Body of the nickname update request
#[derive(Debug, Clone, Serialize)]
pub struct ModifyNick<'a> {
    pub nick: &'a str,
}

/// Error body returned by the API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub retry_after: Option<f64>,
}

/// Role id -> rank, for roles whose name is a rank name
pub type RankRoles = HashMap<Snowflake, Rank>;

impl ApiGuild {
    /// Map the group's rank-named roles to ranks
    pub fn rank_roles(&self) -> RankRoles {
        self.roles
            .iter()
            .filter_map(|role| Rank::from_role_name(&role.name).map(|rank| (role.id, rank)))
            .collect()
    }
}

impl ApiMember {
    /// Highest rank among the member's roles; `Member` without a rank role
    pub fn rank(&self, rank_roles: &RankRoles) -> Rank {
        Rank::highest(self.roles.iter().filter_map(|id| rank_roles.get(id).copied()))
    }

    /// Account handle: the global display name when set, else the username
    pub fn handle(&self) -> &str {
        self.user
            .global_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.user.username)
    }

    pub fn to_roster_member(&self, rank_roles: &RankRoles) -> RosterMember {
        RosterMember {
            member_id: self.user.id,
            handle: self.handle().to_string(),
            profile_name: self.nick.clone(),
            rank: self.rank(rank_roles),
        }
    }

    pub fn to_profile(&self) -> MemberProfile {
        MemberProfile {
            member_id: self.user.id,
            handle: self.handle().to_string(),
            nickname: self.nick.clone(),
            role_ids: self.roles.clone(),
        }
    }
}
