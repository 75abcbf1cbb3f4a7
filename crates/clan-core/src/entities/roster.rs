//! Live roster views of a platform group

use serde::{Deserialize, Serialize};

use crate::value_objects::{Rank, Snowflake};

/// One member as currently present on the platform roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterMember {
    pub member_id: Snowflake,
    pub handle: String,
    /// Free-text group nickname; may follow the `Name [level]` convention
    pub profile_name: Option<String>,
    pub rank: Rank,
}

/// A member's group profile as carried by gateway events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberProfile {
    pub member_id: Snowflake,
    pub handle: String,
    pub nickname: Option<String>,
    #[serde(default)]
    pub role_ids: Vec<Snowflake>,
}

impl MemberProfile {
    /// Nickname if set, otherwise the account handle
    pub fn effective_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_effective_name() {
        let mut profile = MemberProfile {
            member_id: Snowflake::new(7),
            handle: "hen".to_string(),
            nickname: Some("Hen 🇫🇷".to_string()),
            role_ids: vec![],
        };
        assert_eq!(profile.effective_name(), "Hen 🇫🇷");

        profile.nickname = None;
        assert_eq!(profile.effective_name(), "hen");
    }
}
