//! Dispatch event payloads
//!
//! Member objects reuse the REST wire types from `clan_platform::models`.

use clan_core::Snowflake;
use clan_platform::models::{ApiMember, ApiUser};
use serde::Deserialize;

/// READY
#[derive(Debug, Clone, Deserialize)]
pub struct ReadyEvent {
    pub session_id: String,
    /// Host to use when resuming this session
    #[serde(default)]
    pub resume_gateway_url: Option<String>,
    pub user: ApiUser,
}

/// GUILD_CREATE
#[derive(Debug, Clone, Deserialize)]
pub struct GuildCreateEvent {
    pub id: Snowflake,
    #[serde(default)]
    pub members: Vec<ApiMember>,
}

/// GUILD_DELETE
#[derive(Debug, Clone, Deserialize)]
pub struct GuildDeleteEvent {
    pub id: Snowflake,
    /// `true` for an outage, absent when the bot left the group
    #[serde(default)]
    pub unavailable: bool,
}

/// GUILD_MEMBER_ADD and GUILD_MEMBER_UPDATE
#[derive(Debug, Clone, Deserialize)]
pub struct GuildMemberEvent {
    pub guild_id: Snowflake,
    #[serde(flatten)]
    pub member: ApiMember,
}

/// GUILD_MEMBER_REMOVE
#[derive(Debug, Clone, Deserialize)]
pub struct GuildMemberRemoveEvent {
    pub guild_id: Snowflake,
    pub user: ApiUser,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_member_update_payload() {
        let event: GuildMemberEvent = serde_json::from_value(json!({
            "guild_id": "500",
            "user": { "id": "7", "username": "hen", "global_name": null },
            "nick": "Hen 🇫🇷",
            "roles": ["11", "12"],
            "joined_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(event.guild_id, Snowflake::new(500));
        assert_eq!(event.member.user.id, Snowflake::new(7));
        assert_eq!(event.member.nick.as_deref(), Some("Hen 🇫🇷"));
        assert_eq!(event.member.roles.len(), 2);
    }

    #[test]
    fn test_ready_payload() {
        let event: ReadyEvent = serde_json::from_value(json!({
            "v": 10,
            "session_id": "abc",
            "resume_gateway_url": "wss://resume.example",
            "user": { "id": "1", "username": "clan-bot", "bot": true },
            "guilds": []
        }))
        .unwrap();

        assert_eq!(event.session_id, "abc");
        assert!(event.user.bot);
    }

    #[test]
    fn test_guild_create_without_members() {
        let event: GuildCreateEvent = serde_json::from_value(json!({ "id": "9", "name": "Farm" })).unwrap();
        assert!(event.members.is_empty());
    }
}
