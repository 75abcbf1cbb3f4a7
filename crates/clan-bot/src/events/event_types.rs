//! Dispatch event names the bot reacts to

use serde::Deserialize;

/// Value of the `t` field of a Dispatch frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GatewayEventType {
    Ready,
    Resumed,
    /// Group became available, carries its member snapshot
    GuildCreate,
    GuildDelete,
    GuildMemberAdd,
    /// Nickname or roles changed
    GuildMemberUpdate,
    GuildMemberRemove,
}

impl GatewayEventType {
    /// `None` for events the bot ignores
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::deserialize(serde::de::value::StrDeserializer::<serde::de::value::Error>::new(name)).ok()
    }
}
