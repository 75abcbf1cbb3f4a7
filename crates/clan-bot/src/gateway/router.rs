//! Turns dispatch events into profile changes for the watcher

use std::sync::Arc;

use clan_core::{sanitize_display_name, ProfileChangedEvent, Snowflake};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::GatewayResult;
use crate::events::{GatewayEventType, GuildCreateEvent, GuildDeleteEvent, GuildMemberEvent, GuildMemberRemoveEvent, ReadyEvent};
use crate::gateway::ProfileCache;

/// What a dispatch means for the connection loop
#[derive(Debug)]
pub enum Routed {
    /// Session established
    Ready(ReadyEvent),
    /// A member's name needs checking
    Profile(ProfileChangedEvent),
    Ignored,
}

#[derive(Debug)]
pub struct EventRouter {
    cache: Arc<ProfileCache>,
    bot_id: Snowflake,
}

impl EventRouter {
    pub fn new(cache: Arc<ProfileCache>, bot_id: Snowflake) -> Self {
        Self { cache, bot_id }
    }

    pub fn route(&self, event_name: &str, data: Value) -> GatewayResult<Routed> {
        let Some(event_type) = GatewayEventType::from_name(event_name) else {
            return Ok(Routed::Ignored);
        };

        match event_type {
            GatewayEventType::Ready => Ok(Routed::Ready(serde_json::from_value(data)?)),
            GatewayEventType::Resumed => {
                info!("Gateway session resumed");
                Ok(Routed::Ignored)
            }
            GatewayEventType::GuildCreate => {
                let event: GuildCreateEvent = serde_json::from_value(data)?;
                let warmed = self
                    .cache
                    .warm(event.id, event.members.iter().map(|member| member.to_profile()));
                debug!(group_id = %event.id, members = warmed, "Group available");
                Ok(Routed::Ignored)
            }
            GatewayEventType::GuildDelete => {
                let event: GuildDeleteEvent = serde_json::from_value(data)?;
                if !event.unavailable {
                    self.cache.evict_group(event.id);
                    info!(group_id = %event.id, "Removed from group");
                }
                Ok(Routed::Ignored)
            }
            GatewayEventType::GuildMemberAdd | GatewayEventType::GuildMemberUpdate => {
                let event: GuildMemberEvent = serde_json::from_value(data)?;
                Ok(self.profile_changed(event))
            }
            GatewayEventType::GuildMemberRemove => {
                let event: GuildMemberRemoveEvent = serde_json::from_value(data)?;
                self.cache.remove(event.guild_id, event.user.id);
                Ok(Routed::Ignored)
            }
        }
    }

    fn profile_changed(&self, event: GuildMemberEvent) -> Routed {
        // The bot's own nickname is left alone
        if event.member.user.id == self.bot_id {
            return Routed::Ignored;
        }

        let profile = event.member.to_profile();
        let previous = self.cache.upsert(event.guild_id, profile.clone());
        let change = ProfileChangedEvent::new(event.guild_id, previous, profile);

        // Checked on every update, so an earlier failed or refused rename is
        // retried the next time the member changes at all
        if sanitize_display_name(change.new_profile.effective_name()).is_none() {
            return Routed::Ignored;
        }
        debug!(member_id = %change.member_id, name_changed = change.name_changed(), "Flagged name seen");
        Routed::Profile(change)
    }
}
