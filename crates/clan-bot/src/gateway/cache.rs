//! Last known profile of every member the gateway has shown us
//!
//! Member update events only carry the new state; the cache supplies the
//! previous one.

use clan_core::{MemberProfile, Snowflake};
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct ProfileCache {
    profiles: DashMap<(Snowflake, Snowflake), MemberProfile>,
}

impl ProfileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `profile`, returning the one it replaces
    pub fn upsert(&self, group_id: Snowflake, profile: MemberProfile) -> Option<MemberProfile> {
        self.profiles.insert((group_id, profile.member_id), profile)
    }

    pub fn get(&self, group_id: Snowflake, member_id: Snowflake) -> Option<MemberProfile> {
        self.profiles.get(&(group_id, member_id)).map(|entry| entry.value().clone())
    }

    pub fn remove(&self, group_id: Snowflake, member_id: Snowflake) -> Option<MemberProfile> {
        self.profiles.remove(&(group_id, member_id)).map(|(_, profile)| profile)
    }

    /// Seed a group from its member snapshot
    pub fn warm(&self, group_id: Snowflake, profiles: impl IntoIterator<Item = MemberProfile>) -> usize {
        let mut count = 0;
        for profile in profiles {
            self.upsert(group_id, profile);
            count += 1;
        }
        count
    }

    /// Drop every profile of a group the bot left
    pub fn evict_group(&self, group_id: Snowflake) {
        self.profiles.retain(|(group, _), _| *group != group_id);
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
