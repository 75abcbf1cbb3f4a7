//! Role hierarchy rules for renaming members
//!
//! The bot may change a member's nickname when it holds MANAGE_NICKNAMES
//! (or ADMINISTRATOR) and its highest role sits strictly above the member's.
//! Nobody can rename the group owner.

use clan_core::{Permissions, Snowflake};

use crate::models::ApiGuild;

/// Position of the highest role among `role_ids` (0 = @everyone only)
pub fn highest_position(guild: &ApiGuild, role_ids: &[Snowflake]) -> i32 {
    guild
        .roles
        .iter()
        .filter(|role| role_ids.contains(&role.id))
        .map(|role| role.position)
        .max()
        .unwrap_or(0)
}

/// Combined permissions, including the @everyone role (id == group id)
pub fn effective_permissions(guild: &ApiGuild, role_ids: &[Snowflake]) -> Permissions {
    Permissions::combine(
        guild
            .roles
            .iter()
            .filter(|role| role.id == guild.id || role_ids.contains(&role.id))
            .map(|role| role.permissions),
    )
}

/// Whether an actor with `actor_roles` may rename `target`
pub fn can_rename(
    guild: &ApiGuild,
    actor_id: Snowflake,
    actor_roles: &[Snowflake],
    target_id: Snowflake,
    target_roles: &[Snowflake],
) -> bool {
    if target_id == guild.owner_id {
        return false;
    }
    if actor_id == guild.owner_id {
        return true;
    }
    if !effective_permissions(guild, actor_roles).has(Permissions::MANAGE_NICKNAMES) {
        return false;
    }
    highest_position(guild, actor_roles) > highest_position(guild, target_roles)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOT: Snowflake = Snowflake::new(900);
    const OWNER: Snowflake = Snowflake::new(1);
    const TARGET: Snowflake = Snowflake::new(42);

    fn guild(everyone_perms: &str) -> ApiGuild {
        serde_json::from_value(serde_json::json!({
            "id": "100",
            "owner_id": "1",
            "roles": [
                { "id": "100", "name": "@everyone", "position": 0, "permissions": everyone_perms },
                { "id": "301", "name": "Bot", "position": 3, "permissions": "134217728" },
                { "id": "302", "name": "Leader", "position": 5, "permissions": "0" },
                { "id": "303", "name": "Elder", "position": 2, "permissions": "0" },
                { "id": "304", "name": "Admin", "position": 1, "permissions": "8" }
            ]
        }))
        .unwrap()
    }

    fn ids(raw: &[i64]) -> Vec<Snowflake> {
        raw.iter().copied().map(Snowflake::new).collect()
    }

    #[test]
    fn test_bot_above_target() {
        let g = guild("0");
        assert!(can_rename(&g, BOT, &ids(&[301]), TARGET, &ids(&[303])));
        assert!(can_rename(&g, BOT, &ids(&[301]), TARGET, &[]));
    }

    #[test]
    fn test_bot_below_or_equal_target() {
        let g = guild("0");
        assert!(!can_rename(&g, BOT, &ids(&[301]), TARGET, &ids(&[302])));
        assert!(!can_rename(&g, BOT, &ids(&[301]), TARGET, &ids(&[301])));
    }

    #[test]
    fn test_owner_rules() {
        let g = guild("0");
        assert!(!can_rename(&g, BOT, &ids(&[301]), OWNER, &[]));
        assert!(can_rename(&g, OWNER, &[], TARGET, &ids(&[302])));
    }

    #[test]
    fn test_permission_required() {
        let g = guild("0");
        // Elder role has no MANAGE_NICKNAMES
        assert!(!can_rename(&g, BOT, &ids(&[302]), TARGET, &ids(&[303])));
        // Administrator bypasses the permission but not the hierarchy
        assert!(can_rename(&g, BOT, &ids(&[304]), TARGET, &[]));
        assert!(!can_rename(&g, BOT, &ids(&[304]), TARGET, &ids(&[303])));
    }

    #[test]
    fn test_everyone_permissions_apply() {
        let g = guild("134217728");
        assert!(can_rename(&g, BOT, &ids(&[303]), TARGET, &[]));
    }
}
