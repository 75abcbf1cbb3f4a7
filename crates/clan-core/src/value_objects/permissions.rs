//! Role permission bits
//!
//! The platform reports each role's permissions as a decimal string. Only the
//! bits the rename check needs are named; the rest are retained as-is.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Permissions: u64 {
        /// Grants every other bit
        const ADMINISTRATOR    = 1 << 3;
        const CHANGE_NICKNAME  = 1 << 26;
        /// Change other members' nicknames
        const MANAGE_NICKNAMES = 1 << 27;

        const _ = !0;
    }
}

impl Permissions {
    /// `contains`, with ADMINISTRATOR implying everything
    #[inline]
    pub fn has(self, permission: Permissions) -> bool {
        self.contains(Permissions::ADMINISTRATOR) || self.contains(permission)
    }

    /// Union over a member's roles
    pub fn combine(roles: impl IntoIterator<Item = Permissions>) -> Self {
        roles.into_iter().fold(Self::empty(), |acc, p| acc | p)
    }
}

impl Serialize for Permissions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.bits())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBits {
    Number(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = match RawBits::deserialize(deserializer)? {
            RawBits::Number(bits) => bits,
            RawBits::Text(s) => s
                .parse::<u64>()
                .map_err(|_| serde::de::Error::custom("invalid permission bits"))?,
        };
        Ok(Self::from_bits_retain(bits))
    }
}
