//! Value objects - immutable types that represent domain concepts

mod flag_policy;
mod name_parser;
mod permissions;
mod rank;
mod snowflake;

pub use flag_policy::{contains_flag_pair, sanitize_display_name, strip_flag_pairs, FLAG_PLACEHOLDER};
pub use name_parser::{parse_user, ParsedName, UNKNOWN_NAME};
pub use permissions::Permissions;
pub use rank::Rank;
pub use snowflake::{Snowflake, SnowflakeParseError};
