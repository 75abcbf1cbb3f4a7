//! Profile name parsing
//!
//! Clan members follow a loose naming convention on the platform, e.g.
//! `FarmerJoe [123] Elder`: the in-game name first, then the account level
//! in square brackets (or parentheses), then anything.

use serde::Serialize;

/// Name used when a profile has no name at all
pub const UNKNOWN_NAME: &str = "Unknown";

/// Result of [`parse_user`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedName {
    pub clean_name: String,
    pub level: Option<String>,
}

impl ParsedName {
    fn unknown() -> Self {
        Self {
            clean_name: UNKNOWN_NAME.to_string(),
            level: None,
        }
    }
}

/// Extract the canonical name and the level tag from a raw profile name.
///
/// `clean_name` and `level` are computed independently: the name is always
/// cut at the first `[`, whichever bracket group the level came from.
pub fn parse_user(raw: Option<&str>) -> ParsedName {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return ParsedName::unknown(),
    };

    let level = enclosed_digits(raw, '[', ']').or_else(|| enclosed_digits(raw, '(', ')'));

    let prefix = raw.split('[').next().unwrap_or(raw).trim();
    let clean_name = if prefix.is_empty() { raw } else { prefix };

    ParsedName {
        clean_name: clean_name.to_string(),
        level,
    }
}

/// First run of ASCII digits directly wrapped in `open`…`close`
fn enclosed_digits(raw: &str, open: char, close: char) -> Option<String> {
    raw.match_indices(open).find_map(|(start, _)| {
        let rest = &raw[start + open.len_utf8()..];
        let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let closed = rest[digits..].starts_with(close);
        (digits > 0 && closed).then(|| rest[..digits].to_string())
    })
}
