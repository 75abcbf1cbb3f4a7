//! Display-name flag policy
//!
//! Country flags are encoded as a pair of regional indicator symbols
//! (U+1F1E6..=U+1F1FF). Members may not carry flags in their group
//! nickname; the watcher strips them and writes the result back.

/// Name written back when stripping leaves nothing
pub const FLAG_PLACEHOLDER: &str = "Member";

#[inline]
fn is_regional_indicator(c: char) -> bool {
    ('\u{1F1E6}'..='\u{1F1FF}').contains(&c)
}

/// True if the name contains two adjacent regional indicators
pub fn contains_flag_pair(name: &str) -> bool {
    let mut prev_indicator = false;
    for c in name.chars() {
        let indicator = is_regional_indicator(c);
        if indicator && prev_indicator {
            return true;
        }
        prev_indicator = indicator;
    }
    false
}

/// Remove every regional indicator pair, then trim.
///
/// Pairs are consumed left to right; a lone indicator is kept.
pub fn strip_flag_pairs(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();

    while let Some(c) = chars.next() {
        if is_regional_indicator(c) && chars.peek().copied().is_some_and(is_regional_indicator) {
            chars.next();
            continue;
        }
        out.push(c);
    }

    out.trim().to_string()
}

/// Name the member should carry under the policy.
///
/// Returns `None` when the name is already compliant.
pub fn sanitize_display_name(name: &str) -> Option<String> {
    if !contains_flag_pair(name) {
        return None;
    }

    let stripped = strip_flag_pairs(name);
    if stripped.is_empty() {
        Some(FLAG_PLACEHOLDER.to_string())
    } else {
        Some(stripped)
    }
}
