use std::sync::LazyLock;

use regex::Regex;

// "7.", "12)", optionally followed by whitespace.
static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+[.)]\s*").unwrap());

/// Remove a leading enumeration marker from a block. Blocks without one pass
/// through unchanged.
pub fn strip_marker(block: &str) -> &str {
    match MARKER_RE.find(block) {
        Some(m) => block[m.end()..].trim(),
        None => block,
    }
}
