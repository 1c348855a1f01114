use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

// Two or more line breaks; whitespace-only lines count as blank.
static PARAGRAPH_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\r?\n[ \t]*){2,}").unwrap());

/// Blocks at or under this many characters are page numbers, running
/// headers and other OCR debris.
pub const MAX_NOISE_CHARS: usize = 10;

pub fn is_noise(block: &str) -> bool {
    block.trim().chars().count() <= MAX_NOISE_CHARS
}

/// Split reading-ordered text into candidate joke blocks.
///
/// Paragraph breaks are the primary delimiter. Pages that list one joke per
/// line have no blank lines at all, so text without a single paragraph break,
/// or whose paragraphs are all noise, is re-split on single line breaks.
pub fn segment_blocks(text: &str) -> Vec<&str> {
    let paragraphs: Vec<&str> = if PARAGRAPH_BREAK_RE.is_match(text) {
        PARAGRAPH_BREAK_RE
            .split(text)
            .map(str::trim)
            .filter(|p| !is_noise(p))
            .collect()
    } else {
        Vec::new()
    };

    if !paragraphs.is_empty() {
        debug!(blocks = paragraphs.len(), "Segmented on paragraph breaks");
        return paragraphs;
    }

    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !is_noise(l)).collect();
    debug!(blocks = lines.len(), "No paragraph blocks survived, segmented on lines");
    lines
}
