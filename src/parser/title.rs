/// A first line or first sentence must be shorter than this to become the title.
pub const MAX_TITLE_CHARS: usize = 100;
/// Length of the preview title used when no short line or sentence exists.
pub const PREVIEW_CHARS: usize = 50;
pub const ELLIPSIS: &str = "...";

const SENTENCE_DELIMITER: &str = ". ";

/// Derive a `(title, body)` pair from a block, first match wins:
///
/// 1. multi-line block with a short first line: that line is the title;
/// 2. short first sentence: that sentence is the title, the rest the body;
/// 3. otherwise a preview of the first characters is the title and the body
///    keeps the whole block.
pub fn split_title(block: &str) -> (String, String) {
    let mut lines = block.lines();
    let first_line = lines.next().unwrap_or_default();
    let rest: Vec<&str> = lines.collect();

    if !rest.is_empty() && first_line.chars().count() < MAX_TITLE_CHARS {
        return trimmed(first_line, &rest.join("\n"));
    }

    let mut sentences = block.split(SENTENCE_DELIMITER);
    let first_sentence = sentences.next().unwrap_or_default();
    if first_sentence.chars().count() < MAX_TITLE_CHARS {
        let rest: Vec<&str> = sentences.collect();
        return trimmed(first_sentence, &rest.join(SENTENCE_DELIMITER));
    }

    let preview: String = block.chars().take(PREVIEW_CHARS).collect();
    trimmed(&format!("{}{}", preview, ELLIPSIS), block)
}

fn trimmed(title: &str, body: &str) -> (String, String) {
    (title.trim().to_string(), body.trim().to_string())
}
