pub mod blocks;
pub mod candidate;
pub mod enumeration;
pub mod order;
pub mod title;

use tracing::{debug, info};

use crate::error::ScanError;
use crate::ocr::RecognizedFragment;
use candidate::JokeCandidate;

/// Fragments → ordered text → candidates.
pub fn process_fragments(fragments: &[RecognizedFragment]) -> Result<Vec<JokeCandidate>, ScanError> {
    let text = order::order_fragments(fragments);
    if text.trim().is_empty() {
        return Err(ScanError::NoTextFound);
    }
    debug!(fragments = fragments.len(), chars = text.len(), "Ordered fragments");
    process_text(&text)
}

/// Blocks → stripped blocks → (title, body) → candidates, from text that is
/// already in reading order.
pub fn process_text(text: &str) -> Result<Vec<JokeCandidate>, ScanError> {
    let candidates: Vec<JokeCandidate> = blocks::segment_blocks(text)
        .into_iter()
        .map(enumeration::strip_marker)
        .filter(|block| !blocks::is_noise(block))
        .map(|block| {
            let (title, body) = title::split_title(block);
            JokeCandidate::new(&title, &body)
        })
        .collect();

    if candidates.is_empty() {
        return Err(ScanError::NoTextFound);
    }
    info!("Built {} joke candidates", candidates.len());
    Ok(candidates)
}
