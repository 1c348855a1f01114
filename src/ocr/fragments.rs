use async_trait::async_trait;

use super::{RecognitionOptions, RecognizedFragment, TextRecognizer};
use crate::error::ScanError;

/// Reads fragments that an external OCR engine already produced, serialized
/// as a JSON array of `{"text": ..., "vertical_position": ...}` objects.
/// Recognition options do not apply.
pub struct JsonFragments;

#[async_trait]
impl TextRecognizer for JsonFragments {
    async fn recognize(
        &self,
        image: &[u8],
        _options: &RecognitionOptions,
    ) -> Result<Vec<RecognizedFragment>, ScanError> {
        serde_json::from_slice(image)
            .map_err(|e| ScanError::OcrUnavailable(format!("invalid fragment file: {}", e)))
    }

    fn name(&self) -> &str {
        "fragments"
    }
}
