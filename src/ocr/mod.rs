//! Text recognition collaborators.
//!
//! A recognizer turns an image payload into unordered text fragments, each
//! tagged with a vertical position where higher means closer to the top of
//! the page. Reading order is reconstructed later by the parser.

pub mod fragments;
pub mod hocr;
pub mod tesseract;

use std::future::Future;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::ScanError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecognizedFragment {
    pub text: String,
    #[serde(alias = "verticalPosition", alias = "y")]
    pub vertical_position: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecognitionLevel {
    Fast,
    #[default]
    Accurate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionOptions {
    pub level: RecognitionLevel,
    /// BCP-47 style hints, e.g. "en-US".
    pub languages: Vec<String>,
    pub language_correction: bool,
}

impl Default for RecognitionOptions {
    fn default() -> Self {
        RecognitionOptions {
            level: RecognitionLevel::Accurate,
            languages: vec!["en-US".to_string()],
            language_correction: true,
        }
    }
}

#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(
        &self,
        image: &[u8],
        options: &RecognitionOptions,
    ) -> Result<Vec<RecognizedFragment>, ScanError>;

    fn name(&self) -> &str;
}

/// Issue a single recognition request, giving up when `cancel` resolves first.
/// A cancelled request produces no text, the same as an empty page.
pub async fn recognize_until<F>(
    recognizer: &dyn TextRecognizer,
    image: &[u8],
    options: &RecognitionOptions,
    cancel: F,
) -> Result<Vec<RecognizedFragment>, ScanError>
where
    F: Future<Output = ()>,
{
    info!(engine = recognizer.name(), bytes = image.len(), "Recognizing text");
    tokio::select! {
        result = recognizer.recognize(image, options) => {
            let fragments = result?;
            info!("Recognized {} fragments", fragments.len());
            Ok(fragments)
        }
        _ = cancel => {
            warn!("Recognition cancelled");
            Err(ScanError::NoTextFound)
        }
    }
}
