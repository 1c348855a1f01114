use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use super::{hocr, RecognitionLevel, RecognitionOptions, RecognizedFragment, TextRecognizer};
use crate::error::ScanError;

/// Runs the `tesseract` binary on the image and reads back its hOCR output.
pub struct TesseractRecognizer {
    binary: String,
}

impl TesseractRecognizer {
    pub fn new(binary: impl Into<String>) -> Self {
        TesseractRecognizer {
            binary: binary.into(),
        }
    }

    /// `tesseract stdin stdout [options] hocr`
    fn args(options: &RecognitionOptions) -> Vec<String> {
        let mut args = vec!["stdin".to_string(), "stdout".to_string()];

        let mut langs: Vec<String> = Vec::new();
        for tag in &options.languages {
            let lang = tesseract_language(tag);
            if !langs.contains(&lang) {
                langs.push(lang);
            }
        }
        if !langs.is_empty() {
            args.push("-l".to_string());
            args.push(langs.join("+"));
        }

        // Fast skips page layout analysis and treats the image as one block.
        let psm = match options.level {
            RecognitionLevel::Fast => "6",
            RecognitionLevel::Accurate => "3",
        };
        args.push("--psm".to_string());
        args.push(psm.to_string());

        if !options.language_correction {
            for var in ["load_system_dawg=0", "load_freq_dawg=0"] {
                args.push("-c".to_string());
                args.push(var.to_string());
            }
        }

        args.push("hocr".to_string());
        args
    }
}

#[async_trait]
impl TextRecognizer for TesseractRecognizer {
    async fn recognize(
        &self,
        image: &[u8],
        options: &RecognitionOptions,
    ) -> Result<Vec<RecognizedFragment>, ScanError> {
        let args = Self::args(options);
        debug!(binary = %self.binary, ?args, "Spawning tesseract");

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ScanError::OcrUnavailable(format!("could not run {}: {}", self.binary, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(image)
                .await
                .map_err(|e| ScanError::OcrUnavailable(e.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ScanError::OcrUnavailable(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr.lines().last().unwrap_or("unknown error").trim().to_string();
            return Err(ScanError::OcrUnavailable(format!(
                "tesseract exited with {}: {}",
                output.status, reason
            )));
        }

        let xml = String::from_utf8_lossy(&output.stdout);
        hocr::parse_hocr(&xml)
            .map_err(|e| ScanError::OcrUnavailable(format!("unreadable hOCR output: {}", e)))
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}

/// Map a BCP-47 tag ("en-US") to a tesseract traineddata name ("eng").
/// Anything unrecognized is assumed to already be a tesseract name.
pub fn tesseract_language(tag: &str) -> String {
    let lower = tag.trim().to_lowercase();
    let mut parts = lower.split(['-', '_']);
    let primary = parts.next().unwrap_or_default();
    let rest: Vec<&str> = parts.collect();

    let code = match primary {
        "en" => "eng",
        "fr" => "fra",
        "de" => "deu",
        "es" => "spa",
        "it" => "ita",
        "pt" => "por",
        "nl" => "nld",
        "ru" => "rus",
        "ja" => "jpn",
        "ko" => "kor",
        "zh" if rest.iter().any(|p| matches!(*p, "hant" | "tw" | "hk")) => "chi_tra",
        "zh" => "chi_sim",
        _ => return tag.trim().to_string(),
    };
    code.to_string()
}
