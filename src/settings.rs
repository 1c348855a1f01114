use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::ocr::{RecognitionLevel, RecognitionOptions};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub db_path: PathBuf,
    pub tesseract_bin: String,
    pub languages: Vec<String>,
    pub recognition_level: RecognitionLevel,
    pub language_correction: bool,
}

impl Settings {
    pub fn recognition_options(&self) -> RecognitionOptions {
        RecognitionOptions {
            level: self.recognition_level,
            languages: self.languages.clone(),
            language_correction: self.language_correction,
        }
    }
}

/// Defaults, then `jokescan.toml` if present, then `JOKESCAN_*` variables.
pub fn load() -> Result<Settings> {
    build(
        Environment::with_prefix("JOKESCAN")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("languages"),
    )
}

fn build(env: Environment) -> Result<Settings> {
    Config::builder()
        .set_default("db_path", "data/jokes.sqlite")?
        .set_default("tesseract_bin", "tesseract")?
        .set_default("languages", vec!["en-US"])?
        .set_default("recognition_level", "accurate")?
        .set_default("language_correction", true)?
        .add_source(File::with_name("jokescan").required(false))
        .add_source(env)
        .build()
        .context("Failed to load settings")?
        .try_deserialize()
        .context("Invalid settings")
}
