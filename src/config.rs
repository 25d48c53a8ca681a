//! Application configuration
//!
//! Optional settings stored in TOML format. Everything has a sensible
//! default so the binary runs without any config file; CLI flags override
//! what the file provides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// OCR engine settings
    pub ocr: OcrConfig,
    /// Annotation settings
    pub annotate: AnnotateConfig,
    /// Debug output settings
    pub debug: DebugConfig,
}

/// OCR engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Tesseract language code
    pub language: String,
    /// Characters the engine is allowed to emit
    pub whitelist: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            whitelist: "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789".to_string(),
        }
    }
}

/// Annotation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotateConfig {
    /// TTF font used for plate-code labels; system fallbacks are tried
    /// when unset
    pub font: Option<PathBuf>,
}

/// Debug output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Directory for intermediate pipeline images; disabled when unset
    pub dump_dir: Option<PathBuf>,
}

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {path:?}"))?;
    let config: AppConfig =
        toml::from_str(&content).with_context(|| format!("invalid config file {path:?}"))?;
    Ok(config)
}
