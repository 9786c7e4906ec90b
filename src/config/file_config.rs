use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub source_dir: Option<String>,
    pub output_dir: Option<String>,
    pub manifest: Option<String>,
    pub concurrency: Option<usize>,
    pub item_timeout_secs: Option<u64>,
    pub fallback_only: Option<bool>,

    /// Replaces the default encoder tool list when present.
    pub encoders: Option<Vec<EncoderConfig>>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct EncoderConfig {
    pub id: String,
    /// Defaults to `id`.
    #[serde(default)]
    pub program: Option<String>,
    /// Shell-style argument template, e.g. `-i {input} -f mulaw {output}`.
    pub args: String,
    #[serde(default)]
    pub search_paths: Vec<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
