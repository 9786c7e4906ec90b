mod file_config;

pub use file_config::{EncoderConfig, FileConfig};

use crate::backend::EncoderToolSpec;
use crate::batch::default_concurrency;
use anyhow::{bail, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Default per-item conversion limit.
pub const DEFAULT_ITEM_TIMEOUT_SECS: u64 = 120;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub source_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub manifest: Option<String>,
    pub concurrency: Option<usize>,
    pub item_timeout_secs: Option<u64>,
    pub fallback_only: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub manifest: Option<String>,
    pub concurrency: usize,
    /// `None` when the timeout is disabled with `0`.
    pub item_timeout: Option<Duration>,
    pub fallback_only: bool,
    /// Encoder tools in preference order; empty with `fallback_only`.
    pub encoders: Vec<EncoderToolSpec>,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let source_dir = file
            .source_dir
            .map(PathBuf::from)
            .or_else(|| cli.source_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));

        let output_dir = file
            .output_dir
            .map(PathBuf::from)
            .or_else(|| cli.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));

        let manifest = file.manifest.or_else(|| cli.manifest.clone());

        let concurrency = file
            .concurrency
            .or(cli.concurrency)
            .unwrap_or_else(default_concurrency)
            .max(1);

        let item_timeout_secs = file
            .item_timeout_secs
            .or(cli.item_timeout_secs)
            .unwrap_or(DEFAULT_ITEM_TIMEOUT_SECS);
        let item_timeout = (item_timeout_secs > 0).then(|| Duration::from_secs(item_timeout_secs));

        let fallback_only = file.fallback_only.unwrap_or(cli.fallback_only);

        let encoders = if fallback_only {
            Vec::new()
        } else {
            match file.encoders {
                Some(configs) => configs
                    .iter()
                    .map(parse_encoder)
                    .collect::<Result<Vec<_>>>()?,
                None => EncoderToolSpec::defaults(),
            }
        };

        Ok(Self {
            source_dir,
            output_dir,
            manifest,
            concurrency,
            item_timeout,
            fallback_only,
            encoders,
        })
    }
}

/// Turns an `[[encoders]]` table into a tool spec.
fn parse_encoder(config: &EncoderConfig) -> Result<EncoderToolSpec> {
    if config.id.trim().is_empty() {
        bail!("Encoder id must not be empty");
    }

    let Some(args) = shlex::split(&config.args) else {
        bail!("Encoder {}: unbalanced quotes in args: {}", config.id, config.args);
    };
    for placeholder in ["{input}", "{output}"] {
        if !args.iter().any(|a| a.contains(placeholder)) {
            bail!("Encoder {}: args must contain {}", config.id, placeholder);
        }
    }

    Ok(EncoderToolSpec {
        id: config.id.clone(),
        program: config.program.clone().unwrap_or_else(|| config.id.clone()),
        args,
        search_paths: config.search_paths.iter().map(PathBuf::from).collect(),
    })
}
