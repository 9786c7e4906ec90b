use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use ulaw_prompts::backend::{build_tools, BackendSelector};
use ulaw_prompts::batch::{self, BatchOptions, BatchOrchestrator};
use ulaw_prompts::config::{AppConfig, CliConfig, FileConfig};

/// Exit status for errors that prevent a run from starting.
const EXIT_FATAL: u8 = 2;

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(version, about = "Convert audio prompts to 8 kHz mono mu-law")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert every entry of a manifest and print a JSON report.
    Convert(ConvertArgs),
    /// Build a manifest from a directory of recordings.
    Scan(ScanArgs),
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Manifest file path, or the manifest itself as inline JSON.
    #[clap(long)]
    pub manifest: Option<String>,

    /// Directory that manifest sources are relative to.
    #[clap(long, value_parser = parse_path)]
    pub source_dir: Option<PathBuf>,

    /// Directory that manifest outputs are relative to.
    #[clap(long, value_parser = parse_path)]
    pub output_dir: Option<PathBuf>,

    /// Number of items converted at the same time. Defaults to the number of CPUs.
    #[clap(long)]
    pub concurrency: Option<usize>,

    /// Per-item conversion timeout in seconds. Set to 0 to disable.
    #[clap(long)]
    pub item_timeout_secs: Option<u64>,

    /// Never use external encoder tools; only WAV sources can be converted.
    #[clap(long)]
    pub fallback_only: bool,

    /// Path to a TOML config file. Its values override command line values.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Pretty-print the JSON report.
    #[clap(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
struct ScanArgs {
    /// Directory of source recordings.
    #[clap(value_parser = parse_path)]
    pub source_dir: PathBuf,

    /// Write the manifest to this file instead of stdout.
    #[clap(long, value_parser = parse_path)]
    pub out: Option<PathBuf>,

    /// Pretty-print the JSON manifest.
    #[clap(long)]
    pub pretty: bool,
}

impl ConvertArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            source_dir: self.source_dir.clone(),
            output_dir: self.output_dir.clone(),
            manifest: self.manifest.clone(),
            concurrency: self.concurrency,
            item_timeout_secs: self.item_timeout_secs,
            fallback_only: self.fallback_only,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli_args = CliArgs::parse();

    // stdout carries the report, logs go to stderr
    if let Err(e) = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
    {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let result = match cli_args.command {
        Command::Convert(args) => convert(args).await,
        Command::Scan(args) => scan(args),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}

async fn convert(args: ConvertArgs) -> Result<ExitCode> {
    let file_config = match &args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&args.to_cli_config(), file_config)?;

    let manifest_arg = config.manifest.as_deref().ok_or_else(|| {
        anyhow::anyhow!("manifest must be specified via --manifest or in config file")
    })?;
    let entries = batch::load_manifest(manifest_arg).context("Failed to load manifest")?;

    let selector = BackendSelector::new(build_tools(&config.encoders));
    if config.fallback_only {
        info!("Encoder tools disabled, only WAV sources will be converted");
    } else {
        info!("Encoder tools in preference order: {:?}", selector.tool_ids());
    }
    info!(
        "Converting from {:?} into {:?}",
        config.source_dir, config.output_dir
    );
    if !config.source_dir.is_dir() {
        warn!(
            "Source directory {:?} not found, every entry will be skipped",
            config.source_dir
        );
    }

    let orchestrator = BatchOrchestrator::new(
        selector,
        BatchOptions {
            source_dir: config.source_dir.clone(),
            output_dir: config.output_dir.clone(),
            concurrency: config.concurrency,
            item_timeout: config.item_timeout,
        },
    );
    let report = orchestrator.run(&entries).await;

    println!("{}", to_json(&report, args.pretty)?);
    Ok(ExitCode::from(report.exit_code()))
}

fn scan(args: ScanArgs) -> Result<ExitCode> {
    let entries = batch::scan_dir(&args.source_dir)?;
    info!("Found {} recordings in {:?}", entries.len(), args.source_dir);

    let json = to_json(&entries, args.pretty)?;
    match &args.out {
        Some(path) => {
            std::fs::write(path, json + "\n")
                .with_context(|| format!("Failed to write manifest to {:?}", path))?;
            info!("Manifest written to {:?}", path);
        }
        None => println!("{}", json),
    }
    Ok(ExitCode::SUCCESS)
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("Failed to serialize JSON")
}
