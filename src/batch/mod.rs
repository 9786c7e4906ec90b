//! Manifest-driven batch conversion.

mod manifest;
mod orchestrator;
mod report;
mod scan;

pub use manifest::{load as load_manifest, parse as parse_manifest, ManifestEntry, ManifestError};
pub use orchestrator::{default_concurrency, BatchOptions, BatchOrchestrator};
pub use report::{BatchReport, ConversionResult, SkipReason};
pub use scan::{clean_name, is_supported_audio, scan_dir, ScanError, OUTPUT_EXTENSION};
