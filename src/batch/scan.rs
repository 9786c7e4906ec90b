//! Build a manifest from a directory of source recordings.

use super::manifest::ManifestEntry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Source directory not found: {0:?}")]
    NotFound(PathBuf),

    #[error("Failed to walk {path:?}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
}

/// Source extensions picked up by a scan.
const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "mpeg", "aac", "m4a", "wav", "ogg"];

/// Extension given to every scanned output.
pub const OUTPUT_EXTENSION: &str = "ulaw";

/// Check if a file has a scannable audio extension.
pub fn is_supported_audio(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Turn a recording's file stem into a prompt name.
///
/// Lowercases, maps spaces and dashes to `_`, and drops everything that is
/// neither alphanumeric nor `_`.
pub fn clean_name(stem: &str) -> String {
    stem.to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}

/// Walk `source_dir` and produce one entry per supported file, sorted by path.
///
/// Outputs keep the relative parent directory of their source.
pub fn scan_dir(source_dir: &Path) -> Result<Vec<ManifestEntry>, ScanError> {
    if !source_dir.is_dir() {
        return Err(ScanError::NotFound(source_dir.to_path_buf()));
    }

    let mut entries = Vec::new();
    for item in WalkDir::new(source_dir).sort_by_file_name() {
        let item = item.map_err(|source| ScanError::Walk {
            path: source_dir.to_path_buf(),
            source,
        })?;
        if !item.file_type().is_file() || !is_supported_audio(item.path()) {
            continue;
        }

        let Ok(relative) = item.path().strip_prefix(source_dir) else {
            continue;
        };
        let Some(entry) = entry_for(relative) else {
            warn!("Ignoring {:?}: name has no usable characters", relative);
            continue;
        };
        debug!("Found {} -> {}", entry.source, entry.output);
        entries.push(entry);
    }

    let mut seen: HashMap<&str, &str> = HashMap::new();
    for entry in &entries {
        if let Some(first) = seen.insert(&entry.output, &entry.source) {
            warn!(
                "{} and {} both map to {}; only the first converted will be kept",
                first, entry.source, entry.output
            );
        }
    }

    Ok(entries)
}

fn entry_for(relative: &Path) -> Option<ManifestEntry> {
    let stem = relative.file_stem()?.to_str()?;
    let name = clean_name(stem);
    if name.is_empty() {
        return None;
    }

    let output = match relative.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            parent.join(format!("{}.{}", name, OUTPUT_EXTENSION))
        }
        _ => PathBuf::from(format!("{}.{}", name, OUTPUT_EXTENSION)),
    };

    Some(ManifestEntry::new(
        to_manifest_path(relative)?,
        to_manifest_path(&output)?,
    ))
}

/// Manifest paths always use `/` separators.
fn to_manifest_path(path: &Path) -> Option<String> {
    let parts = path
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}
