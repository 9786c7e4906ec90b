//! Manifest parsing.
//!
//! A manifest is either a JSON array of `{"source", "output"}` objects or the
//! same objects as JSON lines. It can be passed inline or as a file path.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Errors that make a whole manifest unusable.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read manifest {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed manifest: {0}")]
    Malformed(String),

    #[error("Invalid manifest entry #{index}: {reason}")]
    InvalidEntry { index: usize, reason: String },
}

/// One source/output pair, both relative to their root directories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub source: String,
    pub output: String,
}

impl ManifestEntry {
    pub fn new(source: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
        }
    }
}

/// Load a manifest from an inline JSON string or from a file path.
pub fn load(arg: &str) -> Result<Vec<ManifestEntry>, ManifestError> {
    let trimmed = arg.trim_start();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        return parse(arg);
    }

    let path = Path::new(arg);
    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content)
}

/// Parse manifest text, validating every entry.
pub fn parse(text: &str) -> Result<Vec<ManifestEntry>, ManifestError> {
    let entries: Vec<ManifestEntry> = if text.trim_start().starts_with('[') {
        serde_json::from_str(text).map_err(|e| ManifestError::Malformed(e.to_string()))?
    } else {
        text.lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(n, line)| {
                serde_json::from_str(line)
                    .map_err(|e| ManifestError::Malformed(format!("line {}: {}", n + 1, e)))
            })
            .collect::<Result<_, _>>()?
    };

    for (index, entry) in entries.iter().enumerate() {
        validate_relative(&entry.source)
            .and_then(|_| validate_relative(&entry.output))
            .map_err(|reason| ManifestError::InvalidEntry { index, reason })?;
    }

    Ok(entries)
}

/// Entries must stay inside their root directory.
fn validate_relative(path: &str) -> Result<(), String> {
    if path.trim().is_empty() {
        return Err("empty path".to_string());
    }
    for component in Path::new(path).components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => return Err(format!("{:?} escapes its root with '..'", path)),
            Component::RootDir | Component::Prefix(_) => {
                return Err(format!("{:?} is not a relative path", path))
            }
        }
    }
    Ok(())
}
