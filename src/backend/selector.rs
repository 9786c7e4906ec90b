//! Backend selection and staged output writes.

use super::encoder_tool::EncoderTool;
use super::error::ConversionError;
use super::fallback::{self, FALLBACK_BACKEND_ID};
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempPath;
use tracing::debug;

/// The strategy used to convert one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// An external encoder tool, by identifier.
    Tool(String),
    /// The in-process WAV pipeline.
    Fallback,
}

impl Backend {
    pub fn id(&self) -> &str {
        match self {
            Backend::Tool(id) => id,
            Backend::Fallback => FALLBACK_BACKEND_ID,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl Serialize for Backend {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

/// Outcome of the selection policy for one source file.
pub enum Selection {
    Tool(Arc<dyn EncoderTool>),
    Fallback,
}

impl Selection {
    pub fn backend(&self) -> Backend {
        match self {
            Selection::Tool(tool) => Backend::Tool(tool.id().to_string()),
            Selection::Fallback => Backend::Fallback,
        }
    }
}

/// Chooses how each item is converted and performs the conversion.
///
/// Tools are tried in order; the first available one wins. Without any
/// available tool only `.wav` sources can be converted.
#[derive(Clone, Default)]
pub struct BackendSelector {
    tools: Vec<Arc<dyn EncoderTool>>,
}

impl BackendSelector {
    pub fn new(tools: Vec<Arc<dyn EncoderTool>>) -> Self {
        Self { tools }
    }

    /// A selector that never uses external tools.
    pub fn fallback_only() -> Self {
        Self::default()
    }

    pub fn tool_ids(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.id()).collect()
    }

    /// Apply the selection policy without converting anything.
    pub fn select(&self, source: &Path) -> Result<Selection, ConversionError> {
        if let Some(tool) = self.tools.iter().find(|t| t.is_available()) {
            return Ok(Selection::Tool(tool.clone()));
        }

        if fallback::supports(source) {
            return Ok(Selection::Fallback);
        }

        let tried = if self.tools.is_empty() {
            "no encoder tools configured".to_string()
        } else {
            format!("none of [{}] found", self.tool_ids().join(", "))
        };
        Err(ConversionError::NoBackendAvailable(format!(
            "{}; in-process fallback only handles .wav, got {:?}",
            tried,
            source.file_name().unwrap_or_default()
        )))
    }

    /// Convert `source` into `output` and report which backend did it.
    ///
    /// The result is written to a temporary file beside `output` and moved
    /// into place only on success, without replacing an existing file. The
    /// parent directory of `output` must exist.
    pub async fn convert(&self, source: &Path, output: &Path) -> Result<Backend, ConversionError> {
        let selection = self.select(source)?;
        let backend = selection.backend();
        debug!("Converting {:?} with {}", source, backend);

        let staging = staging_path(output)?;

        match selection {
            Selection::Tool(tool) => tool.encode(source, &staging).await?,
            Selection::Fallback => {
                let source = source.to_path_buf();
                let encoded = tokio::task::spawn_blocking(move || fallback::transcode_file(&source))
                    .await
                    .map_err(|e| ConversionError::Io(std::io::Error::other(e)))??;
                tokio::fs::write(&staging, encoded).await?;
            }
        }

        commit(staging, output)?;
        Ok(backend)
    }
}

/// Create an empty temporary file next to `output`, keeping its extension.
fn staging_path(output: &Path) -> Result<TempPath, ConversionError> {
    let dir = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let suffix = output
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let file = tempfile::Builder::new()
        .prefix(&format!(".{}.part-", stem))
        .suffix(&suffix)
        .tempfile_in(dir)?;
    Ok(file.into_temp_path())
}

fn commit(staging: TempPath, output: &Path) -> Result<(), ConversionError> {
    staging.persist_noclobber(output).map_err(|e| {
        if e.error.kind() == std::io::ErrorKind::AlreadyExists {
            ConversionError::AlreadyExists(output.to_path_buf())
        } else {
            ConversionError::Io(e.error)
        }
    })
}
