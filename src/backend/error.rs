use crate::audio::WavError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while converting a single manifest item.
///
/// `SourceMissing` and `AlreadyExists` end up as skips in the report, every
/// other variant as a failure.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Source file not found: {0:?}")]
    SourceMissing(PathBuf),

    #[error("Output already exists: {0:?}")]
    AlreadyExists(PathBuf),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("{tool} failed: {message}")]
    EncoderTool { tool: String, message: String },

    #[error("No backend available: {0}")]
    NoBackendAvailable(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Conversion timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<WavError> for ConversionError {
    fn from(e: WavError) -> Self {
        match e {
            WavError::Unsupported(msg) => ConversionError::UnsupportedFormat(msg),
            WavError::Malformed(msg) => ConversionError::Parse(msg),
            WavError::Io(io) => ConversionError::Io(io),
        }
    }
}
