//! Telephony prompt conversion library
//!
//! Normalizes audio files into 8 kHz mono mu-law for IVR playback, driven by
//! a manifest of source/output pairs. The library is exposed for testing and
//! reuse; the `ulaw-prompts` binary wraps it in a CLI.

pub mod audio;
pub mod backend;
pub mod batch;
pub mod config;

// Re-export commonly used types for convenience
pub use backend::{Backend, BackendSelector, ConversionError, EncoderTool, EncoderToolSpec};
pub use batch::{BatchOptions, BatchOrchestrator, BatchReport, ConversionResult, ManifestEntry};
