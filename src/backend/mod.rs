//! Conversion backends.
//!
//! Each item is converted by exactly one backend:
//! 1. the first configured encoder tool found on this machine, or
//! 2. the in-process WAV pipeline when no tool is available and the
//!    source is a `.wav` file.

mod encoder_tool;
mod error;
mod fallback;
mod selector;

pub use encoder_tool::{find_executable, EncoderTool, EncoderToolSpec, ExternalEncoderTool};
pub use error::ConversionError;
pub use fallback::{transcode_file, FALLBACK_BACKEND_ID};
pub use selector::{Backend, BackendSelector, Selection};

use std::sync::Arc;

/// Build encoder tools from their specs, preserving order.
pub fn build_tools(specs: &[EncoderToolSpec]) -> Vec<Arc<dyn EncoderTool>> {
    specs
        .iter()
        .cloned()
        .map(|spec| Arc::new(ExternalEncoderTool::new(spec)) as Arc<dyn EncoderTool>)
        .collect()
}
