//! In-process conversion used when no encoder tool is installed.

use super::error::ConversionError;
use crate::audio::{self, mulaw};
use std::path::Path;
use tracing::debug;

/// Identifier reported for items converted in-process.
pub const FALLBACK_BACKEND_ID: &str = "wav-fallback";

/// Whether the fallback can handle this source at all.
pub fn supports(source: &Path) -> bool {
    audio::is_wav_path(source)
}

/// Read a WAV file and return its headerless 8 kHz mono mu-law encoding.
pub fn transcode_file(source: &Path) -> Result<Vec<u8>, ConversionError> {
    let pcm = audio::read_file(source)?;
    let (rate_in, channels_in) = (pcm.sample_rate, pcm.channels);

    let telephony = audio::to_telephony(pcm);
    let encoded = mulaw::encode_buffer(&telephony);

    debug!(
        "Transcoded {:?}: {} Hz x{} -> {} mu-law samples",
        source,
        rate_in,
        channels_in,
        encoded.len()
    );
    Ok(encoded)
}
