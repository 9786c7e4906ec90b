//! RIFF/WAVE reader for the in-process fallback.
//!
//! Only integer linear PCM is accepted. Anything else is reported as
//! unsupported so the caller can tell "wrong kind of file" apart from
//! "damaged file".

use super::pcm::{PcmBuffer, SampleWidth};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while reading a WAV file.
#[derive(Debug, Error)]
pub enum WavError {
    #[error("Unsupported format: {0}")]
    Unsupported(String),

    #[error("Malformed WAV data: {0}")]
    Malformed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Whether a path carries the `.wav` extension (case-insensitive).
pub fn is_wav_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("wav"))
        .unwrap_or(false)
}

/// Read a WAV file into a PCM buffer.
///
/// Paths without a `.wav` extension are rejected before the file is opened.
pub fn read_file(path: &Path) -> Result<PcmBuffer, WavError> {
    if !is_wav_path(path) {
        return Err(WavError::Unsupported(format!(
            "{} is not a .wav file",
            path.display()
        )));
    }

    let file = BufReader::new(File::open(path)?);
    let buffer = read_pcm(file)?;

    debug!(
        "Read {:?}: {} Hz, {} channel(s), {}-byte samples, {} frames",
        path,
        buffer.sample_rate,
        buffer.channels,
        buffer.width.bytes(),
        buffer.frames()
    );

    Ok(buffer)
}

/// Read WAV data from any seekable source.
pub fn read_pcm<R: Read + Seek>(mut source: R) -> Result<PcmBuffer, WavError> {
    check_riff_tags(&mut source)?;
    source.seek(SeekFrom::Start(0))?;

    let reader = hound::WavReader::new(source).map_err(map_hound_error)?;
    let spec = reader.spec();

    if spec.sample_format != hound::SampleFormat::Int {
        return Err(WavError::Unsupported(
            "floating-point samples are not linear PCM".to_string(),
        ));
    }
    let width = SampleWidth::from_bits(spec.bits_per_sample).ok_or_else(|| {
        WavError::Unsupported(format!("{}-bit samples", spec.bits_per_sample))
    })?;
    if spec.channels == 0 || spec.sample_rate == 0 {
        return Err(WavError::Malformed(format!(
            "{} channels at {} Hz",
            spec.channels, spec.sample_rate
        )));
    }

    // hound stops at the declared end of the data chunk, not at the end of the file.
    let samples = reader
        .into_samples::<i32>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(map_hound_error)?;

    Ok(PcmBuffer::new(
        samples,
        spec.channels,
        spec.sample_rate,
        width,
    ))
}

fn check_riff_tags<R: Read>(source: &mut R) -> Result<(), WavError> {
    let mut header = [0u8; 12];
    if let Err(e) = source.read_exact(&mut header) {
        return match e.kind() {
            std::io::ErrorKind::UnexpectedEof => Err(WavError::Unsupported(
                "file too short for a RIFF header".to_string(),
            )),
            _ => Err(WavError::Io(e)),
        };
    }

    if &header[0..4] != b"RIFF" || &header[8..12] != b"WAVE" {
        return Err(WavError::Unsupported("missing RIFF/WAVE tag".to_string()));
    }
    Ok(())
}

fn map_hound_error(e: hound::Error) -> WavError {
    match e {
        hound::Error::IoError(io) => WavError::Io(io),
        hound::Error::Unsupported => {
            WavError::Unsupported("codec is not linear PCM".to_string())
        }
        other => WavError::Malformed(other.to_string()),
    }
}
