//! Pure audio primitives for the in-process fallback path.
//!
//! The pipeline is WAV reader -> downmix -> rate conversion -> mu-law.
//! Nothing in here knows about manifests or external tools.

pub mod mulaw;
pub mod pcm;
pub mod resample;
pub mod wav;

pub use pcm::{PcmBuffer, SampleWidth};
pub use resample::{downmix, resample, to_telephony, TARGET_SAMPLE_RATE};
pub use wav::{is_wav_path, read_file, read_pcm, WavError};
