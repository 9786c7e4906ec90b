//! Shared constants for end-to-end tests
//!
//! When fixture audio changes, update only this file.

// ============================================================================
// Fixture audio
// ============================================================================

/// Sample rate of the generated wideband fixtures.
pub const WIDEBAND_RATE: u32 = 16_000;

/// Samples per channel in a generated fixture (0.2 s at 16 kHz).
pub const FIXTURE_FRAMES: usize = 3_200;

/// Bytes produced from a fixture: one mu-law byte per 8 kHz sample.
pub const FIXTURE_ULAW_BYTES: usize = FIXTURE_FRAMES / 2;

// ============================================================================
// Manifest layout
// ============================================================================

/// Directory, relative to the workspace, holding source recordings.
pub const SOURCE_DIR: &str = "new sounds";

/// Directory, relative to the workspace, receiving converted prompts.
pub const OUTPUT_DIR: &str = "prompts";

/// Backend identifier of the in-process WAV pipeline.
pub const FALLBACK_BACKEND: &str = "wav-fallback";
