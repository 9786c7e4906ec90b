//! Test workspace creation
//!
//! Every test gets its own temporary source and output tree.

use super::constants::*;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory holding a source tree and an output tree.
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(dir.path().join(SOURCE_DIR)).expect("Failed to create source dir");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn source_dir(&self) -> PathBuf {
        self.dir.path().join(SOURCE_DIR)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join(OUTPUT_DIR)
    }

    pub fn output(&self, rel: &str) -> PathBuf {
        self.output_dir().join(rel)
    }

    /// Write a 16-bit stereo WAV of a 440 Hz tone with identical channels.
    pub fn add_wav(&self, rel: &str) -> PathBuf {
        let path = self.source_path(rel);
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: WIDEBAND_RATE,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).expect("Failed to create wav");
        for i in 0..FIXTURE_FRAMES {
            let t = i as f64 / WIDEBAND_RATE as f64;
            let sample = (f64::sin(2.0 * std::f64::consts::PI * 440.0 * t) * 8000.0) as i16;
            writer.write_sample(sample).expect("Failed to write sample");
            writer.write_sample(sample).expect("Failed to write sample");
        }
        writer.finalize().expect("Failed to finalize wav");
        path
    }

    /// Write arbitrary bytes as a source file, e.g. a fake mp3.
    pub fn add_file(&self, rel: &str, bytes: &[u8]) -> PathBuf {
        let path = self.source_path(rel);
        fs::write(&path, bytes).expect("Failed to write source file");
        path
    }

    /// Write a manifest file at the workspace root and return its path.
    pub fn write_manifest(&self, entries: &[(&str, &str)]) -> PathBuf {
        let path = self.dir.path().join("manifest.json");
        fs::write(&path, manifest_json(entries)).expect("Failed to write manifest");
        path
    }

    fn source_path(&self, rel: &str) -> PathBuf {
        let path = self.source_dir().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create source subdir");
        }
        path
    }
}

/// Serialize `(source, output)` pairs as a JSON array manifest.
pub fn manifest_json(entries: &[(&str, &str)]) -> String {
    let items: Vec<_> = entries
        .iter()
        .map(|(source, output)| json!({ "source": source, "output": output }))
        .collect();
    serde_json::to_string(&items).expect("Failed to serialize manifest")
}
