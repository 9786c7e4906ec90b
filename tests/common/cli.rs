//! Runs the built binary and captures its report.

use std::path::Path;
use std::process::{Command, Output};

/// Captured result of one binary invocation.
pub struct CliRun {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CliRun {
    /// Parse stdout as the JSON report or manifest.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout).unwrap_or_else(|e| {
            panic!(
                "stdout is not JSON ({}):\n{}\nstderr:\n{}",
                e, self.stdout, self.stderr
            )
        })
    }
}

impl From<Output> for CliRun {
    fn from(output: Output) -> Self {
        Self {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// Run `ulaw-prompts` with `args` from `cwd`.
pub fn run_cli(cwd: &Path, args: &[&str]) -> CliRun {
    Command::new(env!("CARGO_BIN_EXE_ulaw-prompts"))
        .current_dir(cwd)
        .args(args)
        .env("LOG_LEVEL", "debug")
        .output()
        .expect("Failed to run ulaw-prompts")
        .into()
}
