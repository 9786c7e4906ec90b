//! External encoder tools (ffmpeg, sox, ...) invoked as child processes.

use super::error::ConversionError;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::OnceLock;
use tokio::process::Command;
use tracing::debug;

/// Maximum number of characters of tool output kept in error messages.
const MAX_DIAGNOSTIC_CHARS: usize = 200;

const INPUT_PLACEHOLDER: &str = "{input}";
const OUTPUT_PLACEHOLDER: &str = "{output}";

/// An encoder able to turn any input file into 8 kHz mono mu-law.
#[async_trait]
pub trait EncoderTool: Send + Sync {
    /// Identifier reported as the backend of converted items.
    fn id(&self) -> &str;

    /// Whether the tool can be used in the current environment.
    fn is_available(&self) -> bool;

    /// Encode `input` into `output`, overwriting `output` if present.
    async fn encode(&self, input: &Path, output: &Path) -> Result<(), ConversionError>;
}

/// Description of an external encoder: what to run and where to find it.
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderToolSpec {
    pub id: String,
    /// Executable name looked up on `PATH`, or a path to it.
    pub program: String,
    /// Argument template; `{input}` and `{output}` are replaced per call.
    pub args: Vec<String>,
    /// Directories searched after `PATH`.
    pub search_paths: Vec<PathBuf>,
}

impl EncoderToolSpec {
    pub fn ffmpeg() -> Self {
        Self {
            id: "ffmpeg".to_string(),
            program: "ffmpeg".to_string(),
            args: to_args(&[
                "-y",
                "-i",
                INPUT_PLACEHOLDER,
                "-ar",
                "8000",
                "-ac",
                "1",
                "-acodec",
                "pcm_mulaw",
                "-f",
                "mulaw",
                OUTPUT_PLACEHOLDER,
            ]),
            search_paths: ffmpeg_install_dirs(),
        }
    }

    pub fn sox() -> Self {
        Self {
            id: "sox".to_string(),
            program: "sox".to_string(),
            args: to_args(&[
                INPUT_PLACEHOLDER,
                "-r",
                "8000",
                "-c",
                "1",
                "-e",
                "u-law",
                "-t",
                "raw",
                OUTPUT_PLACEHOLDER,
            ]),
            search_paths: Vec::new(),
        }
    }

    /// The default preference order: ffmpeg first, then sox.
    pub fn defaults() -> Vec<Self> {
        vec![Self::ffmpeg(), Self::sox()]
    }

    /// Expand the argument template for one conversion.
    pub fn render_args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        self.args
            .iter()
            .map(|arg| match arg.as_str() {
                INPUT_PLACEHOLDER => input.as_os_str().to_owned(),
                OUTPUT_PLACEHOLDER => output.as_os_str().to_owned(),
                _ => OsString::from(
                    arg.replace(INPUT_PLACEHOLDER, &input.to_string_lossy())
                        .replace(OUTPUT_PLACEHOLDER, &output.to_string_lossy()),
                ),
            })
            .collect()
    }
}

fn to_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| a.to_string()).collect()
}

/// Common ffmpeg install locations that are rarely on `PATH`.
fn ffmpeg_install_dirs() -> Vec<PathBuf> {
    if !cfg!(windows) {
        return Vec::new();
    }
    let mut dirs = vec![
        PathBuf::from(r"C:\ffmpeg\bin"),
        PathBuf::from(r"C:\Program Files\ffmpeg\bin"),
    ];
    if let Some(home) = std::env::var_os("USERPROFILE") {
        dirs.push(PathBuf::from(home).join(r"scoop\apps\ffmpeg\current\bin"));
    }
    dirs
}

/// Locate an executable on `PATH` or in the extra search directories.
pub fn find_executable(program: &str, search_paths: &[PathBuf]) -> Option<PathBuf> {
    let direct = Path::new(program);
    if direct.components().count() > 1 {
        return is_executable(direct).then(|| direct.to_path_buf());
    }

    let path_dirs = std::env::var_os("PATH")
        .map(|p| std::env::split_paths(&p).collect::<Vec<_>>())
        .unwrap_or_default();

    path_dirs
        .iter()
        .chain(search_paths.iter())
        .find_map(|dir| {
            let full = dir.join(program);
            if is_executable(&full) {
                return Some(full);
            }
            #[cfg(windows)]
            {
                let exe = dir.join(format!("{}.exe", program));
                if exe.is_file() {
                    return Some(exe);
                }
            }
            None
        })
}

/// A regular file that the current user may run.
#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// An encoder tool backed by a child process.
///
/// The executable lookup runs once; tools don't appear or vanish mid-run.
pub struct ExternalEncoderTool {
    spec: EncoderToolSpec,
    executable: OnceLock<Option<PathBuf>>,
}

impl ExternalEncoderTool {
    pub fn new(spec: EncoderToolSpec) -> Self {
        Self {
            spec,
            executable: OnceLock::new(),
        }
    }

    pub fn spec(&self) -> &EncoderToolSpec {
        &self.spec
    }

    /// Resolved path of the executable, if it was found.
    pub fn executable(&self) -> Option<&Path> {
        self.executable
            .get_or_init(|| {
                let found = find_executable(&self.spec.program, &self.spec.search_paths);
                debug!("Probed encoder {}: {:?}", self.spec.id, found);
                found
            })
            .as_deref()
    }
}

#[async_trait]
impl EncoderTool for ExternalEncoderTool {
    fn id(&self) -> &str {
        &self.spec.id
    }

    fn is_available(&self) -> bool {
        self.executable().is_some()
    }

    async fn encode(&self, input: &Path, output: &Path) -> Result<(), ConversionError> {
        let executable = self
            .executable()
            .ok_or_else(|| ConversionError::EncoderTool {
                tool: self.spec.id.clone(),
                message: format!("{} not found", self.spec.program),
            })?;

        let output_result = Command::new(executable)
            .args(self.spec.render_args(input, output))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ConversionError::EncoderTool {
                tool: self.spec.id.clone(),
                message: format!("failed to spawn: {}", e),
            })?;

        if !output_result.status.success() {
            let stderr = String::from_utf8_lossy(&output_result.stderr);
            let stdout = String::from_utf8_lossy(&output_result.stdout);
            let diagnostics = if stderr.trim().is_empty() {
                stdout.trim()
            } else {
                stderr.trim()
            };
            return Err(ConversionError::EncoderTool {
                tool: self.spec.id.clone(),
                message: format!(
                    "{}: {}",
                    output_result.status,
                    truncate_chars(diagnostics, MAX_DIAGNOSTIC_CHARS)
                ),
            });
        }

        Ok(())
    }
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
