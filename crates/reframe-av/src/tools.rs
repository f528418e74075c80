//! External tool lookup.

use std::path::{Path, PathBuf};
use std::process::Command;

/// The transcode tool this crate drives.
pub const FFMPEG: &str = "ffmpeg";

/// Platform-specific binary file name.
fn binary_name() -> &'static str {
    if cfg!(windows) {
        "ffmpeg.exe"
    } else {
        "ffmpeg"
    }
}

/// Information about an external tool.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Name of the tool.
    pub name: String,
    /// Whether the tool is available.
    pub available: bool,
    /// Version string if available.
    pub version: Option<String>,
    /// Path to the tool executable.
    pub path: Option<PathBuf>,
}

/// Resolve the ffmpeg executable to launch.
///
/// Resolution order: an explicitly configured path (taken when it
/// exists), the bundled copy at `<base_dir>/ffmpeg/ffmpeg` (platform
/// suffix included), a search-path hit via `which`, and finally the
/// bare tool name. Lookup itself never fails; a genuinely missing tool
/// surfaces as a launch error when the invocation runs.
pub fn locate_ffmpeg(base_dir: &Path, configured: Option<&Path>) -> PathBuf {
    if let Some(path) = configured {
        if path.exists() {
            return path.to_path_buf();
        }
        tracing::warn!(
            "configured ffmpeg path {} does not exist; falling back",
            path.display()
        );
    }

    let bundled = base_dir.join("ffmpeg").join(binary_name());
    if bundled.exists() {
        return bundled;
    }

    which::which(FFMPEG).unwrap_or_else(|_| PathBuf::from(FFMPEG))
}

/// Check whether ffmpeg is available and which version answers.
///
/// # Example
///
/// ```no_run
/// use reframe_av::tools::check_ffmpeg;
///
/// let info = check_ffmpeg();
/// if info.available {
///     println!("ffmpeg version: {:?}", info.version);
/// }
/// ```
pub fn check_ffmpeg() -> ToolInfo {
    check_tool_with_arg(FFMPEG, "-version")
}

/// Check if a tool is available using a custom version argument.
fn check_tool_with_arg(name: &str, version_arg: &str) -> ToolInfo {
    let result = Command::new(name).arg(version_arg).output();

    match result {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .map(|s| s.to_string());

            let path = which::which(name).ok();

            ToolInfo {
                name: name.to_string(),
                available: true,
                version,
                path,
            }
        }
        _ => ToolInfo {
            name: name.to_string(),
            available: false,
            version: None,
            path: None,
        },
    }
}
