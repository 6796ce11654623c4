//! Process backend driving the `axe` CLI and `xcrun simctl`.

use super::AutomationBackend;
use crate::error::ShotsError;
use crate::plan::model::TapTarget;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

pub const DEFAULT_AXE_BIN: &str = "axe";
pub const DEFAULT_XCRUN_BIN: &str = "xcrun";

/// Shells out to `axe` for UI automation and `xcrun simctl` for launches.
#[derive(Debug, Clone)]
pub struct AxeBackend {
    axe_bin: PathBuf,
    xcrun_bin: PathBuf,
}

impl Default for AxeBackend {
    fn default() -> Self {
        Self {
            axe_bin: PathBuf::from(DEFAULT_AXE_BIN),
            xcrun_bin: PathBuf::from(DEFAULT_XCRUN_BIN),
        }
    }
}

impl AxeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use explicit binaries (names resolved through `PATH`, or full paths).
    pub fn with_binaries(axe_bin: impl Into<PathBuf>, xcrun_bin: impl Into<PathBuf>) -> Self {
        Self {
            axe_bin: axe_bin.into(),
            xcrun_bin: xcrun_bin.into(),
        }
    }

    fn axe<I, S>(&self, args: I) -> Result<String, ShotsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        run_external_output(&self.axe_bin, args)
    }
}

impl AutomationBackend for AxeBackend {
    fn launch(&self, device: &str, bundle_id: &str) -> Result<(), ShotsError> {
        run_external_output(&self.xcrun_bin, ["simctl", "launch", device, bundle_id]).map(|_| ())
    }

    fn tap(&self, device: &str, target: &TapTarget) -> Result<(), ShotsError> {
        match target {
            TapTarget::Label(label) => self.axe(["tap", "--label", label.as_str(), "--udid", device]),
            TapTarget::Id(id) => self.axe(["tap", "--id", id.as_str(), "--udid", device]),
            TapTarget::Point { x, y } => {
                let (x, y) = (x.to_string(), y.to_string());
                self.axe(["tap", "-x", x.as_str(), "-y", y.as_str(), "--udid", device])
            }
        }
        .map(|_| ())
    }

    fn type_text(&self, device: &str, text: &str) -> Result<(), ShotsError> {
        self.axe(["type", text, "--udid", device]).map(|_| ())
    }

    fn send_keys(&self, device: &str, keycodes: &[u32]) -> Result<(), ShotsError> {
        let joined = keycodes
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.axe(["key-sequence", "--keycodes", joined.as_str(), "--udid", device])
            .map(|_| ())
    }

    fn describe_ui(&self, device: &str) -> Result<String, ShotsError> {
        self.axe(["describe-ui", "--udid", device])
    }

    fn screenshot(&self, device: &str, path: &Path) -> Result<(), ShotsError> {
        self.axe([
            OsStr::new("screenshot"),
            OsStr::new("--output"),
            path.as_os_str(),
            OsStr::new("--udid"),
            OsStr::new(device),
        ])
        .map(|_| ())
    }
}

/// Run `program` and return its stdout.
///
/// A spawn failure or non-zero exit becomes [`ShotsError::Backend`] naming the
/// program, with trimmed stdout and stderr appended when either is non-empty.
pub fn run_external_output<I, S>(program: &Path, args: I) -> Result<String, ShotsError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let command_name = program
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| program.display().to_string());

    let mut command = Command::new(program);
    command.args(args);
    debug!(command = ?command, "Running backend command");

    let output = command.output().map_err(|e| ShotsError::Backend {
        command: command_name.clone(),
        detail: e.to_string(),
    })?;

    if output.status.success() {
        return Ok(String::from_utf8_lossy(&output.stdout).to_string());
    }

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let combined = [stdout, stderr]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    let detail = if combined.is_empty() {
        output.status.to_string()
    } else {
        format!("{} (output: {})", output.status, combined)
    };
    Err(ShotsError::Backend {
        command: command_name,
        detail,
    })
}
