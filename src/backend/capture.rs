//! Single-shot capture: optional launch, screenshot, existence check.

use super::AutomationBackend;
use crate::error::ShotsError;
use crate::plan::model::resolve_device;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureRequest {
    /// Launched before capturing when non-blank.
    pub bundle_id: String,
    pub udid: String,
    /// Screenshot name; written as `<output_dir>/<name>.png`.
    pub name: String,
    pub output_dir: PathBuf,
}

/// Reject names that are empty, `.`/`..`, or contain path separators.
pub fn validate_screenshot_name(name: &str) -> Result<(), ShotsError> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed.contains('/')
        || trimmed.contains('\\')
    {
        return Err(ShotsError::validation(format!(
            "invalid screenshot name {:?}: expected a file name without path separators",
            name
        )));
    }
    Ok(())
}

/// Capture one screenshot and return its path.
pub fn capture<B: AutomationBackend + ?Sized>(
    backend: &B,
    request: &CaptureRequest,
) -> Result<PathBuf, ShotsError> {
    validate_screenshot_name(&request.name)?;
    let udid = resolve_device(&request.udid);

    std::fs::create_dir_all(&request.output_dir)
        .map_err(|e| ShotsError::io("create output directory", &request.output_dir, e))?;

    let bundle_id = request.bundle_id.trim();
    if !bundle_id.is_empty() {
        backend.launch(&udid, bundle_id)?;
    }

    let path = request
        .output_dir
        .join(format!("{}.png", request.name.trim()));
    backend.screenshot(&udid, &path)?;

    std::fs::metadata(&path).map_err(|e| ShotsError::io("screenshot not found at", &path, e))?;
    info!(path = %path.display(), udid = %udid, "Captured screenshot");
    Ok(path)
}
