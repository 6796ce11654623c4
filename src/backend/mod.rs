//! Device automation backend.
//!
//! The plan engine only talks to [`AutomationBackend`]; [`AxeBackend`] is the
//! process implementation driving `axe` and `xcrun simctl`.

pub mod axe;
pub mod capture;

pub use axe::AxeBackend;
pub use capture::{capture, validate_screenshot_name, CaptureRequest};

use crate::error::ShotsError;
use crate::plan::model::TapTarget;
use std::path::Path;

/// Primitive device operations. `device` is always a resolved device id.
pub trait AutomationBackend: Send + Sync {
    fn launch(&self, device: &str, bundle_id: &str) -> Result<(), ShotsError>;

    fn tap(&self, device: &str, target: &TapTarget) -> Result<(), ShotsError>;

    fn type_text(&self, device: &str, text: &str) -> Result<(), ShotsError>;

    /// Send all `keycodes` in a single call.
    fn send_keys(&self, device: &str, keycodes: &[u32]) -> Result<(), ShotsError>;

    /// Current accessibility tree as JSON text.
    fn describe_ui(&self, device: &str) -> Result<String, ShotsError>;

    /// Write a screenshot of the device to `path`.
    fn screenshot(&self, device: &str, path: &Path) -> Result<(), ShotsError>;
}
