//! Configuration System
//!
//! Layered configuration for the plan runner, backend binaries, review
//! pipeline, watch daemon, and logging. Sources are merged by
//! [`ConfigLoader`]; see `facade` for the order.

use crate::backend::axe::{DEFAULT_AXE_BIN, DEFAULT_XCRUN_BIN};
use crate::error::ShotsError;
use crate::logging::LoggingConfig;
use crate::plan::DEFAULT_OUTPUT_DIR;
use crate::review::DEFAULT_REVIEW_OUTPUT_DIR;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;
pub use sources::workspace_file::workspace_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShotsConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub plan: PlanConfig,

    #[serde(default)]
    pub review: ReviewConfig,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub watch: WatchSettings,
}

/// Plan runner settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Plan file used by `run` when `--plan` is omitted
    #[serde(default = "default_plan_path")]
    pub path: PathBuf,
}

fn default_plan_path() -> PathBuf {
    PathBuf::from(".appshots").join("plan.json")
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            path: default_plan_path(),
        }
    }
}

/// Review pipeline directories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewConfig {
    #[serde(default = "default_raw_dir")]
    pub raw_dir: String,

    #[serde(default = "default_framed_dir")]
    pub framed_dir: String,

    #[serde(default = "default_review_output_dir")]
    pub output_dir: String,

    /// Approval ledger; defaults to `<output_dir>/approved.json`
    #[serde(default)]
    pub approval_path: Option<String>,
}

fn default_raw_dir() -> String {
    DEFAULT_OUTPUT_DIR.to_string()
}

fn default_framed_dir() -> String {
    "./screenshots/framed".to_string()
}

fn default_review_output_dir() -> String {
    DEFAULT_REVIEW_OUTPUT_DIR.to_string()
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            raw_dir: default_raw_dir(),
            framed_dir: default_framed_dir(),
            output_dir: default_review_output_dir(),
            approval_path: None,
        }
    }
}

/// External automation binaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_axe_bin")]
    pub axe_bin: PathBuf,

    #[serde(default = "default_xcrun_bin")]
    pub xcrun_bin: PathBuf,
}

fn default_axe_bin() -> PathBuf {
    PathBuf::from(DEFAULT_AXE_BIN)
}

fn default_xcrun_bin() -> PathBuf {
    PathBuf::from(DEFAULT_XCRUN_BIN)
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            axe_bin: default_axe_bin(),
            xcrun_bin: default_xcrun_bin(),
        }
    }
}

/// Watch daemon settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchSettings {
    /// Frame configuration YAML whose screenshot paths are also watched
    #[serde(default)]
    pub frame_config: Option<PathBuf>,

    /// How often the daemon checks its stop flag
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    200
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            frame_config: None,
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Logging(String),
    Review(String),
    Backend(String),
    Watch(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
            ValidationError::Review(msg) => write!(f, "Review: {}", msg),
            ValidationError::Backend(msg) => write!(f, "Backend: {}", msg),
            ValidationError::Watch(msg) => write!(f, "Watch: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl ShotsConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            errors.push(ValidationError::Logging(format!(
                "format must be 'text' or 'json', got '{}'",
                self.logging.format
            )));
        }
        if !matches!(
            self.logging.output.as_str(),
            "stdout" | "stderr" | "file" | "file+stderr"
        ) {
            errors.push(ValidationError::Logging(format!(
                "unknown output '{}'",
                self.logging.output
            )));
        }

        if self.review.framed_dir.trim().is_empty() {
            errors.push(ValidationError::Review(
                "framed_dir cannot be empty".to_string(),
            ));
        }
        if self.review.output_dir.trim().is_empty() {
            errors.push(ValidationError::Review(
                "output_dir cannot be empty".to_string(),
            ));
        }

        if self.backend.axe_bin.as_os_str().is_empty() {
            errors.push(ValidationError::Backend("axe_bin cannot be empty".to_string()));
        }
        if self.backend.xcrun_bin.as_os_str().is_empty() {
            errors.push(ValidationError::Backend(
                "xcrun_bin cannot be empty".to_string(),
            ));
        }

        if self.watch.poll_interval_ms == 0 {
            errors.push(ValidationError::Watch(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and fold every problem into one error.
    pub fn ensure_valid(&self) -> Result<(), ShotsError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ShotsError::Config(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })
    }
}
