//! Error types for plan execution, capture, and review artifacts.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors surfaced by every appshots operation.
#[derive(Debug, Error)]
pub enum ShotsError {
    /// Bad input detected before any work was attempted.
    #[error("{0}")]
    Validation(String),

    /// An external automation tool could not start or exited non-zero.
    #[error("{command}: {detail}")]
    Backend { command: String, detail: String },

    /// The accessibility tree returned by the backend was not JSON.
    #[error("{command}: parse JSON: {source}")]
    UiTree {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    /// A `wait_for` condition never appeared within its budget.
    #[error("wait_for timed out after {timeout_ms}ms")]
    WaitTimeout { timeout_ms: u64 },

    #[error("operation cancelled")]
    Cancelled,

    /// A plan step failed; wraps the step's own error.
    #[error("step {index} ({action}): {source}")]
    Step {
        index: usize,
        action: String,
        #[source]
        source: Box<ShotsError>,
    },

    #[error("{op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{op}: {source}")]
    Json {
        op: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("read screenshot dimensions for {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Watch error: {0}")]
    Watch(String),
}

impl ShotsError {
    pub fn validation(message: impl Into<String>) -> Self {
        ShotsError::Validation(message.into())
    }

    pub fn io(op: &'static str, path: impl AsRef<Path>, source: std::io::Error) -> Self {
        ShotsError::Io {
            op,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn json(op: &'static str, source: serde_json::Error) -> Self {
        ShotsError::Json { op, source }
    }

    /// True when the error (or the step error it wraps) is a cancellation.
    pub fn is_cancelled(&self) -> bool {
        match self {
            ShotsError::Cancelled => true,
            ShotsError::Step { source, .. } => source.is_cancelled(),
            _ => false,
        }
    }

    /// True when the error (or the step error it wraps) is a `wait_for` timeout.
    pub fn is_wait_timeout(&self) -> bool {
        match self {
            ShotsError::WaitTimeout { .. } => true,
            ShotsError::Step { source, .. } => source.is_wait_timeout(),
            _ => false,
        }
    }
}

impl From<config::ConfigError> for ShotsError {
    fn from(err: config::ConfigError) -> Self {
        ShotsError::Config(err.to_string())
    }
}

impl From<notify::Error> for ShotsError {
    fn from(err: notify::Error) -> Self {
        ShotsError::Watch(err.to_string())
    }
}
