//! Run results reported by the plan executor.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Ok,
    Error,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepStatus::Ok => f.write_str("ok"),
            StepStatus::Error => f.write_str("error"),
        }
    }
}

/// Outcome of one attempted step. `index` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    pub index: usize,
    pub action: String,
    pub status: StepStatus,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Record of a plan run. Only attempted steps appear in `steps`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub bundle_id: String,
    pub udid: String,
    /// Absolute output directory.
    pub output_dir: String,
    pub steps: Vec<StepResult>,
}

impl RunResult {
    /// The step that stopped the run, if any.
    pub fn failed_step(&self) -> Option<&StepResult> {
        self.steps.iter().find(|s| s.status == StepStatus::Error)
    }

    pub fn is_success(&self) -> bool {
        self.failed_step().is_none()
    }
}
