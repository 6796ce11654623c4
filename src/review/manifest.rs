//! Review manifest types and their status/summary derivations.

use crate::error::ShotsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_REVIEW_OUTPUT_DIR: &str = "./screenshots/review";
pub const MANIFEST_FILE_NAME: &str = "manifest.json";
pub const HTML_FILE_NAME: &str = "index.html";
pub const APPROVALS_FILE_NAME: &str = "approved.json";

/// Per-entry review status: the 2×2 table over raw presence and size validity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Ready,
    MissingRaw,
    InvalidSize,
    MissingRawInvalidSize,
}

impl ReviewStatus {
    pub fn derive(has_raw: bool, valid_size: bool) -> Self {
        match (has_raw, valid_size) {
            (true, true) => ReviewStatus::Ready,
            (false, true) => ReviewStatus::MissingRaw,
            (true, false) => ReviewStatus::InvalidSize,
            (false, false) => ReviewStatus::MissingRawInvalidSize,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Ready => "ready",
            ReviewStatus::MissingRaw => "missing_raw",
            ReviewStatus::InvalidSize => "invalid_size",
            ReviewStatus::MissingRawInvalidSize => "missing_raw_invalid_size",
        }
    }

    /// Counted under the summary's `missing_raw`.
    pub fn is_missing_raw(&self) -> bool {
        matches!(self, ReviewStatus::MissingRaw | ReviewStatus::MissingRawInvalidSize)
    }

    /// Counted under the summary's `invalid_size`.
    pub fn is_invalid_size(&self) -> bool {
        matches!(self, ReviewStatus::InvalidSize | ReviewStatus::MissingRawInvalidSize)
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalState {
    Approved,
    #[default]
    Pending,
}

impl From<bool> for ApprovalState {
    fn from(approved: bool) -> Self {
        if approved {
            ApprovalState::Approved
        } else {
            ApprovalState::Pending
        }
    }
}

/// One framed screenshot row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewEntry {
    pub key: String,
    pub screenshot_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub locale: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub device: String,
    pub framed_path: String,
    pub framed_relative_path: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub raw_path: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub raw_relative_path: String,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub display_types: Vec<String>,
    pub valid_app_store_size: bool,
    pub status: ReviewStatus,
    pub approved: bool,
    pub approval_state: ApprovalState,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewSummary {
    pub total: usize,
    pub ready: usize,
    pub missing_raw: usize,
    pub invalid_size: usize,
    pub approved: usize,
    pub pending_approval: usize,
}

impl ReviewSummary {
    pub fn from_entries(entries: &[ReviewEntry]) -> Self {
        let mut summary = ReviewSummary {
            total: entries.len(),
            ..ReviewSummary::default()
        };
        for entry in entries {
            if entry.status == ReviewStatus::Ready {
                summary.ready += 1;
            }
            if entry.status.is_missing_raw() {
                summary.missing_raw += 1;
            }
            if entry.status.is_invalid_size() {
                summary.invalid_size += 1;
            }
            if entry.approved {
                summary.approved += 1;
            } else {
                summary.pending_approval += 1;
            }
        }
        summary
    }
}

/// The `manifest.json` artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewManifest {
    /// RFC 3339, UTC.
    pub generated_at: String,
    /// Empty when no raw directory was available.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub raw_dir: String,
    pub framed_dir: String,
    pub output_dir: String,
    pub approval_path: String,
    pub summary: ReviewSummary,
    pub entries: Vec<ReviewEntry>,
}

/// What `generate_review` reports after writing its artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub manifest_path: String,
    pub html_path: String,
    pub approval_path: String,
    pub framed_dir: String,
    pub total: usize,
    pub ready: usize,
    pub missing_raw: usize,
    pub invalid_size: usize,
    pub approved: usize,
    pub pending: usize,
}

/// Parse a generated manifest from disk.
pub fn load_review_manifest(path: &Path) -> Result<ReviewManifest, ShotsError> {
    let data =
        std::fs::read_to_string(path).map_err(|e| ShotsError::io("read review manifest", path, e))?;
    serde_json::from_str(&data).map_err(|e| ShotsError::json("parse review manifest JSON", e))
}

/// Absolute review output directory; blank means [`DEFAULT_REVIEW_OUTPUT_DIR`].
pub fn resolve_review_output_dir(output_dir: Option<&str>) -> Result<PathBuf, ShotsError> {
    let dir = match output_dir.map(str::trim) {
        Some(dir) if !dir.is_empty() => dir,
        _ => DEFAULT_REVIEW_OUTPUT_DIR,
    };
    absolutize(dir, "resolve output directory")
}

pub(crate) fn absolutize(path: &str, op: &'static str) -> Result<PathBuf, ShotsError> {
    std::path::absolute(path).map_err(|e| ShotsError::io(op, path, e))
}
