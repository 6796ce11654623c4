//! Actions on generated review artifacts: bulk approval and opening the report.

use crate::error::ShotsError;
use crate::review::generate::resolve_approval_path;
use crate::review::ledger::ApprovalLedger;
use crate::review::manifest::{
    load_review_manifest, resolve_review_output_dir, ReviewEntry, ReviewStatus, HTML_FILE_NAME,
    MANIFEST_FILE_NAME,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApproveRequest {
    pub output_dir: Option<String>,
    /// Overrides the manifest's ledger path.
    pub approval_path: Option<String>,
    pub all_ready: bool,
    pub locale: Option<String>,
    pub device: Option<String>,
}

impl ApproveRequest {
    fn locale(&self) -> &str {
        self.locale.as_deref().map(str::trim).unwrap_or("")
    }

    fn device(&self) -> &str {
        self.device.as_deref().map(str::trim).unwrap_or("")
    }

    fn has_selector(&self) -> bool {
        self.all_ready || !self.locale().is_empty() || !self.device().is_empty()
    }

    fn selects(&self, entry: &ReviewEntry) -> bool {
        if self.all_ready && entry.status != ReviewStatus::Ready {
            return false;
        }
        let locale = self.locale();
        let device = self.device();
        (locale.is_empty() || entry.locale == locale) && (device.is_empty() || entry.device == device)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveResult {
    pub approval_path: String,
    pub matched: usize,
    pub added: usize,
    pub total_approved: usize,
    /// Keys of every matched entry, sorted.
    pub keys: Vec<String>,
}

/// Approve every manifest entry matching the request's selectors.
pub fn approve_review(request: &ApproveRequest) -> Result<ApproveResult, ShotsError> {
    if !request.has_selector() {
        return Err(ShotsError::validation(
            "provide at least one selector: --all-ready, --locale, or --device",
        ));
    }

    let output_dir = resolve_review_output_dir(request.output_dir.as_deref())?;
    let manifest = load_review_manifest(&output_dir.join(MANIFEST_FILE_NAME))?;

    let approval_path = match request.approval_path.as_deref().map(str::trim) {
        Some(path) if !path.is_empty() => resolve_approval_path(&output_dir, Some(path)),
        _ if !manifest.approval_path.trim().is_empty() => PathBuf::from(manifest.approval_path.trim()),
        _ => resolve_approval_path(&output_dir, None),
    };
    let mut ledger = ApprovalLedger::load(&approval_path)?;

    let mut keys: Vec<String> = manifest
        .entries
        .iter()
        .filter(|entry| request.selects(entry))
        .map(|entry| entry.key.trim().to_string())
        .filter(|key| !key.is_empty())
        .collect();
    keys.sort();
    keys.dedup();

    let added = keys.iter().filter(|key| ledger.approve(key)).count();
    ledger.save()?;

    info!(
        matched = keys.len(),
        added,
        total_approved = ledger.len(),
        "Review approvals updated"
    );

    Ok(ApproveResult {
        approval_path: approval_path.to_string_lossy().to_string(),
        matched: keys.len(),
        added,
        total_approved: ledger.len(),
        keys,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenRequest {
    pub output_dir: Option<String>,
    /// Resolve and check the report without launching a viewer.
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenResult {
    pub html_path: String,
    pub opened: bool,
}

/// Open `<output_dir>/index.html` with the system's default handler.
pub fn open_review(request: &OpenRequest) -> Result<OpenResult, ShotsError> {
    let output_dir = resolve_review_output_dir(request.output_dir.as_deref())?;
    let html_path = output_dir.join(HTML_FILE_NAME);
    std::fs::metadata(&html_path).map_err(|e| ShotsError::io("read review HTML", &html_path, e))?;

    if !request.dry_run {
        open::that(&html_path).map_err(|e| ShotsError::io("open review HTML", &html_path, e))?;
        info!(path = %html_path.display(), "Opened review report");
    }

    Ok(OpenResult {
        html_path: html_path.to_string_lossy().to_string(),
        opened: !request.dry_run,
    })
}
