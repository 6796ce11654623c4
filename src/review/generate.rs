//! Review artifact generation: manifest, HTML report, and approval ledger.

use crate::error::ShotsError;
use crate::images::{
    collect_images, infer_locale_and_device, read_image_dimensions, relative_slash_path,
    review_key, screenshot_id,
};
use crate::review::display_types::matching_app_display_types;
use crate::review::html::render_review_html;
use crate::review::ledger::{write_atomic, ApprovalLedger};
use crate::review::manifest::{
    absolutize, resolve_review_output_dir, ApprovalState, ReviewEntry, ReviewManifest,
    ReviewResult, ReviewStatus, ReviewSummary, APPROVALS_FILE_NAME, HTML_FILE_NAME,
    MANIFEST_FILE_NAME,
};
use crate::review::raw_index::RawIndex;
use chrono::{SecondsFormat, Utc};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewRequest {
    /// Optional; an unusable raw directory means "no raw captures".
    pub raw_dir: Option<String>,
    pub framed_dir: String,
    /// Defaults to `./screenshots/review`.
    pub output_dir: Option<String>,
    /// Defaults to `<output_dir>/approved.json`; relative paths resolve
    /// against the output directory.
    pub approval_path: Option<String>,
}

/// Resolve the ledger path for an output directory.
pub fn resolve_approval_path(output_dir: &Path, approval_path: Option<&str>) -> PathBuf {
    match approval_path.map(str::trim) {
        Some(path) if !path.is_empty() => {
            let path = Path::new(path);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                output_dir.join(path)
            }
        }
        _ => output_dir.join(APPROVALS_FILE_NAME),
    }
}

/// Scan framed (and raw) screenshots and write the review artifacts.
#[instrument(skip_all, fields(framed_dir = %request.framed_dir))]
pub fn generate_review(request: &ReviewRequest) -> Result<ReviewResult, ShotsError> {
    let framed_dir = request.framed_dir.trim();
    if framed_dir.is_empty() {
        return Err(ShotsError::validation("framed directory is required"));
    }
    let framed_dir = absolutize(framed_dir, "resolve framed directory")?;
    let metadata = std::fs::metadata(&framed_dir)
        .map_err(|e| ShotsError::io("read framed directory", &framed_dir, e))?;
    if !metadata.is_dir() {
        return Err(ShotsError::validation(format!(
            "framed directory must be a directory: {}",
            framed_dir.display()
        )));
    }

    let output_dir = resolve_review_output_dir(request.output_dir.as_deref())?;
    std::fs::create_dir_all(&output_dir)
        .map_err(|e| ShotsError::io("create output directory", &output_dir, e))?;

    let approval_path = resolve_approval_path(&output_dir, request.approval_path.as_deref());
    let ledger = ApprovalLedger::load(&approval_path)?;

    let raw_index = match request.raw_dir.as_deref().map(str::trim) {
        Some(raw_dir) if !raw_dir.is_empty() => {
            let raw_dir = absolutize(raw_dir, "resolve raw directory")?;
            if raw_dir.is_dir() {
                match RawIndex::build(&raw_dir) {
                    Ok(index) => index,
                    Err(e) => {
                        warn!(raw_dir = %raw_dir.display(), error = %e, "Raw directory unreadable, entries will have no raw capture");
                        RawIndex::unavailable()
                    }
                }
            } else {
                warn!(raw_dir = %raw_dir.display(), "Raw directory unavailable, entries will have no raw capture");
                RawIndex::unavailable()
            }
        }
        _ => RawIndex::unavailable(),
    };

    let entries = build_review_entries(&framed_dir, &raw_index, &ledger)?;
    let summary = ReviewSummary::from_entries(&entries);
    let manifest = ReviewManifest {
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        raw_dir: raw_index.root().to_string_lossy().to_string(),
        framed_dir: framed_dir.to_string_lossy().to_string(),
        output_dir: output_dir.to_string_lossy().to_string(),
        approval_path: approval_path.to_string_lossy().to_string(),
        summary,
        entries,
    };

    let manifest_path = output_dir.join(MANIFEST_FILE_NAME);
    let mut manifest_json = serde_json::to_vec_pretty(&manifest)
        .map_err(|e| ShotsError::json("marshal manifest JSON", e))?;
    manifest_json.push(b'\n');
    write_atomic(&manifest_path, &manifest_json)?;

    let html_path = output_dir.join(HTML_FILE_NAME);
    write_atomic(&html_path, render_review_html(&manifest).as_bytes())?;

    if !approval_path.exists() {
        ledger.save()?;
    }

    let summary = &manifest.summary;
    info!(
        total = summary.total,
        ready = summary.ready,
        missing_raw = summary.missing_raw,
        invalid_size = summary.invalid_size,
        approved = summary.approved,
        "Review artifacts generated"
    );

    Ok(ReviewResult {
        manifest_path: manifest_path.to_string_lossy().to_string(),
        html_path: html_path.to_string_lossy().to_string(),
        approval_path: approval_path.to_string_lossy().to_string(),
        framed_dir: manifest.framed_dir.clone(),
        total: summary.total,
        ready: summary.ready,
        missing_raw: summary.missing_raw,
        invalid_size: summary.invalid_size,
        approved: summary.approved,
        pending: summary.pending_approval,
    })
}

fn build_review_entries(
    framed_dir: &Path,
    raw_index: &RawIndex,
    ledger: &ApprovalLedger,
) -> Result<Vec<ReviewEntry>, ShotsError> {
    let framed_files = collect_images(framed_dir)?;
    let mut entries = Vec::with_capacity(framed_files.len());

    for framed_path in framed_files {
        let relative = relative_slash_path(framed_dir, &framed_path)?;
        let id = screenshot_id(&framed_path);
        let (locale, device) = infer_locale_and_device(&relative);

        let (width, height) = read_image_dimensions(&framed_path)?;
        let display_types = matching_app_display_types(width, height);
        let valid_size = !display_types.is_empty();

        let (raw_path, raw_relative_path) = match raw_index.lookup(&locale, &device, &id) {
            Some(raw) => (
                raw.to_string_lossy().to_string(),
                relative_slash_path(raw_index.root(), raw)?,
            ),
            None => (String::new(), String::new()),
        };

        let key = review_key(&locale, &device, &id);
        let approved = ledger.is_approved(&key);
        entries.push(ReviewEntry {
            status: ReviewStatus::derive(!raw_path.is_empty(), valid_size),
            key,
            screenshot_id: id,
            locale,
            device,
            framed_path: framed_path.to_string_lossy().to_string(),
            framed_relative_path: relative,
            raw_path,
            raw_relative_path,
            width,
            height,
            display_types,
            valid_app_store_size: valid_size,
            approved,
            approval_state: ApprovalState::from(approved),
        });
    }

    Ok(entries)
}
