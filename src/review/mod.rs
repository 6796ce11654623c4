//! Review/approval pipeline.
//!
//! Pairs framed screenshots with their raw captures, derives a status per
//! entry, and writes `manifest.json`, `index.html`, and the approval ledger
//! into the review output directory.

pub mod actions;
pub mod display_types;
pub mod generate;
pub mod html;
pub mod ledger;
pub mod manifest;
pub mod raw_index;

pub use actions::{approve_review, open_review, ApproveRequest, ApproveResult, OpenRequest, OpenResult};
pub use display_types::{matching_app_display_types, DisplayType, DISPLAY_TYPES};
pub use generate::{generate_review, resolve_approval_path, ReviewRequest};
pub use ledger::ApprovalLedger;
pub use manifest::{
    load_review_manifest, resolve_review_output_dir, ApprovalState, ReviewEntry, ReviewManifest,
    ReviewResult, ReviewStatus, ReviewSummary, APPROVALS_FILE_NAME, DEFAULT_REVIEW_OUTPUT_DIR,
    HTML_FILE_NAME, MANIFEST_FILE_NAME,
};
pub use raw_index::RawIndex;
