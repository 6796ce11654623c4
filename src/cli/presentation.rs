//! CLI presentation: text and json formatters per command family.

mod review;
mod run;
mod shared;

pub use review::{format_approve_result_text, format_open_result_text, format_review_result_text};
pub use run::{format_capture_text, format_run_result_text};
pub use shared::{format_section_heading, to_pretty_json};
