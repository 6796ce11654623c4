//! Shared presentation helpers.

use crate::error::ShotsError;
use owo_colors::OwoColorize;
use serde::Serialize;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Pretty JSON for `--format json`.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, ShotsError> {
    serde_json::to_string_pretty(value).map_err(|e| ShotsError::Json {
        op: "encode output",
        source: e,
    })
}
