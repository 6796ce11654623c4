//! Plan run and capture presentation.

use super::shared::format_section_heading;
use crate::plan::{RunResult, StepStatus};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use std::path::Path;

pub fn format_run_result_text(result: &RunResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Plan Run")));
    out.push_str(&format!("  Bundle ID: {}\n", result.bundle_id));
    out.push_str(&format!("  Device: {}\n", result.udid));
    out.push_str(&format!("  Output: {}\n\n", result.output_dir));

    if result.steps.is_empty() {
        out.push_str("No steps were run.\n");
        return out;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["#", "Action", "Status", "Duration", "Error"]);
    for step in &result.steps {
        table.add_row(vec![
            step.index.to_string(),
            step.action.clone(),
            step.status.to_string(),
            format!("{}ms", step.duration_ms),
            step.error.clone().unwrap_or_default(),
        ]);
    }
    out.push_str(&format!("{}\n", table));

    let ok = result
        .steps
        .iter()
        .filter(|s| s.status == StepStatus::Ok)
        .count();
    let summary = format!("{}/{} steps ok", ok, result.steps.len());
    if result.is_success() {
        out.push_str(&format!("\n{}\n", summary.green()));
    } else {
        out.push_str(&format!("\n{}\n", summary.red()));
    }
    out
}

pub fn format_capture_text(path: &Path) -> String {
    format!("Captured {}", path.display())
}
