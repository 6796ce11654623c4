//! Review command presentation: generate, approve, open.

use super::shared::format_section_heading;
use crate::review::{ApproveResult, OpenResult, ReviewResult};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

pub fn format_review_result_text(result: &ReviewResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Screenshot Review")));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Total", "Ready", "Missing raw", "Invalid size", "Approved", "Pending"]);
    table.add_row(vec![
        result.total.to_string(),
        result.ready.to_string(),
        result.missing_raw.to_string(),
        result.invalid_size.to_string(),
        result.approved.to_string(),
        result.pending.to_string(),
    ]);
    out.push_str(&format!("{}\n\n", table));

    out.push_str(&format!("  Manifest: {}\n", result.manifest_path));
    out.push_str(&format!("  Report: {}\n", result.html_path));
    out.push_str(&format!("  Approvals: {}\n", result.approval_path));
    if result.invalid_size > 0 {
        out.push_str(&format!(
            "\n{}\n",
            format!("{} screenshot(s) have no matching App Store size", result.invalid_size)
                .yellow()
        ));
    }
    out
}

pub fn format_approve_result_text(result: &ApproveResult) -> String {
    let mut out = format!(
        "Matched {} entr{}, newly approved {}, total approved {}\n",
        result.matched,
        if result.matched == 1 { "y" } else { "ies" },
        result.added,
        result.total_approved
    );
    for key in &result.keys {
        out.push_str(&format!("  {}\n", key));
    }
    out.push_str(&format!("Ledger: {}", result.approval_path));
    out
}

pub fn format_open_result_text(result: &OpenResult) -> String {
    if result.opened {
        format!("Opened {}", result.html_path)
    } else {
        result.html_path.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_approve_result_text() {
        let result = ApproveResult {
            approval_path: "/tmp/review/approved.json".to_string(),
            matched: 1,
            added: 1,
            total_approved: 3,
            keys: vec!["en|iPhone_Air|home".to_string()],
        };
        let text = format_approve_result_text(&result);
        assert!(text.starts_with("Matched 1 entry, newly approved 1, total approved 3"));
        assert!(text.contains("  en|iPhone_Air|home\n"));
        assert!(text.ends_with("Ledger: /tmp/review/approved.json"));
    }

    #[test]
    fn test_format_open_result_text_dry_run() {
        let result = OpenResult {
            html_path: "/tmp/review/index.html".to_string(),
            opened: false,
        };
        assert_eq!(format_open_result_text(&result), "/tmp/review/index.html");
    }
}
