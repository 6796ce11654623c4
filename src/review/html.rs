//! Self-contained HTML review report.

use crate::review::manifest::{ReviewEntry, ReviewManifest, ReviewStatus};
use std::fmt::Write;

const STYLE: &str = r#"    body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif; margin: 20px; color: #1f2937; }
    h1 { margin: 0 0 8px 0; }
    .meta { margin-bottom: 18px; color: #4b5563; font-size: 14px; }
    .summary { display: grid; grid-template-columns: repeat(6, minmax(120px, 1fr)); gap: 8px; margin-bottom: 18px; }
    .card { border: 1px solid #e5e7eb; border-radius: 8px; padding: 10px; background: #ffffff; }
    .label { font-size: 12px; color: #6b7280; text-transform: uppercase; letter-spacing: 0.04em; }
    .value { font-size: 22px; font-weight: 700; margin-top: 4px; }
    table { width: 100%; border-collapse: collapse; }
    th, td { border: 1px solid #e5e7eb; padding: 8px; vertical-align: top; text-align: left; font-size: 13px; }
    th { background: #f9fafb; position: sticky; top: 0; z-index: 1; }
    .status-ready { color: #166534; font-weight: 600; }
    .status-missing { color: #92400e; font-weight: 600; }
    .status-invalid { color: #991b1b; font-weight: 600; }
    .approval-approved { color: #166534; font-weight: 600; }
    .approval-pending { color: #6b7280; font-weight: 600; }
    .shot { max-height: 340px; max-width: 220px; border: 1px solid #d1d5db; border-radius: 8px; background: #ffffff; }
    .missing { color: #9ca3af; font-style: italic; }
    code { font-family: ui-monospace, SFMono-Regular, Menlo, monospace; }
"#;

/// Escape text for HTML element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Path-only URL for a local absolute file path.
///
/// Separators become `/`, a Windows drive path gains a leading `/`, and bytes
/// outside the unreserved path set are percent-encoded.
pub fn local_file_url(path: &str) -> String {
    if path.trim().is_empty() {
        return String::new();
    }
    let mut slashed = path.replace('\\', "/");
    let bytes = slashed.as_bytes();
    if bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/' {
        slashed.insert(0, '/');
    }

    let mut url = String::with_capacity(slashed.len());
    for byte in slashed.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' => url.push(byte as char),
            b'-' | b'.' | b'_' | b'~' | b'/' | b':' | b'@' | b'!' | b'$' | b'&' | b'\'' | b'('
            | b')' | b'*' | b'+' | b',' | b';' | b'=' => url.push(byte as char),
            _ => {
                let _ = write!(url, "%{:02X}", byte);
            }
        }
    }
    url
}

fn status_class(status: ReviewStatus) -> &'static str {
    match status {
        ReviewStatus::Ready => "status-ready",
        ReviewStatus::MissingRaw => "status-missing",
        ReviewStatus::InvalidSize | ReviewStatus::MissingRawInvalidSize => "status-invalid",
    }
}

fn optional_code(value: &str) -> String {
    if value.is_empty() {
        r#"<span class="missing">-</span>"#.to_string()
    } else {
        format!("<code>{}</code>", escape_html(value))
    }
}

fn image_cell(kind: &str, path: &str, relative: &str, id: &str) -> String {
    let url = escape_html(&local_file_url(path));
    format!(
        concat!(
            "<a href=\"{url}\" target=\"_blank\" rel=\"noopener\">\n",
            "              <img class=\"shot\" src=\"{url}\" alt=\"{kind} {id}\" />\n",
            "            </a><br />\n",
            "            <code>{relative}</code>"
        ),
        url = url,
        kind = kind,
        id = escape_html(id),
        relative = escape_html(relative),
    )
}

fn render_row(out: &mut String, entry: &ReviewEntry) {
    let approval = if entry.approved {
        r#"<span class="approval-approved">approved</span>"#
    } else {
        r#"<span class="approval-pending">pending</span>"#
    };
    let display_types = if entry.display_types.is_empty() {
        r#"<span class="missing">none</span>"#.to_string()
    } else {
        entry
            .display_types
            .iter()
            .map(|dt| format!("<code>{}</code><br />", escape_html(dt)))
            .collect::<String>()
    };
    let raw = if entry.raw_path.is_empty() {
        r#"<span class="missing">missing</span>"#.to_string()
    } else {
        image_cell("raw", &entry.raw_path, &entry.raw_relative_path, &entry.screenshot_id)
    };
    let framed = image_cell(
        "framed",
        &entry.framed_path,
        &entry.framed_relative_path,
        &entry.screenshot_id,
    );

    let _ = write!(
        out,
        concat!(
            "      <tr>\n",
            "        <td><code>{id}</code></td>\n",
            "        <td>{locale}</td>\n",
            "        <td>{device}</td>\n",
            "        <td><span class=\"{status_class}\">{status}</span></td>\n",
            "        <td>{approval}</td>\n",
            "        <td><code>{width}x{height}</code></td>\n",
            "        <td>{display_types}</td>\n",
            "        <td>\n            {raw}\n        </td>\n",
            "        <td>\n            {framed}\n        </td>\n",
            "      </tr>\n"
        ),
        id = escape_html(&entry.screenshot_id),
        locale = optional_code(&entry.locale),
        device = optional_code(&entry.device),
        status_class = status_class(entry.status),
        status = entry.status,
        approval = approval,
        width = entry.width,
        height = entry.height,
        display_types = display_types,
        raw = raw,
        framed = framed,
    );
}

/// Render the full report for `manifest`.
pub fn render_review_html(manifest: &ReviewManifest) -> String {
    let mut out = String::new();
    let summary = &manifest.summary;

    out.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("  <meta charset=\"utf-8\" />\n");
    out.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n");
    out.push_str("  <title>Screenshot Review</title>\n  <style>\n");
    out.push_str(STYLE);
    out.push_str("  </style>\n</head>\n<body>\n  <h1>Screenshot Review</h1>\n");

    let _ = writeln!(out, "  <div class=\"meta\">");
    let _ = writeln!(out, "    Generated at {}<br />", escape_html(&manifest.generated_at));
    let _ = writeln!(
        out,
        "    Framed: <code>{}</code><br />",
        escape_html(&manifest.framed_dir)
    );
    if !manifest.raw_dir.is_empty() {
        let _ = writeln!(
            out,
            "    Raw: <code>{}</code><br />",
            escape_html(&manifest.raw_dir)
        );
    }
    let _ = writeln!(
        out,
        "    Manifest: <code>{}/manifest.json</code>",
        escape_html(&manifest.output_dir)
    );
    out.push_str("  </div>\n\n  <div class=\"summary\">\n");

    for (label, value) in [
        ("Total", summary.total),
        ("Ready", summary.ready),
        ("Missing Raw", summary.missing_raw),
        ("Invalid Size", summary.invalid_size),
        ("Approved", summary.approved),
        ("Pending", summary.pending_approval),
    ] {
        let _ = writeln!(
            out,
            "    <div class=\"card\"><div class=\"label\">{}</div><div class=\"value\">{}</div></div>",
            label, value
        );
    }
    out.push_str("  </div>\n\n  <table>\n    <thead>\n      <tr>\n");
    for header in [
        "ID",
        "Locale",
        "Device",
        "Status",
        "Approval",
        "Dimensions",
        "Display Types",
        "Raw",
        "Framed",
    ] {
        let _ = writeln!(out, "        <th>{}</th>", header);
    }
    out.push_str("      </tr>\n    </thead>\n    <tbody>\n");

    for entry in &manifest.entries {
        render_row(&mut out, entry);
    }

    out.push_str("    </tbody>\n  </table>\n</body>\n</html>\n");
    out
}
