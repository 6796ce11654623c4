//! Directory layout conventions: `<locale>/<device>/<id>.png`.
//!
//! Screenshots are organised by locale and device directory when those are
//! known. Either level may be missing; a lone leading directory is classified
//! as a locale when it has the shape of a BCP-47 tag and as a device otherwise.

use crate::error::ShotsError;
use std::path::{Component, Path};

/// Infer `(locale, device)` from a path relative to a screenshot root.
///
/// - three or more segments: the first two are locale and device
/// - two segments: the leading directory is a locale if it looks like one,
///   otherwise a device
/// - fewer: neither is known
pub fn infer_locale_and_device(relative_path: &str) -> (String, String) {
    let normalized = relative_path.replace('\\', "/");
    let parts: Vec<&str> = normalized.split('/').collect();

    match parts.len() {
        n if n >= 3 => (parts[0].to_string(), parts[1].to_string()),
        2 if looks_like_locale(parts[0]) => (parts[0].to_string(), String::new()),
        2 => (String::new(), parts[0].to_string()),
        _ => (String::new(), String::new()),
    }
}

/// Whether `token` has the shape of a locale tag such as `en`, `pt-BR`, or
/// `zh_Hans_CN`.
///
/// One to three alphabetic groups separated by `-` or `_`; the first group has
/// 2–3 letters and later groups 2–8.
pub fn looks_like_locale(token: &str) -> bool {
    let clean = token.trim().replace('_', "-");
    if clean.is_empty() {
        return false;
    }

    let parts: Vec<&str> = clean.split('-').collect();
    if parts.len() > 3 {
        return false;
    }

    parts.iter().enumerate().all(|(index, part)| {
        let max_len = if index == 0 { 3 } else { 8 };
        let len = part.chars().count();
        (2..=max_len).contains(&len) && part.chars().all(char::is_alphabetic)
    })
}

/// Screenshot id: the file name without its extension.
pub fn screenshot_id(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// `path` relative to `root`, joined with forward slashes.
pub fn relative_slash_path(root: &Path, path: &Path) -> Result<String, ShotsError> {
    let relative = path.strip_prefix(root).map_err(|_| {
        ShotsError::validation(format!(
            "resolve relative path: {} is not under {}",
            path.display(),
            root.display()
        ))
    })?;

    let segments: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();
    Ok(segments.join("/"))
}

/// Stable review key `locale|device|screenshot_id` with trimmed segments.
pub fn review_key(locale: &str, device: &str, screenshot_id: &str) -> String {
    format!(
        "{}|{}|{}",
        locale.trim(),
        device.trim(),
        screenshot_id.trim()
    )
}
