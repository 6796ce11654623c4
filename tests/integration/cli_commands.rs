//! Binary-level checks for the run and review commands.

use image::GrayImage;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn appshots(workspace: &Path, args: &[&str]) -> Output {
    let home = workspace.join("home");
    fs::create_dir_all(&home).unwrap();
    Command::new(env!("CARGO_BIN_EXE_appshots"))
        .env("HOME", &home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .arg("--workspace")
        .arg(workspace)
        .arg("--quiet")
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_review_generate_and_approve_via_cli() {
    let temp_dir = TempDir::new().unwrap();
    let ws = temp_dir.path();
    let framed = ws.join("screenshots/framed/en/iPhone_Air");
    let raw = ws.join("screenshots/raw/en/iPhone_Air");
    fs::create_dir_all(&framed).unwrap();
    fs::create_dir_all(&raw).unwrap();
    GrayImage::new(1320, 2868).save(framed.join("home.png")).unwrap();
    GrayImage::new(10, 10).save(raw.join("home.png")).unwrap();

    let output = appshots(ws, &["review", "generate", "--format", "json"]);
    assert!(
        output.status.success(),
        "generate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["total"], 1);
    assert_eq!(result["ready"], 1);

    let output = appshots(ws, &["review", "approve", "--all-ready", "--format", "json"]);
    assert!(output.status.success());
    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["matched"], 1);
    assert_eq!(result["keys"][0], "en|iPhone_Air|home");

    let output = appshots(ws, &["review", "open", "--dry-run"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout)
        .trim_end()
        .ends_with("index.html"));
}

#[test]
fn test_approve_without_selector_exits_with_error() {
    let temp_dir = TempDir::new().unwrap();
    let output = appshots(temp_dir.path(), &["review", "approve"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr)
        .contains("provide at least one selector: --all-ready, --locale, or --device"));
}

#[test]
fn test_capture_rejects_path_like_name() {
    let temp_dir = TempDir::new().unwrap();
    let output = appshots(temp_dir.path(), &["capture", "--name", "../escape"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid screenshot name"));
}

#[test]
fn test_run_failure_prints_partial_result() {
    let temp_dir = TempDir::new().unwrap();
    let ws = temp_dir.path();
    let config_dir = ws.join(".appshots");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        format!("[backend]\naxe_bin = \"{}\"\n", ws.join("missing-axe").display()),
    )
    .unwrap();
    fs::write(
        config_dir.join("plan.json"),
        format!(
            r#"{{
                "version": 1,
                "app": {{ "udid": "SIM-1", "output_dir": "{}" }},
                "steps": [{{ "action": "tap", "x": 1, "y": 2 }}]
            }}"#,
            ws.join("out").display()
        ),
    )
    .unwrap();

    let output = appshots(ws, &["run"]);
    assert_eq!(output.status.code(), Some(1));

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["udid"], "SIM-1");
    assert_eq!(result["steps"].as_array().unwrap().len(), 1);
    assert_eq!(result["steps"][0]["action"], "tap");
    assert_eq!(result["steps"][0]["status"], "error");
    assert!(String::from_utf8_lossy(&output.stderr).contains("step 1 (tap)"));
}
