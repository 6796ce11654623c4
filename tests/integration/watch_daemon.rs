//! Watch daemon regenerates review artifacts as screenshots appear.

use appshots::review::load_review_manifest;
use appshots::watch::{WatchConfig, WatchDaemon};
use image::GrayImage;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Render a PNG in `staging` and rename it into place in one step.
fn publish_png(staging: &Path, destination: &Path, width: u32, height: u32) {
    fs::create_dir_all(staging).unwrap();
    fs::create_dir_all(destination.parent().unwrap()).unwrap();
    let staged = staging.join(destination.file_name().unwrap());
    GrayImage::new(width, height).save(&staged).unwrap();
    fs::rename(&staged, destination).unwrap();
}

fn wait_for_total(manifest_path: &Path, expected: usize) -> bool {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        if let Ok(manifest) = load_review_manifest(manifest_path) {
            if manifest.entries.len() == expected {
                return true;
            }
        }
        thread::sleep(Duration::from_millis(50));
    }
    false
}

#[test]
fn test_watch_regenerates_when_framed_image_is_added() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let raw: PathBuf = root.join("raw");
    let framed: PathBuf = root.join("framed");
    let review: PathBuf = root.join("review");
    let staging = root.join("staging");
    fs::create_dir_all(&raw).unwrap();
    publish_png(&staging, &framed.join("en/iPhone_Air/home.png"), 1320, 2868);

    let daemon = WatchDaemon::new(WatchConfig {
        raw_dir: raw.clone(),
        framed_dir: framed.clone(),
        output_dir: Some(review.to_string_lossy().to_string()),
        poll_interval_ms: 20,
        ..WatchConfig::default()
    });
    let stop = daemon.stop_handle();
    let handle = thread::spawn(move || daemon.run());

    let manifest_path = review.join("manifest.json");
    assert!(wait_for_total(&manifest_path, 1), "initial generation did not run");

    publish_png(&staging, &framed.join("en/iPhone_Air/settings.png"), 1320, 2868);
    assert!(
        wait_for_total(&manifest_path, 2),
        "adding a framed image did not regenerate the manifest"
    );

    stop.stop();
    handle.join().unwrap().unwrap();
}

#[test]
fn test_watch_without_existing_directories_fails() {
    let temp_dir = TempDir::new().unwrap();
    let daemon = WatchDaemon::new(WatchConfig {
        raw_dir: temp_dir.path().join("missing-raw"),
        framed_dir: temp_dir.path().join("missing-framed"),
        ..WatchConfig::default()
    });
    let err = daemon.run().unwrap_err();
    assert!(err.to_string().contains("no watchable directories"));
}
