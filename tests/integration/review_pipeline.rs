//! Review generation, approval, and regeneration over real image files.

use appshots::review::{
    approve_review, generate_review, load_review_manifest, ApprovalLedger, ApproveRequest,
    ReviewRequest, ReviewStatus,
};
use image::GrayImage;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_png(path: &Path, width: u32, height: u32) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    GrayImage::new(width, height).save(path).unwrap();
}

struct Fixture {
    _temp_dir: TempDir,
    raw: std::path::PathBuf,
    framed: std::path::PathBuf,
    review: std::path::PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_path_buf();
        Self {
            raw: root.join("raw"),
            framed: root.join("framed"),
            review: root.join("review"),
            _temp_dir: temp_dir,
        }
    }

    fn request(&self) -> ReviewRequest {
        ReviewRequest {
            raw_dir: Some(self.raw.to_string_lossy().to_string()),
            framed_dir: self.framed.to_string_lossy().to_string(),
            output_dir: Some(self.review.to_string_lossy().to_string()),
            approval_path: None,
        }
    }

    fn output_dir(&self) -> Option<String> {
        Some(self.review.to_string_lossy().to_string())
    }
}

#[test]
fn test_generate_pairs_raw_by_locale_and_device() {
    let fx = Fixture::new();
    write_png(&fx.framed.join("en/iPhone_Air/home.png"), 1320, 2868);
    write_png(&fx.framed.join("fr/iPhone_Air/home.png"), 1320, 2868);
    write_png(&fx.framed.join("en/iPhone_Air/settings.png"), 100, 100);
    write_png(&fx.raw.join("en/iPhone_Air/home.png"), 10, 10);
    write_png(&fx.raw.join("en/iPhone_Air/settings.png"), 10, 10);

    let result = generate_review(&fx.request()).unwrap();
    assert_eq!(result.total, 3);
    assert_eq!(result.ready, 1);
    assert_eq!(result.missing_raw, 1);
    assert_eq!(result.invalid_size, 1);
    assert_eq!(result.approved, 0);
    assert_eq!(result.pending, 3);

    let manifest = load_review_manifest(&fx.review.join("manifest.json")).unwrap();
    let home_en = manifest
        .entries
        .iter()
        .find(|e| e.key == "en|iPhone_Air|home")
        .unwrap();
    assert_eq!(home_en.status, ReviewStatus::Ready);
    assert_eq!(home_en.raw_relative_path, "en/iPhone_Air/home.png");
    assert_eq!(home_en.display_types, vec!["APP_IPHONE_69"]);

    let home_fr = manifest
        .entries
        .iter()
        .find(|e| e.key == "fr|iPhone_Air|home")
        .unwrap();
    assert_eq!(home_fr.status, ReviewStatus::MissingRaw);

    let html = fs::read_to_string(fx.review.join("index.html")).unwrap();
    assert!(html.contains("Screenshot Review"));
    assert!(html.contains("en|iPhone_Air|home"));
}

#[test]
fn test_approve_then_regenerate_marks_entries_approved() {
    let fx = Fixture::new();
    write_png(&fx.framed.join("en/iPhone_Air/home.png"), 1320, 2868);
    write_png(&fx.framed.join("en/iPhone_Air/details.png"), 1320, 2868);
    write_png(&fx.raw.join("en/iPhone_Air/home.png"), 10, 10);

    generate_review(&fx.request()).unwrap();

    let approved = approve_review(&ApproveRequest {
        output_dir: fx.output_dir(),
        all_ready: true,
        ..ApproveRequest::default()
    })
    .unwrap();
    assert_eq!(approved.keys, vec!["en|iPhone_Air|home"]);
    assert_eq!((approved.matched, approved.added, approved.total_approved), (1, 1, 1));

    let result = generate_review(&fx.request()).unwrap();
    assert_eq!(result.approved, 1);
    assert_eq!(result.pending, 1);

    let manifest = load_review_manifest(&fx.review.join("manifest.json")).unwrap();
    let home = manifest
        .entries
        .iter()
        .find(|e| e.screenshot_id == "home")
        .unwrap();
    assert!(home.approved);
    assert_eq!(manifest.summary.approved, 1);
}

#[test]
fn test_legacy_ledger_formats_are_honored() {
    let fx = Fixture::new();
    write_png(&fx.framed.join("en/iPhone_Air/home.png"), 1320, 2868);
    write_png(&fx.framed.join("en/iPhone_Air/details.png"), 1320, 2868);
    fs::create_dir_all(&fx.review).unwrap();
    fs::write(
        fx.review.join("approved.json"),
        r#"{"en|iPhone_Air|home": true, "en|iPhone_Air|details": false}"#,
    )
    .unwrap();

    let result = generate_review(&fx.request()).unwrap();
    assert_eq!(result.approved, 1);

    let approved = approve_review(&ApproveRequest {
        output_dir: fx.output_dir(),
        locale: Some("en".to_string()),
        ..ApproveRequest::default()
    })
    .unwrap();
    assert_eq!(approved.added, 1);
    assert_eq!(approved.total_approved, 2);

    let saved = fs::read_to_string(fx.review.join("approved.json")).unwrap();
    assert!(saved.contains("\"approved\""));
    let ledger = ApprovalLedger::load(fx.review.join("approved.json")).unwrap();
    assert!(ledger.is_approved("en|iPhone_Air|details"));
}

#[test]
fn test_missing_framed_directory_is_an_error() {
    let fx = Fixture::new();
    let err = generate_review(&fx.request()).unwrap_err();
    assert!(err.to_string().contains("read framed directory"));
    assert!(!fx.review.join("manifest.json").exists());
}
