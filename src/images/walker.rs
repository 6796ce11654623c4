//! Image walker: collects screenshot files under a directory tree.

use crate::error::ShotsError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions recognised as screenshot images (compared case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Whether `path` has one of the [`IMAGE_EXTENSIONS`].
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Walk `root` recursively and collect every image file.
///
/// Paths are sorted by their full string form, so `a-b/x.png` comes before
/// `a/x.png`. First-wins raw lookups and manifest order depend on it.
pub fn collect_images(root: &Path) -> Result<Vec<PathBuf>, ShotsError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
            ShotsError::io(
                "scan screenshot directory",
                path,
                e.into_io_error().unwrap_or_else(|| {
                    std::io::Error::new(std::io::ErrorKind::Other, "filesystem loop detected")
                }),
            )
        })?;

        if entry.file_type().is_dir() {
            continue;
        }
        if !is_image_file(entry.path()) {
            continue;
        }
        files.push(entry.into_path());
    }

    files.sort_by(|a, b| a.to_string_lossy().cmp(&b.to_string_lossy()));
    Ok(files)
}

/// Read pixel dimensions from the image header.
pub fn read_image_dimensions(path: &Path) -> Result<(u32, u32), ShotsError> {
    image::image_dimensions(path).map_err(|source| ShotsError::Image {
        path: path.to_path_buf(),
        source,
    })
}
