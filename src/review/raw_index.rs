//! Index of raw captures used to pair each framed image with its source.

use crate::error::ShotsError;
use crate::images::{collect_images, infer_locale_and_device, relative_slash_path, review_key, screenshot_id};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
struct RawFile {
    path: PathBuf,
    locale: String,
    device: String,
}

impl RawFile {
    fn is_generic(&self) -> bool {
        self.locale.is_empty() && self.device.is_empty()
    }
}

/// Raw captures keyed by review key and by bare screenshot id.
///
/// Review keys keep the first file seen. A bare id seen on two different files
/// is ambiguous and is never resolvable through the bare-id lookup.
#[derive(Debug, Clone, Default)]
pub struct RawIndex {
    root: PathBuf,
    by_key: HashMap<String, RawFile>,
    by_id: HashMap<String, RawFile>,
    ambiguous_ids: HashSet<String>,
}

impl RawIndex {
    /// An index with no raw files; every lookup misses.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Scan `root` for raw images.
    pub fn build(root: &Path) -> Result<Self, ShotsError> {
        let mut index = RawIndex {
            root: root.to_path_buf(),
            ..RawIndex::default()
        };

        for path in collect_images(root)? {
            let id = screenshot_id(&path).trim().to_string();
            let relative = relative_slash_path(root, &path)?;
            let (locale, device) = infer_locale_and_device(&relative);
            let file = RawFile {
                path: path.clone(),
                locale,
                device,
            };

            if !index.ambiguous_ids.contains(&id) {
                match index.by_id.get(&id) {
                    None => {
                        index.by_id.insert(id.clone(), file.clone());
                    }
                    Some(existing) if existing.path != path => {
                        index.by_id.remove(&id);
                        index.ambiguous_ids.insert(id.clone());
                    }
                    Some(_) => {}
                }
            }

            index
                .by_key
                .entry(review_key(&file.locale, &file.device, &id))
                .or_insert(file);
        }

        Ok(index)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_ambiguous(&self, screenshot_id: &str) -> bool {
        self.ambiguous_ids.contains(screenshot_id.trim())
    }

    /// Find the raw capture for a framed image.
    ///
    /// Exact review-key match first. Otherwise the unambiguous bare-id match
    /// is accepted when the framed entry has no locale or device, when the
    /// candidate has none, or when every locale/device the framed entry does
    /// have agrees with the candidate's.
    pub fn lookup(&self, locale: &str, device: &str, screenshot_id: &str) -> Option<&Path> {
        if let Some(file) = self.by_key.get(&review_key(locale, device, screenshot_id)) {
            return Some(&file.path);
        }

        let candidate = self.by_id.get(screenshot_id.trim())?;
        let framed_generic = locale.is_empty() && device.is_empty();
        let compatible = (locale.is_empty() || locale == candidate.locale)
            && (device.is_empty() || device == candidate.device);

        if framed_generic || candidate.is_generic() || compatible {
            Some(&candidate.path)
        } else {
            None
        }
    }
}
