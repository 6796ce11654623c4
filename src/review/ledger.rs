//! Approval ledger: the persisted set of approved review keys.
//!
//! Three on-disk encodings are read:
//! - `{"<key>": true, ...}` (only `true` values count)
//! - `["<key>", ...]`
//! - `{"approved": ["<key>", ...]}`
//!
//! Only the last one is ever written, with keys sorted.

use crate::error::ShotsError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
struct WrappedLedger {
    approved: Vec<String>,
}

/// Approved keys loaded from (and saved back to) a ledger file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalLedger {
    path: PathBuf,
    keys: BTreeSet<String>,
}

impl ApprovalLedger {
    /// An empty ledger bound to `path`; nothing is read.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            keys: BTreeSet::new(),
        }
    }

    /// Load the ledger at `path`. A missing file is an empty ledger.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ShotsError> {
        let path = path.into();
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "Approval ledger not found, starting empty");
                return Ok(Self::empty(path));
            }
            Err(e) => return Err(ShotsError::io("read approvals file", &path, e)),
        };

        let keys = parse_ledger(&data).ok_or_else(|| {
            ShotsError::validation(format!(
                "parse approvals file {}: expected an object of booleans, a list of keys, or {{\"approved\": [...]}}",
                path.display()
            ))
        })?;
        Ok(Self { path, keys })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn keys(&self) -> &BTreeSet<String> {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn is_approved(&self, key: &str) -> bool {
        self.keys.contains(key.trim())
    }

    /// Add `key` (trimmed). Returns true if it was not already approved.
    pub fn approve(&mut self, key: &str) -> bool {
        let key = key.trim();
        if key.is_empty() {
            return false;
        }
        self.keys.insert(key.to_string())
    }

    /// Write `{"approved": [sorted keys]}` via temp file and rename.
    pub fn save(&self) -> Result<(), ShotsError> {
        let payload = WrappedLedger {
            approved: self.keys.iter().cloned().collect(),
        };
        let mut data = serde_json::to_vec_pretty(&payload)
            .map_err(|e| ShotsError::json("marshal approvals JSON", e))?;
        data.push(b'\n');

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ShotsError::io("create approvals directory", parent, e))?;
        }
        write_atomic(&self.path, &data)
    }
}

fn parse_ledger(data: &[u8]) -> Option<BTreeSet<String>> {
    if let Ok(map) = serde_json::from_slice::<HashMap<String, bool>>(data) {
        return Some(
            map.into_iter()
                .filter(|(_, approved)| *approved)
                .map(|(key, _)| key)
                .filter_map(normalize_key)
                .collect(),
        );
    }
    if let Ok(list) = serde_json::from_slice::<Vec<String>>(data) {
        return Some(list.into_iter().filter_map(normalize_key).collect());
    }
    if let Ok(wrapped) = serde_json::from_slice::<WrappedLedger>(data) {
        return Some(wrapped.approved.into_iter().filter_map(normalize_key).collect());
    }
    None
}

fn normalize_key(key: String) -> Option<String> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Write `data` to a sibling temp file, then rename it over `path`.
pub(crate) fn write_atomic(path: &Path, data: &[u8]) -> Result<(), ShotsError> {
    let mut temp_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, data).map_err(|e| ShotsError::io("write temp file", &temp_path, e))?;
    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        ShotsError::io("replace file", path, e)
    })
}
