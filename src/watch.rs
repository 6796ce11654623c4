//! Watch mode: regenerate review artifacts when screenshots change.
//!
//! The daemon watches the raw and framed screenshot directories, plus the
//! frame config and the directories its image assets live in, and funnels
//! relevant events into a [`GenerationCoalescer`] around `generate_review`.

use crate::coalescer::GenerationCoalescer;
use crate::error::ShotsError;
use crate::images::is_image_file;
use crate::review::{generate_review, ReviewRequest};
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::RwLock;
use serde::Deserialize;
use std::path::{Component, Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Whether an event of `kind` on `path` should trigger regeneration.
///
/// Only creations and content writes count. The path must be the frame
/// config itself, or an image under one of `tracked_dirs`.
pub fn is_relevant_change(
    path: &Path,
    kind: &EventKind,
    config_path: Option<&Path>,
    tracked_dirs: &[PathBuf],
) -> bool {
    let writes_content = match kind {
        EventKind::Create(_) => true,
        EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any) => true,
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => true,
        _ => false,
    };
    if !writes_content {
        return false;
    }

    if config_path.map(|config| config == path).unwrap_or(false) {
        return true;
    }
    is_image_file(path) && tracked_dirs.iter().any(|dir| path.starts_with(dir))
}

#[derive(Debug, Default, Deserialize)]
struct FrameConfig {
    #[serde(default)]
    screenshots: serde_yaml::Mapping,
}

#[derive(Debug, Default, Deserialize)]
struct FrameScreenshot {
    #[serde(default)]
    content: Vec<FrameContent>,
}

#[derive(Debug, Default, Deserialize)]
struct FrameContent {
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    asset: Option<String>,
}

/// Directories holding the image assets referenced by a frame config.
///
/// Reads `screenshots.<name>.content[]` entries of type `image`. Relative
/// asset paths resolve against the config file's directory. Directories are
/// unique, in first-seen order. Any read or parse problem yields no
/// directories.
pub fn collect_asset_dirs(config_path: &Path) -> Vec<PathBuf> {
    let contents = match std::fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            debug!(path = %config_path.display(), error = %e, "Frame config unreadable");
            return Vec::new();
        }
    };
    let config: FrameConfig = match serde_yaml::from_str(&contents) {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %config_path.display(), error = %e, "Frame config is not valid YAML");
            return Vec::new();
        }
    };

    let config_dir = std::path::absolute(config_path)
        .ok()
        .and_then(|path| path.parent().map(Path::to_path_buf))
        .unwrap_or_default();

    let mut dirs: Vec<PathBuf> = Vec::new();
    for (_, value) in config.screenshots {
        let Ok(screenshot) = serde_yaml::from_value::<FrameScreenshot>(value) else {
            continue;
        };
        for item in screenshot.content {
            if item.kind.trim() != "image" {
                continue;
            }
            let Some(asset) = item.asset.as_deref().map(str::trim).filter(|a| !a.is_empty()) else {
                continue;
            };
            let asset_path = clean_path(&config_dir.join(asset));
            if let Some(parent) = asset_path.parent() {
                let parent = parent.to_path_buf();
                if !dirs.contains(&parent) {
                    dirs.push(parent);
                }
            }
        }
    }
    dirs
}

/// Drop `.` components.
fn clean_path(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Watch mode configuration
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub raw_dir: PathBuf,
    pub framed_dir: PathBuf,
    pub output_dir: Option<String>,
    pub approval_path: Option<String>,
    /// Frame config whose image asset directories are watched too.
    pub frame_config: Option<PathBuf>,
    /// How often the event loop checks for a stop request.
    pub poll_interval_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from(crate::plan::DEFAULT_OUTPUT_DIR),
            framed_dir: PathBuf::from("./screenshots/framed"),
            output_dir: None,
            approval_path: None,
            frame_config: None,
            poll_interval_ms: 200,
        }
    }
}

impl WatchConfig {
    fn review_request(&self) -> ReviewRequest {
        ReviewRequest {
            raw_dir: Some(self.raw_dir.to_string_lossy().to_string()),
            framed_dir: self.framed_dir.to_string_lossy().to_string(),
            output_dir: self.output_dir.clone(),
            approval_path: self.approval_path.clone(),
        }
    }
}

/// Long-running watcher that keeps review artifacts current.
pub struct WatchDaemon {
    config: WatchConfig,
    running: Arc<RwLock<bool>>,
}

impl WatchDaemon {
    pub fn new(config: WatchConfig) -> Self {
        Self {
            config,
            running: Arc::new(RwLock::new(false)),
        }
    }

    /// Ask a running daemon to return from [`WatchDaemon::run`].
    pub fn stop(&self) {
        *self.running.write() = false;
    }

    /// Handle that stops the daemon from another thread.
    pub fn stop_handle(&self) -> WatchStopHandle {
        WatchStopHandle {
            running: Arc::clone(&self.running),
        }
    }

    /// Generate once, then regenerate on relevant changes until stopped.
    ///
    /// Generation failures are logged and never end the loop.
    pub fn run(&self) -> Result<(), ShotsError> {
        *self.running.write() = true;

        let request = self.config.review_request();
        let coalescer = GenerationCoalescer::new(|| match generate_review(&request) {
            Ok(result) => info!(
                total = result.total,
                ready = result.ready,
                html = %result.html_path,
                "Review artifacts regenerated"
            ),
            Err(e) => error!("Review regeneration failed: {}", e),
        });

        let config_path = self
            .config
            .frame_config
            .as_deref()
            .map(std::path::absolute)
            .transpose()
            .map_err(|e| ShotsError::Watch(format!("resolve frame config path: {}", e)))?;

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            if let Err(e) = tx.send(res) {
                error!("Error sending watch event: {}", e);
            }
        })?;

        let mut tracked = Vec::new();
        for dir in [&self.config.raw_dir, &self.config.framed_dir] {
            track_dir(&mut watcher, &mut tracked, dir);
        }
        if let Some(config_path) = &config_path {
            if let Some(config_dir) = config_path.parent() {
                if let Err(e) = watcher.watch(config_dir, RecursiveMode::NonRecursive) {
                    warn!(path = %config_dir.display(), "Cannot watch frame config directory: {}", e);
                }
            }
            for dir in collect_asset_dirs(config_path) {
                track_dir(&mut watcher, &mut tracked, &dir);
            }
        }
        if tracked.is_empty() {
            return Err(ShotsError::Watch("no watchable directories".to_string()));
        }

        info!(dirs = ?tracked, "Watching screenshot directories");

        std::thread::scope(|scope| {
            scope.spawn(|| coalescer.trigger());

            let poll = Duration::from_millis(self.config.poll_interval_ms.max(1));
            while *self.running.read() {
                match rx.recv_timeout(poll) {
                    Ok(Ok(event)) => {
                        if self.handle_event(&event, config_path.as_deref(), &mut watcher, &mut tracked)
                        {
                            scope.spawn(|| coalescer.trigger());
                        }
                    }
                    Ok(Err(e)) => warn!("Watch error: {}", e),
                    Err(mpsc::RecvTimeoutError::Timeout) => {}
                    Err(mpsc::RecvTimeoutError::Disconnected) => {
                        error!("Watcher channel disconnected");
                        break;
                    }
                }
            }
        });

        info!("Watch stopped");
        Ok(())
    }

    /// Returns true when `event` should trigger regeneration. A frame config
    /// change also starts watching any newly referenced asset directories.
    fn handle_event(
        &self,
        event: &Event,
        config_path: Option<&Path>,
        watcher: &mut RecommendedWatcher,
        tracked: &mut Vec<PathBuf>,
    ) -> bool {
        let relevant: Vec<&PathBuf> = event
            .paths
            .iter()
            .filter(|path| is_relevant_change(path, &event.kind, config_path, tracked.as_slice()))
            .collect();
        if relevant.is_empty() {
            return false;
        }

        if let Some(config_path) = config_path {
            if relevant.iter().any(|path| path.as_path() == config_path) {
                for dir in collect_asset_dirs(config_path) {
                    track_dir(watcher, tracked, &dir);
                }
            }
        }
        debug!(paths = ?relevant, kind = ?event.kind, "Relevant change");
        true
    }
}

/// Stops a [`WatchDaemon`] from another thread.
#[derive(Clone)]
pub struct WatchStopHandle {
    running: Arc<RwLock<bool>>,
}

impl WatchStopHandle {
    pub fn stop(&self) {
        *self.running.write() = false;
    }
}

fn track_dir(watcher: &mut RecommendedWatcher, tracked: &mut Vec<PathBuf>, dir: &Path) {
    let dir = match std::path::absolute(dir) {
        Ok(dir) => clean_path(&dir),
        Err(e) => {
            warn!(path = %dir.display(), "Cannot resolve watch directory: {}", e);
            return;
        }
    };
    if tracked.contains(&dir) {
        return;
    }
    if !dir.is_dir() {
        warn!(path = %dir.display(), "Watch directory does not exist, skipping");
        return;
    }
    match watcher.watch(&dir, RecursiveMode::Recursive) {
        Ok(()) => tracked.push(dir),
        Err(e) => warn!(path = %dir.display(), "Cannot watch directory: {}", e),
    }
}
