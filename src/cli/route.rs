//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::backend::{capture, AxeBackend, CaptureRequest};
use crate::config::{ConfigLoader, ShotsConfig};
use crate::error::ShotsError;
use crate::plan::{Plan, PlanExecutor, RunResult, DEFAULT_OUTPUT_DIR};
use crate::review::{
    approve_review, generate_review, open_review, ApproveRequest, OpenRequest, ReviewRequest,
};
use crate::watch::{WatchConfig, WatchDaemon};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info};

use crate::cli::command_name;
use crate::cli::parse::{Commands, ReviewCommands};
use crate::cli::presentation::{
    format_approve_result_text, format_capture_text, format_open_result_text,
    format_review_result_text, format_run_result_text, to_pretty_json,
};

/// Runtime context for CLI execution: workspace, config path, and loaded config.
pub struct RunContext {
    workspace_root: PathBuf,
    config_path: Option<PathBuf>,
    config: ShotsConfig,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ShotsError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        config.ensure_valid()?;

        Ok(Self {
            workspace_root,
            config_path,
            config,
        })
    }

    pub fn config(&self) -> &ShotsConfig {
        &self.config
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ShotsError> {
        let started = Instant::now();
        let name = command_name(command);
        info!(command = %name, "Command started");
        let result = self.execute_inner(command);
        match &result {
            Ok(_) => info!(
                command = %name,
                duration_ms = started.elapsed().as_millis() as u64,
                "Command finished"
            ),
            Err(e) => error!(command = %name, error = %e, "Command failed"),
        }
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, ShotsError> {
        match command {
            Commands::Run { plan, format } => self.handle_run(plan.as_deref(), format),
            Commands::Capture {
                name,
                bundle_id,
                udid,
                output_dir,
                format,
            } => {
                let request = CaptureRequest {
                    bundle_id: bundle_id.clone().unwrap_or_default(),
                    udid: udid.clone().unwrap_or_default(),
                    name: name.clone(),
                    output_dir: output_dir
                        .clone()
                        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
                };
                let path = capture(&self.backend(), &request)?;
                if format == "json" {
                    to_pretty_json(&serde_json::json!({ "path": path }))
                } else {
                    Ok(format_capture_text(&path))
                }
            }
            Commands::Review { command } => self.handle_review_command(command),
            Commands::Watch {
                raw_dir,
                framed_dir,
                output_dir,
                approval_path,
                frame_config,
            } => {
                let review = &self.config.review;
                let watch_config = WatchConfig {
                    raw_dir: PathBuf::from(self.pick(raw_dir, &review.raw_dir)),
                    framed_dir: PathBuf::from(self.pick(framed_dir, &review.framed_dir)),
                    output_dir: Some(self.pick(output_dir, &review.output_dir)),
                    approval_path: self.pick_optional(approval_path, &review.approval_path),
                    frame_config: frame_config.clone().or_else(|| {
                        self.config
                            .watch
                            .frame_config
                            .as_ref()
                            .map(|p| self.workspace_path(p))
                    }),
                    poll_interval_ms: self.config.watch.poll_interval_ms,
                };
                let daemon = WatchDaemon::new(watch_config);
                info!("Starting watch mode daemon");
                daemon.run()?;
                Ok("Watch daemon stopped".to_string())
            }
        }
    }

    fn handle_run(&self, plan: Option<&Path>, format: &str) -> Result<String, ShotsError> {
        let plan_path = plan
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.workspace_path(&self.config.plan.path));
        let plan = Plan::load(&plan_path)?;
        info!(plan = %plan_path.display(), steps = plan.steps.len(), "Running plan");

        match PlanExecutor::new().execute(&self.backend(), &plan) {
            Ok(result) => self.format_run(&result, format),
            Err(failure) => {
                // Attempted steps are still reported before the error.
                if let Some(result) = &failure.result {
                    println!("{}", self.format_run(result, format)?);
                }
                Err(failure.into())
            }
        }
    }

    fn format_run(&self, result: &RunResult, format: &str) -> Result<String, ShotsError> {
        if format == "text" {
            Ok(format_run_result_text(result))
        } else {
            to_pretty_json(result)
        }
    }

    fn handle_review_command(&self, command: &ReviewCommands) -> Result<String, ShotsError> {
        let review = &self.config.review;
        match command {
            ReviewCommands::Generate {
                raw_dir,
                framed_dir,
                output_dir,
                approval_path,
                format,
            } => {
                let request = ReviewRequest {
                    raw_dir: Some(self.pick(raw_dir, &review.raw_dir)),
                    framed_dir: self.pick(framed_dir, &review.framed_dir),
                    output_dir: Some(self.pick(output_dir, &review.output_dir)),
                    approval_path: self.pick_optional(approval_path, &review.approval_path),
                };
                let result = generate_review(&request)?;
                if format == "json" {
                    to_pretty_json(&result)
                } else {
                    Ok(format_review_result_text(&result))
                }
            }
            ReviewCommands::Open {
                output_dir,
                dry_run,
                format,
            } => {
                let result = open_review(&OpenRequest {
                    output_dir: Some(self.pick(output_dir, &review.output_dir)),
                    dry_run: *dry_run,
                })?;
                if format == "json" {
                    to_pretty_json(&result)
                } else {
                    Ok(format_open_result_text(&result))
                }
            }
            ReviewCommands::Approve {
                all_ready,
                locale,
                device,
                output_dir,
                approval_path,
                format,
            } => {
                let result = approve_review(&ApproveRequest {
                    output_dir: Some(self.pick(output_dir, &review.output_dir)),
                    approval_path: approval_path.clone(),
                    all_ready: *all_ready,
                    locale: locale.clone(),
                    device: device.clone(),
                })?;
                if format == "json" {
                    to_pretty_json(&result)
                } else {
                    Ok(format_approve_result_text(&result))
                }
            }
        }
    }

    fn backend(&self) -> AxeBackend {
        AxeBackend::with_binaries(
            self.config.backend.axe_bin.clone(),
            self.config.backend.xcrun_bin.clone(),
        )
    }

    /// Config paths are relative to the workspace; flag values are used as given.
    fn workspace_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace_root.join(path)
        }
    }

    fn pick(&self, flag: &Option<String>, configured: &str) -> String {
        match flag {
            Some(value) if !value.trim().is_empty() => value.clone(),
            _ => self
                .workspace_path(Path::new(configured))
                .to_string_lossy()
                .to_string(),
        }
    }

    fn pick_optional(&self, flag: &Option<String>, configured: &Option<String>) -> Option<String> {
        match flag {
            Some(value) if !value.trim().is_empty() => Some(value.clone()),
            _ => configured
                .as_deref()
                .filter(|value| !value.trim().is_empty())
                .map(|value| self.pick(&None, value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parse::Cli;
    use crate::review::ApprovalLedger;
    use clap::Parser;
    use tempfile::TempDir;

    fn context(workspace: &Path) -> RunContext {
        RunContext::new(workspace.to_path_buf(), None).unwrap()
    }

    #[test]
    fn test_review_generate_uses_workspace_relative_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let framed = temp_dir.path().join("screenshots").join("framed");
        std::fs::create_dir_all(&framed).unwrap();

        let cli = Cli::try_parse_from(["appshots", "review", "generate", "--format", "json"])
            .unwrap();
        let output = context(temp_dir.path()).execute(&cli.command).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["total"], 0);

        let review_dir = temp_dir.path().join("screenshots").join("review");
        assert!(review_dir.join("manifest.json").is_file());
        assert!(review_dir.join("index.html").is_file());
        assert!(ApprovalLedger::load(review_dir.join("approved.json"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_review_approve_without_selector_fails() {
        let temp_dir = TempDir::new().unwrap();
        let cli = Cli::try_parse_from(["appshots", "review", "approve"]).unwrap();
        let err = context(temp_dir.path()).execute(&cli.command).unwrap_err();
        assert!(err.to_string().contains("provide at least one selector"));
    }

    #[test]
    fn test_run_with_missing_plan_fails() {
        let temp_dir = TempDir::new().unwrap();
        let cli = Cli::try_parse_from(["appshots", "run"]).unwrap();
        let err = context(temp_dir.path()).execute(&cli.command).unwrap_err();
        assert!(err.to_string().contains("plan.json"));
    }

    #[test]
    fn test_invalid_config_file_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("appshots.toml");
        std::fs::write(&config_path, "[watch]\npoll_interval_ms = 0\n").unwrap();

        let err = RunContext::new(temp_dir.path().to_path_buf(), Some(config_path))
            .err()
            .unwrap();
        assert!(err.to_string().contains("poll_interval_ms"));
    }
}
