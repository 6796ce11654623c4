//! Plan executor: runs validated steps in order against a backend.

use crate::backend::{capture, AutomationBackend, CaptureRequest};
use crate::cancel::CancellationToken;
use crate::error::ShotsError;
use crate::plan::model::{Plan, PlanStep, WaitForStep};
use crate::plan::result::{RunResult, StepResult, StepStatus};
use crate::plan::tree::UiNode;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// A failed run: the error plus whatever the run recorded before it stopped.
///
/// `result` is `None` when the plan was rejected before any step ran.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct RunFailure {
    pub result: Option<RunResult>,
    #[source]
    pub error: ShotsError,
}

impl RunFailure {
    fn rejected(error: ShotsError) -> Self {
        Self {
            result: None,
            error,
        }
    }
}

impl From<RunFailure> for ShotsError {
    fn from(failure: RunFailure) -> Self {
        failure.error
    }
}

/// Interprets plans. Cancelling the token aborts the run at its next
/// suspension point or step boundary.
#[derive(Debug, Clone, Default)]
pub struct PlanExecutor {
    cancel: CancellationToken,
}

impl PlanExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancellation(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Validate `plan`, then execute its steps in order.
    ///
    /// Stops at the first failing step; the returned failure carries every
    /// step result recorded so far, with the failing step last.
    #[instrument(skip_all, fields(steps = plan.steps.len()))]
    pub fn execute<B: AutomationBackend + ?Sized>(
        &self,
        backend: &B,
        plan: &Plan,
    ) -> Result<RunResult, RunFailure> {
        plan.validate().map_err(RunFailure::rejected)?;
        let output_dir = prepare_output_dir(plan.app.resolved_output_dir())
            .map_err(RunFailure::rejected)?;

        let mut result = RunResult {
            bundle_id: plan.app.bundle_id.trim().to_string(),
            udid: plan.app.resolved_udid(),
            output_dir: output_dir.to_string_lossy().to_string(),
            steps: Vec::with_capacity(plan.steps.len()),
        };
        let post_action_delay = Duration::from_millis(plan.defaults.post_action_delay_ms);

        info!(
            bundle_id = %result.bundle_id,
            udid = %result.udid,
            output_dir = %result.output_dir,
            "Starting plan run"
        );

        for (offset, step) in plan.steps.iter().enumerate() {
            let index = offset + 1;
            let action = step.action();

            if let Err(error) = self.cancel.check() {
                return Err(RunFailure {
                    result: Some(result),
                    error,
                });
            }

            let start = Instant::now();
            let outcome = self.run_step(backend, &result, &output_dir, step);
            let duration_ms = start.elapsed().as_millis() as u64;

            match outcome {
                Ok(()) => {
                    info!(index, action = %action, duration_ms, "Step completed");
                    result.steps.push(StepResult {
                        index,
                        action: action.to_string(),
                        status: StepStatus::Ok,
                        duration_ms,
                        error: None,
                    });
                }
                Err(cause) => {
                    warn!(index, action = %action, duration_ms, error = %cause, "Step failed");
                    result.steps.push(StepResult {
                        index,
                        action: action.to_string(),
                        status: StepStatus::Error,
                        duration_ms,
                        error: Some(cause.to_string()),
                    });
                    return Err(RunFailure {
                        result: Some(result),
                        error: ShotsError::Step {
                            index,
                            action: action.to_string(),
                            source: Box::new(cause),
                        },
                    });
                }
            }

            if !post_action_delay.is_zero() && !action.is_wait() {
                if let Err(error) = self.cancel.sleep(post_action_delay) {
                    return Err(RunFailure {
                        result: Some(result),
                        error,
                    });
                }
            }
        }

        info!(steps = result.steps.len(), "Plan run completed");
        Ok(result)
    }

    fn run_step<B: AutomationBackend + ?Sized>(
        &self,
        backend: &B,
        run: &RunResult,
        output_dir: &Path,
        step: &PlanStep,
    ) -> Result<(), ShotsError> {
        let udid = run.udid.as_str();
        match step {
            PlanStep::Launch => backend.launch(udid, &run.bundle_id),
            PlanStep::Tap(target) => backend.tap(udid, target),
            PlanStep::Type { text } => backend.type_text(udid, text),
            PlanStep::KeySequence { keycodes } => backend.send_keys(udid, keycodes),
            PlanStep::Wait { duration_ms } => self.cancel.sleep(Duration::from_millis(*duration_ms)),
            PlanStep::WaitFor(wait) => self.wait_for(backend, udid, wait),
            PlanStep::Screenshot { name } => capture(
                backend,
                &CaptureRequest {
                    bundle_id: String::new(),
                    udid: udid.to_string(),
                    name: name.clone(),
                    output_dir: output_dir.to_path_buf(),
                },
            )
            .map(|_| ()),
        }
    }

    /// Poll the accessibility tree until `wait.target` matches or the timeout
    /// elapses. The tree is always queried at least once.
    fn wait_for<B: AutomationBackend + ?Sized>(
        &self,
        backend: &B,
        udid: &str,
        wait: &WaitForStep,
    ) -> Result<(), ShotsError> {
        let timeout_ms = wait.effective_timeout_ms();
        let poll_interval = wait.effective_poll_interval();
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        let mut polls = 0usize;

        loop {
            polls += 1;
            let raw = backend.describe_ui(udid)?;
            let tree = UiNode::parse(&raw).map_err(|source| ShotsError::UiTree {
                command: "describe-ui".to_string(),
                source,
            })?;
            if wait.target.matches(&tree) {
                debug!(polls, "wait_for target found");
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(ShotsError::WaitTimeout { timeout_ms });
            }
            self.cancel.sleep(poll_interval)?;
        }
    }
}

/// Absolutize and create the run's output directory.
fn prepare_output_dir(dir: &str) -> Result<PathBuf, ShotsError> {
    let absolute =
        std::path::absolute(dir).map_err(|e| ShotsError::io("resolve output directory", dir, e))?;
    std::fs::create_dir_all(&absolute)
        .map_err(|e| ShotsError::io("create output directory", &absolute, e))?;
    Ok(absolute)
}
