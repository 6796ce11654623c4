//! Plan model: the versioned automation script and its typed steps.
//!
//! On disk a step is a flat JSON object with an `action` field. It is
//! converted into the closed [`PlanStep`] enum on load; fields that do not
//! belong to the step's action are rejected rather than ignored.

use crate::backend::validate_screenshot_name;
use crate::error::ShotsError;
use crate::plan::tree::UiTarget;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// The only plan version this engine executes.
pub const SUPPORTED_PLAN_VERSION: u32 = 1;

/// Device id meaning "the currently booted simulator".
pub const DEFAULT_DEVICE: &str = "booted";

pub const DEFAULT_OUTPUT_DIR: &str = "./screenshots/raw";

pub const DEFAULT_WAIT_FOR_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_WAIT_FOR_POLL_INTERVAL_MS: u64 = 400;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub version: u32,
    pub app: PlanApp,
    #[serde(default)]
    pub defaults: PlanDefaults,
    #[serde(default)]
    pub steps: Vec<PlanStep>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanApp {
    #[serde(default)]
    pub bundle_id: String,
    #[serde(default)]
    pub udid: String,
    #[serde(default)]
    pub output_dir: String,
}

impl PlanApp {
    /// Trimmed device id, or [`DEFAULT_DEVICE`] when unset.
    pub fn resolved_udid(&self) -> String {
        resolve_device(&self.udid)
    }

    /// Trimmed output directory, or [`DEFAULT_OUTPUT_DIR`] when unset.
    pub fn resolved_output_dir(&self) -> &str {
        match self.output_dir.trim() {
            "" => DEFAULT_OUTPUT_DIR,
            dir => dir,
        }
    }
}

/// Trimmed device id, or [`DEFAULT_DEVICE`] when blank.
pub fn resolve_device(udid: &str) -> String {
    match udid.trim() {
        "" => DEFAULT_DEVICE.to_string(),
        udid => udid.to_string(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDefaults {
    /// Pause after every non-wait step.
    #[serde(default)]
    pub post_action_delay_ms: u64,
}

impl Plan {
    /// Parse and validate a plan from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ShotsError> {
        let plan: Plan = serde_json::from_str(json).map_err(|e| ShotsError::json("parse plan JSON", e))?;
        plan.validate()?;
        Ok(plan)
    }

    /// Read, parse, and validate a plan file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ShotsError> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| ShotsError::io("read plan file", path, e))?;
        Self::from_json_str(&contents)
    }

    /// Validate everything that can be checked without touching the device.
    pub fn validate(&self) -> Result<(), ShotsError> {
        if self.version != SUPPORTED_PLAN_VERSION {
            return Err(ShotsError::validation(format!(
                "unsupported plan version {} (expected {})",
                self.version, SUPPORTED_PLAN_VERSION
            )));
        }
        if self.steps.is_empty() {
            return Err(ShotsError::validation("plan must contain at least one step"));
        }
        let launches = self.steps.iter().any(|s| matches!(s, PlanStep::Launch));
        if launches && self.app.bundle_id.trim().is_empty() {
            return Err(ShotsError::validation(
                "app.bundle_id is required when the plan contains a launch step",
            ));
        }
        for (index, step) in self.steps.iter().enumerate() {
            step.validate().map_err(|e| {
                ShotsError::validation(format!("steps[{}] ({}): {}", index, step.action(), e))
            })?;
        }
        Ok(())
    }
}

/// Step action names as they appear in plan files and run results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepAction {
    Launch,
    Tap,
    Type,
    KeySequence,
    Wait,
    WaitFor,
    Screenshot,
}

impl StepAction {
    pub const ALL: [StepAction; 7] = [
        StepAction::Launch,
        StepAction::Tap,
        StepAction::Type,
        StepAction::KeySequence,
        StepAction::Wait,
        StepAction::WaitFor,
        StepAction::Screenshot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepAction::Launch => "launch",
            StepAction::Tap => "tap",
            StepAction::Type => "type",
            StepAction::KeySequence => "key_sequence",
            StepAction::Wait => "wait",
            StepAction::WaitFor => "wait_for",
            StepAction::Screenshot => "screenshot",
        }
    }

    /// Wait actions are not followed by the post-action delay.
    pub fn is_wait(&self) -> bool {
        matches!(self, StepAction::Wait | StepAction::WaitFor)
    }

    /// Raw step fields this action accepts besides `action`.
    fn allowed_fields(&self) -> &'static [&'static str] {
        match self {
            StepAction::Launch => &[],
            StepAction::Tap => &["label", "id", "x", "y"],
            StepAction::Type => &["text"],
            StepAction::KeySequence => &["keycodes"],
            StepAction::Wait => &["duration_ms"],
            StepAction::WaitFor => &["id", "label", "contains", "timeout_ms", "poll_interval_ms"],
            StepAction::Screenshot => &["name"],
        }
    }
}

impl fmt::Display for StepAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepAction {
    type Err = ShotsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        StepAction::ALL
            .into_iter()
            .find(|action| action.as_str() == normalized)
            .ok_or_else(|| ShotsError::validation(format!("unsupported action {:?}", s.trim())))
    }
}

/// How a `tap` step selects its target. Exactly one selector per step.
#[derive(Debug, Clone, PartialEq)]
pub enum TapTarget {
    Label(String),
    Id(String),
    Point { x: f64, y: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaitForStep {
    pub target: UiTarget,
    pub timeout_ms: Option<u64>,
    pub poll_interval_ms: Option<u64>,
}

impl WaitForStep {
    /// Explicit positive timeout, else [`DEFAULT_WAIT_FOR_TIMEOUT_MS`].
    pub fn effective_timeout_ms(&self) -> u64 {
        self.timeout_ms
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_WAIT_FOR_TIMEOUT_MS)
    }

    /// Explicit positive poll interval, else [`DEFAULT_WAIT_FOR_POLL_INTERVAL_MS`].
    pub fn effective_poll_interval(&self) -> Duration {
        Duration::from_millis(
            self.poll_interval_ms
                .filter(|ms| *ms > 0)
                .unwrap_or(DEFAULT_WAIT_FOR_POLL_INTERVAL_MS),
        )
    }
}

/// One automation step; each variant carries only the data its action uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStep", into = "RawStep")]
pub enum PlanStep {
    Launch,
    Tap(TapTarget),
    Type { text: String },
    KeySequence { keycodes: Vec<u32> },
    Wait { duration_ms: u64 },
    WaitFor(WaitForStep),
    Screenshot { name: String },
}

impl PlanStep {
    pub fn action(&self) -> StepAction {
        match self {
            PlanStep::Launch => StepAction::Launch,
            PlanStep::Tap(_) => StepAction::Tap,
            PlanStep::Type { .. } => StepAction::Type,
            PlanStep::KeySequence { .. } => StepAction::KeySequence,
            PlanStep::Wait { .. } => StepAction::Wait,
            PlanStep::WaitFor(_) => StepAction::WaitFor,
            PlanStep::Screenshot { .. } => StepAction::Screenshot,
        }
    }

    /// Check the variant's own invariants.
    pub fn validate(&self) -> Result<(), ShotsError> {
        match self {
            PlanStep::Launch | PlanStep::Wait { .. } => Ok(()),
            PlanStep::Tap(TapTarget::Label(value)) | PlanStep::Tap(TapTarget::Id(value)) => {
                if value.trim().is_empty() {
                    Err(ShotsError::validation("tap selector cannot be empty"))
                } else {
                    Ok(())
                }
            }
            PlanStep::Tap(TapTarget::Point { x, y }) => {
                if x.is_finite() && y.is_finite() {
                    Ok(())
                } else {
                    Err(ShotsError::validation("tap coordinates must be finite numbers"))
                }
            }
            PlanStep::Type { text } => {
                if text.is_empty() {
                    Err(ShotsError::validation("type requires text"))
                } else {
                    Ok(())
                }
            }
            PlanStep::KeySequence { keycodes } => {
                if keycodes.is_empty() {
                    Err(ShotsError::validation("key_sequence requires at least one keycode"))
                } else {
                    Ok(())
                }
            }
            PlanStep::WaitFor(wait) => {
                if wait.target.is_empty() {
                    Err(ShotsError::validation(
                        "wait_for requires at least one of id, label, or contains",
                    ))
                } else {
                    Ok(())
                }
            }
            PlanStep::Screenshot { name } => validate_screenshot_name(name),
        }
    }
}

/// Flat on-disk step shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStep {
    action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    keycodes: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    contains: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    poll_interval_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl RawStep {
    fn present_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        let mut mark = |present: bool, name: &'static str| {
            if present {
                fields.push(name);
            }
        };
        mark(self.label.is_some(), "label");
        mark(self.id.is_some(), "id");
        mark(self.x.is_some(), "x");
        mark(self.y.is_some(), "y");
        mark(self.text.is_some(), "text");
        mark(self.keycodes.is_some(), "keycodes");
        mark(self.duration_ms.is_some(), "duration_ms");
        mark(self.contains.is_some(), "contains");
        mark(self.timeout_ms.is_some(), "timeout_ms");
        mark(self.poll_interval_ms.is_some(), "poll_interval_ms");
        mark(self.name.is_some(), "name");
        fields
    }
}

fn non_blank(value: &Option<String>) -> bool {
    value.as_deref().map(|v| !v.trim().is_empty()).unwrap_or(false)
}

impl TryFrom<RawStep> for PlanStep {
    type Error = ShotsError;

    fn try_from(raw: RawStep) -> Result<Self, Self::Error> {
        let action: StepAction = raw.action.parse()?;

        let foreign: Vec<&str> = raw
            .present_fields()
            .into_iter()
            .filter(|field| !action.allowed_fields().contains(field))
            .collect();
        if !foreign.is_empty() {
            return Err(ShotsError::validation(format!(
                "{} step does not accept field(s): {}",
                action,
                foreign.join(", ")
            )));
        }

        let step = match action {
            StepAction::Launch => PlanStep::Launch,
            StepAction::Tap => {
                let has_point = raw.x.is_some() || raw.y.is_some();
                let selectors =
                    [non_blank(&raw.label), non_blank(&raw.id), has_point].iter().filter(|s| **s).count();
                if selectors != 1 {
                    return Err(ShotsError::validation(
                        "tap requires exactly one of label, id, or x/y",
                    ));
                }
                match (raw.label, raw.id, raw.x, raw.y) {
                    (Some(label), _, _, _) if !label.trim().is_empty() => {
                        PlanStep::Tap(TapTarget::Label(label))
                    }
                    (_, Some(id), _, _) if !id.trim().is_empty() => PlanStep::Tap(TapTarget::Id(id)),
                    (_, _, Some(x), Some(y)) => PlanStep::Tap(TapTarget::Point { x, y }),
                    _ => return Err(ShotsError::validation("tap coordinates require both x and y")),
                }
            }
            StepAction::Type => PlanStep::Type {
                text: raw
                    .text
                    .ok_or_else(|| ShotsError::validation("type requires text"))?,
            },
            StepAction::KeySequence => PlanStep::KeySequence {
                keycodes: raw.keycodes.unwrap_or_default(),
            },
            StepAction::Wait => PlanStep::Wait {
                duration_ms: raw
                    .duration_ms
                    .ok_or_else(|| ShotsError::validation("wait requires duration_ms"))?,
            },
            StepAction::WaitFor => PlanStep::WaitFor(WaitForStep {
                target: UiTarget {
                    id: raw.id,
                    label: raw.label,
                    contains: raw.contains,
                },
                timeout_ms: raw.timeout_ms,
                poll_interval_ms: raw.poll_interval_ms,
            }),
            StepAction::Screenshot => PlanStep::Screenshot {
                name: raw
                    .name
                    .ok_or_else(|| ShotsError::validation("screenshot requires name"))?,
            },
        };

        step.validate()?;
        Ok(step)
    }
}

impl From<PlanStep> for RawStep {
    fn from(step: PlanStep) -> Self {
        let mut raw = RawStep {
            action: step.action().as_str().to_string(),
            ..RawStep::default()
        };
        match step {
            PlanStep::Launch => {}
            PlanStep::Tap(TapTarget::Label(label)) => raw.label = Some(label),
            PlanStep::Tap(TapTarget::Id(id)) => raw.id = Some(id),
            PlanStep::Tap(TapTarget::Point { x, y }) => {
                raw.x = Some(x);
                raw.y = Some(y);
            }
            PlanStep::Type { text } => raw.text = Some(text),
            PlanStep::KeySequence { keycodes } => raw.keycodes = Some(keycodes),
            PlanStep::Wait { duration_ms } => raw.duration_ms = Some(duration_ms),
            PlanStep::WaitFor(wait) => {
                raw.id = wait.target.id;
                raw.label = wait.target.label;
                raw.contains = wait.target.contains;
                raw.timeout_ms = wait.timeout_ms;
                raw.poll_interval_ms = wait.poll_interval_ms;
            }
            PlanStep::Screenshot { name } => raw.name = Some(name),
        }
        raw
    }
}
