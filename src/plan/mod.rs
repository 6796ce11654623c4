//! Plan engine: the automation script model and its interpreter.

pub mod executor;
pub mod model;
pub mod result;
pub mod tree;

pub use executor::{PlanExecutor, RunFailure};
pub use model::{
    resolve_device, Plan, PlanApp, PlanDefaults, PlanStep, StepAction, TapTarget, WaitForStep,
    DEFAULT_DEVICE, DEFAULT_OUTPUT_DIR, DEFAULT_WAIT_FOR_POLL_INTERVAL_MS,
    DEFAULT_WAIT_FOR_TIMEOUT_MS, SUPPORTED_PLAN_VERSION,
};
pub use result::{RunResult, StepResult, StepStatus};
pub use tree::{UiNode, UiTarget};
