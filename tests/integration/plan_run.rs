//! End-to-end plan runs against an in-memory simulator.

use appshots::backend::AutomationBackend;
use appshots::plan::{Plan, PlanExecutor, StepStatus, TapTarget};
use appshots::ShotsError;
use parking_lot::Mutex;
use serde_json::json;
use std::path::Path;
use tempfile::TempDir;

/// Simulator with two screens; tapping `open-settings` switches to settings.
#[derive(Default)]
struct FakeSimulator {
    launched: Mutex<Option<String>>,
    screen: Mutex<&'static str>,
    typed: Mutex<String>,
    keys: Mutex<Vec<u32>>,
}

impl FakeSimulator {
    fn tree(&self) -> serde_json::Value {
        match *self.screen.lock() {
            "home" => json!([{
                "AXLabel": "Home",
                "children": [{ "AXUniqueId": "open-settings", "AXLabel": "Settings" }]
            }]),
            "settings" => json!([{
                "AXLabel": "Settings",
                "children": [{ "AXUniqueId": "search", "AXValue": self.typed.lock().clone() }]
            }]),
            _ => json!([]),
        }
    }
}

impl AutomationBackend for FakeSimulator {
    fn launch(&self, _device: &str, bundle_id: &str) -> Result<(), ShotsError> {
        *self.launched.lock() = Some(bundle_id.to_string());
        *self.screen.lock() = "home";
        Ok(())
    }

    fn tap(&self, _device: &str, target: &TapTarget) -> Result<(), ShotsError> {
        match target {
            TapTarget::Id(id) if id == "open-settings" => {
                *self.screen.lock() = "settings";
                Ok(())
            }
            TapTarget::Point { .. } => Ok(()),
            other => Err(ShotsError::Backend {
                command: "axe".to_string(),
                detail: format!("exit status: 1 (output: no element for {:?})", other),
            }),
        }
    }

    fn type_text(&self, _device: &str, text: &str) -> Result<(), ShotsError> {
        self.typed.lock().push_str(text);
        Ok(())
    }

    fn send_keys(&self, _device: &str, keycodes: &[u32]) -> Result<(), ShotsError> {
        self.keys.lock().extend_from_slice(keycodes);
        Ok(())
    }

    fn describe_ui(&self, _device: &str) -> Result<String, ShotsError> {
        Ok(self.tree().to_string())
    }

    fn screenshot(&self, _device: &str, path: &Path) -> Result<(), ShotsError> {
        std::fs::write(path, self.screen.lock().as_bytes())
            .map_err(|e| ShotsError::io("write screenshot", path, e))
    }
}

fn plan_json(output_dir: &Path, steps: serde_json::Value) -> String {
    json!({
        "version": 1,
        "app": {
            "bundle_id": "com.example.notes",
            "output_dir": output_dir.to_string_lossy(),
        },
        "steps": steps,
    })
    .to_string()
}

#[test]
fn test_full_plan_captures_each_screen() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("raw");
    let plan = Plan::from_json_str(&plan_json(
        &output_dir,
        json!([
            { "action": "launch" },
            { "action": "wait_for", "label": "home", "timeout_ms": 1000, "poll_interval_ms": 10 },
            { "action": "screenshot", "name": "home" },
            { "action": "tap", "id": "open-settings" },
            { "action": "type", "text": "dark mode" },
            { "action": "key_sequence", "keycodes": [40] },
            { "action": "wait_for", "contains": "DARK", "timeout_ms": 1000, "poll_interval_ms": 10 },
            { "action": "screenshot", "name": "settings" }
        ]),
    ))
    .unwrap();

    let simulator = FakeSimulator::default();
    let result = PlanExecutor::new().execute(&simulator, &plan).unwrap();

    assert!(result.is_success());
    assert_eq!(result.steps.len(), 8);
    assert_eq!(result.udid, "booted");
    assert!(Path::new(&result.output_dir).is_absolute());
    assert_eq!(
        result.steps.iter().map(|s| s.index).collect::<Vec<_>>(),
        (1..=8).collect::<Vec<_>>()
    );
    assert_eq!(simulator.launched.lock().as_deref(), Some("com.example.notes"));
    assert_eq!(*simulator.keys.lock(), vec![40]);
    assert_eq!(std::fs::read_to_string(output_dir.join("home.png")).unwrap(), "home");
    assert_eq!(
        std::fs::read_to_string(output_dir.join("settings.png")).unwrap(),
        "settings"
    );
}

#[test]
fn test_failing_step_stops_the_run_with_partial_result() {
    let temp_dir = TempDir::new().unwrap();
    let plan = Plan::from_json_str(&plan_json(
        temp_dir.path(),
        json!([
            { "action": "launch" },
            { "action": "tap", "x": 10, "y": 20 },
            { "action": "tap", "label": "Missing" },
            { "action": "screenshot", "name": "never" }
        ]),
    ))
    .unwrap();

    let failure = PlanExecutor::new()
        .execute(&FakeSimulator::default(), &plan)
        .unwrap_err();
    let result = failure.result.as_ref().unwrap();

    assert_eq!(result.steps.len(), 3);
    assert_eq!(result.steps[2].status, StepStatus::Error);
    assert!(result.steps[..2].iter().all(|s| s.status == StepStatus::Ok));
    assert!(failure.error.to_string().starts_with("step 3 (tap): axe:"));
    assert!(!temp_dir.path().join("never.png").exists());
}

#[test]
fn test_wait_for_timeout_is_reported_as_step_error() {
    let temp_dir = TempDir::new().unwrap();
    let plan = Plan::from_json_str(&plan_json(
        temp_dir.path(),
        json!([
            { "action": "launch" },
            { "action": "wait_for", "id": "never-there", "timeout_ms": 60, "poll_interval_ms": 20 }
        ]),
    ))
    .unwrap();

    let failure = PlanExecutor::new()
        .execute(&FakeSimulator::default(), &plan)
        .unwrap_err();

    match &failure.error {
        ShotsError::Step { index, source, .. } => {
            assert_eq!(*index, 2);
            assert!(source.is_wait_timeout());
        }
        other => panic!("unexpected error: {other}"),
    }
    let step = &failure.result.unwrap().steps[1];
    assert!(step.duration_ms >= 60);
}
