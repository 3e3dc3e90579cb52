use serde::{Serialize, Serializer};

use crate::actions::Command;

/// One recorded loop iteration. Only successfully executed actions and
/// terminal actions make it into the trajectory; parse misses, validation
/// rejections and failed dispatches consume their iteration silently.
#[derive(Debug, Clone, Serialize)]
pub struct Step {
    #[serde(rename = "step")]
    pub index: usize,
    /// Persisted in call syntax, e.g. `click(x=640, y=300)`.
    #[serde(serialize_with = "call_syntax")]
    pub action: Command,
    pub reasoning: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

/// Terminal outcome of one task run. The trajectory is frozen once this
/// exists; a Finish or Fail step, when present, is always last.
#[derive(Debug, Clone, Serialize)]
pub struct TaskResult {
    pub success: bool,
    pub steps: usize,
    pub trajectory: Vec<Step>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TaskResult {
    pub fn succeeded(steps: usize, trajectory: Vec<Step>) -> Self {
        Self {
            success: true,
            steps,
            trajectory,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>, steps: usize, trajectory: Vec<Step>) -> Self {
        Self {
            success: false,
            steps,
            trajectory,
            error: Some(error.into()),
        }
    }
}

fn call_syntax<S: Serializer>(command: &Command, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&command.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_serializes_action_in_call_syntax() {
        let step = Step {
            index: 1,
            action: Command::Click { x: 640, y: 300 },
            reasoning: "search box".into(),
            url: "https://example.com".into(),
            result: Some("Clicked at (640, 300)".into()),
        };
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["step"], 1);
        assert_eq!(json["action"], "click(x=640, y=300)");
        assert_eq!(json["result"], "Clicked at (640, 300)");
    }

    #[test]
    fn terminal_step_omits_result_field() {
        let step = Step {
            index: 3,
            action: Command::Finish,
            reasoning: String::new(),
            url: "https://example.com".into(),
            result: None,
        };
        let json = serde_json::to_value(&step).unwrap();
        assert!(json.get("result").is_none());
        assert_eq!(json["action"], "finish()");
    }

    #[test]
    fn failed_result_carries_error() {
        let result = TaskResult::failed("Failed to load page", 0, vec![]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["steps"], 0);
        assert_eq!(json["error"], "Failed to load page");
        assert!(json["trajectory"].as_array().unwrap().is_empty());
    }

    #[test]
    fn succeeded_result_omits_error() {
        let json = serde_json::to_value(TaskResult::succeeded(2, vec![])).unwrap();
        assert_eq!(json["success"], true);
        assert!(json.get("error").is_none());
    }
}
