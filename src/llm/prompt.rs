//! Prompt text for the vision model. The output format requested here is
//! the wire contract consumed by [`crate::actions::parser`].

/// System prompt parameterized on the viewport so the model knows the
/// coordinate bounds its clicks are checked against.
pub fn system_prompt(viewport_width: u32, viewport_height: u32) -> String {
    format!(
        "\
You are a web navigation agent. Given a screenshot and a task, output the next action.

AVAILABLE ACTIONS:
- click(x, y): Click at pixel coordinates
- type(\"text\"): Type text into focused element
- scroll(direction, amount): Scroll up/down (amount in pixels, default 500)
- wait(seconds): Wait (max 10 seconds)
- press(\"key\"): Press key (Enter, Tab, Escape, etc.)
- finish(): Task completed successfully
- fail(\"reason\"): Task cannot be completed

OUTPUT FORMAT:
Thought: <brief reasoning about what you see and what to do next>
Action: <single action call>

IMPORTANT:
- Viewport is {viewport_width}x{viewport_height} pixels (coordinates must be within this range)
- Only output ONE action at a time
- Be precise with coordinates - look carefully at the screenshot
- After typing in a search box, remember to press(\"Enter\") to submit

EXAMPLE:
Thought: I can see a search box in the center of the page at approximately (640, 300). I need to click it first.
Action: click(640, 300)"
    )
}

/// Builds the textual part of the user turn; the screenshot rides along as
/// a separate image part.
pub fn build_user_message(task: &str, url: &str, history: &[String], hint: Option<&str>) -> String {
    let history_text = if history.is_empty() {
        "None".to_string()
    } else {
        history
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{}. {}", i + 1, h))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let mut message = format!(
        "TASK: {task}\n\nCURRENT URL: {url}\n\nPREVIOUS ACTIONS:\n{history_text}\n"
    );

    if let Some(hint) = hint {
        message.push_str(&format!("\nOPERATOR HINT: {hint}\n"));
    }

    message.push_str(
        "\nLook at the screenshot and decide the next action to accomplish the task.\n\
         Output your thought process, then a single action.",
    );
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_reads_none() {
        let msg = build_user_message("find a mouse", "https://example.com", &[], None);
        assert!(msg.contains("PREVIOUS ACTIONS:\nNone"));
        assert!(msg.contains("TASK: find a mouse"));
        assert!(!msg.contains("OPERATOR HINT"));
    }

    #[test]
    fn history_is_numbered_from_one() {
        let history = vec![
            "click(x=1, y=2) - opened menu".to_string(),
            "type(text=mouse) - entered query".to_string(),
        ];
        let msg = build_user_message("t", "u", &history, None);
        assert!(msg.contains("1. click(x=1, y=2) - opened menu"));
        assert!(msg.contains("2. type(text=mouse) - entered query"));
    }

    #[test]
    fn hint_is_included_when_present() {
        let msg = build_user_message("t", "u", &[], Some("try the top banner"));
        assert!(msg.contains("OPERATOR HINT: try the top banner"));
    }

    #[test]
    fn system_prompt_names_the_configured_viewport() {
        let prompt = system_prompt(1920, 1080);
        assert!(prompt.contains("Viewport is 1920x1080 pixels"));
    }
}
