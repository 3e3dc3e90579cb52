use serde::{Deserialize, Serialize};

/// The closed command vocabulary the model may issue. Exactly one textual
/// pattern per variant; see [`crate::actions::parser`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    Click { x: i64, y: i64 },
    Type { text: String },
    Scroll { direction: String, amount: i64 },
    Wait { seconds: f64 },
    Press { key: String },
    Finish,
    Fail { reason: String },
}

/// Pixels scrolled when the model omits the amount argument.
pub const DEFAULT_SCROLL_AMOUNT: i64 = 500;

impl Command {
    /// Finish and Fail end the run; everything else is dispatched to the browser.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Command::Finish | Command::Fail { .. })
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Command::Click { .. } => "click",
            Command::Type { .. } => "type",
            Command::Scroll { .. } => "scroll",
            Command::Wait { .. } => "wait",
            Command::Press { .. } => "press",
            Command::Finish => "finish",
            Command::Fail { .. } => "fail",
        }
    }
}

/// Call-syntax rendering, `<kind>(<param>=<value>, ...)`. This is the form
/// written into history entries and persisted trajectories.
impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Click { x, y } => write!(f, "click(x={x}, y={y})"),
            Command::Type { text } => write!(f, "type(text={text})"),
            Command::Scroll { direction, amount } => {
                write!(f, "scroll(direction={direction}, amount={amount})")
            }
            Command::Wait { seconds } => write!(f, "wait(seconds={seconds})"),
            Command::Press { key } => write!(f, "press(key={key})"),
            Command::Finish => write!(f, "finish()"),
            Command::Fail { reason } => write!(f, "fail(reason={reason})"),
        }
    }
}

/// A parsed model decision: the command plus the free-text rationale that
/// accompanied it (empty when the response had no "Thought:" segment).
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub command: Command,
    pub reasoning: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_call_syntax() {
        let cmd = Command::Click { x: 640, y: 300 };
        assert_eq!(cmd.to_string(), "click(x=640, y=300)");

        let cmd = Command::Scroll {
            direction: "down".into(),
            amount: 500,
        };
        assert_eq!(cmd.to_string(), "scroll(direction=down, amount=500)");

        assert_eq!(Command::Finish.to_string(), "finish()");
    }

    #[test]
    fn only_finish_and_fail_are_terminal() {
        assert!(Command::Finish.is_terminal());
        assert!(Command::Fail {
            reason: "blocked".into()
        }
        .is_terminal());
        assert!(!Command::Click { x: 0, y: 0 }.is_terminal());
        assert!(!Command::Wait { seconds: 1.0 }.is_terminal());
    }
}
