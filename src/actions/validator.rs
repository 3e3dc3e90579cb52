//! Environment-constraint checks applied to parsed commands before dispatch.
//!
//! Validation is pure: no side effects, the command is never mutated. Only
//! Click, Scroll and Wait carry constraints; every other variant is
//! unconditionally valid.

use crate::actions::types::Command;

/// Runtime bounds the orchestrator supplies for one run.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub max_wait_secs: f64,
}

pub fn validate(command: &Command, limits: &Limits) -> Result<(), String> {
    match command {
        Command::Click { x, y } => {
            let w = i64::from(limits.viewport_width);
            let h = i64::from(limits.viewport_height);
            if !(0..=w).contains(x) || !(0..=h).contains(y) {
                return Err(format!(
                    "Click coordinates ({x}, {y}) outside viewport {w}x{h}"
                ));
            }
        }
        Command::Scroll { direction, .. } => {
            if direction != "up" && direction != "down" {
                return Err(format!("Invalid scroll direction: {direction}"));
            }
        }
        Command::Wait { seconds } => {
            if *seconds > limits.max_wait_secs {
                return Err(format!(
                    "Wait time too long (max {}s)",
                    limits.max_wait_secs
                ));
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMITS: Limits = Limits {
        viewport_width: 1280,
        viewport_height: 720,
        max_wait_secs: 10.0,
    };

    #[test]
    fn click_outside_viewport_is_rejected_with_bounds() {
        let err = validate(&Command::Click { x: 2000, y: 300 }, &LIMITS).unwrap_err();
        assert!(err.contains("(2000, 300)"));
        assert!(err.contains("1280x720"));
    }

    #[test]
    fn click_bounds_are_inclusive() {
        assert!(validate(&Command::Click { x: 0, y: 0 }, &LIMITS).is_ok());
        assert!(validate(&Command::Click { x: 1280, y: 720 }, &LIMITS).is_ok());
        assert!(validate(&Command::Click { x: 1281, y: 720 }, &LIMITS).is_err());
        assert!(validate(&Command::Click { x: 1280, y: 721 }, &LIMITS).is_err());
    }

    #[test]
    fn scroll_direction_must_be_up_or_down() {
        let sideways = Command::Scroll {
            direction: "sideways".into(),
            amount: 500,
        };
        let err = validate(&sideways, &LIMITS).unwrap_err();
        assert!(err.contains("sideways"));

        for dir in ["up", "down"] {
            let cmd = Command::Scroll {
                direction: dir.into(),
                amount: 500,
            };
            assert!(validate(&cmd, &LIMITS).is_ok());
        }
    }

    #[test]
    fn wait_ceiling_is_inclusive() {
        assert!(validate(&Command::Wait { seconds: 10.0 }, &LIMITS).is_ok());
        assert!(validate(&Command::Wait { seconds: 11.0 }, &LIMITS).is_err());
    }

    #[test]
    fn unconstrained_variants_are_always_valid() {
        assert!(validate(&Command::Finish, &LIMITS).is_ok());
        assert!(validate(
            &Command::Type {
                text: "anything".into()
            },
            &LIMITS
        )
        .is_ok());
        assert!(validate(
            &Command::Press {
                key: "Enter".into()
            },
            &LIMITS
        )
        .is_ok());
        assert!(validate(
            &Command::Fail {
                reason: "stuck".into()
            },
            &LIMITS
        )
        .is_ok());
    }
}
