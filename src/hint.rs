//! Optional operator hints. The orchestrator asks the provider once per
//! step and bounds the call with a timeout, so a silent operator never
//! stalls the loop.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};

/// External hint collaborator. Implementations may block indefinitely;
/// the orchestrator applies the deadline.
#[async_trait]
pub trait HintProvider: Send + Sync {
    /// Returns a hint for the upcoming step, or `None` when the operator
    /// has nothing to say.
    async fn hint(&self) -> Option<String>;
}

/// Reads one line from stdin. Intended for interactive runs where an
/// operator watches the browser and can nudge the model.
pub struct StdinHint;

#[async_trait]
impl HintProvider for StdinHint {
    async fn hint(&self) -> Option<String> {
        let mut line = String::new();
        let mut reader = BufReader::new(tokio::io::stdin());
        match reader.read_line(&mut line).await {
            Ok(0) => None,
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    None
                } else {
                    Some(line.to_string())
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "hint read failed");
                None
            }
        }
    }
}
