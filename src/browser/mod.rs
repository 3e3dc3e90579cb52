pub mod cdp;

use async_trait::async_trait;

use crate::actions::Command;
use crate::errors::WebPilotResult;

pub use cdp::CdpBrowser;

/// Browser collaborator owned exclusively by one orchestrator for the
/// lifetime of a run.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Loads the URL; failures are absorbed and reported as `false`.
    async fn navigate(&self, url: &str) -> bool;

    /// Captures the current page as PNG bytes.
    async fn screenshot(&self) -> WebPilotResult<Vec<u8>>;

    async fn current_url(&self) -> WebPilotResult<String>;

    /// Dispatches a non-terminal command. Runtime errors never propagate;
    /// they come back as `(false, message)`.
    async fn execute(&self, command: &Command) -> (bool, String);

    /// Tears down the underlying session. Best effort.
    async fn close(&mut self) {}
}
