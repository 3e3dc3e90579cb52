//! WebPilot: a vision-driven web navigation agent.
//!
//! The agent looks at the page through screenshots only, asks a multimodal
//! model what to do next, and drives the browser over CDP. The pieces are
//! deliberately separable: [`actions`] is the command grammar, [`browser`]
//! the CDP driver, [`llm`] the model client, and [`agent`] the loop tying
//! them together.

pub mod actions;
pub mod agent;
pub mod browser;
pub mod config;
pub mod errors;
pub mod hint;
pub mod llm;
pub mod sites;

pub use agent::{RunRecorder, TaskResult, WebAgent};
pub use errors::{WebPilotError, WebPilotResult};

/// Installs the global tracing subscriber. RUST_LOG wins when set.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
