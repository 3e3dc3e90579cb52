pub mod client;
pub mod prompt;
pub mod types;

use async_trait::async_trait;

use crate::errors::WebPilotResult;

pub use client::OpenAiCompatibleClient;

/// Inference collaborator: one screenshot in, one raw "Thought/Action"
/// reply out. Transport and provider failures surface as errors; the
/// orchestrator treats those as fatal for the run.
#[async_trait]
pub trait VisionModel: Send + Sync {
    async fn predict(
        &self,
        screenshot: &[u8],
        task: &str,
        history: &[String],
        url: &str,
        hint: Option<&str>,
    ) -> WebPilotResult<String>;
}
