use std::time::Duration;

use base64::Engine as _;

use crate::config::{AgentConfig, LlmConfig};
use crate::errors::{WebPilotError, WebPilotResult};
use crate::llm::prompt::{build_user_message, system_prompt};
use crate::llm::types::{ChatMessage, ContentPart, ImageUrl};
use crate::llm::VisionModel;

/// Chat-completions client for any OpenAI-compatible endpoint (OpenRouter
/// by default). One screenshot per request, plain-text reply.
pub struct OpenAiCompatibleClient {
    api_base: String,
    api_key: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
    system_prompt: String,
    client: reqwest::Client,
}

impl OpenAiCompatibleClient {
    pub fn new(config: &LlmConfig, agent: &AgentConfig) -> WebPilotResult<Self> {
        let api_key = config.resolve_api_key()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            api_base: config.api_base.clone(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            system_prompt: system_prompt(agent.viewport_width, agent.viewport_height),
            client,
        })
    }

    fn build_messages(
        &self,
        screenshot: &[u8],
        task: &str,
        history: &[String],
        url: &str,
        hint: Option<&str>,
    ) -> Vec<ChatMessage> {
        let screenshot_b64 = base64::engine::general_purpose::STANDARD.encode(screenshot);
        vec![
            ChatMessage::system(self.system_prompt.clone()),
            ChatMessage::user_parts(vec![
                ContentPart::Text {
                    text: build_user_message(task, url, history, hint),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: format!("data:image/png;base64,{screenshot_b64}"),
                    },
                },
            ]),
        ]
    }
}

#[async_trait::async_trait]
impl VisionModel for OpenAiCompatibleClient {
    async fn predict(
        &self,
        screenshot: &[u8],
        task: &str,
        history: &[String],
        url: &str,
        hint: Option<&str>,
    ) -> WebPilotResult<String> {
        let messages = self.build_messages(screenshot, task, history, url, hint);

        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });

        tracing::debug!(
            model = %self.model,
            history = history.len(),
            hint = hint.is_some(),
            screenshot_bytes = screenshot.len(),
            "sending inference request"
        );

        let response = self
            .client
            .post(&self.api_base)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let err_body = response.text().await.unwrap_or_default();
            return Err(WebPilotError::Inference(format!("{status}: {err_body}")));
        }

        let json: serde_json::Value = response.json().await?;
        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                WebPilotError::Inference(format!("no content in model response: {json}"))
            })?;

        tracing::debug!(content_len = content.len(), "inference response received");
        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::MessageContent;

    fn test_client() -> OpenAiCompatibleClient {
        OpenAiCompatibleClient {
            api_base: "http://localhost/v1/chat/completions".into(),
            api_key: "test".into(),
            model: "test-model".into(),
            temperature: 0.7,
            max_tokens: 500,
            system_prompt: system_prompt(1280, 720),
            client: reqwest::Client::new(),
        }
    }

    #[test]
    fn request_carries_system_then_multimodal_user_turn() {
        let client = test_client();
        let messages = client.build_messages(b"pngbytes", "buy a mouse", &[], "https://a.b", None);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        match &messages[0].content {
            MessageContent::Text(text) => {
                assert!(text.contains("Viewport is 1280x720 pixels"));
            }
            MessageContent::Parts(_) => panic!("system turn should be plain text"),
        }
        assert_eq!(messages[1].role, "user");

        match &messages[1].content {
            MessageContent::Parts(parts) => {
                assert_eq!(parts.len(), 2);
                match &parts[1] {
                    ContentPart::ImageUrl { image_url } => {
                        assert!(image_url.url.starts_with("data:image/png;base64,"));
                    }
                    other => panic!("expected image part, got {other:?}"),
                }
            }
            MessageContent::Text(_) => panic!("user turn should be multimodal"),
        }
    }

    #[test]
    fn message_json_matches_wire_shape() {
        let client = test_client();
        let messages =
            client.build_messages(b"x", "t", &["click(x=1, y=2) - why".into()], "u", Some("h"));
        let json = serde_json::to_value(&messages).unwrap();
        assert_eq!(json[1]["content"][0]["type"], "text");
        assert_eq!(json[1]["content"][1]["type"], "image_url");
        let text = json[1]["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("OPERATOR HINT: h"));
        assert!(text.contains("1. click(x=1, y=2) - why"));
    }
}
