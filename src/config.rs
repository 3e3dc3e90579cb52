use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::{WebPilotError, WebPilotResult};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
}

/// Settings consumed by the orchestrator loop. Passed in explicitly so
/// concurrent runs can use independent values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,
    /// Hard budget on loop iterations per task.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    /// How many recent executed actions are shown to the model.
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    /// Pause after a dispatched action, lets async page effects settle.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Ceiling on wait(seconds) actions.
    #[serde(default = "default_max_wait_secs")]
    pub max_wait_secs: f64,
    /// Deadline for the optional operator hint per step.
    #[serde(default = "default_hint_timeout_secs")]
    pub hint_timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            max_steps: default_max_steps(),
            history_window: default_history_window(),
            settle_delay_ms: default_settle_delay_ms(),
            max_wait_secs: default_max_wait_secs(),
            hint_timeout_secs: default_hint_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Optional key in config.toml; falls back to the OPENROUTER_API_KEY env var.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            model: default_model(),
            api_key: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl LlmConfig {
    /// Resolves the API key from config or environment.
    pub fn resolve_api_key(&self) -> WebPilotResult<String> {
        if let Some(key) = &self.api_key {
            if !key.is_empty() {
                return Ok(key.clone());
            }
        }
        std::env::var("OPENROUTER_API_KEY").map_err(|_| {
            WebPilotError::Config(
                "OPENROUTER_API_KEY not set; add it to .env or put api_key in config.toml".into(),
            )
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default)]
    pub headless: bool,
    /// Explicit Chrome/Chromium binary; auto-detected when absent.
    #[serde(default)]
    pub chrome_executable: Option<String>,
    #[serde(default = "default_navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: false,
            chrome_executable: None,
            navigation_timeout_ms: default_navigation_timeout_ms(),
        }
    }
}

fn default_viewport_width() -> u32 {
    1280
}

fn default_viewport_height() -> u32 {
    720
}

fn default_max_steps() -> usize {
    15
}

fn default_history_window() -> usize {
    5
}

fn default_settle_delay_ms() -> u64 {
    1000
}

fn default_max_wait_secs() -> f64 {
    10.0
}

fn default_hint_timeout_secs() -> u64 {
    3
}

fn default_api_base() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "qwen/qwen2.5-vl-32b-instruct:free".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    500
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_navigation_timeout_ms() -> u64 {
    60_000
}

fn resolve_config_path() -> WebPilotResult<PathBuf> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            let candidate = parent.join("config.toml");
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "config found next to executable");
                return Ok(candidate);
            }
        }
    }

    let cwd = std::env::current_dir()?;
    let candidate = cwd.join("config.toml");
    if candidate.exists() {
        tracing::debug!(path = %candidate.display(), "config found in working directory");
        return Ok(candidate);
    }

    Err(WebPilotError::Config(
        "config.toml not found next to executable or in working directory".into(),
    ))
}

pub fn load_config() -> WebPilotResult<AppConfig> {
    let path = resolve_config_path()?;
    let content = std::fs::read_to_string(&path)?;
    let config: AppConfig = toml::from_str(&content)?;
    tracing::info!(path = %path.display(), model = %config.llm.model, "config loaded");
    Ok(config)
}

pub fn save_config(config: &AppConfig) -> WebPilotResult<()> {
    let path = resolve_config_path()?;
    let content = toml::to_string_pretty(config)?;
    std::fs::write(&path, content)?;
    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.agent.viewport_width, 1280);
        assert_eq!(cfg.agent.viewport_height, 720);
        assert_eq!(cfg.agent.max_steps, 15);
        assert_eq!(cfg.agent.history_window, 5);
        assert_eq!(cfg.agent.max_wait_secs, 10.0);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [agent]
            max_steps = 3

            [llm]
            model = "test-model"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.agent.max_steps, 3);
        assert_eq!(cfg.agent.viewport_width, 1280);
        assert_eq!(cfg.llm.model, "test-model");
        assert_eq!(cfg.llm.max_tokens, 500);
        assert!(!cfg.browser.headless);
    }
}
