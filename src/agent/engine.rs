//! The perceive → infer → parse → validate → execute loop.
//!
//! One `WebAgent` owns one browser session and one history list; nothing
//! here is shared across runs, so callers may drive several agents in
//! parallel with independent configs.

use std::time::Duration;

use crate::actions::{self, Command, Limits};
use crate::agent::recorder::RunRecorder;
use crate::agent::state::{Step, TaskResult};
use crate::browser::BrowserDriver;
use crate::config::AgentConfig;
use crate::errors::WebPilotResult;
use crate::hint::HintProvider;
use crate::llm::VisionModel;

pub struct WebAgent {
    browser: Box<dyn BrowserDriver>,
    model: Box<dyn VisionModel>,
    hints: Option<Box<dyn HintProvider>>,
    config: AgentConfig,
    history: Vec<String>,
}

impl WebAgent {
    pub fn new(
        browser: Box<dyn BrowserDriver>,
        model: Box<dyn VisionModel>,
        config: AgentConfig,
    ) -> Self {
        Self {
            browser,
            model,
            hints: None,
            config,
            history: Vec::new(),
        }
    }

    /// Attaches an operator hint provider; each step will wait for it up
    /// to the configured deadline.
    pub fn with_hints(mut self, hints: Box<dyn HintProvider>) -> Self {
        self.hints = Some(hints);
        self
    }

    /// Runs one task to a terminal outcome. Navigation and inference
    /// failures come back inside the `TaskResult`; an `Err` only means the
    /// browser session itself broke (screenshot or URL capture failed).
    pub async fn run_task(
        &mut self,
        url: &str,
        task: &str,
        recorder: Option<&RunRecorder>,
    ) -> WebPilotResult<TaskResult> {
        tracing::info!(task = %task, url = %url, "starting task");

        if !self.browser.navigate(url).await {
            return Ok(TaskResult::failed("Failed to load page", 0, Vec::new()));
        }

        self.history.clear();
        let mut trajectory: Vec<Step> = Vec::new();
        let limits = Limits {
            viewport_width: self.config.viewport_width,
            viewport_height: self.config.viewport_height,
            max_wait_secs: self.config.max_wait_secs,
        };
        let budget = self.config.max_steps;

        for step in 1..=budget {
            tracing::info!(step, budget, "running step");

            let screenshot = self.browser.screenshot().await?;
            let current_url = self.browser.current_url().await?;

            if let Some(rec) = recorder {
                if let Err(e) = rec.save_screenshot(step, &screenshot) {
                    tracing::warn!(error = %e, step, "failed to save screenshot");
                }
            }

            let hint = self.solicit_hint().await;

            let response = match self
                .model
                .predict(
                    &screenshot,
                    task,
                    self.recent_history(),
                    &current_url,
                    hint.as_deref(),
                )
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!(error = %e, step, "model inference failed");
                    return Ok(TaskResult::failed(
                        format!("Model inference failed: {e}"),
                        step - 1,
                        trajectory,
                    ));
                }
            };
            tracing::debug!(response = %response, "model response");

            // Unparseable or invalid responses consume the iteration but
            // leave no trajectory entry.
            let Some(action) = actions::parse(&response) else {
                tracing::warn!(step, "could not parse an action from the response");
                continue;
            };
            if let Err(reason) = actions::validate(&action.command, &limits) {
                tracing::warn!(step, %reason, "action rejected");
                continue;
            }

            tracing::info!(step, action = %action.command, "action chosen");
            if !action.reasoning.is_empty() {
                tracing::debug!(reasoning = %action.reasoning, "model thought");
            }

            if action.command.is_terminal() {
                let failure = match &action.command {
                    Command::Fail { reason } => Some(reason.clone()),
                    _ => None,
                };
                trajectory.push(Step {
                    index: step,
                    action: action.command.clone(),
                    reasoning: action.reasoning,
                    url: current_url,
                    result: None,
                });
                return Ok(match failure {
                    None => {
                        tracing::info!(steps = step, "task completed");
                        TaskResult::succeeded(step, trajectory)
                    }
                    Some(reason) => {
                        tracing::warn!(steps = step, reason = %reason, "task declared failed");
                        TaskResult::failed(reason, step, trajectory)
                    }
                });
            }

            let (executed, message) = self.browser.execute(&action.command).await;
            if executed {
                tracing::info!(step, message = %message, "action executed");
                self.history
                    .push(format!("{} - {}", action.command, action.reasoning));
                trajectory.push(Step {
                    index: step,
                    action: action.command,
                    reasoning: action.reasoning,
                    url: current_url,
                    result: Some(message),
                });
            } else {
                // Non-fatal: a misfired action just costs the iteration.
                tracing::warn!(step, message = %message, "action execution failed");
            }

            tokio::time::sleep(Duration::from_millis(self.config.settle_delay_ms)).await;
        }

        tracing::warn!(budget, "maximum steps reached");
        Ok(TaskResult::failed(
            format!("Max steps ({budget}) exceeded"),
            budget,
            trajectory,
        ))
    }

    /// Closes the browser session. The agent is spent afterwards.
    pub async fn shutdown(mut self) {
        self.browser.close().await;
    }

    async fn solicit_hint(&self) -> Option<String> {
        let provider = self.hints.as_ref()?;
        let deadline = Duration::from_secs(self.config.hint_timeout_secs);
        match tokio::time::timeout(deadline, provider.hint()).await {
            Ok(hint) => hint,
            Err(_) => {
                tracing::debug!("no hint before deadline");
                None
            }
        }
    }

    /// The window shown to the model; the full list is kept intact.
    fn recent_history(&self) -> &[String] {
        let start = self
            .history
            .len()
            .saturating_sub(self.config.history_window);
        &self.history[start..]
    }
}
