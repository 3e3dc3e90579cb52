//! Chrome DevTools Protocol driver built on chromiumoxide. All input goes
//! through raw CDP input dispatch so actions behave like a real user at
//! pixel coordinates, independent of the page's DOM.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as ChromeConfig};
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchKeyEventParams, DispatchKeyEventType, DispatchMouseEventParams, DispatchMouseEventType,
    MouseButton,
};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::{Page, ScreenshotParams};
use futures_util::StreamExt;
use tokio::task::JoinHandle;

use crate::actions::Command;
use crate::browser::BrowserDriver;
use crate::config::{AgentConfig, BrowserConfig};
use crate::errors::{WebPilotError, WebPilotResult};

/// Inter-key delay while typing, approximates human input.
const TYPE_DELAY: Duration = Duration::from_millis(50);
/// Fixed pause after a click before checking whether the page settled.
const CLICK_SETTLE: Duration = Duration::from_millis(500);
/// Best-effort ceiling on post-click network settling.
const CLICK_NETWORK_IDLE: Duration = Duration::from_secs(3);
/// Pause after scroll and key-press dispatch.
const INPUT_SETTLE: Duration = Duration::from_millis(300);

pub struct CdpBrowser {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    viewport_width: u32,
    viewport_height: u32,
    navigation_timeout: Duration,
}

impl CdpBrowser {
    /// Launches Chrome with the configured viewport and opens a blank page.
    pub async fn launch(browser: &BrowserConfig, agent: &AgentConfig) -> WebPilotResult<Self> {
        let mut builder = ChromeConfig::builder()
            .no_sandbox()
            .window_size(agent.viewport_width, agent.viewport_height);

        if !browser.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &browser.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        let chrome_config = builder
            .build()
            .map_err(|e| WebPilotError::Browser(format!("failed to build browser config: {e}")))?;

        tracing::info!(
            headless = browser.headless,
            width = agent.viewport_width,
            height = agent.viewport_height,
            "launching chrome"
        );

        let (chrome, mut handler) = Browser::launch(chrome_config)
            .await
            .map_err(|e| WebPilotError::Browser(format!("failed to launch browser: {e}")))?;

        // Drains the CDP websocket; the connection stalls without this.
        let handler_task = tokio::spawn(async move { while handler.next().await.is_some() {} });

        let page = chrome
            .new_page("about:blank")
            .await
            .map_err(|e| WebPilotError::Browser(format!("failed to open page: {e}")))?;

        tracing::info!("browser launched");
        Ok(Self {
            browser: chrome,
            page,
            handler_task,
            viewport_width: agent.viewport_width,
            viewport_height: agent.viewport_height,
            navigation_timeout: Duration::from_millis(browser.navigation_timeout_ms),
        })
    }

    async fn dispatch_click(&self, x: f64, y: f64) -> WebPilotResult<()> {
        let move_params = DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MouseMoved)
            .x(x)
            .y(y)
            .build()
            .map_err(WebPilotError::Browser)?;
        self.page
            .execute(move_params)
            .await
            .map_err(|e| WebPilotError::Browser(e.to_string()))?;

        let down_params = DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MousePressed)
            .x(x)
            .y(y)
            .button(MouseButton::Left)
            .click_count(1)
            .build()
            .map_err(WebPilotError::Browser)?;
        self.page
            .execute(down_params)
            .await
            .map_err(|e| WebPilotError::Browser(e.to_string()))?;

        let up_params = DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MouseReleased)
            .x(x)
            .y(y)
            .button(MouseButton::Left)
            .click_count(1)
            .build()
            .map_err(WebPilotError::Browser)?;
        self.page
            .execute(up_params)
            .await
            .map_err(|e| WebPilotError::Browser(e.to_string()))?;
        Ok(())
    }

    async fn dispatch_type(&self, text: &str) -> WebPilotResult<()> {
        for ch in text.chars() {
            let params = DispatchKeyEventParams::builder()
                .r#type(DispatchKeyEventType::Char)
                .text(ch.to_string())
                .build()
                .map_err(WebPilotError::Browser)?;
            self.page
                .execute(params)
                .await
                .map_err(|e| WebPilotError::Browser(e.to_string()))?;
            tokio::time::sleep(TYPE_DELAY).await;
        }
        Ok(())
    }

    async fn dispatch_scroll(&self, delta_y: f64) -> WebPilotResult<()> {
        // Wheel events need a position; the viewport center is a safe target.
        let params = DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MouseWheel)
            .x(f64::from(self.viewport_width) / 2.0)
            .y(f64::from(self.viewport_height) / 2.0)
            .delta_x(0.0)
            .delta_y(delta_y)
            .build()
            .map_err(WebPilotError::Browser)?;
        self.page
            .execute(params)
            .await
            .map_err(|e| WebPilotError::Browser(e.to_string()))?;
        Ok(())
    }

    async fn dispatch_press(&self, key: &str) -> WebPilotResult<()> {
        let down_params = DispatchKeyEventParams::builder()
            .r#type(DispatchKeyEventType::KeyDown)
            .key(key.to_string())
            .build()
            .map_err(WebPilotError::Browser)?;
        self.page
            .execute(down_params)
            .await
            .map_err(|e| WebPilotError::Browser(e.to_string()))?;

        let up_params = DispatchKeyEventParams::builder()
            .r#type(DispatchKeyEventType::KeyUp)
            .key(key.to_string())
            .build()
            .map_err(WebPilotError::Browser)?;
        self.page
            .execute(up_params)
            .await
            .map_err(|e| WebPilotError::Browser(e.to_string()))?;
        Ok(())
    }

    async fn try_execute(&self, command: &Command) -> WebPilotResult<String> {
        match command {
            Command::Click { x, y } => {
                self.dispatch_click(*x as f64, *y as f64).await?;
                tokio::time::sleep(CLICK_SETTLE).await;
                // Best effort: the page not settling in time is fine.
                let _ = tokio::time::timeout(CLICK_NETWORK_IDLE, self.page.wait_for_navigation())
                    .await;
                Ok(format!("Clicked at ({x}, {y})"))
            }
            Command::Type { text } => {
                self.dispatch_type(text).await?;
                Ok(format!("Typed: '{text}'"))
            }
            Command::Scroll { direction, amount } => {
                let delta_y = if direction == "down" {
                    *amount as f64
                } else {
                    -(*amount as f64)
                };
                self.dispatch_scroll(delta_y).await?;
                tokio::time::sleep(INPUT_SETTLE).await;
                Ok(format!("Scrolled {direction} {amount}px"))
            }
            Command::Wait { seconds } => {
                tokio::time::sleep(Duration::from_secs_f64(seconds.max(0.0))).await;
                Ok(format!("Waited {seconds}s"))
            }
            Command::Press { key } => {
                self.dispatch_press(key).await?;
                tokio::time::sleep(INPUT_SETTLE).await;
                Ok(format!("Pressed {key}"))
            }
            Command::Finish => Ok("Task complete".to_string()),
            Command::Fail { reason } => Ok(format!("Failed: {reason}")),
        }
    }
}

#[async_trait]
impl BrowserDriver for CdpBrowser {
    async fn navigate(&self, url: &str) -> bool {
        let result = tokio::time::timeout(self.navigation_timeout, async {
            self.page
                .goto(url)
                .await
                .map_err(|e| WebPilotError::Browser(e.to_string()))?;
            self.page
                .wait_for_navigation()
                .await
                .map_err(|e| WebPilotError::Browser(e.to_string()))?;
            Ok::<_, WebPilotError>(())
        })
        .await;

        match result {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                tracing::error!(error = %e, url, "navigation failed");
                false
            }
            Err(_) => {
                tracing::error!(url, "navigation timed out");
                false
            }
        }
    }

    async fn screenshot(&self) -> WebPilotResult<Vec<u8>> {
        self.page
            .screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .build(),
            )
            .await
            .map_err(|e| WebPilotError::Browser(format!("screenshot failed: {e}")))
    }

    async fn current_url(&self) -> WebPilotResult<String> {
        self.page
            .url()
            .await
            .map(|url| url.unwrap_or_else(|| "about:blank".to_string()))
            .map_err(|e| WebPilotError::Browser(format!("url lookup failed: {e}")))
    }

    async fn execute(&self, command: &Command) -> (bool, String) {
        match self.try_execute(command).await {
            Ok(message) => (true, message),
            Err(e) => (false, format!("Execution error: {e}")),
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::warn!(error = %e, "browser close failed");
        }
        if let Err(e) = self.browser.wait().await {
            tracing::warn!(error = %e, "browser wait failed");
        }
        self.handler_task.abort();
        tracing::info!("browser closed");
    }
}
