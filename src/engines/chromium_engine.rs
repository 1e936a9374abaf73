// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::BrowserSettings;
use crate::engines::traits::{BrowserHandle, BrowserLauncher, EngineError};
use async_trait::async_trait;
use chromiumoxide::error::CdpError;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// 反自动化检测及容器环境所需的启动参数
const LAUNCH_ARGS: &[&str] = &[
    "--disable-blink-features=AutomationControlled",
    "--disable-dev-shm-usage",
    "--disable-gpu",
];

/// CDP请求超时相对页面加载预算的余量，保证页面加载超时总是先触发
const REQUEST_TIMEOUT_MARGIN: Duration = Duration::from_secs(5);

/// 关闭远程标签页的最长等待时间
const TAB_CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Chromium 启动器
///
/// 基于chromiumoxide，每次 `launch` 都会得到一个全新的浏览器进程（或远程连接）
pub struct ChromiumLauncher {
    settings: BrowserSettings,
}

impl ChromiumLauncher {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }

    fn build_config(&self) -> Result<BrowserConfig, EngineError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(self.request_timeout());

        if !self.settings.headless {
            builder = builder.with_head();
        }

        let chrome_path = self
            .settings
            .chrome_path
            .clone()
            .or_else(|| std::env::var("CHROME_PATH").ok());
        if let Some(path) = chrome_path {
            builder = builder.chrome_executable(path);
        }

        for arg in LAUNCH_ARGS {
            builder = builder.arg(*arg);
        }
        for arg in &self.settings.extra_args {
            builder = builder.arg(arg.clone());
        }

        builder.build().map_err(EngineError::Launch)
    }

    fn request_timeout(&self) -> Duration {
        self.settings.page_load_timeout() + REQUEST_TIMEOUT_MARGIN
    }
}

/// chromiumoxide 自身的请求超时同样视为页面加载超时
fn navigation_error(error: CdpError) -> EngineError {
    match error {
        CdpError::Timeout => EngineError::Timeout,
        other => EngineError::Navigation(other.to_string()),
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserHandle>, EngineError> {
        let remote_url = self
            .settings
            .remote_debugging_url
            .clone()
            .or_else(|| std::env::var("CHROMIUM_REMOTE_DEBUGGING_URL").ok());

        let (browser, mut handler) = if let Some(ref url) = remote_url {
            info!("Connecting to remote Chrome instance at: {}", url);
            Browser::connect(url)
                .await
                .map_err(|e| EngineError::Launch(format!("Failed to connect to remote Chrome: {}", e)))?
        } else {
            info!("Launching headless Chrome");
            Browser::launch(self.build_config()?)
                .await
                .map_err(|e| EngineError::Launch(e.to_string()))?
        };

        // Spawn a handler to process browser events
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler_task.abort();
                return Err(EngineError::Launch(format!("Failed to open page: {}", e)));
            }
        };

        Ok(Box::new(ChromiumHandle {
            browser,
            page,
            handler_task: Some(handler_task),
            remote: remote_url.is_some(),
            page_load_timeout: self.settings.page_load_timeout(),
            script_timeout: self.settings.script_timeout(),
            closed: false,
        }))
    }
}

/// 单个浏览器进程及其唯一页面
///
/// 远程模式下浏览器不归本进程所有，关闭时只关闭自己打开的标签页
pub struct ChromiumHandle {
    browser: Browser,
    page: Page,
    handler_task: Option<JoinHandle<()>>,
    remote: bool,
    page_load_timeout: Duration,
    script_timeout: Duration,
    closed: bool,
}

#[async_trait]
impl BrowserHandle for ChromiumHandle {
    async fn navigate(&mut self, url: &str) -> Result<(), EngineError> {
        match tokio::time::timeout(self.page_load_timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(navigation_error(e)),
            Err(_) => Err(EngineError::Timeout),
        }
    }

    async fn stop_loading(&mut self) -> Result<(), EngineError> {
        self.evaluate("window.stop();").await.map(|_| ())
    }

    async fn evaluate(&mut self, script: &str) -> Result<Option<String>, EngineError> {
        let result = tokio::time::timeout(self.script_timeout, self.page.evaluate(script))
            .await
            .map_err(|_| EngineError::Timeout)?
            .map_err(|e| EngineError::Script(e.to_string()))?;

        Ok(result
            .value()
            .and_then(|value| value.as_str())
            .map(str::to_string))
    }

    async fn close(&mut self) -> Result<(), EngineError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let outcome = if self.remote {
            close_tab(self.page.clone()).await
        } else {
            let closed = self
                .browser
                .close()
                .await
                .map(|_| ())
                .map_err(|e| EngineError::Other(format!("Failed to close browser: {}", e)));
            if let Err(e) = self.browser.wait().await {
                warn!("Failed to wait for browser process exit: {}", e);
            }
            closed
        };

        if let Some(task) = self.handler_task.take() {
            task.abort();
        }
        debug!("Browser handle closed");
        outcome
    }
}

async fn close_tab(page: Page) -> Result<(), EngineError> {
    match tokio::time::timeout(TAB_CLOSE_TIMEOUT, page.close()).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(EngineError::Other(format!("Failed to close tab: {}", e))),
        Err(_) => Err(EngineError::Timeout),
    }
}

impl Drop for ChromiumHandle {
    fn drop(&mut self) {
        let Some(task) = self.handler_task.take() else {
            return;
        };

        // 本地进程由 chromiumoxide 的 Browser 析构终止；远程标签页需要在后台关闭
        if self.remote && !self.closed {
            if let Ok(runtime) = tokio::runtime::Handle::try_current() {
                let page = self.page.clone();
                runtime.spawn(async move {
                    if let Err(e) = close_tab(page).await {
                        warn!("Failed to close remote tab on drop: {}", e);
                    }
                    task.abort();
                });
                return;
            }
        }
        task.abort();
    }
}
