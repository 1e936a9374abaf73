// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use extractrs::config::settings::Settings;
use extractrs::engines::dynamic_extractor::COMPANY_NAME_SCRIPT;
use extractrs::engines::reqwest_engine::ReqwestEngine;
use extractrs::engines::traits::{BrowserHandle, BrowserLauncher, EngineError, PageFetcher};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use url::Url;

/// 所有等待时间为零的配置
pub fn fast_settings() -> Settings {
    let mut settings = Settings::default();
    settings.batch.request_delay_ms = 0;
    settings.browser.settle_delay_ms = 0;
    settings.browser.navigation_retry_pause_ms = 0;
    settings.extraction.retry_backoff_ms = 0;
    settings.static_fetch.timeout_secs = 2;
    settings
}

/// 把指定主机的请求改写到本地 mock server 的真实静态抓取器
///
/// 未登记的主机直接返回连接失败，不会访问外网
pub struct RoutedFetcher {
    inner: ReqwestEngine,
    base: Url,
    hosts: HashSet<String>,
    pub requests: Mutex<Vec<String>>,
}

impl RoutedFetcher {
    pub fn new(settings: &Settings, mock_server_uri: &str, hosts: &[&str]) -> Self {
        Self {
            inner: ReqwestEngine::new(&settings.static_fetch).unwrap(),
            base: Url::parse(mock_server_uri).unwrap(),
            hosts: hosts.iter().map(|h| h.to_string()).collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for RoutedFetcher {
    async fn fetch(&self, url: &str) -> Result<String, EngineError> {
        self.requests.lock().unwrap().push(url.to_string());

        let parsed = Url::parse(url).map_err(|e| EngineError::Other(e.to_string()))?;
        let host = parsed.host_str().unwrap_or_default().to_string();
        if !self.hosts.contains(&host) {
            return Err(EngineError::Other(format!("unreachable host {}", host)));
        }

        let target = self
            .base
            .join(parsed.path())
            .map_err(|e| EngineError::Other(e.to_string()))?;
        self.inner.fetch(target.as_str()).await
    }

    fn name(&self) -> &'static str {
        "routed"
    }
}

/// 假浏览器的单次启动行为
#[derive(Debug, Clone, Copy)]
pub enum BrowserBehavior {
    Crash,
    Render,
}

/// 渲染预置页面文本的假浏览器，并记录生命周期事件
#[derive(Default)]
pub struct MockBrowser {
    plan: Mutex<VecDeque<BrowserBehavior>>,
    pages: HashMap<String, (Option<String>, String)>,
    pub events: Arc<Mutex<Vec<String>>>,
}

impl MockBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(mut self, url: &str, title: Option<&str>, text: &str) -> Self {
        self.pages
            .insert(url.to_string(), (title.map(str::to_string), text.to_string()));
        self
    }

    pub fn then(self, behavior: BrowserBehavior) -> Self {
        self.plan.lock().unwrap().push_back(behavior);
        self
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.events().iter().filter(|e| e.starts_with(prefix)).count()
    }
}

#[async_trait]
impl BrowserLauncher for MockBrowser {
    async fn launch(&self) -> Result<Box<dyn BrowserHandle>, EngineError> {
        let behavior = self
            .plan
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(BrowserBehavior::Render);
        self.events.lock().unwrap().push("launch".to_string());

        Ok(Box::new(MockPage {
            behavior,
            pages: self.pages.clone(),
            current: None,
            events: self.events.clone(),
        }))
    }
}

struct MockPage {
    behavior: BrowserBehavior,
    pages: HashMap<String, (Option<String>, String)>,
    current: Option<String>,
    events: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl BrowserHandle for MockPage {
    async fn navigate(&mut self, url: &str) -> Result<(), EngineError> {
        self.events.lock().unwrap().push(format!("navigate {}", url));
        match self.behavior {
            BrowserBehavior::Crash => Err(EngineError::Navigation("chrome not reachable".to_string())),
            BrowserBehavior::Render => {
                self.current = Some(url.to_string());
                Ok(())
            }
        }
    }

    async fn stop_loading(&mut self) -> Result<(), EngineError> {
        Ok(())
    }

    async fn evaluate(&mut self, script: &str) -> Result<Option<String>, EngineError> {
        let page = self.current.as_ref().and_then(|url| self.pages.get(url));
        Ok(match page {
            Some((title, _)) if script == COMPANY_NAME_SCRIPT => title.clone(),
            Some((_, text)) => Some(text.clone()),
            None => None,
        })
    }

    async fn close(&mut self) -> Result<(), EngineError> {
        self.events.lock().unwrap().push("close".to_string());
        Ok(())
    }
}
