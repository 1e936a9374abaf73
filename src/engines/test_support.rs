// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 单元测试共用的假引擎

use crate::engines::dynamic_extractor::COMPANY_NAME_SCRIPT;
use crate::engines::traits::{BrowserHandle, BrowserLauncher, EngineError, PageFetcher};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// 按URL返回预置HTML的静态抓取器，未登记的URL返回403
#[derive(Default)]
pub(crate) struct StubFetcher {
    pages: HashMap<String, String>,
    pub calls: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<String, EngineError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or(EngineError::HttpStatus(403))
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// 每次启动的行为
#[derive(Debug, Clone, Copy)]
pub(crate) enum LaunchPlan {
    /// 启动失败
    Fail,
    /// 启动成功，但每次导航都崩溃
    Crash,
    /// 正常渲染登记的页面
    Serve,
}

/// 按计划启动假浏览器的启动器；计划用完后一律正常渲染
#[derive(Default)]
pub(crate) struct ScriptedLauncher {
    plan: Mutex<VecDeque<LaunchPlan>>,
    pages: HashMap<String, String>,
    pub events: Arc<Mutex<Vec<String>>>,
}

impl ScriptedLauncher {
    pub fn with_plan(self, plan: &[LaunchPlan]) -> Self {
        *self.plan.lock().unwrap() = plan.iter().copied().collect();
        self
    }

    pub fn with_page(mut self, url: &str, text: &str) -> Self {
        self.pages.insert(url.to_string(), text.to_string());
        self
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, event: &str) -> usize {
        self.events().iter().filter(|e| e.as_str() == event).count()
    }
}

#[async_trait]
impl BrowserLauncher for ScriptedLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserHandle>, EngineError> {
        let plan = self
            .plan
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(LaunchPlan::Serve);

        if let LaunchPlan::Fail = plan {
            self.events.lock().unwrap().push("launch failed".to_string());
            return Err(EngineError::Launch("chrome not found".to_string()));
        }

        self.events.lock().unwrap().push("launch".to_string());
        Ok(Box::new(ScriptedHandle {
            crash: matches!(plan, LaunchPlan::Crash),
            pages: self.pages.clone(),
            current: None,
            events: self.events.clone(),
        }))
    }
}

struct ScriptedHandle {
    crash: bool,
    pages: HashMap<String, String>,
    current: Option<String>,
    events: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl BrowserHandle for ScriptedHandle {
    async fn navigate(&mut self, url: &str) -> Result<(), EngineError> {
        self.events.lock().unwrap().push(format!("navigate {}", url));
        if self.crash {
            return Err(EngineError::Navigation("target crashed".to_string()));
        }
        self.current = Some(url.to_string());
        Ok(())
    }

    async fn stop_loading(&mut self) -> Result<(), EngineError> {
        Ok(())
    }

    async fn evaluate(&mut self, script: &str) -> Result<Option<String>, EngineError> {
        if script == COMPANY_NAME_SCRIPT {
            return Ok(None);
        }
        Ok(self
            .current
            .as_ref()
            .and_then(|url| self.pages.get(url))
            .cloned())
    }

    async fn close(&mut self) -> Result<(), EngineError> {
        self.events.lock().unwrap().push("close".to_string());
        Ok(())
    }
}
