// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 非2xx状态码
    #[error("Unexpected HTTP status: {0}")]
    HttpStatus(u16),
    /// 超时
    #[error("Timeout")]
    Timeout,
    /// 浏览器启动失败
    #[error("Browser launch failed: {0}")]
    Launch(String),
    /// 页面导航失败
    #[error("Navigation failed: {0}")]
    Navigation(String),
    /// 页面脚本执行失败
    #[error("Script evaluation failed: {0}")]
    Script(String),
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

impl EngineError {
    /// 是否为超时类错误
    pub fn is_timeout(&self) -> bool {
        match self {
            EngineError::Timeout => true,
            EngineError::RequestFailed(e) => e.is_timeout(),
            _ => false,
        }
    }
}

/// 静态抓取能力
///
/// 一次轻量级HTTP GET，成功时返回响应正文
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 抓取页面HTML
    async fn fetch(&self, url: &str) -> Result<String, EngineError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}

/// 浏览器启动能力
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    /// 启动一个新的浏览器句柄
    async fn launch(&self) -> Result<Box<dyn BrowserHandle>, EngineError>;
}

/// 浏览器句柄
///
/// 同一时刻只有一个使用者，因此方法都接收 `&mut self`
#[async_trait]
pub trait BrowserHandle: Send {
    /// 导航到URL，页面加载超时返回 [`EngineError::Timeout`]
    async fn navigate(&mut self, url: &str) -> Result<(), EngineError>;

    /// 停止当前页面加载
    async fn stop_loading(&mut self) -> Result<(), EngineError>;

    /// 在页面上下文中执行脚本，返回字符串结果或缺失
    async fn evaluate(&mut self, script: &str) -> Result<Option<String>, EngineError>;

    /// 关闭浏览器，释放底层进程
    async fn close(&mut self) -> Result<(), EngineError>;
}
