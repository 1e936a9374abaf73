// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::{BrowserSettings, ExtractionSettings};
use crate::engines::traits::{BrowserHandle, EngineError};
use crate::utils::text::{non_empty, truncate_chars, DEFAULT_MAX_CONTENT_CHARS};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// 公司名称回退链：标题首段（先按 `|` 再按 `-` 切分）→ og:site_name → 主机名首段（首字母大写）
pub const COMPANY_NAME_SCRIPT: &str = r#"(() => {
    const title = (document.title || '').split('|')[0].split('-')[0].trim();
    if (title) return title;
    const meta = document.querySelector('meta[property="og:site_name"]');
    const site = meta && meta.content ? meta.content.trim() : '';
    if (site) return site;
    const label = (window.location.hostname || '').replace(/^www\./, '').split('.')[0] || '';
    return label ? label.charAt(0).toUpperCase() + label.slice(1).toLowerCase() : null;
})()"#;

/// 正文回退链：body → main → article → 根元素
pub const CONTENT_SCRIPT: &str = r#"(() => {
    const text = (el) => (el && el.innerText ? el.innerText : '');
    return text(document.body)
        || text(document.querySelector('main'))
        || text(document.querySelector('article'))
        || text(document.documentElement)
        || null;
})()"#;

/// 单次动态抓取失败原因
#[derive(Error, Debug)]
pub enum DynamicFailure {
    /// 浏览器/会话故障，会话需要丢弃重建
    #[error("browser session failure: {0}")]
    Session(#[from] EngineError),
    /// 页面加载成功但没有可见文本
    #[error("page rendered no content")]
    EmptyContent,
}

impl DynamicFailure {
    /// 该失败是否要求丢弃当前会话
    pub fn requires_new_session(&self) -> bool {
        matches!(self, DynamicFailure::Session(_))
    }
}

/// 动态抓取结果
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicExtraction {
    pub company_name: Option<String>,
    pub content: String,
}

/// 动态提取器
///
/// 通过浏览器句柄加载页面，在页面上下文中执行脚本获取名称和正文
#[derive(Debug, Clone)]
pub struct DynamicExtractor {
    settle_delay: Duration,
    navigation_retry_pause: Duration,
    max_content_chars: usize,
}

impl Default for DynamicExtractor {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(3),
            Duration::from_secs(2),
            DEFAULT_MAX_CONTENT_CHARS,
        )
    }
}

impl DynamicExtractor {
    pub fn new(settle_delay: Duration, navigation_retry_pause: Duration, max_content_chars: usize) -> Self {
        Self {
            settle_delay,
            navigation_retry_pause,
            max_content_chars,
        }
    }

    pub fn from_settings(browser: &BrowserSettings, extraction: &ExtractionSettings) -> Self {
        Self::new(
            browser.settle_delay(),
            browser.navigation_retry_pause(),
            extraction.max_content_chars,
        )
    }

    /// 抓取单个URL
    ///
    /// 加载超时时停止加载、暂停后再导航一次；第二次仍失败则返回会话故障
    pub async fn extract(
        &self,
        handle: &mut dyn BrowserHandle,
        url: &str,
    ) -> Result<DynamicExtraction, DynamicFailure> {
        self.navigate(handle, url).await?;

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        let company_name = non_empty(handle.evaluate(COMPANY_NAME_SCRIPT).await?);
        let content = handle
            .evaluate(CONTENT_SCRIPT)
            .await?
            .map(|text| truncate_chars(text.trim(), self.max_content_chars))
            .unwrap_or_default();

        if content.is_empty() {
            return Err(DynamicFailure::EmptyContent);
        }

        debug!("Dynamic extraction got {} chars for {}", content.chars().count(), url);
        Ok(DynamicExtraction {
            company_name,
            content,
        })
    }

    async fn navigate(&self, handle: &mut dyn BrowserHandle, url: &str) -> Result<(), EngineError> {
        match handle.navigate(url).await {
            Err(e) if e.is_timeout() => {
                warn!("Page load timeout for {}, retrying...", url);
                if let Err(stop_err) = handle.stop_loading().await {
                    debug!("window.stop() failed for {}: {}", url, stop_err);
                }
                if !self.navigation_retry_pause.is_zero() {
                    tokio::time::sleep(self.navigation_retry_pause).await;
                }
                handle.navigate(url).await
            }
            other => other,
        }
    }
}
