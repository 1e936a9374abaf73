// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::Settings;
use crate::domain::models::{ExtractionResult, ExtractionStrategy};
use crate::domain::services::extraction_service::{ExtractionService, ParseFailure};
use crate::engines::browser_session::BrowserSession;
use crate::engines::dynamic_extractor::{DynamicExtractor, DynamicFailure};
use crate::engines::traits::{EngineError, PageFetcher};
use crate::infrastructure::observability::metrics::{
    DYNAMIC_SUCCESS_TOTAL, FAILED_TOTAL, STATIC_SUCCESS_TOTAL, URL_DURATION_SECONDS,
};
use crate::utils::retry_policy::RetryPolicy;
use crate::utils::url_utils::domain_name;
use metrics::{counter, histogram};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

/// 静态路径失败原因
#[derive(Error, Debug)]
pub enum StaticFailure {
    /// 传输失败、超时或非2xx
    #[error("fetch failed: {0}")]
    Fetch(#[from] EngineError),
    /// 没有可解析的页面主体
    #[error("no parseable body")]
    NoBody,
    /// 页面没有可见文本
    #[error("no visible content")]
    EmptyContent,
}

impl From<ParseFailure> for StaticFailure {
    fn from(failure: ParseFailure) -> Self {
        match failure {
            ParseFailure::NoBody => StaticFailure::NoBody,
            ParseFailure::EmptyContent => StaticFailure::EmptyContent,
        }
    }
}

/// 单个URL的最终失败
///
/// 作为返回值交给调用方，保留每一步的失败原因
#[derive(Error, Debug)]
#[error("all strategies failed for {url} (static: {static_failure}, dynamic attempts: {})", .dynamic_failures.len())]
pub struct ExtractionFailure {
    pub url: String,
    pub static_failure: StaticFailure,
    pub dynamic_failures: Vec<DynamicFailure>,
}

/// 单个URL的抓取状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionState {
    NotStarted,
    TryStatic,
    TryDynamic { attempt: u32 },
    Done(ExtractionStrategy),
    Failed,
}

impl fmt::Display for ExtractionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionState::NotStarted => write!(f, "not-started"),
            ExtractionState::TryStatic => write!(f, "try-static"),
            ExtractionState::TryDynamic { attempt } => write!(f, "try-dynamic({})", attempt),
            ExtractionState::Done(strategy) => write!(f, "done({})", strategy),
            ExtractionState::Failed => write!(f, "failed"),
        }
    }
}

/// 抓取编排器
///
/// 先走静态路径，失败后升级到浏览器路径并有限次重试。
/// 浏览器故障时丢弃会话，下一次尝试会启动新的浏览器。
pub struct ExtractionOrchestrator {
    fetcher: Arc<dyn PageFetcher>,
    static_extractor: ExtractionService,
    dynamic_extractor: DynamicExtractor,
    retry_policy: RetryPolicy,
}

impl ExtractionOrchestrator {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        static_extractor: ExtractionService,
        dynamic_extractor: DynamicExtractor,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            fetcher,
            static_extractor,
            dynamic_extractor,
            retry_policy,
        }
    }

    pub fn from_settings(fetcher: Arc<dyn PageFetcher>, settings: &Settings) -> Self {
        Self::new(
            fetcher,
            ExtractionService::new(settings.extraction.max_content_chars),
            DynamicExtractor::from_settings(&settings.browser, &settings.extraction),
            settings.extraction.retry_policy(),
        )
    }

    /// 抓取单个（已规范化的）URL
    ///
    /// # 参数
    ///
    /// * `url` - 带协议的URL
    /// * `session` - 批处理独占的浏览器会话
    ///
    /// # 返回值
    ///
    /// * `Ok(ExtractionResult)` - 正文非空的结果
    /// * `Err(ExtractionFailure)` - 所有策略都失败，调用方应丢弃该URL
    pub async fn extract(
        &self,
        url: &str,
        session: &mut BrowserSession,
    ) -> Result<ExtractionResult, ExtractionFailure> {
        let started = Instant::now();
        let mut state = ExtractionState::NotStarted;
        let mut outcome = None;
        let mut static_failure = None;
        let mut dynamic_failures = Vec::new();

        loop {
            let next = match state {
                ExtractionState::NotStarted => ExtractionState::TryStatic,
                ExtractionState::TryStatic => match self.try_static(url).await {
                    Ok(result) => {
                        outcome = Some(result);
                        ExtractionState::Done(ExtractionStrategy::Static)
                    }
                    Err(failure) => {
                        info!(
                            "Static path ({}) failed for {} ({}), escalating to browser",
                            self.fetcher.name(),
                            url,
                            failure
                        );
                        static_failure = Some(failure);
                        ExtractionState::TryDynamic { attempt: 1 }
                    }
                },
                ExtractionState::TryDynamic { attempt } if !self.retry_policy.should_retry(attempt - 1) => {
                    ExtractionState::Failed
                }
                ExtractionState::TryDynamic { attempt } => match self.try_dynamic(url, session).await {
                    Ok(result) => {
                        outcome = Some(result);
                        ExtractionState::Done(ExtractionStrategy::Dynamic)
                    }
                    Err(failure) => {
                        warn!("Attempt {} failed for {}: {}", attempt, url, failure);
                        let recreate = failure.requires_new_session();
                        dynamic_failures.push(failure);
                        if recreate {
                            session.dispose().await;
                            // 最后一次尝试之后不再等待
                            if self.retry_policy.should_retry(attempt) {
                                let backoff = self.retry_policy.backoff;
                                if !backoff.is_zero() {
                                    tokio::time::sleep(backoff).await;
                                }
                            }
                        }
                        ExtractionState::TryDynamic { attempt: attempt + 1 }
                    }
                },
                ExtractionState::Done(_) | ExtractionState::Failed => break,
            };
            debug!("{}: {} -> {}", url, state, next);
            state = next;
        }

        histogram!(URL_DURATION_SECONDS).record(started.elapsed().as_secs_f64());

        match outcome {
            Some(result) => {
                match result.strategy {
                    ExtractionStrategy::Static => counter!(STATIC_SUCCESS_TOTAL).increment(1),
                    ExtractionStrategy::Dynamic => counter!(DYNAMIC_SUCCESS_TOTAL).increment(1),
                }
                info!("Extracted {} via {} path", url, result.strategy);
                Ok(result)
            }
            None => {
                counter!(FAILED_TOTAL).increment(1);
                Err(ExtractionFailure {
                    url: url.to_string(),
                    static_failure: static_failure.unwrap_or(StaticFailure::NoBody),
                    dynamic_failures,
                })
            }
        }
    }

    async fn try_static(&self, url: &str) -> Result<ExtractionResult, StaticFailure> {
        let html = self.fetcher.fetch(url).await?;
        let extraction = self.static_extractor.extract(&html, url)?;

        Ok(ExtractionResult::new(
            domain_name(url),
            extraction.company_name,
            url,
            extraction.content,
            ExtractionStrategy::Static,
        ))
    }

    async fn try_dynamic(
        &self,
        url: &str,
        session: &mut BrowserSession,
    ) -> Result<ExtractionResult, DynamicFailure> {
        let handle = session.acquire().await?;
        let extraction = self.dynamic_extractor.extract(handle, url).await?;

        Ok(ExtractionResult::new(
            domain_name(url),
            extraction.company_name,
            url,
            extraction.content,
            ExtractionStrategy::Dynamic,
        ))
    }
}

#[cfg(test)]
#[path = "router_test.rs"]
mod tests;
