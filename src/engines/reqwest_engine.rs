// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::StaticFetchSettings;
use crate::engines::traits::{EngineError, PageFetcher};
use crate::engines::user_agents::UserAgentPool;
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// 静态抓取引擎
///
/// 基于reqwest的单次GET请求：随机User-Agent、固定超时、跟随重定向、不校验证书。
/// 本层不做重试，失败时返回错误由上层决定是否切换策略。
pub struct ReqwestEngine {
    client: reqwest::Client,
    user_agents: UserAgentPool,
}

impl ReqwestEngine {
    /// 根据配置创建引擎
    pub fn new(settings: &StaticFetchSettings) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(settings.max_redirects))
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            user_agents: UserAgentPool::new(settings.user_agents.clone()),
        })
    }

    async fn fetch_inner(&self, url: &str) -> Result<String, EngineError> {
        let user_agent = self.user_agents.pick();
        debug!("Static fetch {} with user agent {}", url, user_agent);

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::HttpStatus(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl PageFetcher for ReqwestEngine {
    async fn fetch(&self, url: &str) -> Result<String, EngineError> {
        let start = Instant::now();
        match self.fetch_inner(url).await {
            Ok(body) => {
                debug!(
                    "Static fetch succeeded for {} ({} bytes in {:?})",
                    url,
                    body.len(),
                    start.elapsed()
                );
                Ok(body)
            }
            Err(e) => {
                warn!("Static fetch failed for {}: {}", url, e);
                Err(e)
            }
        }
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
