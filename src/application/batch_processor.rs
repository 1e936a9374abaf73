// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::{BatchSettings, Settings};
use crate::domain::models::GroupedRecord;
use crate::domain::services::grouping_service::group_results;
use crate::engines::browser_session::BrowserSession;
use crate::engines::router::ExtractionOrchestrator;
use crate::engines::traits::{BrowserLauncher, PageFetcher};
use crate::infrastructure::observability::metrics::{SKIPPED_TOTAL, URLS_TOTAL};
use crate::utils::url_utils::{is_denied, normalize_url};
use metrics::counter;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 一次批处理的统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// 实际交给编排器的URL数
    pub processed: usize,
    /// 命中屏蔽列表而跳过的URL数
    pub skipped: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// 本次运行启动浏览器的次数
    pub sessions_launched: u32,
}

/// 批处理输出：分组记录 + 统计
#[derive(Debug, Clone)]
pub struct BatchOutput {
    pub records: Vec<GroupedRecord>,
    pub report: BatchReport,
}

/// 批处理器
///
/// 顺序处理URL列表：规范化、过滤、逐个抓取、固定间隔限速，最后分组。
/// 浏览器会话归本次运行独占，运行结束时关闭。
pub struct BatchProcessor {
    orchestrator: ExtractionOrchestrator,
    launcher: Arc<dyn BrowserLauncher>,
    settings: BatchSettings,
}

impl BatchProcessor {
    pub fn new(
        orchestrator: ExtractionOrchestrator,
        launcher: Arc<dyn BrowserLauncher>,
        settings: BatchSettings,
    ) -> Self {
        Self {
            orchestrator,
            launcher,
            settings,
        }
    }

    pub fn from_settings(
        fetcher: Arc<dyn PageFetcher>,
        launcher: Arc<dyn BrowserLauncher>,
        settings: &Settings,
    ) -> Self {
        Self::new(
            ExtractionOrchestrator::from_settings(fetcher, settings),
            launcher,
            settings.batch.clone(),
        )
    }

    /// 处理一批URL
    ///
    /// 单个URL的失败只记录日志，不会中断批处理。
    /// 若运行的 future 被提前丢弃，会话随之析构，浏览器进程同样会被终止。
    pub async fn run(&self, urls: &[String]) -> BatchOutput {
        let total = urls.len();
        let delay = self.settings.request_delay();
        let mut session = BrowserSession::new(self.launcher.clone());
        let mut report = BatchReport::default();
        let mut results = Vec::new();

        for (index, raw) in urls.iter().enumerate() {
            if raw.trim().is_empty() {
                continue;
            }

            let url = normalize_url(raw);
            counter!(URLS_TOTAL).increment(1);
            info!("Processing ({}/{}): {}", index + 1, total, url);

            if is_denied(&url, &self.settings.deny_list) {
                info!("Skipping unsupported URL: {}", url);
                report.skipped += 1;
                counter!(SKIPPED_TOTAL).increment(1);
                continue;
            }

            report.processed += 1;
            match self.orchestrator.extract(&url, &mut session).await {
                Ok(result) => {
                    debug!("Collected {} chars from {}", result.content.chars().count(), url);
                    report.succeeded += 1;
                    results.push(result);
                }
                Err(failure) => {
                    report.failed += 1;
                    warn!("Dropping {}: {}", url, failure);
                }
            }

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        session.dispose().await;
        report.sessions_launched = session.launch_count();

        let records = group_results(results);
        info!(
            "Batch finished: processed={}, skipped={}, succeeded={}, failed={}, sessions_launched={}, groups={}",
            report.processed,
            report.skipped,
            report.succeeded,
            report.failed,
            report.sessions_launched,
            records.len()
        );

        BatchOutput { records, report }
    }
}
