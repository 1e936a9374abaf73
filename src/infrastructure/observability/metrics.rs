// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use thiserror::Error;
use tracing::info;

pub const URLS_TOTAL: &str = "extraction_urls_total";
pub const SKIPPED_TOTAL: &str = "extraction_skipped_total";
pub const STATIC_SUCCESS_TOTAL: &str = "extraction_static_success_total";
pub const DYNAMIC_SUCCESS_TOTAL: &str = "extraction_dynamic_success_total";
pub const FAILED_TOTAL: &str = "extraction_failed_total";
pub const SESSIONS_LAUNCHED_TOTAL: &str = "browser_sessions_launched_total";
pub const SESSIONS_DISPOSED_TOTAL: &str = "browser_sessions_disposed_total";
pub const URL_DURATION_SECONDS: &str = "extraction_url_duration_seconds";

/// 指标初始化错误
#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Invalid metrics listen address {0}")]
    InvalidAddress(String),
    #[error("Failed to install Prometheus recorder: {0}")]
    Install(String),
}

/// 初始化指标系统
///
/// 安装带HTTP监听的 Prometheus 导出器并注册指标描述。
/// 未调用时所有指标宏都是空操作。
pub fn init_metrics(listen_addr: &str) -> Result<(), MetricsError> {
    let addr: SocketAddr = listen_addr
        .parse()
        .map_err(|_| MetricsError::InvalidAddress(listen_addr.to_string()))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| MetricsError::Install(e.to_string()))?;

    describe_metrics();
    info!("Metrics exporter listening on {}", addr);
    Ok(())
}

fn describe_metrics() {
    describe_counter!(URLS_TOTAL, "Total number of URLs read from input");
    describe_counter!(SKIPPED_TOTAL, "Total number of deny-listed URLs skipped");
    describe_counter!(
        STATIC_SUCCESS_TOTAL,
        "Total number of URLs extracted by the static strategy"
    );
    describe_counter!(
        DYNAMIC_SUCCESS_TOTAL,
        "Total number of URLs extracted by the browser strategy"
    );
    describe_counter!(FAILED_TOTAL, "Total number of URLs that produced no record");
    describe_counter!(SESSIONS_LAUNCHED_TOTAL, "Total number of browser sessions launched");
    describe_counter!(SESSIONS_DISPOSED_TOTAL, "Total number of browser sessions disposed");
    describe_histogram!(
        URL_DURATION_SECONDS,
        "Duration of a single URL extraction in seconds"
    );
}
