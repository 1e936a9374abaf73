// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{fast_settings, BrowserBehavior, MockBrowser, RoutedFetcher};
use extractrs::application::BatchProcessor;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 所有静态请求都被拦截的站点
async fn blocking_site() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_crash_on_first_attempt_recreates_session() {
    let server = blocking_site().await;
    let settings = fast_settings();
    let fetcher = Arc::new(RoutedFetcher::new(&settings, &server.uri(), &["spa.test"]));
    let browser = Arc::new(
        MockBrowser::new()
            .then(BrowserBehavior::Crash)
            .render("https://spa.test", None, "Rendered on the client"),
    );
    let processor = BatchProcessor::from_settings(fetcher, browser.clone(), &settings);

    let output = processor.run(&["spa.test".to_string()]).await;

    assert_eq!(output.records.len(), 1);
    assert_eq!(output.records[0].content, "Rendered on the client");
    assert_eq!(
        browser.events(),
        vec![
            "launch",
            "navigate https://spa.test",
            "close",
            "launch",
            "navigate https://spa.test",
            "close",
        ]
    );
    assert_eq!(output.report.sessions_launched, 2);
}

#[tokio::test]
async fn test_exhausted_attempts_drop_url_and_batch_continues() {
    let server = blocking_site().await;
    let settings = fast_settings();
    let fetcher = Arc::new(RoutedFetcher::new(&settings, &server.uri(), &["down.test", "up.test"]));
    let browser = Arc::new(
        MockBrowser::new()
            .then(BrowserBehavior::Crash)
            .then(BrowserBehavior::Crash)
            .then(BrowserBehavior::Crash)
            .render("https://up.test", None, "Still here"),
    );
    let processor = BatchProcessor::from_settings(fetcher, browser.clone(), &settings);

    let output = processor
        .run(&["down.test".to_string(), "up.test".to_string()])
        .await;

    assert_eq!(output.records.len(), 1);
    assert_eq!(output.records[0].domain_name, "up.test");
    assert_eq!(output.report.failed, 1);
    assert_eq!(output.report.succeeded, 1);
    assert_eq!(browser.count("navigate https://down.test"), 3);
    // 三次崩溃各丢弃一次，结束时再关闭一次
    assert_eq!(browser.count("launch"), 4);
    assert_eq!(browser.count("close"), 4);
}

#[tokio::test]
async fn test_configured_attempt_cap_is_respected() {
    let server = blocking_site().await;
    let mut settings = fast_settings();
    settings.extraction.max_dynamic_attempts = 1;
    let fetcher = Arc::new(RoutedFetcher::new(&settings, &server.uri(), &["down.test"]));
    let browser = Arc::new(
        MockBrowser::new()
            .then(BrowserBehavior::Crash)
            .render("https://down.test", None, "would have worked"),
    );
    let processor = BatchProcessor::from_settings(fetcher, browser.clone(), &settings);

    let output = processor.run(&["down.test".to_string()]).await;

    assert!(output.records.is_empty());
    assert_eq!(browser.count("launch"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_pacing_uses_configured_delays() {
    let settings = {
        let mut settings = fast_settings();
        settings.batch.request_delay_ms = 2_000;
        settings.browser.settle_delay_ms = 3_000;
        settings
    };
    // 不可达主机，静态路径立即失败，不依赖真实网络计时
    let fetcher = Arc::new(RoutedFetcher::new(&settings, "http://127.0.0.1:1", &[]));
    let browser = Arc::new(
        MockBrowser::new()
            .render("https://a.test", None, "A")
            .render("https://b.test", None, "B"),
    );
    let processor = BatchProcessor::from_settings(fetcher, browser, &settings);

    let start = tokio::time::Instant::now();
    let output = processor
        .run(&["a.test".to_string(), "b.test".to_string()])
        .await;

    assert_eq!(output.records.len(), 2);
    // 每个URL：渲染等待3秒 + 请求间隔2秒
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(10), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(12), "elapsed {:?}", elapsed);
}
