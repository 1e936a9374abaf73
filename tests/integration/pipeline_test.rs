// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{fast_settings, MockBrowser, RoutedFetcher};
use extractrs::application::export::RecordExporter;
use extractrs::application::input::load_urls;
use extractrs::application::BatchProcessor;
use extractrs::domain::models::{GroupedRecord, IndexDocument};
use std::io::Write;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn site() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><body><nav>Menu</nav><main>Hello</main></body></html>",
        ))
        .mount(&server)
        .await;

    // 反爬虫拦截，只能靠浏览器
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    server
}

#[tokio::test]
async fn test_static_and_dynamic_urls_become_two_groups() {
    let server = site().await;
    let settings = fast_settings();
    let fetcher = Arc::new(RoutedFetcher::new(&settings, &server.uri(), &["example.com", "foo.test"]));
    let browser = Arc::new(MockBrowser::new().render("https://foo.test/page", Some("Foo"), "World"));
    let processor = BatchProcessor::from_settings(fetcher.clone(), browser.clone(), &settings);

    let output = processor
        .run(&["example.com".to_string(), "https://foo.test/page".to_string()])
        .await;

    assert_eq!(output.records.len(), 2);

    let example = &output.records[0];
    assert_eq!(example.domain_name, "example.com");
    assert_eq!(example.company_name.as_deref(), Some("Example"));
    assert_eq!(example.url, vec!["https://example.com"]);
    assert_eq!(example.content, "Hello");

    let foo = &output.records[1];
    assert_eq!(foo.domain_name, "foo.test");
    assert_eq!(foo.company_name.as_deref(), Some("Foo"));
    assert_eq!(foo.content, "World");

    // 静态路径先于浏览器尝试
    assert_eq!(
        fetcher.requests(),
        vec!["https://example.com".to_string(), "https://foo.test/page".to_string()]
    );
    assert_eq!(browser.count("launch"), 1);
    assert_eq!(browser.count("close"), 1);
    assert_eq!(output.report.succeeded, 2);
}

#[tokio::test]
async fn test_deny_listed_urls_are_never_requested() {
    let server = site().await;
    let settings = fast_settings();
    let fetcher = Arc::new(RoutedFetcher::new(&settings, &server.uri(), &["example.com"]));
    let browser = Arc::new(MockBrowser::new());
    let processor = BatchProcessor::from_settings(fetcher.clone(), browser.clone(), &settings);

    let output = processor
        .run(&[
            "https://www.youtube.com/watch?v=abc".to_string(),
            "https://drive.google.com/file/d/1".to_string(),
            "youtu.be/xyz".to_string(),
        ])
        .await;

    assert!(output.records.is_empty());
    assert!(fetcher.requests().is_empty());
    assert!(browser.events().is_empty());
    assert_eq!(output.report.skipped, 3);
    assert_eq!(output.report.processed, 0);
}

#[tokio::test]
async fn test_same_domain_and_company_are_merged_in_order() {
    let server = MockServer::start().await;
    for (route, body) in [("/a", "First"), ("/b", "Second")] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                r#"<html><head><meta property="og:site_name" content="Acme"></head><body><article>{}</article></body></html>"#,
                body
            )))
            .mount(&server)
            .await;
    }
    let settings = fast_settings();
    let fetcher = Arc::new(RoutedFetcher::new(&settings, &server.uri(), &["acme.com", "www.acme.com"]));
    let processor = BatchProcessor::from_settings(fetcher, Arc::new(MockBrowser::new()), &settings);

    let output = processor
        .run(&["acme.com/a".to_string(), "www.acme.com/b".to_string()])
        .await;

    assert_eq!(output.records.len(), 1, "www. prefix must not split the group: {:?}", output.records);
    assert_eq!(output.records[0].company_name.as_deref(), Some("Acme"));
    assert_eq!(output.records[0].content, "First\n\nSecond");
}

#[tokio::test]
async fn test_input_file_to_exported_json() {
    let server = site().await;
    let settings = fast_settings();
    let fetcher = Arc::new(RoutedFetcher::new(&settings, &server.uri(), &["example.com", "foo.test"]));
    let browser = Arc::new(MockBrowser::new().render("https://foo.test/page", None, "World"));
    let processor = BatchProcessor::from_settings(fetcher, browser, &settings);

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("startups.txt");
    let mut file = std::fs::File::create(&input).unwrap();
    writeln!(file, "example.com\n\n   \nhttps://foo.test/page\nyoutube.com/watch").unwrap();

    let urls = load_urls(&input).await.unwrap();
    assert_eq!(urls.len(), 3);

    let output = processor.run(&urls).await;
    let exporter = RecordExporter::new(dir.path().join("out"), &settings.export);
    let records_path = exporter.write_records(&input, &output.records).await.unwrap();
    let documents_path = exporter.write_documents(&input, &output.records).await.unwrap();

    assert!(records_path.ends_with("out/startups.json"));
    let records: Vec<GroupedRecord> = serde_json::from_slice(&std::fs::read(&records_path).unwrap()).unwrap();
    assert_eq!(records, output.records);

    let documents: Vec<IndexDocument> = serde_json::from_slice(&std::fs::read(&documents_path).unwrap()).unwrap();
    assert_eq!(documents.len(), 2);
    assert!(documents[0].text.contains("Hello"));
    assert!(documents
        .iter()
        .all(|d| d.text.chars().count() <= settings.export.document_max_chars));
}

#[tokio::test]
async fn test_content_is_capped_for_huge_pages() {
    let server = MockServer::start().await;
    let huge = "word ".repeat(30_000);
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!("<main>{}</main>", huge)))
        .mount(&server)
        .await;
    let settings = fast_settings();
    let fetcher = Arc::new(RoutedFetcher::new(&settings, &server.uri(), &["big.test"]));
    let processor = BatchProcessor::from_settings(fetcher, Arc::new(MockBrowser::new()), &settings);

    let output = processor.run(&["big.test".to_string()]).await;

    assert_eq!(output.records.len(), 1);
    assert_eq!(output.records[0].content.chars().count(), 100_000);
}
