// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Context;
use clap::Parser;
use extractrs::application::export::RecordExporter;
use extractrs::application::input::load_urls;
use extractrs::application::{BatchError, BatchProcessor};
use extractrs::config::settings::Settings;
use extractrs::engines::chromium_engine::ChromiumLauncher;
use extractrs::engines::reqwest_engine::ReqwestEngine;
use extractrs::engines::traits::{BrowserLauncher, PageFetcher};
use extractrs::infrastructure::observability::metrics::init_metrics;
use extractrs::utils::telemetry;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};

/// 被 Ctrl-C 中断时的退出码 (128 + SIGINT)
const EXIT_INTERRUPTED: u8 = 130;

#[derive(Parser, Debug)]
#[command(name = "extractrs")]
#[command(about = "Extract company names and page text from URL lists, static HTML first and a headless browser as fallback")]
#[command(version)]
struct Cli {
    /// Files with one URL per line; each is processed as its own batch
    #[arg(required = true, value_name = "INPUT")]
    inputs: Vec<PathBuf>,

    /// Configuration file layered over the built-in defaults
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory for the `<input stem>.json` result files
    #[arg(short, long, default_value = "data")]
    output_dir: PathBuf,

    /// Also write `<input stem>.documents.json` for the retrieval index
    #[arg(long)]
    documents: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// 一次运行中各输入文件的处理结果
#[derive(Debug, Default, PartialEq, Eq)]
struct RunSummary {
    /// 成功处理（含无数据）的输入文件数
    completed: usize,
    /// 读取或写出失败的输入文件数
    failed: usize,
}

/// 主函数
///
/// 逐个处理输入文件，每个文件独立运行一次批处理并写出结果
#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // 1. Initialize logging
    telemetry::init_telemetry(cli.verbose);
    info!("Starting extractrs...");

    // 2. Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::from_file(&path.to_string_lossy())
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Settings::new().context("failed to load configuration")?,
    };
    info!("Configuration loaded");

    if settings.metrics.enabled {
        init_metrics(&settings.metrics.listen_addr)?;
    }

    // 3. Build engines
    let fetcher: Arc<dyn PageFetcher> = Arc::new(ReqwestEngine::new(&settings.static_fetch)?);
    let launcher: Arc<dyn BrowserLauncher> = Arc::new(ChromiumLauncher::new(settings.browser.clone()));
    let processor = BatchProcessor::from_settings(fetcher, launcher, &settings);
    let exporter = RecordExporter::new(&cli.output_dir, &settings.export);

    // 4. Process each input list; 中断时丢弃整个 future，浏览器会话随之析构
    let summary = tokio::select! {
        summary = run_inputs(&processor, &exporter, &cli.inputs, cli.documents) => summary,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, shutting down");
            return Ok(ExitCode::from(EXIT_INTERRUPTED));
        }
    };

    info!(
        "Finished: {} input(s) completed, {} failed",
        summary.completed, summary.failed
    );
    Ok(if summary.failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// 依次处理所有输入文件，单个文件失败只记录日志并继续下一个
async fn run_inputs(
    processor: &BatchProcessor,
    exporter: &RecordExporter,
    inputs: &[PathBuf],
    documents: bool,
) -> RunSummary {
    let mut summary = RunSummary::default();

    for input in inputs {
        match process_input(processor, exporter, input, documents).await {
            Ok(()) => summary.completed += 1,
            Err(e) => {
                error!("Skipping {}: {}", input.display(), e);
                summary.failed += 1;
            }
        }
    }

    summary
}

async fn process_input(
    processor: &BatchProcessor,
    exporter: &RecordExporter,
    input: &Path,
    documents: bool,
) -> Result<(), BatchError> {
    let urls = load_urls(input).await?;
    info!("Processing {} ({} URLs)", input.display(), urls.len());

    let output = processor.run(&urls).await;
    if output.records.is_empty() {
        warn!("No data collected from {}", input.display());
        return Ok(());
    }

    exporter.write_records(input, &output.records).await?;
    if documents {
        exporter.write_documents(input, &output.records).await?;
    }
    Ok(())
}
