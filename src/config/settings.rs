// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::retry_policy::RetryPolicy;
use crate::utils::text::DEFAULT_MAX_CONTENT_CHARS;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};

/// 可通过逗号分隔的环境变量覆盖的列表配置项
const LIST_KEYS: &[&str] = &[
    "batch.deny_list",
    "static_fetch.user_agents",
    "browser.extra_args",
];
use serde::Deserialize;
use std::time::Duration;

/// 应用程序配置设置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// 静态抓取配置
    pub static_fetch: StaticFetchSettings,
    /// 浏览器配置
    pub browser: BrowserSettings,
    /// 提取与重试配置
    pub extraction: ExtractionSettings,
    /// 批处理配置
    pub batch: BatchSettings,
    /// 导出配置
    pub export: ExportSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
}

/// 静态抓取配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct StaticFetchSettings {
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 是否跳过证书校验
    pub accept_invalid_certs: bool,
    /// 最大重定向次数
    pub max_redirects: usize,
    /// 自定义 User-Agent 池，为空时使用内置池
    #[serde(default)]
    pub user_agents: Vec<String>,
}

impl Default for StaticFetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            accept_invalid_certs: true,
            max_redirects: 10,
            user_agents: Vec::new(),
        }
    }
}

/// 浏览器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    /// 是否无头模式
    pub headless: bool,
    /// 页面加载超时（秒）
    pub page_load_timeout_secs: u64,
    /// 页面脚本执行超时（秒）
    pub script_timeout_secs: u64,
    /// 导航完成后等待客户端渲染的时间（毫秒）
    pub settle_delay_ms: u64,
    /// 加载超时后重新导航前的暂停（毫秒）
    pub navigation_retry_pause_ms: u64,
    /// Chrome 可执行文件路径
    pub chrome_path: Option<String>,
    /// 远程调试地址，设置后连接已有实例而不是启动新进程
    pub remote_debugging_url: Option<String>,
    /// 额外的启动参数
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            page_load_timeout_secs: 30,
            script_timeout_secs: 30,
            settle_delay_ms: 3_000,
            navigation_retry_pause_ms: 2_000,
            chrome_path: None,
            remote_debugging_url: None,
            extra_args: Vec::new(),
        }
    }
}

impl BrowserSettings {
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }

    pub fn script_timeout(&self) -> Duration {
        Duration::from_secs(self.script_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn navigation_retry_pause(&self) -> Duration {
        Duration::from_millis(self.navigation_retry_pause_ms)
    }
}

/// 提取与重试配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionSettings {
    /// 正文最大字符数
    pub max_content_chars: usize,
    /// 动态抓取最大尝试次数
    pub max_dynamic_attempts: u32,
    /// 动态抓取失败后的等待时间（毫秒）
    pub retry_backoff_ms: u64,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
            max_dynamic_attempts: 3,
            retry_backoff_ms: 5_000,
        }
    }
}

impl ExtractionSettings {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::fixed(
            self.max_dynamic_attempts,
            Duration::from_millis(self.retry_backoff_ms),
        )
    }
}

/// 批处理配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct BatchSettings {
    /// 每个URL处理完成后的固定间隔（毫秒）
    pub request_delay_ms: u64,
    /// 屏蔽的域名子串
    pub deny_list: Vec<String>,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            request_delay_ms: 2_000,
            deny_list: default_deny_list(),
        }
    }
}

impl BatchSettings {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

fn default_deny_list() -> Vec<String> {
    ["drive.google.com", "youtube.com", "youtu.be"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// 导出配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ExportSettings {
    /// 索引文档的最大字符数
    pub document_max_chars: usize,
    /// 是否输出格式化JSON
    pub pretty: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            document_max_chars: 1_000,
            pretty: true,
        }
    }
}

/// 指标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用 Prometheus 监听
    pub enabled: bool,
    /// 监听地址
    pub listen_addr: String,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: "127.0.0.1:9000".to_string(),
        }
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载：内置默认值 → `config/default` → `config/{APP_ENVIRONMENT}` → `EXTRACTRS__*` 环境变量
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Self::environment());

        builder.build()?.try_deserialize()
    }

    /// 从指定文件加载配置（叠加在默认值之上，环境变量仍然优先）
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let builder = Self::defaults()?
            .add_source(File::with_name(path).required(true))
            .add_source(Self::environment());

        builder.build()?.try_deserialize()
    }

    /// `EXTRACTRS__SECTION__KEY` 环境变量，列表项以逗号分隔
    fn environment() -> Environment {
        LIST_KEYS.iter().fold(
            Environment::with_prefix("EXTRACTRS")
                .separator("__")
                .try_parsing(true)
                .list_separator(","),
            |env, key| env.with_list_parse_key(key),
        )
    }

    fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let fetch = StaticFetchSettings::default();
        let browser = BrowserSettings::default();
        let extraction = ExtractionSettings::default();
        let batch = BatchSettings::default();
        let export = ExportSettings::default();
        let metrics = MetricsSettings::default();

        Config::builder()
            // Static fetch
            .set_default("static_fetch.timeout_secs", fetch.timeout_secs)?
            .set_default("static_fetch.accept_invalid_certs", fetch.accept_invalid_certs)?
            .set_default("static_fetch.max_redirects", fetch.max_redirects as u64)?
            .set_default("static_fetch.user_agents", Vec::<String>::new())?
            // Browser
            .set_default("browser.headless", browser.headless)?
            .set_default("browser.page_load_timeout_secs", browser.page_load_timeout_secs)?
            .set_default("browser.script_timeout_secs", browser.script_timeout_secs)?
            .set_default("browser.settle_delay_ms", browser.settle_delay_ms)?
            .set_default("browser.navigation_retry_pause_ms", browser.navigation_retry_pause_ms)?
            .set_default("browser.extra_args", Vec::<String>::new())?
            // Extraction
            .set_default("extraction.max_content_chars", extraction.max_content_chars as u64)?
            .set_default("extraction.max_dynamic_attempts", extraction.max_dynamic_attempts as u64)?
            .set_default("extraction.retry_backoff_ms", extraction.retry_backoff_ms)?
            // Batch
            .set_default("batch.request_delay_ms", batch.request_delay_ms)?
            .set_default("batch.deny_list", batch.deny_list)?
            // Export
            .set_default("export.document_max_chars", export.document_max_chars as u64)?
            .set_default("export.pretty", export.pretty)?
            // Metrics
            .set_default("metrics.enabled", metrics.enabled)?
            .set_default("metrics.listen_addr", metrics.listen_addr)
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
