// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 产生结果的抓取策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStrategy {
    /// HTTP直接抓取 + HTML解析
    Static,
    /// 浏览器自动化
    Dynamic,
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionStrategy::Static => write!(f, "static"),
            ExtractionStrategy::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// 单个URL的抓取结果
///
/// 每个成功处理的URL最多产生一条，失败的URL不产生记录。
/// `content` 始终非空且不超过配置的最大字符数。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// 域名标识（分组键的一部分）
    pub domain_name: String,
    /// 公司名称（分组键的一部分）
    pub company_name: Option<String>,
    /// 规范化后的URL
    pub url: String,
    /// 清洗后的正文
    pub content: String,
    /// 产生该结果的策略
    #[serde(skip, default = "default_strategy")]
    pub strategy: ExtractionStrategy,
}

fn default_strategy() -> ExtractionStrategy {
    ExtractionStrategy::Static
}

impl ExtractionResult {
    pub fn new(
        domain_name: impl Into<String>,
        company_name: Option<String>,
        url: impl Into<String>,
        content: impl Into<String>,
        strategy: ExtractionStrategy,
    ) -> Self {
        Self {
            domain_name: domain_name.into(),
            company_name,
            url: url.into(),
            content: content.into(),
            strategy,
        }
    }

    /// 分组键 `(domain_name, company_name)`
    pub fn group_key(&self) -> (String, Option<String>) {
        (self.domain_name.clone(), self.company_name.clone())
    }
}
