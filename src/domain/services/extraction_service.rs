// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::text::{non_empty, truncate_chars, DEFAULT_MAX_CONTENT_CHARS};
use crate::utils::url_utils::{company_name_from_domain, domain_name};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, warn};

/// 正文定位的选择器级联，按优先级排列，先匹配者胜出
pub const CONTENT_SELECTORS: &[&str] = &[
    "main",
    "article",
    ".main-content",
    "#content",
    "[role=\"main\"]",
];

/// 站点名称的 meta 选择器，按优先级排列
pub const SITE_NAME_SELECTORS: &[&str] = &[
    "meta[property=\"og:site_name\"]",
    "meta[name=\"application-name\"]",
];

/// 不可见文本所在的标签
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template", "head"];

static CONTENT_CASCADE: Lazy<Vec<(&'static str, Selector)>> = Lazy::new(|| compile(CONTENT_SELECTORS));
static SITE_NAME_CASCADE: Lazy<Vec<(&'static str, Selector)>> = Lazy::new(|| compile(SITE_NAME_SELECTORS));
static BODY_SELECTOR: Lazy<Vec<(&'static str, Selector)>> = Lazy::new(|| compile(&["body"]));

fn compile(selectors: &[&'static str]) -> Vec<(&'static str, Selector)> {
    selectors
        .iter()
        .filter_map(|raw| match Selector::parse(raw) {
            Ok(selector) => Some((*raw, selector)),
            Err(e) => {
                warn!("Skipping invalid selector {}: {:?}", raw, e);
                None
            }
        })
        .collect()
}

/// 正文来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    /// 命中级联中的某个选择器
    Selector(&'static str),
    /// 未命中任何选择器，回退到整个 `<body>`
    Body,
}

/// 静态解析失败原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    /// 没有可解析的页面主体
    NoBody,
    /// 找到了主体但没有可见文本
    EmptyContent,
}

/// 静态解析结果
#[derive(Debug, Clone, PartialEq)]
pub struct StaticExtraction {
    /// 公司/站点名称
    pub company_name: Option<String>,
    /// 正文（已截断）
    pub content: String,
    /// 正文来源
    pub source: ContentSource,
}

/// 静态提取服务
///
/// 从原始HTML中同步解析公司名称和正文，本层从不panic或向上抛出异常
#[derive(Debug, Clone)]
pub struct ExtractionService {
    max_content_chars: usize,
}

impl Default for ExtractionService {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONTENT_CHARS)
    }
}

impl ExtractionService {
    pub fn new(max_content_chars: usize) -> Self {
        Self { max_content_chars }
    }

    /// 提取公司名称和正文
    ///
    /// # 参数
    ///
    /// * `html` - 原始HTML
    /// * `url` - 来源URL，用于推导回退的公司名称
    ///
    /// # 返回值
    ///
    /// * `Ok(StaticExtraction)` - 正文非空
    /// * `Err(ParseFailure)` - 没有主体或没有可见文本（名称与正文均视为缺失）
    pub fn extract(&self, html: &str, url: &str) -> Result<StaticExtraction, ParseFailure> {
        if html.trim().is_empty() {
            return Err(ParseFailure::NoBody);
        }

        let document = Html::parse_document(html);
        let company_name = site_name(&document).or_else(|| company_name_from_domain(&domain_name(url)));

        for (raw, selector) in CONTENT_CASCADE.iter() {
            if let Some(element) = document.select(selector).next() {
                debug!("Content selector {} matched for {}", raw, url);
                let text = self.visible_text(element);
                return if text.is_empty() {
                    Err(ParseFailure::EmptyContent)
                } else {
                    Ok(StaticExtraction {
                        company_name,
                        content: text,
                        source: ContentSource::Selector(raw),
                    })
                };
            }
        }

        let body = BODY_SELECTOR
            .first()
            .and_then(|(_, selector)| document.select(selector).next())
            .ok_or(ParseFailure::NoBody)?;

        let text = self.visible_text(body);
        if text.is_empty() {
            return Err(ParseFailure::EmptyContent);
        }

        Ok(StaticExtraction {
            company_name,
            content: text,
            source: ContentSource::Body,
        })
    }

    /// 拼接元素内的可见文本节点：逐个去空白、丢弃空节点、以单个空格连接，然后截断
    fn visible_text(&self, element: ElementRef<'_>) -> String {
        let root_id = element.id();
        let mut parts: Vec<&str> = Vec::new();

        for node in element.descendants() {
            let Node::Text(text) = node.value() else {
                continue;
            };

            let hidden = node
                .ancestors()
                .take_while(|ancestor| ancestor.id() != root_id)
                .filter_map(|ancestor| ancestor.value().as_element())
                .any(|el| HIDDEN_TAGS.contains(&el.name()));
            if hidden {
                continue;
            }

            let trimmed = text.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed);
            }
        }

        truncate_chars(&parts.join(" "), self.max_content_chars)
    }
}

fn site_name(document: &Html) -> Option<String> {
    // 第一个出现的标签决定结果，内容为空时直接回退到域名
    let meta = SITE_NAME_CASCADE
        .iter()
        .find_map(|(_, selector)| document.select(selector).next())?;
    non_empty(meta.value().attr("content").map(str::to_string))
}

#[cfg(test)]
#[path = "extraction_service_test.rs"]
mod tests;
