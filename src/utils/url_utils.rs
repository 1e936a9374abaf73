// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static SCHEME_PREFIX: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").ok());

/// 默认协议前缀
pub const DEFAULT_SCHEME: &str = "https://";

/// 规范化输入URL
///
/// 去除首尾空白；缺少协议时补上 `https://`，已有协议的URL保持不变（幂等）
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("{}{}", DEFAULT_SCHEME, trimmed)
    }
}

/// 判断字符串是否以 `scheme://` 开头
pub fn has_scheme(raw: &str) -> bool {
    match SCHEME_PREFIX.as_ref() {
        Some(re) => re.is_match(raw),
        None => raw.starts_with("http://") || raw.starts_with("https://"),
    }
}

/// 从URL中解析域名标识
///
/// 返回小写、去掉 `www.` 前缀和端口的主机名。该值是分组键的一部分。
/// 本函数永不失败：URL无法解析时退化为对原始字符串的切分。
pub fn domain_name(raw: &str) -> String {
    if let Ok(parsed) = Url::parse(raw.trim()) {
        if let Some(host) = parsed.host_str() {
            if !host.is_empty() {
                return strip_www(&host.to_lowercase()).to_string();
            }
        }
    }

    fallback_domain_name(raw)
}

fn fallback_domain_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_scheme = match trimmed.find("://") {
        Some(idx) => &trimmed[idx + 3..],
        None => trimmed,
    };
    let authority = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or(without_scheme);
    let host_port = authority.rsplit('@').next().unwrap_or(authority);
    let host = host_port.split(':').next().unwrap_or(host_port);

    let host = host.to_lowercase();
    let host = strip_www(&host);
    if host.is_empty() {
        trimmed.to_lowercase()
    } else {
        host.to_string()
    }
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// 由域名推导公司名：取第一段标签并首字母大写
///
/// `example.com` → `Example`
pub fn company_name_from_domain(domain: &str) -> Option<String> {
    let label = domain.split('.').next().unwrap_or_default();
    let mut chars = label.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect())
}

/// 判断URL是否命中屏蔽列表
///
/// 屏蔽项按子串匹配URL的域名标识（例如 `youtube.com` 同时命中 `m.youtube.com`）
pub fn is_denied(url: &str, deny_list: &[String]) -> bool {
    let domain = domain_name(url);
    deny_list
        .iter()
        .map(|entry| entry.trim().to_lowercase())
        .filter(|entry| !entry.is_empty())
        .any(|entry| domain.contains(&entry))
}
