// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::error::BatchError;
use std::path::Path;
use tracing::debug;

/// 读取按行分隔的URL列表
///
/// 文件缺失或不是合法UTF-8时直接失败，不做部分处理
pub async fn load_urls(path: &Path) -> Result<Vec<String>, BatchError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| BatchError::Input {
            path: path.to_path_buf(),
            source,
        })?;

    let urls = parse_url_list(&text);
    debug!("Loaded {} URLs from {}", urls.len(), path.display());
    Ok(urls)
}

/// 去除每行首尾空白并丢弃空行，保留顺序和重复项
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
