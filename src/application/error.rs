// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::PathBuf;
use thiserror::Error;

/// 批处理级别的致命错误
///
/// 单个URL的失败不会出现在这里，只有输入/输出层面的失败才会中止一次运行
#[derive(Error, Debug)]
pub enum BatchError {
    /// 输入文件缺失或无法读取
    #[error("Failed to read URL list {}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 结果文件写入失败
    #[error("Failed to write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 结果序列化失败
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}
