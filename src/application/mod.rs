// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 批处理编排、URL列表读取与结果导出
pub mod batch_processor;
pub mod error;
pub mod export;
pub mod input;

pub use batch_processor::{BatchOutput, BatchProcessor, BatchReport};
pub use error::BatchError;
