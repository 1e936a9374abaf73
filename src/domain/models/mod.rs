// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// - 抓取结果（extraction_result）：单个URL的公司名称与正文
/// - 分组记录（grouped_record）：按域名与公司名聚合后的输出，以及供检索流水线使用的索引文档
pub mod extraction_result;
pub mod grouped_record;

pub use extraction_result::{ExtractionResult, ExtractionStrategy};
pub use grouped_record::{DocumentMetadata, GroupedRecord, IndexDocument, CONTENT_SEPARATOR};
