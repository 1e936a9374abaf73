// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::text::truncate_chars;
use serde::{Deserialize, Serialize};

/// 分组内容之间的分隔符
pub const CONTENT_SEPARATOR: &str = "\n\n";

/// 按 `(domain_name, company_name)` 聚合后的记录
///
/// 批处理的唯一持久输出。`url` 与 `content` 均保持结果产生的先后顺序。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedRecord {
    pub domain_name: String,
    pub company_name: Option<String>,
    pub url: Vec<String>,
    pub content: String,
}

/// 供检索问答流水线索引的文档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDocument {
    pub id: String,
    pub text: String,
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub domain_name: String,
    pub company_name: Option<String>,
    pub urls: Vec<String>,
}

impl GroupedRecord {
    /// 文档ID：`domain::company`，缺失公司名时用 `-`
    pub fn document_id(&self) -> String {
        format!(
            "{}::{}",
            self.domain_name,
            self.company_name.as_deref().unwrap_or("-")
        )
    }

    /// 扁平化为索引文档，`text` 截断到 `max_chars` 个字符
    pub fn to_index_document(&self, max_chars: usize) -> IndexDocument {
        let header = format!(
            "Company: {}\nDomain: {}\nSources: {}",
            self.company_name.as_deref().unwrap_or("unknown"),
            self.domain_name,
            self.url.join(", ")
        );
        let text = format!("{}{}{}", header, CONTENT_SEPARATOR, self.content);

        IndexDocument {
            id: self.document_id(),
            text: truncate_chars(&text, max_chars),
            metadata: DocumentMetadata {
                domain_name: self.domain_name.clone(),
                company_name: self.company_name.clone(),
                urls: self.url.clone(),
            },
        }
    }
}
