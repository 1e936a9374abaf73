// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::{ExtractionResult, GroupedRecord, CONTENT_SEPARATOR};
use std::collections::HashMap;

/// 将逐URL结果按 `(domain_name, company_name)` 聚合
///
/// 组的顺序为键首次出现的顺序；组内 `url` 与 `content` 按结果产生顺序排列，
/// 正文之间以空行分隔。不同域名即使公司名相同也不会合并。
pub fn group_results(results: Vec<ExtractionResult>) -> Vec<GroupedRecord> {
    let mut groups: Vec<GroupedRecord> = Vec::new();
    let mut index: HashMap<(String, Option<String>), usize> = HashMap::new();

    for result in results {
        let key = result.group_key();
        match index.get(&key) {
            Some(&position) => {
                let group = &mut groups[position];
                group.url.push(result.url);
                group.content.push_str(CONTENT_SEPARATOR);
                group.content.push_str(&result.content);
            }
            None => {
                index.insert(key, groups.len());
                groups.push(GroupedRecord {
                    domain_name: result.domain_name,
                    company_name: result.company_name,
                    url: vec![result.url],
                    content: result.content,
                });
            }
        }
    }

    groups
}
