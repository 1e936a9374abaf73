// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 提取服务（extraction_service）：从静态HTML中解析公司名称和正文
/// - 分组服务（grouping_service）：按域名与公司名聚合逐URL结果
pub mod extraction_service;
pub mod grouping_service;
