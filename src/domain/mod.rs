// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// - 领域模型（models）：抓取结果、分组记录与索引文档
/// - 服务（services）：静态HTML解析与结果分组
///
/// 领域层不依赖任何网络或浏览器实现。
pub mod models;
pub mod services;
