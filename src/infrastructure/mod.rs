// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 目前只包含可观测性（observability）：指标名称定义与 Prometheus 导出器
pub mod observability;
