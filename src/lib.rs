// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 批处理流程：读取URL列表、逐个抓取、分组并导出
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含抓取结果、分组记录等核心实体，以及静态解析和分组服务
pub mod domain;

/// 引擎模块
///
/// 静态HTTP抓取、浏览器会话与动态提取，以及串联两种策略的编排器
pub mod engines;

/// 基础设施模块
///
/// 提供指标导出等外部集成
pub mod infrastructure;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;
