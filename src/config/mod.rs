// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置，包括静态抓取、浏览器、重试、批处理节奏与导出等配置
pub mod settings;
