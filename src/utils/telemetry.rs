// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 默认日志过滤规则
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "debug,extractrs=trace"
    } else {
        "info,extractrs=debug"
    }
}

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则回退到 [`default_filter`]
pub fn init_telemetry(verbose: bool) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(verbose).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
}
