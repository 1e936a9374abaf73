// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::{BrowserHandle, BrowserLauncher, EngineError};
use crate::infrastructure::observability::metrics::{SESSIONS_DISPOSED_TOTAL, SESSIONS_LAUNCHED_TOTAL};
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 浏览器会话管理器
///
/// 懒启动、跨URL复用、失败后丢弃重建。同一时刻最多持有一个活跃句柄，
/// 调用方需要独占 `&mut self` 才能使用，因此不会被并发访问。
pub struct BrowserSession {
    launcher: Arc<dyn BrowserLauncher>,
    handle: Option<Box<dyn BrowserHandle>>,
    launches: u32,
    disposals: u32,
}

impl BrowserSession {
    pub fn new(launcher: Arc<dyn BrowserLauncher>) -> Self {
        Self {
            launcher,
            handle: None,
            launches: 0,
            disposals: 0,
        }
    }

    /// 获取活跃句柄，没有时启动一个新的
    ///
    /// 启动失败时会话保持空闲，下次调用会再次尝试
    pub async fn acquire(&mut self) -> Result<&mut dyn BrowserHandle, EngineError> {
        if self.handle.is_none() {
            debug!("Launching new browser session");
            let handle = self.launcher.launch().await?;
            self.launches += 1;
            counter!(SESSIONS_LAUNCHED_TOTAL).increment(1);
            info!("Browser session launched (#{})", self.launches);
            self.handle = Some(handle);
        }

        match self.handle.as_deref_mut() {
            Some(handle) => {
                let handle: &mut dyn BrowserHandle = handle;
                Ok(handle)
            }
            None => Err(EngineError::Other("browser session unavailable".to_string())),
        }
    }

    /// 关闭并丢弃当前句柄
    ///
    /// 幂等：没有活跃句柄时什么都不做。关闭失败只记录日志，句柄照样被丢弃。
    pub async fn dispose(&mut self) {
        let Some(mut handle) = self.handle.take() else {
            return;
        };

        if let Err(e) = handle.close().await {
            warn!("Failed to close browser session cleanly: {}", e);
        }
        self.disposals += 1;
        counter!(SESSIONS_DISPOSED_TOTAL).increment(1);
        debug!("Browser session disposed");
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// 累计启动次数
    pub fn launch_count(&self) -> u32 {
        self.launches
    }

    /// 累计丢弃次数
    pub fn dispose_count(&self) -> u32 {
        self.disposals
    }
}
