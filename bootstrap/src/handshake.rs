//! 启动握手
//!
//! 对外提供流量之前，确认存储可达且所需表已存在。
//! 固定间隔重试；全部失败时返回致命错误，由调用方终止进程。

use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use tracing::{error, info};
use wiki_config::StartupConfig;
use wiki_errors::AppError;
use wiki_ports::StorageGateway;

use crate::error::BootstrapError;
use crate::retry::{RetryConfig, with_retry};

/// 握手状态
///
/// `Ready` 与 `FailedFatal` 为终态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HandshakeState {
    NotStarted = 0,
    Retrying = 1,
    Ready = 2,
    FailedFatal = 3,
}

impl HandshakeState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Retrying,
            2 => Self::Ready,
            3 => Self::FailedFatal,
            _ => Self::NotStarted,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready | Self::FailedFatal)
    }
}

/// 启动握手
pub struct StartupHandshake {
    retry: RetryConfig,
    state: AtomicU8,
}

impl StartupHandshake {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            retry: RetryConfig::fixed(max_attempts, delay),
            state: AtomicU8::new(HandshakeState::NotStarted as u8),
        }
    }

    pub fn from_config(config: &StartupConfig) -> Self {
        Self::new(config.max_attempts, config.delay())
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// 当前状态
    pub fn state(&self) -> HandshakeState {
        HandshakeState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn set_state(&self, state: HandshakeState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }

    /// 执行握手
    ///
    /// 每次尝试 = 打开连接 + 确保表存在。已到达终态时不再重复执行。
    pub async fn run(&self, gateway: &dyn StorageGateway) -> Result<(), BootstrapError> {
        match self.state() {
            HandshakeState::Ready => return Ok(()),
            HandshakeState::FailedFatal => {
                return Err(BootstrapError::StartupUnreachable {
                    attempts: self.retry.max_attempts,
                    source: AppError::unavailable("startup handshake already failed"),
                });
            }
            _ => {}
        }

        info!(
            backend = gateway.backend_name(),
            max_attempts = self.retry.max_attempts,
            delay_secs = self.retry.delay.as_secs_f64(),
            "Starting storage handshake"
        );

        let state = &self.state;
        let result = with_retry(&self.retry, "storage handshake", |_attempt| async move {
            let outcome = gateway.ensure_schema().await;
            if outcome.is_err() {
                state.store(HandshakeState::Retrying as u8, Ordering::SeqCst);
            }
            outcome
        })
        .await;

        match result {
            Ok(()) => {
                self.set_state(HandshakeState::Ready);
                info!(backend = gateway.backend_name(), "Storage handshake completed");
                Ok(())
            }
            Err(exhausted) => {
                self.set_state(HandshakeState::FailedFatal);
                error!(
                    backend = gateway.backend_name(),
                    attempts = exhausted.attempts,
                    error = %exhausted.last_error,
                    "Storage unreachable, giving up"
                );
                Err(BootstrapError::StartupUnreachable {
                    attempts: exhausted.attempts,
                    source: exhausted.last_error,
                })
            }
        }
    }
}

impl Default for StartupHandshake {
    fn default() -> Self {
        Self::from_config(&StartupConfig::default())
    }
}
