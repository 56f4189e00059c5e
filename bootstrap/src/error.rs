//! 启动错误

use thiserror::Error;
use wiki_config::ConfigError;
use wiki_errors::AppError;

/// 启动阶段的致命错误
///
/// 任何一种都应终止进程，交由编排系统重启
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to initialize storage: {0}")]
    Storage(#[source] AppError),

    #[error("Storage unreachable after {attempts} attempts: {source}")]
    StartupUnreachable {
        attempts: u32,
        #[source]
        source: AppError,
    },

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}
