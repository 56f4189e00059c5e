//! 重试工具模块
//!
//! 固定间隔重试：第一次尝试不等待，仅在两次尝试之间等待 `delay`，
//! 最坏情况下总等待时间为 `(max_attempts - 1) * delay`。

use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};

/// 重试配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// 最大尝试次数（至少 1）
    pub max_attempts: u32,
    /// 两次尝试之间的固定延迟
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            delay: Duration::from_secs(3),
        }
    }
}

impl RetryConfig {
    /// 创建固定间隔的重试配置
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// 所有尝试都失败时的最坏等待时间
    pub fn worst_case_wait(&self) -> Duration {
        self.delay * self.max_attempts.saturating_sub(1)
    }
}

/// 重试耗尽
#[derive(Debug)]
pub struct RetryExhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

/// 带重试的异步操作执行器
///
/// 成功时立即返回，不再进行后续尝试；全部失败时返回最后一次的错误
pub async fn with_retry<F, Fut, T, E>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> Result<T, RetryExhausted<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(result) => {
                if attempt > 1 {
                    info!(
                        operation = operation_name,
                        attempt,
                        "Operation succeeded after retry"
                    );
                }
                return Ok(result);
            }
            Err(e) if attempt >= max_attempts => {
                warn!(
                    operation = operation_name,
                    attempt,
                    max_attempts,
                    error = %e,
                    "Operation failed, no more retries"
                );
                return Err(RetryExhausted {
                    attempts: attempt,
                    last_error: e,
                });
            }
            Err(e) => {
                warn!(
                    operation = operation_name,
                    attempt,
                    max_attempts,
                    error = %e,
                    delay_ms = config.delay.as_millis() as u64,
                    "Operation failed, retrying"
                );
                tokio::time::sleep(config.delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_retry_success_first_attempt() {
        let config = RetryConfig::fixed(3, Duration::from_millis(100));
        let result: Result<i32, RetryExhausted<&str>> =
            with_retry(&config, "test", |_| async { Ok(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_success_after_failures() {
        let config = RetryConfig::fixed(3, Duration::from_secs(3));
        let counter = AtomicU32::new(0);
        let start = tokio::time::Instant::now();

        let result: Result<i32, RetryExhausted<&str>> = with_retry(&config, "test", |_| {
            let count = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if count < 2 {
                    Err("temporary error")
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(6) && elapsed < Duration::from_secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_all_failures() {
        let config = RetryConfig::fixed(3, Duration::from_secs(3));
        let counter = AtomicU32::new(0);

        let result: Result<i32, RetryExhausted<&str>> = with_retry(&config, "test", |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err("permanent error") }
        })
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.attempts, 3);
        assert_eq!(err.last_error, "permanent error");
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_attempt_numbers_start_at_one() {
        let config = RetryConfig::fixed(4, Duration::ZERO);
        let mut seen = Vec::new();

        let _: Result<(), RetryExhausted<&str>> = with_retry(&config, "test", |attempt| {
            seen.push(attempt);
            async { Err("nope") }
        })
        .await;

        assert_eq!(seen, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_fixed_delay_config() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 10);
        assert_eq!(config.delay, Duration::from_secs(3));
        assert_eq!(config.worst_case_wait(), Duration::from_secs(27));

        assert_eq!(RetryConfig::fixed(0, Duration::from_secs(1)).max_attempts, 1);
        assert_eq!(
            RetryConfig::fixed(1, Duration::from_secs(5)).worst_case_wait(),
            Duration::ZERO
        );
    }
}
