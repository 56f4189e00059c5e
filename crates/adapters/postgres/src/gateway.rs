//! PostgreSQL 存储网关

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use wiki_errors::{AppError, AppResult};
use wiki_ports::{StorageGateway, UnitOfWork};

use crate::connection::{check_connection, map_sqlx_error};
use crate::schema::SchemaInitializer;
use crate::unit_of_work::PgUnitOfWork;

/// 连通性检查与建表的默认超时
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// 基于 `PgPool` 的存储网关
///
/// 连接被拒绝时 sqlx 会在 `acquire_timeout` 内不断重连，
/// 因此 `ping` 与 `ensure_schema` 各自受 `probe_timeout` 约束
#[derive(Clone)]
pub struct PostgresGateway {
    pool: PgPool,
    probe_timeout: Duration,
}

impl PostgresGateway {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    /// 设置超时时间
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    async fn bounded<F>(&self, operation: &str, fut: F) -> AppResult<()>
    where
        F: Future<Output = AppResult<()>>,
    {
        tokio::time::timeout(self.probe_timeout, fut)
            .await
            .unwrap_or_else(|_| {
                Err(AppError::unavailable(format!(
                    "{} timed out after {:?}",
                    operation, self.probe_timeout
                )))
            })
    }
}

#[async_trait]
impl StorageGateway for PostgresGateway {
    async fn ping(&self) -> AppResult<()> {
        self.bounded("Database health check", check_connection(&self.pool))
            .await
    }

    async fn ensure_schema(&self) -> AppResult<()> {
        let initializer = SchemaInitializer::new(self.pool.clone());
        self.bounded("Schema initialization", initializer.ensure())
            .await
    }

    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("Failed to begin transaction", e))?;
        Ok(Box::new(PgUnitOfWork::new(tx)))
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
