//! 基础设施资源管理
//!
//! 统一持有存储网关与 metrics 注册表，由 bootstrap 初始化后注入业务服务

use std::sync::Arc;

use secrecy::ExposeSecret;
use tracing::info;
use wiki_adapter_postgres::{PostgresConfig, PostgresGateway, create_pool};
use wiki_config::AppConfig;
use wiki_ports::StorageGateway;

use crate::error::BootstrapError;
use crate::metrics::MetricsRecorder;

/// 基础设施资源容器
pub struct Infrastructure {
    /// 应用配置
    config: AppConfig,
    /// 存储网关（内部持有连接池，所有请求共享）
    gateway: Arc<dyn StorageGateway>,
    /// Metrics 注册表
    metrics: Arc<MetricsRecorder>,
}

impl Infrastructure {
    /// 从配置创建基础设施资源
    ///
    /// 连接池是惰性的，这里不会访问数据库；连通性由启动握手负责
    pub fn from_config(config: AppConfig) -> Result<Self, BootstrapError> {
        let pg_config = PostgresConfig::new(config.database.url.expose_secret())
            .with_max_connections(config.database.max_connections)
            .with_min_connections(config.database.min_connections)
            .with_acquire_timeout(config.database.acquire_timeout());
        let pool = create_pool(&pg_config).map_err(BootstrapError::Storage)?;
        info!(
            max_connections = config.database.max_connections,
            "PostgreSQL connection pool created"
        );

        let gateway =
            PostgresGateway::new(pool).with_probe_timeout(config.database.probe_timeout());

        Ok(Self::new(
            config,
            Arc::new(gateway),
            Arc::new(MetricsRecorder::new()),
        ))
    }

    /// 使用给定的存储网关与 metrics 注册表组装
    pub fn new(
        config: AppConfig,
        gateway: Arc<dyn StorageGateway>,
        metrics: Arc<MetricsRecorder>,
    ) -> Self {
        Self {
            config,
            gateway,
            metrics,
        }
    }

    /// 获取应用配置
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 获取存储网关
    pub fn gateway(&self) -> Arc<dyn StorageGateway> {
        self.gateway.clone()
    }

    /// 获取 metrics 注册表
    pub fn metrics(&self) -> Arc<MetricsRecorder> {
        self.metrics.clone()
    }
}
