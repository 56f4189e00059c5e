//! 健康检查模块
//!
//! 提供 /health/live、/health/ready、/health/startup 三个探针。
//! 三者互不共享失败逻辑：
//! - live 从不访问存储，存储故障不能导致进程被重启
//! - ready 每次调用都实时检查存储，失败时返回 503，让实例暂时摘流
//! - startup 只有在启动握手完成后才可达，因此总是成功

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use wiki_errors::ErrorBody;
use wiki_ports::StorageGateway;

/// 就绪检查失败时返回给编排系统的描述
pub const NOT_READY_DETAIL: &str = "Database not ready";

/// 探针响应体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeStatus {
    pub status: String,
}

impl ProbeStatus {
    pub fn alive() -> Self {
        Self::new("alive")
    }

    pub fn ready() -> Self {
        Self::new("ready")
    }

    pub fn started() -> Self {
        Self::new("started")
    }

    fn new(status: &str) -> Self {
        Self {
            status: status.to_string(),
        }
    }
}

/// 就绪检查结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    NotReady { reason: String },
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl IntoResponse for Readiness {
    fn into_response(self) -> Response {
        match self {
            Self::Ready => (StatusCode::OK, Json(ProbeStatus::ready())).into_response(),
            Self::NotReady { .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorBody::new(NOT_READY_DETAIL)),
            )
                .into_response(),
        }
    }
}

/// 健康检查器
pub struct HealthChecker {
    gateway: Arc<dyn StorageGateway>,
}

impl HealthChecker {
    pub fn new(gateway: Arc<dyn StorageGateway>) -> Self {
        Self { gateway }
    }

    /// 执行存活检查（liveness）
    ///
    /// 只表示进程在运行，不检查依赖
    pub fn liveness(&self) -> ProbeStatus {
        ProbeStatus::alive()
    }

    /// 执行就绪检查（readiness）
    ///
    /// 不缓存结果；失败被转换为 `NotReady`，不会向上抛出
    pub async fn readiness(&self) -> Readiness {
        match self.gateway.ping().await {
            Ok(()) => {
                debug!(backend = self.gateway.backend_name(), "Readiness check passed");
                Readiness::Ready
            }
            Err(e) => {
                warn!(
                    backend = self.gateway.backend_name(),
                    error = %e,
                    "Readiness check failed"
                );
                Readiness::NotReady {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// 执行启动检查（startup）
    pub fn startup(&self) -> ProbeStatus {
        ProbeStatus::started()
    }
}

/// 健康检查路由
pub fn health_routes(checker: Arc<HealthChecker>) -> Router {
    Router::new()
        .route("/health/live", get(live_handler))
        .route("/health/ready", get(ready_handler))
        .route("/health/startup", get(startup_handler))
        .with_state(checker)
}

/// Liveness 端点处理器
async fn live_handler(State(checker): State<Arc<HealthChecker>>) -> impl IntoResponse {
    (StatusCode::OK, Json(checker.liveness()))
}

/// Readiness 端点处理器
async fn ready_handler(State(checker): State<Arc<HealthChecker>>) -> Readiness {
    checker.readiness().await
}

/// Startup 端点处理器
async fn startup_handler(State(checker): State<Arc<HealthChecker>>) -> impl IntoResponse {
    (StatusCode::OK, Json(checker.startup()))
}
