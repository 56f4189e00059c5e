//! wiki-bootstrap - 服务启动骨架
//!
//! 启动顺序：配置 → 日志 → metrics → 存储网关 → 启动握手 → 监听端口。
//! 握手完成之前不绑定端口，因此任何探针都只会在握手成功后被访问到。

mod error;
pub mod handshake;
pub mod health;
mod infrastructure;
pub mod metrics;
pub mod retry;
mod runtime;
mod starter;
#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

pub use error::*;
pub use handshake::{HandshakeState, StartupHandshake};
pub use health::{HealthChecker, ProbeStatus, Readiness, health_routes};
pub use infrastructure::*;
pub use self::metrics::{
    MetricsRecorder, PROMETHEUS_CONTENT_TYPE, metrics_routes, track_requests,
};
pub use runtime::*;
pub use starter::*;
