//! Metrics 模块
//!
//! 提供 Prometheus metrics 导出。
//! 记录器不安装为全局 recorder，每个 `MetricsRecorder` 都是独立的注册表，
//! 通过依赖注入传给使用方，测试时可以各自创建。

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    Router,
    extract::{MatchedPath, Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::get,
};
use metrics::{Counter, counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};

/// Prometheus 文本格式的 content-type
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Metrics 记录器
pub struct MetricsRecorder {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
}

impl MetricsRecorder {
    /// 创建新的 Metrics 记录器
    pub fn new() -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        let this = Self { recorder, handle };
        this.scoped(|| {
            describe_counter!("http_requests_total", "Total HTTP requests handled");
            describe_histogram!(
                "http_request_duration_seconds",
                metrics::Unit::Seconds,
                "HTTP request latency"
            );
        });
        this
    }

    /// 在本注册表上下文中执行 metrics 宏
    fn scoped<T>(&self, f: impl FnOnce() -> T) -> T {
        metrics::with_local_recorder(&self.recorder, f)
    }

    /// 注册一个带描述的计数器
    pub fn counter(&self, name: &'static str, description: &'static str) -> Counter {
        self.scoped(|| {
            describe_counter!(name, description);
            counter!(name)
        })
    }

    /// 记录 HTTP 请求
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration: Duration) {
        let labels = [
            ("method", method.to_string()),
            ("path", path.to_string()),
            ("status", status.to_string()),
        ];
        self.scoped(|| {
            counter!("http_requests_total", &labels).increment(1);
            histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());
        });
    }

    /// 获取 Prometheus 格式的 metrics
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

/// Metrics 路由
pub fn metrics_routes(metrics: Arc<MetricsRecorder>) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
}

/// Metrics 端点处理器
async fn metrics_handler(State(metrics): State<Arc<MetricsRecorder>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        metrics.render(),
    )
}

/// HTTP 请求计量中间件
///
/// 使用匹配到的路由模板作为 path 标签，避免 ID 造成高基数
pub async fn track_requests(
    State(metrics): State<Arc<MetricsRecorder>>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    metrics.record_http_request(&method, &path, response.status().as_u16(), start.elapsed());
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::counter_value;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[test]
    fn test_registries_are_independent() {
        let a = MetricsRecorder::new();
        let b = MetricsRecorder::new();

        a.counter("users_created_total", "Total users created").increment(2);
        b.counter("users_created_total", "Total users created").increment(5);

        assert_eq!(counter_value(&a.render(), "users_created_total"), Some(2));
        assert_eq!(counter_value(&b.render(), "users_created_total"), Some(5));
    }

    #[test]
    fn test_counter_handles_share_state() {
        let metrics = MetricsRecorder::new();
        let first = metrics.counter("posts_created_total", "Total posts created");
        let second = metrics.counter("posts_created_total", "Total posts created");
        first.increment(1);
        second.increment(1);

        let rendered = metrics.render();
        assert!(rendered.contains("# HELP posts_created_total Total posts created"));
        assert_eq!(counter_value(&rendered, "posts_created_total"), Some(2));
    }

    #[tokio::test]
    async fn test_metrics_endpoint_and_request_tracking() {
        let metrics = Arc::new(MetricsRecorder::new());
        let app = metrics_routes(metrics.clone())
            .route_layer(axum::middleware::from_fn_with_state(
                metrics.clone(),
                track_requests,
            ));

        let request = || Request::builder().uri("/metrics").body(Body::empty()).unwrap();
        let _ = app.clone().oneshot(request()).await.unwrap();
        let response = app.oneshot(request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            PROMETHEUS_CONTENT_TYPE
        );
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        let line = text
            .lines()
            .find(|l| l.starts_with("http_requests_total{") && l.contains("path=\"/metrics\""))
            .unwrap();
        assert!(line.contains("status=\"200\""));
        assert!(line.ends_with(" 1"));
    }
}
