//! 集成测试公共设施：基于内存存储组装完整应用

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use wiki_adapter_memory::InMemoryStore;
use wiki_bootstrap::{MetricsRecorder, StartupHandshake, build_app};
use wiki_service::api::http::routes;
use wiki_service::application::{DomainMetrics, WikiService};

pub struct TestApp {
    pub router: Router,
    pub store: InMemoryStore,
    pub metrics: Arc<MetricsRecorder>,
}

impl TestApp {
    /// 完成启动握手后组装应用，与正式启动顺序一致
    pub async fn spawn() -> Self {
        let store = InMemoryStore::new();
        StartupHandshake::default().run(&store).await.unwrap();

        let metrics = Arc::new(MetricsRecorder::new());
        let service = Arc::new(WikiService::new(
            Arc::new(store.clone()),
            DomainMetrics::register(&metrics),
        ));
        let router = build_app(Arc::new(store.clone()), metrics.clone(), routes(service));

        Self {
            router,
            store,
            metrics,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.post_raw(uri, body.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, body: impl Into<String>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.into()))
            .unwrap();
        self.send(request).await
    }

    pub async fn get_text(&self, uri: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    pub fn counter(&self, name: &str) -> u64 {
        wiki_bootstrap::testutil::counter_value(&self.metrics.render(), name).unwrap_or(0)
    }
}
