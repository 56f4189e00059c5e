//! wiki-service 入口
//!
//! 使用 wiki-bootstrap 统一启动模式；启动握手失败时返回错误，进程以非零状态退出

use std::sync::Arc;

use wiki_bootstrap::{BootstrapError, Infrastructure, run};
use wiki_service::api::http::routes;
use wiki_service::application::{DomainMetrics, WikiService};

#[tokio::main]
async fn main() -> Result<(), BootstrapError> {
    dotenvy::dotenv().ok();

    run("config", |infra: &Infrastructure| {
        let metrics = DomainMetrics::register(&infra.metrics());
        let service = Arc::new(WikiService::new(infra.gateway(), metrics));
        routes(service)
    })
    .await
}
