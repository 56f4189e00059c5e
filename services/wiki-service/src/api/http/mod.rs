//! HTTP API
//!
//! 路由由路由表生成，根路径返回的接口目录也来自同一张表。
//! 未文档化的条目（如 `/user/{id}` 别名）照常注册，但不出现在目录中。

mod dto;
mod handlers;

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    http::Method,
    routing::{MethodRouter, get, post},
};
use serde::{Deserialize, Serialize};

use crate::application::WikiService;

pub use dto::*;

/// 处理器共享状态
pub type AppState = Arc<WikiService>;

/// 根路径返回的说明
pub const API_MESSAGE: &str = "User and Post API";

/// 由其他组件提供、但需要出现在目录中的端点
const EXTERNAL_ENDPOINTS: &[(&str, &str)] = &[("GET /metrics", "Prometheus metrics")];

/// 路由表条目
pub struct ApiRoute {
    pub method: Method,
    pub path: &'static str,
    pub description: &'static str,
    /// 是否出现在接口目录中
    pub documented: bool,
    handler: MethodRouter<AppState>,
}

impl ApiRoute {
    fn documented(
        method: Method,
        path: &'static str,
        description: &'static str,
        handler: MethodRouter<AppState>,
    ) -> Self {
        Self {
            method,
            path,
            description,
            documented: true,
            handler,
        }
    }

    fn hidden(method: Method, path: &'static str, handler: MethodRouter<AppState>) -> Self {
        Self {
            method,
            path,
            description: "",
            documented: false,
            handler,
        }
    }

    /// 目录中的键，例如 `GET /posts/{id}`
    pub fn key(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// 业务路由表
pub fn route_table() -> Vec<ApiRoute> {
    vec![
        ApiRoute::documented(
            Method::POST,
            "/users",
            "Create a new user",
            post(handlers::create_user),
        ),
        ApiRoute::documented(
            Method::POST,
            "/posts",
            "Create a new post",
            post(handlers::create_post),
        ),
        ApiRoute::documented(
            Method::GET,
            "/users/{id}",
            "Get user by ID",
            get(handlers::get_user),
        ),
        ApiRoute::hidden(Method::GET, "/user/{id}", get(handlers::get_user)),
        ApiRoute::documented(
            Method::GET,
            "/posts/{id}",
            "Get post by ID",
            get(handlers::get_post),
        ),
    ]
}

/// 接口目录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiDirectory {
    pub message: String,
    pub endpoints: BTreeMap<String, String>,
}

impl ApiDirectory {
    pub fn from_routes(routes: &[ApiRoute]) -> Self {
        let mut endpoints: BTreeMap<String, String> = routes
            .iter()
            .filter(|route| route.documented)
            .map(|route| (route.key(), route.description.to_string()))
            .collect();
        for (key, description) in EXTERNAL_ENDPOINTS {
            endpoints.insert(key.to_string(), description.to_string());
        }

        Self {
            message: API_MESSAGE.to_string(),
            endpoints,
        }
    }
}

/// 业务路由
pub fn routes(service: AppState) -> Router {
    let table = route_table();
    let directory = ApiDirectory::from_routes(&table);

    table
        .into_iter()
        .fold(Router::new(), |router, route| {
            router.route(route.path, route.handler)
        })
        .route(
            "/",
            get(move || {
                let directory = directory.clone();
                async move { Json(directory) }
            }),
        )
        .with_state(service)
}
