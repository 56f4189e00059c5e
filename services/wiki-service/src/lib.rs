//! wiki-service - 用户与帖子服务
//!
//! - `application`: 领域操作（创建/查询用户与帖子）与业务计数器
//! - `api::http`: HTTP 路由、请求/响应 DTO

pub mod api;
pub mod application;
