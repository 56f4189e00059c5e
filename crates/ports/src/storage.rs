//! 存储网关 trait 定义

use async_trait::async_trait;
use wiki_errors::AppResult;

use crate::UnitOfWork;

/// 存储网关
///
/// 持有连接池，由所有请求共享
#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// 连通性检查
    ///
    /// 每次调用都真实访问存储，不缓存结果，无副作用
    async fn ping(&self) -> AppResult<()>;

    /// 确保所需的表存在（幂等）
    async fn ensure_schema(&self) -> AppResult<()>;

    /// 开启一个 Unit of Work
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>>;

    /// 存储后端名称（用于日志）
    fn backend_name(&self) -> &'static str;
}
