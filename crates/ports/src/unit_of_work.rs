//! Unit of Work trait 定义

use async_trait::async_trait;
use wiki_common::{NewPost, NewUser, Post, PostId, User, UserId};
use wiki_errors::AppResult;

/// Unit of Work trait
///
/// 一个实例对应一个数据库事务。未调用 `commit` 就被 drop 时必须回滚并释放连接，
/// 错误路径上的清理依赖这一点。
#[async_trait]
pub trait UnitOfWork: Send {
    /// 插入用户，返回包含存储层分配字段的完整记录
    async fn insert_user(&mut self, user: &NewUser) -> AppResult<User>;

    /// 根据 ID 查找用户
    async fn find_user(&mut self, id: UserId) -> AppResult<Option<User>>;

    /// 插入帖子，返回包含存储层分配字段的完整记录
    async fn insert_post(&mut self, post: &NewPost) -> AppResult<Post>;

    /// 根据 ID 查找帖子
    async fn find_post(&mut self, id: PostId) -> AppResult<Option<Post>>;

    /// 帖子总数
    async fn count_posts(&mut self) -> AppResult<i64>;

    /// 提交事务
    async fn commit(self: Box<Self>) -> AppResult<()>;

    /// 回滚事务
    async fn rollback(self: Box<Self>) -> AppResult<()>;
}
