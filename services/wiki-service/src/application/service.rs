//! 领域操作
//!
//! 每个操作对应一个 Unit of Work：`begin` → 查询/写入 → `commit`。
//! 未提交就返回（包括 `?` 提前返回）时 Unit of Work 被 drop，事务回滚并归还连接。

use std::sync::Arc;

use tracing::{info, instrument};
use wiki_common::{NewPost, NewUser, Post, PostId, User, UserId};
use wiki_errors::{AppError, AppResult};
use wiki_ports::StorageGateway;

use super::metrics::DomainMetrics;

/// 用户不存在时的错误描述
pub const USER_NOT_FOUND: &str = "User not found";
/// 帖子不存在时的错误描述
pub const POST_NOT_FOUND: &str = "Post not found";

/// 用户与帖子服务
pub struct WikiService {
    gateway: Arc<dyn StorageGateway>,
    metrics: DomainMetrics,
}

impl WikiService {
    pub fn new(gateway: Arc<dyn StorageGateway>, metrics: DomainMetrics) -> Self {
        Self { gateway, metrics }
    }

    /// 创建用户
    #[instrument(skip(self, name), fields(name_len = name.len()))]
    pub async fn create_user(&self, name: &str) -> AppResult<User> {
        let mut uow = self.gateway.begin().await?;
        let user = uow.insert_user(&NewUser::new(name)).await?;
        uow.commit().await?;

        self.metrics.user_created();
        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// 创建帖子
    ///
    /// 作者不存在时在任何写入之前返回 `NotFound`
    #[instrument(skip(self, content), fields(content_len = content.len()))]
    pub async fn create_post(&self, content: &str, user_id: UserId) -> AppResult<Post> {
        let mut uow = self.gateway.begin().await?;
        if uow.find_user(user_id).await?.is_none() {
            return Err(AppError::not_found(USER_NOT_FOUND));
        }

        let post = uow.insert_post(&NewPost::new(content, user_id)).await?;
        uow.commit().await?;

        self.metrics.post_created();
        info!(post_id = %post.id, "Post created");
        Ok(post)
    }

    /// 根据 ID 获取用户
    #[instrument(skip(self))]
    pub async fn get_user(&self, id: UserId) -> AppResult<User> {
        let mut uow = self.gateway.begin().await?;
        let user = uow.find_user(id).await?;
        uow.commit().await?;

        user.ok_or_else(|| AppError::not_found(USER_NOT_FOUND))
    }

    /// 根据 ID 获取帖子
    #[instrument(skip(self))]
    pub async fn get_post(&self, id: PostId) -> AppResult<Post> {
        let mut uow = self.gateway.begin().await?;
        let post = uow.find_post(id).await?;
        uow.commit().await?;

        post.ok_or_else(|| AppError::not_found(POST_NOT_FOUND))
    }

    /// 已提交的帖子总数
    pub async fn count_posts(&self) -> AppResult<i64> {
        let mut uow = self.gateway.begin().await?;
        let count = uow.count_posts().await?;
        uow.commit().await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiki_adapter_memory::InMemoryStore;
    use wiki_bootstrap::MetricsRecorder;
    use wiki_bootstrap::testutil::counter_value;

    use crate::application::{POSTS_CREATED_TOTAL, USERS_CREATED_TOTAL};

    fn service(store: &InMemoryStore) -> (WikiService, MetricsRecorder) {
        let recorder = MetricsRecorder::new();
        let metrics = DomainMetrics::register(&recorder);
        (WikiService::new(Arc::new(store.clone()), metrics), recorder)
    }

    #[tokio::test]
    async fn test_create_then_get_user() {
        let store = InMemoryStore::new();
        let (service, recorder) = service(&store);

        let created = service.create_user("alice").await.unwrap();
        let fetched = service.get_user(created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(counter_value(&recorder.render(), USERS_CREATED_TOTAL), Some(1));
    }

    #[tokio::test]
    async fn test_create_post_for_missing_user_writes_nothing() {
        let store = InMemoryStore::new();
        let (service, recorder) = service(&store);

        let err = service.create_post("hello", UserId(999999)).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(ref msg) if msg == USER_NOT_FOUND));
        assert_eq!(service.count_posts().await.unwrap(), 0);
        assert_eq!(counter_value(&recorder.render(), POSTS_CREATED_TOTAL).unwrap_or(0), 0);
    }

    #[tokio::test]
    async fn test_create_post_increments_counter_once() {
        let store = InMemoryStore::new();
        let (service, recorder) = service(&store);
        let user = service.create_user("bob").await.unwrap();

        let post = service.create_post("first", user.id).await.unwrap();

        assert_eq!(post.user_id, user.id);
        assert_eq!(service.get_post(post.id).await.unwrap(), post);
        assert_eq!(counter_value(&recorder.render(), POSTS_CREATED_TOTAL), Some(1));
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let store = InMemoryStore::new();
        let (service, _) = service(&store);

        let err = service.get_user(UserId(42)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == USER_NOT_FOUND));

        let err = service.get_post(PostId(42)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == POST_NOT_FOUND));
    }

    #[tokio::test]
    async fn test_storage_outage_propagates_without_counting() {
        let store = InMemoryStore::new();
        let (service, recorder) = service(&store);
        store.set_available(false);

        let err = service.create_user("carol").await.unwrap_err();

        assert!(err.is_storage_failure());
        assert_eq!(counter_value(&recorder.render(), USERS_CREATED_TOTAL).unwrap_or(0), 0);
        store.set_available(true);
        assert_eq!(store.user_count().await, 0);
    }
}
