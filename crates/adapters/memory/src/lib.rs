//! wiki-adapter-memory - 进程内存储适配器
//!
//! 语义与 PostgreSQL 适配器保持一致：ID 由序列分配（回滚不归还），
//! 写入暂存在 Unit of Work 中，commit 时才对其他会话可见。
//! 可模拟存储中断，供测试和本地运行使用。

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::debug;
use wiki_common::{NewPost, NewUser, Post, PostId, User, UserId};
use wiki_errors::{AppError, AppResult};
use wiki_ports::{StorageGateway, UnitOfWork};

#[derive(Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    posts: BTreeMap<PostId, Post>,
    user_seq: i64,
    post_seq: i64,
    schema_ready: bool,
}

struct Shared {
    tables: Mutex<Tables>,
    available: AtomicBool,
    failing_schema_attempts: AtomicU32,
    schema_attempts: AtomicU32,
    pings: AtomicU32,
}

/// 内存存储
///
/// Clone 共享同一份数据
#[derive(Clone)]
pub struct InMemoryStore {
    shared: Arc<Shared>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                tables: Mutex::new(Tables::default()),
                available: AtomicBool::new(true),
                failing_schema_attempts: AtomicU32::new(0),
                schema_attempts: AtomicU32::new(0),
                pings: AtomicU32::new(0),
            }),
        }
    }

    /// 模拟存储可用 / 中断
    pub fn set_available(&self, available: bool) {
        self.shared.available.store(available, Ordering::SeqCst);
    }

    pub fn is_available(&self) -> bool {
        self.shared.available.load(Ordering::SeqCst)
    }

    /// 让接下来的 `n` 次建表尝试失败
    pub fn fail_next_schema_attempts(&self, n: u32) {
        self.shared.failing_schema_attempts.store(n, Ordering::SeqCst);
    }

    /// 已发生的建表尝试次数（含失败）
    pub fn schema_attempts(&self) -> u32 {
        self.shared.schema_attempts.load(Ordering::SeqCst)
    }

    /// 已发生的连通性检查次数
    pub fn ping_count(&self) -> u32 {
        self.shared.pings.load(Ordering::SeqCst)
    }

    pub async fn is_schema_ready(&self) -> bool {
        self.shared.tables.lock().await.schema_ready
    }

    /// 已提交的用户数
    pub async fn user_count(&self) -> usize {
        self.shared.tables.lock().await.users.len()
    }

    /// 已提交的帖子数
    pub async fn post_count(&self) -> usize {
        self.shared.tables.lock().await.posts.len()
    }

    fn ensure_available(&self) -> AppResult<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(AppError::unavailable("connection refused"))
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageGateway for InMemoryStore {
    async fn ping(&self) -> AppResult<()> {
        self.shared.pings.fetch_add(1, Ordering::SeqCst);
        self.ensure_available()
    }

    async fn ensure_schema(&self) -> AppResult<()> {
        let attempt = self.shared.schema_attempts.fetch_add(1, Ordering::SeqCst) + 1;
        self.ensure_available()?;

        let failing = self
            .shared
            .failing_schema_attempts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if failing.is_ok() {
            debug!(attempt, "Simulated schema failure");
            return Err(AppError::unavailable("connection refused"));
        }

        self.shared.tables.lock().await.schema_ready = true;
        Ok(())
    }

    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        self.ensure_available()?;
        Ok(Box::new(MemoryUnitOfWork {
            store: self.clone(),
            users: Vec::new(),
            posts: Vec::new(),
        }))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// 内存 Unit of Work
///
/// 未提交的写入只对本会话可见，drop 即丢弃
pub struct MemoryUnitOfWork {
    store: InMemoryStore,
    users: Vec<User>,
    posts: Vec<Post>,
}

impl MemoryUnitOfWork {
    async fn user_exists(&self, id: UserId) -> bool {
        self.users.iter().any(|u| u.id == id)
            || self.store.shared.tables.lock().await.users.contains_key(&id)
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn insert_user(&mut self, user: &NewUser) -> AppResult<User> {
        self.store.ensure_available()?;
        let id = {
            let mut tables = self.store.shared.tables.lock().await;
            tables.user_seq += 1;
            UserId(tables.user_seq)
        };
        let record = User {
            id,
            name: user.name.clone(),
            created_time: Utc::now(),
        };
        self.users.push(record.clone());
        Ok(record)
    }

    async fn find_user(&mut self, id: UserId) -> AppResult<Option<User>> {
        self.store.ensure_available()?;
        if let Some(user) = self.users.iter().find(|u| u.id == id) {
            return Ok(Some(user.clone()));
        }
        Ok(self.store.shared.tables.lock().await.users.get(&id).cloned())
    }

    async fn insert_post(&mut self, post: &NewPost) -> AppResult<Post> {
        self.store.ensure_available()?;
        if !self.user_exists(post.user_id).await {
            return Err(AppError::database(format!(
                "insert or update on table \"posts\" violates foreign key constraint (user_id={})",
                post.user_id
            )));
        }
        let id = {
            let mut tables = self.store.shared.tables.lock().await;
            tables.post_seq += 1;
            PostId(tables.post_seq)
        };
        let record = Post {
            id,
            content: post.content.clone(),
            user_id: post.user_id,
            created_time: Utc::now(),
        };
        self.posts.push(record.clone());
        Ok(record)
    }

    async fn find_post(&mut self, id: PostId) -> AppResult<Option<Post>> {
        self.store.ensure_available()?;
        if let Some(post) = self.posts.iter().find(|p| p.id == id) {
            return Ok(Some(post.clone()));
        }
        Ok(self.store.shared.tables.lock().await.posts.get(&id).cloned())
    }

    async fn count_posts(&mut self) -> AppResult<i64> {
        self.store.ensure_available()?;
        let committed = self.store.shared.tables.lock().await.posts.len();
        Ok((committed + self.posts.len()) as i64)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.store.ensure_available()?;
        let this = *self;
        let mut tables = this.store.shared.tables.lock().await;
        for user in this.users {
            tables.users.insert(user.id, user);
        }
        for post in this.posts {
            tables.posts.insert(post.id, post);
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        Ok(())
    }
}
