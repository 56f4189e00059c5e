//! 业务计数器

use metrics::Counter;
use wiki_bootstrap::MetricsRecorder;

/// 用户创建计数器名称
pub const USERS_CREATED_TOTAL: &str = "users_created_total";
/// 帖子创建计数器名称
pub const POSTS_CREATED_TOTAL: &str = "posts_created_total";

/// 业务计数器
///
/// 只增不减，每次成功创建（提交之后）加一
#[derive(Clone)]
pub struct DomainMetrics {
    users_created: Counter,
    posts_created: Counter,
}

impl DomainMetrics {
    /// 在给定注册表上注册计数器
    pub fn register(recorder: &MetricsRecorder) -> Self {
        Self {
            users_created: recorder.counter(USERS_CREATED_TOTAL, "Total users created"),
            posts_created: recorder.counter(POSTS_CREATED_TOTAL, "Total posts created"),
        }
    }

    pub fn user_created(&self) {
        self.users_created.increment(1);
    }

    pub fn post_created(&self) {
        self.posts_created.increment(1);
    }
}
