//! 请求/响应 DTO

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wiki_common::{Post, User};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub created_time: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.as_i64(),
            name: user.name,
            created_time: user.created_time,
        }
    }
}

/// 帖子响应（ID 字段名为 `post_id`）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostResponse {
    pub post_id: i64,
    pub content: String,
    pub user_id: i64,
    pub created_time: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            post_id: post.id.as_i64(),
            content: post.content,
            user_id: post.user_id.as_i64(),
            created_time: post.created_time,
        }
    }
}
