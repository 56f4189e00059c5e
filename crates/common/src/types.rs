//! 通用类型定义

use chrono::{DateTime, Utc};
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// 用户 ID（存储层分配，单调递增）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From)]
#[serde(transparent)]
#[display("{_0}")]
pub struct UserId(pub i64);

impl UserId {
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

/// 帖子 ID（存储层分配）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From)]
#[serde(transparent)]
#[display("{_0}")]
pub struct PostId(pub i64);

impl PostId {
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

/// 用户记录
///
/// 创建后不可变，`id` 与 `created_time` 均由存储层在插入时赋值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub created_time: DateTime<Utc>,
}

/// 帖子记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub content: String,
    pub user_id: UserId,
    pub created_time: DateTime<Utc>,
}

/// 待插入的用户
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// 待插入的帖子
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub content: String,
    pub user_id: UserId,
}

impl NewPost {
    pub fn new(content: impl Into<String>, user_id: UserId) -> Self {
        Self {
            content: content.into(),
            user_id,
        }
    }
}
