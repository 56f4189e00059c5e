//! PostgreSQL Unit of Work
//!
//! 每个实例持有一个事务；drop 时 sqlx 自动回滚并把连接还给连接池

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Postgres, Transaction};
use wiki_common::{NewPost, NewUser, Post, PostId, User, UserId};
use wiki_errors::AppResult;
use wiki_ports::UnitOfWork;

use crate::connection::map_sqlx_error;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    created_time: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId(row.id),
            name: row.name,
            created_time: row.created_time,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    content: String,
    user_id: i64,
    created_time: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: PostId(row.id),
            content: row.content,
            user_id: UserId(row.user_id),
            created_time: row.created_time,
        }
    }
}

pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

impl PgUnitOfWork {
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn insert_user(&mut self, user: &NewUser) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name)
            VALUES ($1)
            RETURNING id, name, created_time
            "#,
        )
        .bind(&user.name)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to insert user", e))?;

        Ok(row.into())
    }

    async fn find_user(&mut self, id: UserId) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, created_time FROM users WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to find user", e))?;

        Ok(row.map(User::from))
    }

    async fn insert_post(&mut self, post: &NewPost) -> AppResult<Post> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (content, user_id)
            VALUES ($1, $2)
            RETURNING id, content, user_id, created_time
            "#,
        )
        .bind(&post.content)
        .bind(post.user_id.0)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to insert post", e))?;

        Ok(row.into())
    }

    async fn find_post(&mut self, id: PostId) -> AppResult<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(
            "SELECT id, content, user_id, created_time FROM posts WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to find post", e))?;

        Ok(row.map(Post::from))
    }

    async fn count_posts(&mut self) -> AppResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to count posts", e))?;

        Ok(count)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| map_sqlx_error("Failed to commit transaction", e))
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        self.tx
            .rollback()
            .await
            .map_err(|e| map_sqlx_error("Failed to rollback transaction", e))
    }
}
