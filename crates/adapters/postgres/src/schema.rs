//! Schema 初始化
//!
//! 首次启动时创建所需的表，重复执行无副作用

use sqlx::PgPool;
use tracing::info;
use wiki_errors::AppResult;

use crate::connection::map_sqlx_error;

/// 多副本同时启动时串行化建表的 advisory lock key
const SCHEMA_LOCK_KEY: i64 = 0x7769_6b69;

/// 建表语句，按依赖顺序执行
pub const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR NOT NULL,
        created_time TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS posts (
        id BIGSERIAL PRIMARY KEY,
        content TEXT NOT NULL,
        user_id BIGINT NOT NULL REFERENCES users(id),
        created_time TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_posts_user_id ON posts (user_id)",
];

/// Schema 初始化器
pub struct SchemaInitializer {
    pool: PgPool,
}

impl SchemaInitializer {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 在单个事务中创建缺失的表
    pub async fn ensure(&self) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("Failed to begin transaction", e))?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(SCHEMA_LOCK_KEY)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to acquire schema lock", e))?;

        for statement in SCHEMA_STATEMENTS {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("Failed to create schema", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("Failed to commit schema", e))?;

        info!(tables = "users, posts", "Schema ensured");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statements_are_idempotent() {
        for statement in SCHEMA_STATEMENTS {
            assert!(
                statement.contains("IF NOT EXISTS"),
                "statement is not idempotent: {}",
                statement
            );
        }
    }

    #[test]
    fn test_users_created_before_posts() {
        let users = SCHEMA_STATEMENTS
            .iter()
            .position(|s| s.contains("TABLE IF NOT EXISTS users"))
            .unwrap();
        let posts = SCHEMA_STATEMENTS
            .iter()
            .position(|s| s.contains("TABLE IF NOT EXISTS posts"))
            .unwrap();
        assert!(users < posts);
        assert!(SCHEMA_STATEMENTS[posts].contains("REFERENCES users(id)"));
    }
}
