/*
 * Responsibility
 * - SQLx lookups against the users table (id TEXT, sessions TEXT[])
 * - Read-only: issuing and revoking sessions belongs to the login service
 */
use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use crate::repos::error::{RepoError, RepoResult};
use crate::services::session::{SessionStore, SessionStoreError};

#[derive(Clone, Debug)]
pub struct SessionRepo {
    pool: PgPool,
}

impl SessionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> RepoResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await
            .map_err(RepoError::Db)?;

        Ok(Self::new(pool))
    }

    // True when `token` is one of the user's active sessions.
    pub async fn has_session(&self, user_id: &str, token: &str) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM users
                WHERE id = $1 AND sessions @> ARRAY[$2::text]
            )
            "#,
        )
        .bind(user_id)
        .bind(token)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

#[async_trait]
impl SessionStore for SessionRepo {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn exists(&self, user_id: &str, token: &str) -> Result<bool, SessionStoreError> {
        Ok(self.has_session(user_id, token).await?)
    }
}
