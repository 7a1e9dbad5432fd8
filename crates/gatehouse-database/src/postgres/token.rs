//! API token repository, PostgreSQL backing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use gatehouse_core::error::{AppError, ErrorKind};
use gatehouse_core::result::AppResult;
use gatehouse_entity::token::ApiToken;

use crate::repository::TokenRepository;

/// PostgreSQL-backed API token repository.
#[derive(Debug, Clone)]
pub struct PgTokenRepository {
    pool: PgPool,
}

impl PgTokenRepository {
    /// Create a new token repository on the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for PgTokenRepository {
    async fn insert(&self, token: &ApiToken) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO api_tokens (
                id, user_id, name, token_hash, scopes, is_active, usage_count,
                last_used_at, expires_at, revoked_at, revoked_by, created_from,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(token.id)
        .bind(token.user_id)
        .bind(&token.name)
        .bind(&token.token_hash)
        .bind(&token.scopes)
        .bind(token.is_active)
        .bind(token.usage_count)
        .bind(token.last_used_at)
        .bind(token.expires_at)
        .bind(token.revoked_at)
        .bind(token.revoked_by)
        .bind(&token.created_from)
        .bind(token.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert token", e))?;

        Ok(())
    }

    async fn find_by_hash(&self, token_hash: &str) -> AppResult<Option<ApiToken>> {
        sqlx::query_as::<_, ApiToken>("SELECT * FROM api_tokens WHERE token_hash = $1")
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find token by hash", e)
            })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ApiToken>> {
        sqlx::query_as::<_, ApiToken>("SELECT * FROM api_tokens WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find token", e))
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<ApiToken>> {
        sqlx::query_as::<_, ApiToken>(
            "SELECT * FROM api_tokens WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list tokens", e))
    }

    async fn record_usage(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query(
            "UPDATE api_tokens SET usage_count = usage_count + 1, last_used_at = $2 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record token usage", e)
        })?;

        Ok(())
    }

    async fn deactivate(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE api_tokens SET is_active = FALSE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to deactivate token", e)
            })?;

        Ok(())
    }

    async fn revoke(&self, id: Uuid, revoked_by: Uuid, at: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE api_tokens SET revoked_at = $3, revoked_by = $2, is_active = FALSE \
             WHERE id = $1 AND revoked_at IS NULL",
        )
        .bind(id)
        .bind(revoked_by)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to revoke token", e))?;

        Ok(result.rows_affected() > 0)
    }
}
