//! Session repository, PostgreSQL backing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use gatehouse_core::error::{AppError, ErrorKind};
use gatehouse_core::result::AppResult;
use gatehouse_entity::session::Session;

use crate::repository::SessionRepository;

/// PostgreSQL-backed session repository.
#[derive(Debug, Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    /// Create a new session repository on the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn insert(&self, session: &Session) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO sessions (
                token, user_id, username, email, is_authenticated, is_admin,
                provider, created_from, valid_until, closed_on, last_activity,
                created_at, ip_address, user_agent, browser_family,
                browser_version, os_family, os_version, device_family,
                country_code, region, city, fingerprint
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18, $19, $20, $21, $22, $23
            )",
        )
        .bind(&session.token)
        .bind(session.user_id)
        .bind(&session.username)
        .bind(&session.email)
        .bind(session.is_authenticated)
        .bind(session.is_admin)
        .bind(&session.provider)
        .bind(&session.created_from)
        .bind(session.valid_until)
        .bind(session.closed_on)
        .bind(session.last_activity)
        .bind(session.created_at)
        .bind(&session.client.ip_address)
        .bind(&session.client.user_agent)
        .bind(&session.client.browser_family)
        .bind(&session.client.browser_version)
        .bind(&session.client.os_family)
        .bind(&session.client.os_version)
        .bind(&session.client.device_family)
        .bind(&session.client.country_code)
        .bind(&session.client.region)
        .bind(&session.client.city)
        .bind(&session.client.fingerprint)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert session", e))?;

        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find session", e))
    }

    async fn update_last_activity(&self, token: &str, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query("UPDATE sessions SET last_activity = $2 WHERE token = $1")
            .bind(token)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update session activity", e)
            })?;

        Ok(())
    }

    async fn close(&self, token: &str, at: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE sessions SET closed_on = $2 WHERE token = $1 AND closed_on IS NULL",
        )
        .bind(token)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to close session", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_active(&self, limit: i64) -> AppResult<Vec<Session>> {
        sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE closed_on IS NULL AND valid_until > NOW() \
             ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list active sessions", e)
        })
    }

    async fn close_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE sessions SET closed_on = $1 WHERE closed_on IS NULL AND valid_until <= $1",
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to close expired sessions", e)
        })?;

        Ok(result.rows_affected())
    }
}
