//! Idempotent schema bootstrap.
//!
//! Applied on startup before the PostgreSQL repositories are used. Every
//! statement is `IF NOT EXISTS` so repeated starts are safe. Schema
//! evolution beyond this bootstrap is handled outside the application.

use sqlx::PgPool;

use gatehouse_core::error::{AppError, ErrorKind};
use gatehouse_core::result::AppResult;

const CLIENT_COLUMNS: &str = "\
    ip_address      TEXT NOT NULL,
    user_agent      TEXT NOT NULL,
    browser_family  TEXT NOT NULL,
    browser_version TEXT NOT NULL,
    os_family       TEXT NOT NULL,
    os_version      TEXT NOT NULL,
    device_family   TEXT NOT NULL,
    country_code    TEXT,
    region          TEXT,
    city            TEXT,
    fingerprint     TEXT NOT NULL";

/// Apply the Gatehouse schema to the connected database.
pub async fn apply(pool: &PgPool) -> AppResult<()> {
    let statements = [
        format!(
            "CREATE TABLE IF NOT EXISTS sessions (
                token            TEXT PRIMARY KEY,
                user_id          UUID NOT NULL,
                username         TEXT NOT NULL,
                email            TEXT NOT NULL,
                is_authenticated BOOLEAN NOT NULL,
                is_admin         BOOLEAN NOT NULL,
                provider         TEXT NOT NULL,
                created_from     TEXT NOT NULL,
                valid_until      TIMESTAMPTZ NOT NULL,
                closed_on        TIMESTAMPTZ,
                last_activity    TIMESTAMPTZ NOT NULL,
                created_at       TIMESTAMPTZ NOT NULL,
                {CLIENT_COLUMNS}
            )"
        ),
        "CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions (user_id)".to_string(),
        "CREATE INDEX IF NOT EXISTS idx_sessions_open ON sessions (valid_until) \
         WHERE closed_on IS NULL"
            .to_string(),
        "CREATE TABLE IF NOT EXISTS api_tokens (
            id           UUID PRIMARY KEY,
            user_id      UUID NOT NULL,
            name         TEXT NOT NULL,
            token_hash   TEXT NOT NULL UNIQUE,
            scopes       TEXT[] NOT NULL DEFAULT '{}',
            is_active    BOOLEAN NOT NULL,
            usage_count  BIGINT NOT NULL DEFAULT 0,
            last_used_at TIMESTAMPTZ,
            expires_at   TIMESTAMPTZ,
            revoked_at   TIMESTAMPTZ,
            revoked_by   UUID,
            created_from TEXT NOT NULL,
            created_at   TIMESTAMPTZ NOT NULL
        )"
        .to_string(),
        "CREATE INDEX IF NOT EXISTS idx_api_tokens_user_id ON api_tokens (user_id)".to_string(),
        format!(
            "CREATE TABLE IF NOT EXISTS traffic_metrics (
                id               UUID PRIMARY KEY,
                method           TEXT NOT NULL,
                path             TEXT NOT NULL,
                status_code      INTEGER NOT NULL,
                response_time_ns BIGINT NOT NULL,
                response_size    BIGINT NOT NULL,
                error_excerpt    TEXT,
                user_id          UUID,
                session_token    TEXT,
                occurred_at      TIMESTAMPTZ NOT NULL,
                {CLIENT_COLUMNS}
            )"
        ),
        "CREATE INDEX IF NOT EXISTS idx_traffic_metrics_occurred_at \
         ON traffic_metrics (occurred_at)"
            .to_string(),
        "CREATE TABLE IF NOT EXISTS users (
            id            UUID PRIMARY KEY,
            username      TEXT NOT NULL UNIQUE,
            email         TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            is_admin      BOOLEAN NOT NULL,
            is_active     BOOLEAN NOT NULL,
            created_at    TIMESTAMPTZ NOT NULL
        )"
        .to_string(),
    ];

    for statement in &statements {
        sqlx::query(statement).execute(pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to apply schema", e)
        })?;
    }

    Ok(())
}
