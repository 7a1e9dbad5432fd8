//! User directory, PostgreSQL backing.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use gatehouse_core::error::{AppError, ErrorKind};
use gatehouse_core::result::AppResult;
use gatehouse_entity::user::User;

use crate::password;
use crate::repository::UserDirectory;

/// PostgreSQL-backed user directory.
#[derive(Debug, Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    /// Create a new user directory on the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user", e))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by username", e)
            })
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by email", e)
            })
    }

    async fn verify_credentials(&self, login: &str, password: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE username = $1 OR email = $1",
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to look up credentials", e)
        })?;

        let Some(user) = user else {
            debug!(login = %login, "Login rejected: unknown account");
            return Ok(None);
        };

        if !user.is_active {
            debug!(user_id = %user.id, "Login rejected: inactive account");
            return Ok(None);
        }

        if !password::verify_password(password, &user.password_hash)? {
            debug!(user_id = %user.id, "Login rejected: wrong password");
            return Ok(None);
        }

        Ok(Some(user))
    }

    async fn ensure_user(&self, user: &User) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, is_admin, is_active, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) ON CONFLICT (username) DO NOTHING",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(user.is_active)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to seed user", e))?;

        Ok(())
    }
}
