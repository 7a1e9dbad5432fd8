//! API token issuance, validation, and revocation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distr::Alphanumeric;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use uuid::Uuid;

use gatehouse_core::error::AppError;
use gatehouse_core::result::AppResult;
use gatehouse_database::{TokenRepository, UserDirectory};
use gatehouse_entity::token::ApiToken;
use gatehouse_entity::user::User;

/// Prefix identifying Gatehouse API tokens.
const TOKEN_PREFIX: &str = "gh_";
/// Length of the random part of a token secret.
const TOKEN_LENGTH: usize = 32;

/// Hash a token secret for storage and lookup.
///
/// Secrets are high-entropy random strings, so an unsalted SHA-256 is
/// sufficient and keeps lookup a single indexed query.
pub fn hash_token(plaintext: &str) -> String {
    hex::encode(Sha256::digest(plaintext.as_bytes()))
}

/// Generate a fresh token secret.
fn generate_secret() -> String {
    let tail: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect();
    format!("{TOKEN_PREFIX}{tail}")
}

/// Token issuance and validation on top of the token repository and the
/// user directory.
#[derive(Debug, Clone)]
pub struct TokenService {
    /// Token persistence port.
    tokens: Arc<dyn TokenRepository>,
    /// User lookup collaborator.
    users: Arc<dyn UserDirectory>,
}

impl TokenService {
    /// Create a new token service.
    pub fn new(tokens: Arc<dyn TokenRepository>, users: Arc<dyn UserDirectory>) -> Self {
        Self { tokens, users }
    }

    /// Issue a new token for a user.
    ///
    /// The plaintext secret is returned exactly once here; only its hash
    /// is stored.
    pub async fn generate(
        &self,
        user_id: Uuid,
        name: &str,
        scopes: Vec<String>,
        expires_at: Option<DateTime<Utc>>,
        created_from: &str,
    ) -> AppResult<(String, ApiToken)> {
        let plaintext = generate_secret();
        let token = ApiToken {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            token_hash: hash_token(&plaintext),
            scopes,
            is_active: true,
            usage_count: 0,
            last_used_at: None,
            expires_at,
            revoked_at: None,
            revoked_by: None,
            created_from: created_from.to_string(),
            created_at: Utc::now(),
        };

        self.tokens.insert(&token).await?;

        debug!(token_id = %token.id, user_id = %user_id, "API token issued");
        Ok((plaintext, token))
    }

    /// Validate a token secret and resolve its owner.
    ///
    /// Every rejection is the same generic authentication error so the
    /// response leaks nothing about why a credential failed; the precise
    /// cause is logged for audit. Expiry detected here flips the token
    /// inactive, the same lazy transition sessions use.
    pub async fn validate(&self, plaintext: &str) -> AppResult<(User, ApiToken)> {
        if !plaintext.starts_with(TOKEN_PREFIX) {
            debug!("Token rejected: malformed secret");
            return Err(Self::rejection());
        }

        let Some(mut token) = self.tokens.find_by_hash(&hash_token(plaintext)).await? else {
            debug!("Token rejected: unknown secret");
            return Err(Self::rejection());
        };

        if token.is_revoked() {
            debug!(token_id = %token.id, "Token rejected: revoked");
            return Err(Self::rejection());
        }

        if !token.is_active {
            debug!(token_id = %token.id, "Token rejected: inactive");
            return Err(Self::rejection());
        }

        let now = Utc::now();
        if token.is_expired_at(now) {
            if let Err(e) = self.tokens.deactivate(token.id).await {
                warn!(token_id = %token.id, error = %e, "Failed to deactivate expired token");
            }
            debug!(token_id = %token.id, "Token rejected: expired");
            return Err(Self::rejection());
        }

        let Some(user) = self.users.find_by_id(token.user_id).await? else {
            warn!(token_id = %token.id, user_id = %token.user_id, "Token rejected: owner missing");
            return Err(Self::rejection());
        };

        if !user.is_active {
            debug!(token_id = %token.id, user_id = %user.id, "Token rejected: owner inactive");
            return Err(Self::rejection());
        }

        self.tokens.record_usage(token.id, now).await?;
        token.usage_count += 1;
        token.last_used_at = Some(now);

        Ok((user, token))
    }

    /// Revoke a token.
    ///
    /// Deliberately not idempotent: revoking an already-revoked token is
    /// a conflict so audit trails record exactly one revocation.
    pub async fn revoke(&self, token_id: Uuid, revoked_by: Uuid) -> AppResult<()> {
        if self.tokens.revoke(token_id, revoked_by, Utc::now()).await? {
            debug!(token_id = %token_id, revoked_by = %revoked_by, "API token revoked");
            return Ok(());
        }

        match self.tokens.find_by_id(token_id).await? {
            None => Err(AppError::not_found("Token not found")),
            Some(_) => Err(AppError::conflict("Token already revoked")),
        }
    }

    /// Look up a token record by id.
    pub async fn get(&self, token_id: Uuid) -> AppResult<Option<ApiToken>> {
        self.tokens.find_by_id(token_id).await
    }

    /// List a user's tokens, most recent first.
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<ApiToken>> {
        self.tokens.list_by_user(user_id).await
    }

    fn rejection() -> AppError {
        AppError::authentication("Invalid API token")
    }
}
