//! API token repository, in-memory backing.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use gatehouse_core::error::AppError;
use gatehouse_core::result::AppResult;
use gatehouse_entity::token::ApiToken;

use super::{read_guard, write_guard};
use crate::repository::TokenRepository;

/// In-memory API token repository keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryTokenRepository {
    tokens: RwLock<HashMap<Uuid, ApiToken>>,
}

impl InMemoryTokenRepository {
    /// Create an empty token store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn insert(&self, token: &ApiToken) -> AppResult<()> {
        let mut tokens = write_guard(&self.tokens);
        if tokens.contains_key(&token.id)
            || tokens.values().any(|t| t.token_hash == token.token_hash)
        {
            return Err(AppError::database("Duplicate token"));
        }
        tokens.insert(token.id, token.clone());
        Ok(())
    }

    async fn find_by_hash(&self, token_hash: &str) -> AppResult<Option<ApiToken>> {
        Ok(read_guard(&self.tokens)
            .values()
            .find(|t| t.token_hash == token_hash)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ApiToken>> {
        Ok(read_guard(&self.tokens).get(&id).cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<ApiToken>> {
        let mut tokens: Vec<ApiToken> = read_guard(&self.tokens)
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        tokens.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tokens)
    }

    async fn record_usage(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        if let Some(token) = write_guard(&self.tokens).get_mut(&id) {
            token.usage_count += 1;
            token.last_used_at = Some(at);
        }
        Ok(())
    }

    async fn deactivate(&self, id: Uuid) -> AppResult<()> {
        if let Some(token) = write_guard(&self.tokens).get_mut(&id) {
            token.is_active = false;
        }
        Ok(())
    }

    async fn revoke(&self, id: Uuid, revoked_by: Uuid, at: DateTime<Utc>) -> AppResult<bool> {
        let mut tokens = write_guard(&self.tokens);
        match tokens.get_mut(&id) {
            Some(token) if token.revoked_at.is_none() => {
                token.revoked_at = Some(at);
                token.revoked_by = Some(revoked_by);
                token.is_active = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
