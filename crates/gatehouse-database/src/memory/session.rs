//! Session repository, in-memory backing.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use gatehouse_core::error::AppError;
use gatehouse_core::result::AppResult;
use gatehouse_entity::session::Session;

use super::{read_guard, write_guard};
use crate::repository::SessionRepository;

/// In-memory session repository keyed by token.
#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionRepository {
    /// Create an empty session store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn insert(&self, session: &Session) -> AppResult<()> {
        let mut sessions = write_guard(&self.sessions);
        if sessions.contains_key(&session.token) {
            return Err(AppError::database("Duplicate session token"));
        }
        sessions.insert(session.token.clone(), session.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Session>> {
        Ok(read_guard(&self.sessions).get(token).cloned())
    }

    async fn update_last_activity(&self, token: &str, at: DateTime<Utc>) -> AppResult<()> {
        if let Some(session) = write_guard(&self.sessions).get_mut(token) {
            session.last_activity = at;
        }
        Ok(())
    }

    async fn close(&self, token: &str, at: DateTime<Utc>) -> AppResult<bool> {
        let mut sessions = write_guard(&self.sessions);
        match sessions.get_mut(token) {
            Some(session) if session.closed_on.is_none() => {
                session.closed_on = Some(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_active(&self, limit: i64) -> AppResult<Vec<Session>> {
        let mut active: Vec<Session> = read_guard(&self.sessions)
            .values()
            .filter(|session| session.is_valid())
            .cloned()
            .collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        active.truncate(limit.max(0) as usize);
        Ok(active)
    }

    async fn close_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut closed = 0;
        for session in write_guard(&self.sessions).values_mut() {
            if session.closed_on.is_none() && session.is_expired_at(now) {
                session.closed_on = Some(now);
                closed += 1;
            }
        }
        Ok(closed)
    }
}
