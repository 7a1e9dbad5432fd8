//! User directory, in-memory backing.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use gatehouse_core::result::AppResult;
use gatehouse_entity::user::User;

use super::{read_guard, write_guard};
use crate::password;
use crate::repository::UserDirectory;

/// In-memory user directory keyed by user id.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(read_guard(&self.users).get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(read_guard(&self.users)
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(read_guard(&self.users)
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn verify_credentials(&self, login: &str, password: &str) -> AppResult<Option<User>> {
        let user = read_guard(&self.users)
            .values()
            .find(|u| u.username == login || u.email == login)
            .cloned();

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
        let mut users = write_guard(&self.users);
        if users.values().any(|u| u.username == user.username) {
            return Ok(());
        }
        users.insert(user.id, user.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(username: &str, password: &str, is_active: bool) -> User {
        User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: password::hash_password(password).unwrap(),
            is_admin: false,
            is_active,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_verify_credentials_by_username_and_email() {
        let dir = InMemoryUserDirectory::new();
        dir.ensure_user(&user("alice", "hunter2", true)).await.unwrap();

        assert!(dir.verify_credentials("alice", "hunter2").await.unwrap().is_some());
        assert!(
            dir.verify_credentials("alice@example.com", "hunter2")
                .await
                .unwrap()
                .is_some()
        );
        assert!(dir.verify_credentials("alice", "wrong").await.unwrap().is_none());
        assert!(dir.verify_credentials("bob", "hunter2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_inactive_account_cannot_authenticate() {
        let dir = InMemoryUserDirectory::new();
        dir.ensure_user(&user("carol", "pw", false)).await.unwrap();
        assert!(dir.verify_credentials("carol", "pw").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ensure_user_is_idempotent() {
        let dir = InMemoryUserDirectory::new();
        let first = user("dave", "pw", true);
        dir.ensure_user(&first).await.unwrap();

        let mut second = user("dave", "other", true);
        second.is_admin = true;
        dir.ensure_user(&second).await.unwrap();

        let stored = dir.find_by_username("dave").await.unwrap().unwrap();
        assert_eq!(stored.id, first.id);
        assert!(!stored.is_admin);
    }
}
