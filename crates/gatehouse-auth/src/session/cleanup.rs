//! Periodic sweep of expired sessions.
//!
//! Expiry is detected lazily during validation, but sessions that are
//! never presented again would stay open forever without this sweep.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time;
use tracing::{error, info};

use gatehouse_core::result::AppResult;
use gatehouse_database::SessionRepository;

/// Closes expired sessions on a fixed interval.
#[derive(Debug, Clone)]
pub struct SessionCleanup {
    /// Session persistence port.
    repo: Arc<dyn SessionRepository>,
    /// Time between sweeps.
    interval: Duration,
}

impl SessionCleanup {
    /// Create a new cleanup handler.
    pub fn new(repo: Arc<dyn SessionRepository>, interval: Duration) -> Self {
        Self { repo, interval }
    }

    /// Run one sweep. Returns the number of sessions closed.
    pub async fn run_cleanup(&self) -> AppResult<u64> {
        let closed = self.repo.close_expired(Utc::now()).await?;
        if closed > 0 {
            info!(closed, "Closed expired sessions");
        }
        Ok(closed)
    }

    /// Sweep on the configured interval until shutdown is signalled.
    pub async fn run(self, mut cancel: watch::Receiver<bool>) {
        info!(interval_secs = self.interval.as_secs(), "Session cleanup started");

        loop {
            tokio::select! {
                _ = cancel.changed() => {
                    info!("Session cleanup stopped");
                    return;
                }
                _ = time::sleep(self.interval) => {
                    if let Err(e) = self.run_cleanup().await {
                        error!(error = %e, "Session cleanup sweep failed");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use gatehouse_database::memory::session::InMemorySessionRepository;
    use gatehouse_entity::client::ClientInfo;
    use gatehouse_entity::session::Session;

    fn session(token: &str, valid_until: chrono::DateTime<Utc>) -> Session {
        Session {
            token: token.to_string(),
            user_id: uuid::Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            is_authenticated: true,
            is_admin: false,
            provider: "local".to_string(),
            created_from: "web".to_string(),
            valid_until,
            closed_on: None,
            last_activity: Utc::now(),
            created_at: Utc::now(),
            client: ClientInfo::default(),
        }
    }

    #[tokio::test]
    async fn test_sweep_closes_only_expired() {
        let repo = Arc::new(InMemorySessionRepository::new());
        let now = Utc::now();
        repo.insert(&session("live", now + ChronoDuration::hours(1)))
            .await
            .unwrap();
        repo.insert(&session("stale", now - ChronoDuration::minutes(5)))
            .await
            .unwrap();

        let cleanup = SessionCleanup::new(repo.clone(), Duration::from_secs(60));
        assert_eq!(cleanup.run_cleanup().await.unwrap(), 1);

        assert!(repo.find_by_token("live").await.unwrap().unwrap().closed_on.is_none());
        assert!(repo.find_by_token("stale").await.unwrap().unwrap().closed_on.is_some());

        // A second sweep finds nothing left to close.
        assert_eq!(cleanup.run_cleanup().await.unwrap(), 0);
    }
}
