//! Traffic metric repository, in-memory backing.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use gatehouse_core::result::AppResult;
use gatehouse_entity::metric::TrafficMetric;

use super::{read_guard, write_guard};
use crate::repository::TrafficMetricRepository;

/// In-memory traffic metric store, append-only like its SQL counterpart.
#[derive(Debug, Default)]
pub struct InMemoryTrafficMetricRepository {
    metrics: RwLock<Vec<TrafficMetric>>,
}

impl InMemoryTrafficMetricRepository {
    /// Create an empty metric store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TrafficMetricRepository for InMemoryTrafficMetricRepository {
    async fn insert(&self, metric: &TrafficMetric) -> AppResult<()> {
        write_guard(&self.metrics).push(metric.clone());
        Ok(())
    }

    async fn list_recent(&self, limit: i64) -> AppResult<Vec<TrafficMetric>> {
        let mut metrics: Vec<TrafficMetric> = read_guard(&self.metrics).clone();
        metrics.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        metrics.truncate(limit.max(0) as usize);
        Ok(metrics)
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut metrics = write_guard(&self.metrics);
        let before = metrics.len();
        metrics.retain(|m| m.occurred_at >= cutoff);
        Ok((before - metrics.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use gatehouse_entity::client::ClientInfo;
    use uuid::Uuid;

    fn metric(occurred_at: DateTime<Utc>) -> TrafficMetric {
        TrafficMetric {
            id: Uuid::new_v4(),
            method: "GET".to_string(),
            path: "/api/tokens".to_string(),
            status_code: 200,
            response_time_ns: 1_000_000,
            response_size: 64,
            error_excerpt: None,
            user_id: None,
            session_token: None,
            occurred_at,
            client: ClientInfo::default(),
        }
    }

    #[tokio::test]
    async fn test_list_recent_is_newest_first() {
        let repo = InMemoryTrafficMetricRepository::new();
        let now = Utc::now();
        repo.insert(&metric(now - Duration::minutes(2))).await.unwrap();
        repo.insert(&metric(now)).await.unwrap();
        repo.insert(&metric(now - Duration::minutes(1))).await.unwrap();

        let recent = repo.list_recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].occurred_at, now);
    }

    #[tokio::test]
    async fn test_delete_older_than() {
        let repo = InMemoryTrafficMetricRepository::new();
        let now = Utc::now();
        repo.insert(&metric(now - Duration::days(40))).await.unwrap();
        repo.insert(&metric(now)).await.unwrap();

        assert_eq!(repo.delete_older_than(now - Duration::days(30)).await.unwrap(), 1);
        assert_eq!(repo.list_recent(10).await.unwrap().len(), 1);
    }
}
