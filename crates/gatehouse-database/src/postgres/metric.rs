//! Traffic metric repository, PostgreSQL backing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use gatehouse_core::error::{AppError, ErrorKind};
use gatehouse_core::result::AppResult;
use gatehouse_entity::metric::TrafficMetric;

use crate::repository::TrafficMetricRepository;

/// PostgreSQL-backed traffic metric repository.
#[derive(Debug, Clone)]
pub struct PgTrafficMetricRepository {
    pool: PgPool,
}

impl PgTrafficMetricRepository {
    /// Create a new metric repository on the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrafficMetricRepository for PgTrafficMetricRepository {
    async fn insert(&self, metric: &TrafficMetric) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO traffic_metrics (
                id, method, path, status_code, response_time_ns, response_size,
                error_excerpt, user_id, session_token, occurred_at, ip_address,
                user_agent, browser_family, browser_version, os_family,
                os_version, device_family, country_code, region, city,
                fingerprint
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18, $19, $20, $21
            )",
        )
        .bind(metric.id)
        .bind(&metric.method)
        .bind(&metric.path)
        .bind(metric.status_code)
        .bind(metric.response_time_ns)
        .bind(metric.response_size)
        .bind(&metric.error_excerpt)
        .bind(metric.user_id)
        .bind(&metric.session_token)
        .bind(metric.occurred_at)
        .bind(&metric.client.ip_address)
        .bind(&metric.client.user_agent)
        .bind(&metric.client.browser_family)
        .bind(&metric.client.browser_version)
        .bind(&metric.client.os_family)
        .bind(&metric.client.os_version)
        .bind(&metric.client.device_family)
        .bind(&metric.client.country_code)
        .bind(&metric.client.region)
        .bind(&metric.client.city)
        .bind(&metric.client.fingerprint)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert metric", e))?;

        Ok(())
    }

    async fn list_recent(&self, limit: i64) -> AppResult<Vec<TrafficMetric>> {
        sqlx::query_as::<_, TrafficMetric>(
            "SELECT * FROM traffic_metrics ORDER BY occurred_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list metrics", e))
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM traffic_metrics WHERE occurred_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to trim metrics", e)
            })?;

        Ok(result.rows_affected())
    }
}
