//! Traffic metric entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::client::ClientInfo;

/// An immutable per-request traffic record.
///
/// Written asynchronously after the response is produced; rows are never
/// updated. `error_excerpt` is populated only for responses with status
/// 400 or above.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrafficMetric {
    /// Unique metric identifier.
    pub id: Uuid,
    /// HTTP method.
    pub method: String,
    /// Request path (without query string).
    pub path: String,
    /// Response status code.
    pub status_code: i32,
    /// Elapsed handler time in nanoseconds.
    pub response_time_ns: i64,
    /// Response body size in bytes.
    pub response_size: i64,
    /// Truncated response body excerpt for error responses.
    pub error_excerpt: Option<String>,
    /// The authenticated user, when known.
    pub user_id: Option<Uuid>,
    /// The session token, when the request was cookie-authenticated.
    pub session_token: Option<String>,
    /// When the request completed.
    pub occurred_at: DateTime<Utc>,

    /// Client metadata captured for this request.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub client: ClientInfo,
}
