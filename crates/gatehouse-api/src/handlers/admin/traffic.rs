//! Admin traffic observability handlers.

use axum::Json;
use axum::extract::{Query, State};

use gatehouse_core::error::AppError;
use gatehouse_entity::metric::TrafficMetric;

use crate::dto::request::LimitQuery;
use crate::dto::response::{ApiResponse, StatsResponse};
use crate::extractors::AdminUser;
use crate::state::AppState;

/// GET {prefix}/api/admin/traffic
pub async fn recent_traffic(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(limit): Query<LimitQuery>,
) -> Result<Json<ApiResponse<Vec<TrafficMetric>>>, AppError> {
    let metrics = state
        .repos
        .metrics
        .list_recent(limit.effective(100, 1000))
        .await?;
    Ok(Json(ApiResponse::ok(metrics)))
}

/// GET {prefix}/api/admin/stats
pub async fn stats(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Json<ApiResponse<StatsResponse>> {
    Json(ApiResponse::ok(StatsResponse {
        traffic: state.traffic_stats.snapshot(),
        fingerprint_cache: state.fingerprint_cache.stats(),
    }))
}
