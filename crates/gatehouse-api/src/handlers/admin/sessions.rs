//! Admin session management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use gatehouse_core::error::AppError;

use crate::dto::request::LimitQuery;
use crate::dto::response::{ApiResponse, MessageResponse, SessionResponse};
use crate::extractors::AdminUser;
use crate::state::AppState;

/// GET {prefix}/api/admin/sessions
pub async fn list_sessions(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(limit): Query<LimitQuery>,
) -> Result<Json<ApiResponse<Vec<SessionResponse>>>, AppError> {
    let sessions = state
        .session_store
        .list_active(limit.effective(100, 1000))
        .await?;
    let items = sessions.iter().map(SessionResponse::from).collect();
    Ok(Json(ApiResponse::ok(items)))
}

/// DELETE {prefix}/api/admin/sessions/{token}
///
/// Closes someone's session. Unknown tokens map to 404 and an already
/// closed session to 409 so operators can tell the two apart.
pub async fn end_session(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(token): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    state.session_store.end_session(&token).await?;

    tracing::info!(admin_id = %admin.user_id, "Session closed by admin");

    Ok(Json(ApiResponse::ok(MessageResponse::new("Session closed"))))
}
