//! API token handlers: issue, list, revoke.

use axum::Json;
use axum::extract::{Extension, Path, State};
use uuid::Uuid;
use validator::Validate;

use gatehouse_core::error::AppError;
use gatehouse_entity::client::ClientInfo;

use crate::dto::request::CreateTokenRequest;
use crate::dto::response::{ApiResponse, MessageResponse, TokenCreatedResponse, TokenResponse};
use crate::extractors::CurrentUser;
use crate::state::AppState;

/// POST {prefix}/api/tokens
///
/// Issues a new token for the calling user. The plaintext secret is in
/// this response and nowhere else; only its hash is stored.
pub async fn create_token(
    State(state): State<AppState>,
    user: CurrentUser,
    Extension(client): Extension<ClientInfo>,
    Json(request): Json<CreateTokenRequest>,
) -> Result<Json<ApiResponse<TokenCreatedResponse>>, AppError> {
    request
        .validate()
        .map_err(|error| AppError::validation(error.to_string()))?;

    let (plaintext, token) = state
        .token_service
        .generate(
            user.user_id,
            &request.name,
            request.scopes,
            request.expires_at,
            &client.ip_address,
        )
        .await?;

    tracing::info!(user_id = %user.user_id, token_id = %token.id, "API token issued");

    Ok(Json(ApiResponse::ok(TokenCreatedResponse {
        token: plaintext,
        details: TokenResponse::from(&token),
    })))
}

/// GET {prefix}/api/tokens
pub async fn list_tokens(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<TokenResponse>>>, AppError> {
    let tokens = state.token_service.list_for_user(user.user_id).await?;
    let items = tokens.iter().map(TokenResponse::from).collect();
    Ok(Json(ApiResponse::ok(items)))
}

/// DELETE {prefix}/api/tokens/{id}
///
/// Owners revoke their own tokens; admins may revoke anyone's. A
/// second revocation is a conflict, not a silent success.
pub async fn revoke_token(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(token_id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    let token = state
        .token_service
        .get(token_id)
        .await?
        .ok_or_else(|| AppError::not_found("Token not found"))?;

    if !user.is_admin && token.user_id != user.user_id {
        return Err(AppError::authorization(
            "Cannot revoke another user's token",
        ));
    }

    state.token_service.revoke(token_id, user.user_id).await?;

    tracing::info!(token_id = %token_id, revoked_by = %user.user_id, "API token revoked");

    Ok(Json(ApiResponse::ok(MessageResponse::new("Token revoked"))))
}
