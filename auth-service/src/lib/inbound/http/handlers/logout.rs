use auth::AuthContext;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::refresh::RefreshTokenRequest;
use super::ApiError;
use super::JsonBody;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

/// End the session behind a refresh token. Unknown tokens succeed too.
pub async fn logout(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RefreshTokenRequest>,
) -> Result<StatusCode, ApiError> {
    let token = body.required_token()?;

    state.auth_service.logout(token).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn logout_all(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthContext>,
) -> Result<StatusCode, ApiError> {
    let ended = state
        .auth_service
        .logout_all(&UserId(caller.user_id))
        .await?;

    tracing::debug!(user_id = %caller.user_id, ended, "Logged out everywhere");

    Ok(StatusCode::NO_CONTENT)
}
