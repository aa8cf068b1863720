use auth::AuthContext;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use uuid::Uuid;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::session::models::SessionId;
use crate::domain::session::models::SessionInfo;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

pub async fn list_sessions(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthContext>,
) -> Result<ApiSuccess<Vec<SessionInfo>>, ApiError> {
    let sessions = state
        .auth_service
        .active_sessions(&UserId(caller.user_id))
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        sessions.iter().map(SessionInfo::from).collect(),
    ))
}

pub async fn revoke_session(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthContext>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let session_id = Uuid::parse_str(&session_id)
        .map(SessionId)
        .map_err(|_| ApiError::validation("Invalid session id"))?;

    state
        .auth_service
        .revoke_session(&UserId(caller.user_id), &session_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
