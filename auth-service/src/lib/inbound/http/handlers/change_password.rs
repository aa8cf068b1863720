use auth::AuthContext;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use super::ApiError;
use super::JsonBody;
use crate::domain::auth::models::ChangePasswordCommand;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

/// Replace the caller's password. Every session of the caller ends.
pub async fn change_password(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthContext>,
    JsonBody(body): JsonBody<ChangePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    let command = ChangePasswordCommand {
        user_id: UserId(caller.user_id),
        old_password: body.old_password,
        new_password: body.new_password,
    };

    state.auth_service.change_password(command).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ChangePasswordRequest {
    old_password: String,
    new_password: String,
}
