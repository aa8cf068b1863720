use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use serde::Deserialize;

use super::client_context;
use super::register::AuthResponseData;
use super::ApiError;
use super::ApiSuccess;
use super::JsonBody;
use crate::domain::auth::models::LoginCommand;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<ApiSuccess<AuthResponseData>, ApiError> {
    let command = LoginCommand {
        email: body.email,
        password: body.password,
        client: client_context(&headers),
    };

    state
        .auth_service
        .login(command)
        .await
        .map_err(ApiError::from)
        .map(|result| ApiSuccess::new(StatusCode::OK, result.into()))
}

/// HTTP request body for logging in (raw JSON)
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}
