use auth::AuthContext;
use auth::GateError;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;
use uuid::Uuid;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::TokenInfo;
use crate::inbound::http::router::AppState;

/// Validate the bearer token of the request and describe it.
pub async fn verify_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<ApiSuccess<TokenInfo>, ApiError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(GateError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::TokenInvalid)?;
    let token = auth::extract_bearer_token(header).map_err(AuthError::from)?;

    state
        .auth_service
        .verify_token(token)
        .await
        .map_err(ApiError::from)
        .map(|info| ApiSuccess::new(StatusCode::OK, info))
}

/// Caller identity for routes where a token is optional.
pub async fn whoami(
    Extension(caller): Extension<Option<AuthContext>>,
) -> ApiSuccess<WhoAmIResponseData> {
    ApiSuccess::new(StatusCode::OK, caller.into())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WhoAmIResponseData {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
}

impl From<Option<AuthContext>> for WhoAmIResponseData {
    fn from(caller: Option<AuthContext>) -> Self {
        match caller {
            Some(context) => Self {
                authenticated: true,
                user_id: Some(context.user_id),
                username: Some(context.username),
                roles: Some(context.roles),
            },
            None => Self {
                authenticated: false,
                user_id: None,
                username: None,
                roles: None,
            },
        }
    }
}
