use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::JsonBody;
use crate::domain::auth::models::AccessTokenResult;
use crate::inbound::http::router::AppState;

pub async fn refresh_token(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RefreshTokenRequest>,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    let token = body.required_token()?;

    state
        .auth_service
        .refresh_token(token)
        .await
        .map_err(ApiError::from)
        .map(|result| ApiSuccess::new(StatusCode::OK, result.into()))
}

/// Body shared by refresh and logout.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshTokenRequest {
    #[serde(default)]
    refresh_token: String,
}

impl RefreshTokenRequest {
    pub fn required_token(&self) -> Result<&str, ApiError> {
        let token = self.refresh_token.trim();
        if token.is_empty() {
            return Err(ApiError::validation("Refresh token is required"));
        }
        Ok(token)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenResponseData {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl From<AccessTokenResult> for TokenResponseData {
    fn from(result: AccessTokenResult) -> Self {
        Self {
            access_token: result.access_token,
            token_type: result.token_type.to_string(),
            expires_in: result.expires_in,
        }
    }
}
