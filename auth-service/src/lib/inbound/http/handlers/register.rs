use std::fmt;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use super::client_context;
use super::ApiError;
use super::ApiSuccess;
use super::JsonBody;
use crate::domain::auth::models::AuthResult;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::user::models::UserProfile;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> Result<ApiSuccess<AuthResponseData>, ApiError> {
    let command = body.try_into_command(&headers)?;

    state
        .auth_service
        .register(command)
        .await
        .map_err(ApiError::from)
        .map(|result| ApiSuccess::new(StatusCode::CREATED, result.into()))
}

/// HTTP request body for registering an account (raw JSON)
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    email: String,
    username: String,
    password: String,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

impl RegisterRequest {
    fn try_into_command(self, headers: &HeaderMap) -> Result<RegisterCommand, ApiError> {
        RegisterCommand::new(
            self.email,
            self.username,
            self.password,
            self.first_name,
            self.last_name,
            client_context(headers),
        )
        .map_err(ApiError::from)
    }
}

/// Tokens plus the account they were issued for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthResponseData {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserProfile,
    pub roles: Vec<String>,
}

impl From<AuthResult> for AuthResponseData {
    fn from(result: AuthResult) -> Self {
        Self {
            access_token: result.access_token,
            refresh_token: result.refresh_token,
            token_type: result.token_type.to_string(),
            expires_in: result.expires_in,
            user: result.user,
            roles: result.roles,
        }
    }
}
