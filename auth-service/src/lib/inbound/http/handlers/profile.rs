use auth::AuthContext;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::parse_user_id;
use super::ApiError;
use super::ApiSuccess;
use super::JsonBody;
use crate::domain::account::models::UpdateProfileCommand;
use crate::domain::role::models::RoleInfo;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;
use crate::inbound::http::router::AppState;

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthContext>,
) -> Result<ApiSuccess<UserProfile>, ApiError> {
    state
        .user_service
        .get_profile(&UserId(caller.user_id))
        .await
        .map_err(ApiError::from)
        .map(|profile| ApiSuccess::new(StatusCode::OK, profile))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthContext>,
    JsonBody(body): JsonBody<UpdateProfileRequest>,
) -> Result<ApiSuccess<UserProfile>, ApiError> {
    let command = body.try_into_command()?;

    state
        .user_service
        .update_profile(&UserId(caller.user_id), command)
        .await
        .map_err(ApiError::from)
        .map(|profile| ApiSuccess::new(StatusCode::OK, profile))
}

pub async fn delete_profile(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthContext>,
) -> Result<StatusCode, ApiError> {
    state
        .user_service
        .delete_account(&UserId(caller.user_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<UserProfile>, ApiError> {
    let user_id = parse_user_id(&user_id)?;

    state
        .user_service
        .get_profile(&user_id)
        .await
        .map_err(ApiError::from)
        .map(|profile| ApiSuccess::new(StatusCode::OK, profile))
}

pub async fn get_user_roles(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<UserRolesResponseData>, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    let roles = state.user_service.get_user_roles(&user_id).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        UserRolesResponseData {
            user_id: user_id.0,
            roles,
        },
    ))
}

/// HTTP request body for a partial profile update (raw JSON)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    username: Option<String>,
}

impl UpdateProfileRequest {
    fn try_into_command(self) -> Result<UpdateProfileCommand, ApiError> {
        UpdateProfileCommand::new(self.first_name, self.last_name, self.username)
            .map_err(ApiError::from)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRolesResponseData {
    pub user_id: Uuid,
    pub roles: Vec<RoleInfo>,
}
