use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use super::parse_user_id;
use super::ApiError;
use super::ApiSuccess;
use super::JsonBody;
use crate::domain::account::models::RoleAssignmentCommand;
use crate::domain::account::models::UpdateRoleCommand;
use crate::domain::role::models::CreateRoleCommand;
use crate::domain::role::models::RoleId;
use crate::domain::role::models::RoleInfo;
use crate::domain::user::models::Pagination;
use crate::domain::user::models::UserPage;
use crate::domain::user::models::UserProfile;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ListUsersQuery {
    page: Option<u32>,
    page_size: Option<u32>,
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<ApiSuccess<UserPage>, ApiError> {
    state
        .user_service
        .list_users(Pagination::new(query.page, query.page_size))
        .await
        .map_err(ApiError::from)
        .map(|page| ApiSuccess::new(StatusCode::OK, page))
}

pub async fn activate_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<UserProfile>, ApiError> {
    let user_id = parse_user_id(&user_id)?;

    state
        .user_service
        .activate_user(&user_id)
        .await
        .map_err(ApiError::from)
        .map(|profile| ApiSuccess::new(StatusCode::OK, profile))
}

pub async fn deactivate_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<UserProfile>, ApiError> {
    let user_id = parse_user_id(&user_id)?;

    state
        .user_service
        .deactivate_user(&user_id)
        .await
        .map_err(ApiError::from)
        .map(|profile| ApiSuccess::new(StatusCode::OK, profile))
}

/// HTTP request body naming one user and one role (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoleAssignmentRequest {
    user_id: String,
    role_id: String,
}

impl RoleAssignmentRequest {
    fn try_into_command(self) -> Result<RoleAssignmentCommand, ApiError> {
        Ok(RoleAssignmentCommand {
            user_id: parse_user_id(&self.user_id)?,
            role_id: parse_role_id(&self.role_id)?,
        })
    }
}

pub async fn assign_role(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RoleAssignmentRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .user_service
        .assign_role(body.try_into_command()?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove_role(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RoleAssignmentRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .user_service
        .remove_role(body.try_into_command()?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_roles(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<RoleInfo>>, ApiError> {
    state
        .user_service
        .list_roles()
        .await
        .map_err(ApiError::from)
        .map(|roles| ApiSuccess::new(StatusCode::OK, roles))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateRoleRequest {
    name: String,
    #[serde(default)]
    description: Option<String>,
}

pub async fn create_role(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateRoleRequest>,
) -> Result<ApiSuccess<RoleInfo>, ApiError> {
    let command = CreateRoleCommand::new(body.name, body.description)?;

    state
        .user_service
        .create_role(command)
        .await
        .map_err(ApiError::from)
        .map(|role| ApiSuccess::new(StatusCode::CREATED, role))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateRoleRequest {
    #[serde(default)]
    description: Option<String>,
}

pub async fn update_role(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
    JsonBody(body): JsonBody<UpdateRoleRequest>,
) -> Result<ApiSuccess<RoleInfo>, ApiError> {
    let role_id = parse_role_id(&role_id)?;
    let command = UpdateRoleCommand::new(body.description)?;

    state
        .user_service
        .update_role(&role_id, command)
        .await
        .map_err(ApiError::from)
        .map(|role| ApiSuccess::new(StatusCode::OK, role))
}

pub async fn delete_role(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let role_id = parse_role_id(&role_id)?;

    state.user_service.delete_role(&role_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

fn parse_role_id(raw: &str) -> Result<RoleId, ApiError> {
    Uuid::parse_str(raw.trim())
        .map(RoleId)
        .map_err(|_| ApiError::validation("Invalid role id"))
}
