use crate::domain::auth::errors::AuthError;
use crate::domain::role::models::CreateRoleCommand;
use crate::domain::role::models::RoleId;
use crate::domain::role::models::RoleName;
use crate::domain::user::models::normalize_name;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;

const MAX_DESCRIPTION_LENGTH: usize = 255;

/// Partial profile update.
///
/// Outer `None` leaves a field unchanged. For names, `Some(None)` clears
/// the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProfileCommand {
    pub first_name: Option<Option<String>>,
    pub last_name: Option<Option<String>>,
    pub username: Option<Username>,
}

impl UpdateProfileCommand {
    /// Validate raw profile changes. Blank names clear the stored name.
    ///
    /// # Errors
    /// * `Validation` - Username is malformed or a name is too long
    pub fn new(
        first_name: Option<String>,
        last_name: Option<String>,
        username: Option<String>,
    ) -> Result<Self, AuthError> {
        Ok(Self {
            first_name: first_name.map(|n| normalize_name(Some(n))).transpose()?,
            last_name: last_name.map(|n| normalize_name(Some(n))).transpose()?,
            username: username.map(Username::new).transpose()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.username.is_none()
    }
}

/// Grant or revoke one role for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleAssignmentCommand {
    pub user_id: UserId,
    pub role_id: RoleId,
}

/// Replace a role's description. `None` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRoleCommand {
    pub description: Option<String>,
}

impl UpdateRoleCommand {
    /// # Errors
    /// * `Validation` - Description longer than 255 characters
    pub fn new(description: Option<String>) -> Result<Self, AuthError> {
        Ok(Self {
            description: normalize_description(description)?,
        })
    }
}

impl CreateRoleCommand {
    /// # Errors
    /// * `Validation` - Malformed name or over-long description
    pub fn new(name: String, description: Option<String>) -> Result<Self, AuthError> {
        Ok(Self {
            name: RoleName::new(name)?,
            description: normalize_description(description)?,
        })
    }
}

fn normalize_description(description: Option<String>) -> Result<Option<String>, AuthError> {
    match description.map(|d| d.trim().to_string()) {
        Some(d) if d.is_empty() => Ok(None),
        Some(d) if d.chars().count() > MAX_DESCRIPTION_LENGTH => Err(AuthError::Validation(
            format!("Description too long: maximum {} characters", MAX_DESCRIPTION_LENGTH),
        )),
        other => Ok(other),
    }
}
