use async_trait::async_trait;

use crate::domain::account::models::RoleAssignmentCommand;
use crate::domain::account::models::UpdateProfileCommand;
use crate::domain::account::models::UpdateRoleCommand;
use crate::domain::auth::errors::AuthError;
use crate::domain::role::models::CreateRoleCommand;
use crate::domain::role::models::RoleId;
use crate::domain::role::models::RoleInfo;
use crate::domain::user::models::Pagination;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserPage;
use crate::domain::user::models::UserProfile;

/// Port for account and role administration.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Retrieve the public profile of a user.
    ///
    /// # Errors
    /// * `UserNotFound` - User does not exist
    /// * `Database` - Database operation failed
    async fn get_profile(&self, user_id: &UserId) -> Result<UserProfile, AuthError>;

    /// Apply a partial profile update.
    ///
    /// # Arguments
    /// * `user_id` - User to update
    /// * `command` - Validated changes
    ///
    /// # Returns
    /// Updated profile
    ///
    /// # Errors
    /// * `UserNotFound` - User does not exist
    /// * `UsernameExists` - New username belongs to another user
    /// * `Database` - Database operation failed
    async fn update_profile(
        &self,
        user_id: &UserId,
        command: UpdateProfileCommand,
    ) -> Result<UserProfile, AuthError>;

    /// Soft-delete an account and end its sessions.
    ///
    /// # Errors
    /// * `UserNotFound` - User does not exist
    /// * `Database` - Database operation failed
    async fn delete_account(&self, user_id: &UserId) -> Result<(), AuthError>;

    /// List users one page at a time, oldest first.
    ///
    /// # Errors
    /// * `Database` - Database operation failed
    async fn list_users(&self, pagination: Pagination) -> Result<UserPage, AuthError>;

    /// Reactivate an account. Already-active accounts are left untouched.
    ///
    /// # Errors
    /// * `UserNotFound` - User does not exist
    /// * `Database` - Database operation failed
    async fn activate_user(&self, user_id: &UserId) -> Result<UserProfile, AuthError>;

    /// Deactivate an account and end its sessions. Already-inactive accounts
    /// are left untouched.
    ///
    /// # Errors
    /// * `UserNotFound` - User does not exist
    /// * `Database` - Database operation failed
    async fn deactivate_user(&self, user_id: &UserId) -> Result<UserProfile, AuthError>;

    /// Grant a role. Granting a held role again succeeds.
    ///
    /// # Errors
    /// * `UserNotFound` - User does not exist
    /// * `NotFound` - Role does not exist
    /// * `Database` - Database operation failed
    async fn assign_role(&self, command: RoleAssignmentCommand) -> Result<(), AuthError>;

    /// Revoke a role.
    ///
    /// # Errors
    /// * `UserNotFound` - User does not exist
    /// * `NotFound` - Role does not exist or is not held by the user
    /// * `Database` - Database operation failed
    async fn remove_role(&self, command: RoleAssignmentCommand) -> Result<(), AuthError>;

    /// Roles held by a user, ordered by name.
    ///
    /// # Errors
    /// * `UserNotFound` - User does not exist
    /// * `Database` - Database operation failed
    async fn get_user_roles(&self, user_id: &UserId) -> Result<Vec<RoleInfo>, AuthError>;

    /// # Errors
    /// * `RoleExists` - Role name is taken
    /// * `Database` - Database operation failed
    async fn create_role(&self, command: CreateRoleCommand) -> Result<RoleInfo, AuthError>;

    /// # Errors
    /// * `Database` - Database operation failed
    async fn list_roles(&self) -> Result<Vec<RoleInfo>, AuthError>;

    /// # Errors
    /// * `NotFound` - Role does not exist
    /// * `Database` - Database operation failed
    async fn update_role(
        &self,
        role_id: &RoleId,
        command: UpdateRoleCommand,
    ) -> Result<RoleInfo, AuthError>;

    /// Delete a role together with all of its assignments.
    ///
    /// # Errors
    /// * `NotFound` - Role does not exist
    /// * `Database` - Database operation failed
    async fn delete_role(&self, role_id: &RoleId) -> Result<(), AuthError>;
}
