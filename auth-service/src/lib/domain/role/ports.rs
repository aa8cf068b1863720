use async_trait::async_trait;

use crate::domain::role::errors::RoleError;
use crate::domain::role::models::Role;
use crate::domain::role::models::RoleId;
use crate::domain::role::models::RoleName;
use crate::domain::user::models::UserId;

/// Persistence operations for roles and user-role assignments.
#[async_trait]
pub trait RoleRepository: Send + Sync + 'static {
    /// Persist a new role.
    ///
    /// # Errors
    /// * `AlreadyExists` - Role name is taken
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, role: Role) -> Result<Role, RoleError>;

    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &RoleId) -> Result<Option<Role>, RoleError>;

    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_name(&self, name: &RoleName) -> Result<Option<Role>, RoleError>;

    /// Retrieve all roles ordered by name.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list(&self) -> Result<Vec<Role>, RoleError>;

    /// # Errors
    /// * `NotFound` - Role does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, role: Role) -> Result<Role, RoleError>;

    /// Delete a role and all of its assignments.
    ///
    /// # Errors
    /// * `NotFound` - Role does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &RoleId) -> Result<(), RoleError>;

    /// Grant a role to a user. Granting a role twice is a no-op.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn assign_to_user(&self, user_id: &UserId, role_id: &RoleId) -> Result<(), RoleError>;

    /// Revoke a role from a user.
    ///
    /// # Errors
    /// * `NotAssigned` - The user does not hold the role
    /// * `DatabaseError` - Database operation failed
    async fn remove_from_user(&self, user_id: &UserId, role_id: &RoleId)
        -> Result<(), RoleError>;

    /// Retrieve the roles held by a user, ordered by name.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn roles_for_user(&self, user_id: &UserId) -> Result<Vec<Role>, RoleError>;
}
