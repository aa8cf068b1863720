use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::account::models::RoleAssignmentCommand;
use crate::domain::account::models::UpdateProfileCommand;
use crate::domain::account::models::UpdateRoleCommand;
use crate::domain::account::ports::UserServicePort;
use crate::domain::auth::errors::AuthError;
use crate::domain::events::DomainEvent;
use crate::domain::events::EventPublisher;
use crate::domain::role::models::CreateRoleCommand;
use crate::domain::role::models::Role;
use crate::domain::role::models::RoleId;
use crate::domain::role::models::RoleInfo;
use crate::domain::role::ports::RoleRepository;
use crate::domain::session::ports::SessionRepository;
use crate::domain::user::models::Pagination;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserPage;
use crate::domain::user::models::UserProfile;
use crate::domain::user::ports::UserRepository;

/// Domain service implementation for account administration.
pub struct UserService<UR, RR, SR, EP>
where
    UR: UserRepository,
    RR: RoleRepository,
    SR: SessionRepository,
    EP: EventPublisher,
{
    user_repository: Arc<UR>,
    role_repository: Arc<RR>,
    session_repository: Arc<SR>,
    event_publisher: Arc<EP>,
}

impl<UR, RR, SR, EP> UserService<UR, RR, SR, EP>
where
    UR: UserRepository,
    RR: RoleRepository,
    SR: SessionRepository,
    EP: EventPublisher,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `user_repository` - User persistence implementation
    /// * `role_repository` - Role persistence implementation
    /// * `session_repository` - Session persistence implementation
    /// * `event_publisher` - Domain event publishing implementation
    pub fn new(
        user_repository: Arc<UR>,
        role_repository: Arc<RR>,
        session_repository: Arc<SR>,
        event_publisher: Arc<EP>,
    ) -> Self {
        Self {
            user_repository,
            role_repository,
            session_repository,
            event_publisher,
        }
    }

    async fn find_user(&self, user_id: &UserId) -> Result<User, AuthError> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    async fn find_role(&self, role_id: &RoleId) -> Result<Role, AuthError> {
        self.role_repository
            .find_by_id(role_id)
            .await?
            .ok_or_else(|| AuthError::NotFound("Role not found".to_string()))
    }

    async fn end_sessions(&self, user_id: &UserId) {
        if let Err(e) = self.session_repository.delete_by_user(user_id).await {
            tracing::warn!(user_id = %user_id, "Failed to end sessions: {}", e);
        }
    }

    async fn publish(&self, event: DomainEvent) {
        if let Err(e) = self.event_publisher.publish(&event).await {
            tracing::warn!(
                event_type = event.event_type(),
                user_id = %event.user_id(),
                "Failed to publish event: {}",
                e
            );
        }
    }
}

#[async_trait]
impl<UR, RR, SR, EP> UserServicePort for UserService<UR, RR, SR, EP>
where
    UR: UserRepository,
    RR: RoleRepository,
    SR: SessionRepository,
    EP: EventPublisher,
{
    async fn get_profile(&self, user_id: &UserId) -> Result<UserProfile, AuthError> {
        let user = self.find_user(user_id).await?;
        Ok(UserProfile::from(&user))
    }

    async fn update_profile(
        &self,
        user_id: &UserId,
        command: UpdateProfileCommand,
    ) -> Result<UserProfile, AuthError> {
        let mut user = self.find_user(user_id).await?;

        if command.is_empty() {
            return Ok(UserProfile::from(&user));
        }

        if let Some(username) = command.username {
            if username != user.username {
                let taken = self
                    .user_repository
                    .find_by_username(&username)
                    .await?
                    .is_some_and(|other| other.id != user.id);
                if taken {
                    return Err(AuthError::UsernameExists);
                }
                user.username = username;
            }
        }
        if let Some(first_name) = command.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = command.last_name {
            user.last_name = last_name;
        }
        user.updated_at = Utc::now();

        let user = self.user_repository.update(user).await?;

        tracing::info!(user_id = %user.id, "Profile updated");

        Ok(UserProfile::from(&user))
    }

    async fn delete_account(&self, user_id: &UserId) -> Result<(), AuthError> {
        let user = self.find_user(user_id).await?;

        self.user_repository.delete(&user.id).await?;
        self.end_sessions(&user.id).await;

        tracing::info!(user_id = %user.id, "Account deleted");

        self.publish(DomainEvent::user_deleted(&user)).await;

        Ok(())
    }

    async fn list_users(&self, pagination: Pagination) -> Result<UserPage, AuthError> {
        let users = self.user_repository.list(&pagination).await?;
        let total = self.user_repository.count().await?;

        let profiles = users.iter().map(UserProfile::from).collect();

        Ok(UserPage::new(profiles, total, pagination))
    }

    async fn activate_user(&self, user_id: &UserId) -> Result<UserProfile, AuthError> {
        let mut user = self.find_user(user_id).await?;

        if user.is_active {
            return Ok(UserProfile::from(&user));
        }

        user.is_active = true;
        user.updated_at = Utc::now();
        let user = self.user_repository.update(user).await?;

        tracing::info!(user_id = %user.id, "User activated");

        self.publish(DomainEvent::user_activated(&user)).await;

        Ok(UserProfile::from(&user))
    }

    async fn deactivate_user(&self, user_id: &UserId) -> Result<UserProfile, AuthError> {
        let mut user = self.find_user(user_id).await?;

        if !user.is_active {
            return Ok(UserProfile::from(&user));
        }

        user.is_active = false;
        user.updated_at = Utc::now();
        let user = self.user_repository.update(user).await?;
        self.end_sessions(&user.id).await;

        tracing::info!(user_id = %user.id, "User deactivated");

        self.publish(DomainEvent::user_deactivated(&user)).await;

        Ok(UserProfile::from(&user))
    }

    async fn assign_role(&self, command: RoleAssignmentCommand) -> Result<(), AuthError> {
        let user = self.find_user(&command.user_id).await?;
        let role = self.find_role(&command.role_id).await?;

        self.role_repository
            .assign_to_user(&user.id, &role.id)
            .await?;

        tracing::info!(user_id = %user.id, role = %role.name, "Role assigned");

        self.publish(DomainEvent::role_assigned(user.id, &role)).await;

        Ok(())
    }

    async fn remove_role(&self, command: RoleAssignmentCommand) -> Result<(), AuthError> {
        let user = self.find_user(&command.user_id).await?;
        let role = self.find_role(&command.role_id).await?;

        self.role_repository
            .remove_from_user(&user.id, &role.id)
            .await?;

        tracing::info!(user_id = %user.id, role = %role.name, "Role removed");

        self.publish(DomainEvent::role_removed(user.id, &role)).await;

        Ok(())
    }

    async fn get_user_roles(&self, user_id: &UserId) -> Result<Vec<RoleInfo>, AuthError> {
        let user = self.find_user(user_id).await?;
        let roles = self.role_repository.roles_for_user(&user.id).await?;

        Ok(roles.iter().map(RoleInfo::from).collect())
    }

    async fn create_role(&self, command: CreateRoleCommand) -> Result<RoleInfo, AuthError> {
        if self
            .role_repository
            .find_by_name(&command.name)
            .await?
            .is_some()
        {
            return Err(AuthError::RoleExists);
        }

        let role = self
            .role_repository
            .create(Role::new(command.name, command.description))
            .await?;

        tracing::info!(role = %role.name, "Role created");

        Ok(RoleInfo::from(&role))
    }

    async fn list_roles(&self) -> Result<Vec<RoleInfo>, AuthError> {
        let roles = self.role_repository.list().await?;
        Ok(roles.iter().map(RoleInfo::from).collect())
    }

    async fn update_role(
        &self,
        role_id: &RoleId,
        command: UpdateRoleCommand,
    ) -> Result<RoleInfo, AuthError> {
        let mut role = self.find_role(role_id).await?;

        role.description = command.description;
        role.updated_at = Utc::now();
        let role = self.role_repository.update(role).await?;

        Ok(RoleInfo::from(&role))
    }

    async fn delete_role(&self, role_id: &RoleId) -> Result<(), AuthError> {
        self.role_repository.delete(role_id).await?;

        tracing::info!(role_id = %role_id, "Role deleted");

        Ok(())
    }
}
