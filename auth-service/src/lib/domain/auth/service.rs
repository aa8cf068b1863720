use std::sync::Arc;

use async_trait::async_trait;
use auth::generate_opaque_token;
use auth::PasswordHasher;
use auth::TokenAuthority;
use chrono::Utc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::AccessTokenResult;
use crate::domain::auth::models::AuthResult;
use crate::domain::auth::models::AuthSettings;
use crate::domain::auth::models::ChangePasswordCommand;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::TokenInfo;
use crate::domain::auth::models::TOKEN_TYPE;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::events::DomainEvent;
use crate::domain::events::EventPublisher;
use crate::domain::role::errors::RoleError;
use crate::domain::role::models::RoleName;
use crate::domain::role::ports::RoleRepository;
use crate::domain::session::errors::SessionError;
use crate::domain::session::models::ClientContext;
use crate::domain::session::models::Session;
use crate::domain::session::models::SessionId;
use crate::domain::session::ports::SessionRepository;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;
use crate::domain::user::ports::UserRepository;

const DUMMY_PASSWORD: &str = "timing-equalization-placeholder";

/// Authentication orchestrator.
///
/// Coordinates the user, role and session stores with the password hasher
/// and token authority. Holds no mutable state between calls.
pub struct AuthService<UR, RR, SR, EP>
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
    token_authority: Arc<TokenAuthority>,
    password_hasher: PasswordHasher,
    settings: AuthSettings,
    dummy_hash: Option<String>,
}

impl<UR, RR, SR, EP> AuthService<UR, RR, SR, EP>
where
    UR: UserRepository,
    RR: RoleRepository,
    SR: SessionRepository,
    EP: EventPublisher,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// Hashes a throw-away password once so that logins for unknown emails
    /// can pay the same verification cost as real ones.
    ///
    /// # Arguments
    /// * `user_repository` - User persistence implementation
    /// * `role_repository` - Role persistence implementation
    /// * `session_repository` - Session persistence implementation
    /// * `event_publisher` - Domain event publishing implementation
    /// * `token_authority` - Access token signer and validator
    /// * `password_hasher` - Configured password hasher
    /// * `settings` - Token lifetimes and account policy
    ///
    /// # Returns
    /// Configured authentication service instance
    pub fn new(
        user_repository: Arc<UR>,
        role_repository: Arc<RR>,
        session_repository: Arc<SR>,
        event_publisher: Arc<EP>,
        token_authority: Arc<TokenAuthority>,
        password_hasher: PasswordHasher,
        settings: AuthSettings,
    ) -> Self {
        let dummy_hash = match password_hasher.hash(DUMMY_PASSWORD) {
            Ok(hash) => Some(hash),
            Err(e) => {
                tracing::warn!("Failed to prepare login timing hash: {}", e);
                None
            }
        };

        Self {
            user_repository,
            role_repository,
            session_repository,
            event_publisher,
            token_authority,
            password_hasher,
            settings,
            dummy_hash,
        }
    }

    async fn hash_password(&self, password: String) -> Result<String, AuthError> {
        let hasher = self.password_hasher.clone();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("Password hashing task failed: {}", e)))?
            .map_err(AuthError::from)
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, AuthError> {
        let hasher = self.password_hasher.clone();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Internal(format!("Password verification task failed: {}", e)))?
            .map_err(AuthError::from)
    }

    async fn burn_dummy_verification(&self, password: String) {
        if let Some(hash) = &self.dummy_hash {
            let _ = self.verify_password(password, hash.clone()).await;
        }
    }

    /// Any lookup failure, including a malformed email, yields `None`.
    async fn find_login_candidate(&self, email: &str) -> Option<User> {
        let email = EmailAddress::new(email.to_string()).ok()?;

        match self.user_repository.find_by_email(&email).await {
            Ok(user) => user,
            Err(e) => {
                tracing::error!("User lookup failed during login: {}", e);
                None
            }
        }
    }

    async fn role_names(&self, user_id: &UserId) -> Result<Vec<String>, RoleError> {
        let roles = self.role_repository.roles_for_user(user_id).await?;

        Ok(roles
            .into_iter()
            .map(|role| role.name.as_str().to_string())
            .collect())
    }

    async fn role_names_or_empty(&self, user_id: &UserId) -> Vec<String> {
        match self.role_names(user_id).await {
            Ok(roles) => roles,
            Err(e) => {
                tracing::warn!(user_id = %user_id, "Failed to resolve roles, continuing without: {}", e);
                Vec::new()
            }
        }
    }

    async fn assign_default_role(&self, user_id: &UserId) {
        let role_name = match RoleName::new(self.settings.default_role.clone()) {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!(user_id = %user_id, "Configured default role is invalid: {}", e);
                return;
            }
        };

        match self.role_repository.find_by_name(&role_name).await {
            Ok(Some(role)) => {
                if let Err(e) = self.role_repository.assign_to_user(user_id, &role.id).await {
                    tracing::warn!(
                        user_id = %user_id,
                        role = %role_name,
                        "Failed to assign default role: {}",
                        e
                    );
                }
            }
            Ok(None) => {
                tracing::warn!(user_id = %user_id, role = %role_name, "Default role does not exist");
            }
            Err(e) => {
                tracing::warn!(
                    user_id = %user_id,
                    role = %role_name,
                    "Failed to look up default role: {}",
                    e
                );
            }
        }
    }

    fn issue_access_token(&self, user: &User, roles: &[String]) -> Result<String, AuthError> {
        self.token_authority
            .issue_access(
                user.id.0,
                user.email.as_str(),
                user.username.as_str(),
                roles,
                self.settings.access_token_ttl,
            )
            .map_err(AuthError::from)
    }

    fn open_session(&self, user_id: UserId, client: &ClientContext) -> Session {
        Session::new(
            user_id,
            generate_opaque_token(),
            client,
            self.settings.refresh_token_ttl,
        )
    }

    fn auth_result(
        &self,
        access_token: String,
        refresh_token: String,
        user: &User,
        roles: Vec<String>,
    ) -> AuthResult {
        AuthResult {
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE,
            expires_in: self.settings.access_token_ttl.num_seconds(),
            user: UserProfile::from(user),
            roles,
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
impl<UR, RR, SR, EP> AuthServicePort for AuthService<UR, RR, SR, EP>
where
    UR: UserRepository,
    RR: RoleRepository,
    SR: SessionRepository,
    EP: EventPublisher,
{
    async fn register(&self, command: RegisterCommand) -> Result<AuthResult, AuthError> {
        let RegisterCommand {
            email,
            username,
            password,
            first_name,
            last_name,
            client,
        } = command;

        if self.user_repository.exists_by_email(&email).await? {
            return Err(AuthError::EmailExists);
        }
        if self.user_repository.exists_by_username(&username).await? {
            return Err(AuthError::UsernameExists);
        }

        let password_hash = self.hash_password(password.into_inner()).await?;
        let user = User::new(email, username, password_hash, first_name, last_name);
        let session = self.open_session(user.id, &client);

        let (user, session) = self
            .user_repository
            .create_with_session(user, session)
            .await
            .map_err(|e| {
                tracing::error!("Failed to persist new account: {}", e);
                AuthError::from(e)
            })?;

        tracing::info!(user_id = %user.id, session_id = %session.id, "User registered");

        self.assign_default_role(&user.id).await;
        let roles = self.role_names_or_empty(&user.id).await;
        let access_token = self.issue_access_token(&user, &roles)?;

        self.publish(DomainEvent::user_registered(&user)).await;

        Ok(self.auth_result(access_token, session.refresh_token, &user, roles))
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthResult, AuthError> {
        let LoginCommand {
            email,
            password,
            client,
        } = command;

        let mut user = match self.find_login_candidate(&email).await {
            Some(user) => user,
            None => {
                self.burn_dummy_verification(password).await;
                return Err(AuthError::InvalidCredentials);
            }
        };

        // Password before account state: only a caller holding the password
        // learns that the account is inactive or unverified.
        if !self
            .verify_password(password, user.password_hash.clone())
            .await?
        {
            tracing::info!(user_id = %user.id, "Login rejected: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AuthError::UserInactive);
        }
        if self.settings.require_verified_email && !user.is_verified {
            return Err(AuthError::UserNotVerified);
        }

        let now = Utc::now();
        match self.user_repository.update_last_login(&user.id, now).await {
            Ok(()) => user.last_login_at = Some(now),
            Err(e) => tracing::warn!(user_id = %user.id, "Failed to record last login: {}", e),
        }

        let roles = self.role_names(&user.id).await.map_err(|e| {
            tracing::error!(user_id = %user.id, "Failed to resolve roles during login: {}", e);
            AuthError::Database(e.to_string())
        })?;

        let access_token = self.issue_access_token(&user, &roles)?;
        let session = self.open_session(user.id, &client);
        let session = self.session_repository.create(session).await.map_err(|e| {
            tracing::error!(user_id = %user.id, "Failed to create session: {}", e);
            AuthError::from(e)
        })?;

        tracing::info!(user_id = %user.id, session_id = %session.id, "User logged in");

        self.publish(DomainEvent::user_logged_in(&user, &session)).await;

        Ok(self.auth_result(access_token, session.refresh_token, &user, roles))
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<AccessTokenResult, AuthError> {
        let session = self
            .session_repository
            .find_by_refresh_token(refresh_token)
            .await?
            .ok_or(AuthError::TokenInvalid)?;

        if !session.is_usable_at(Utc::now()) {
            return Err(AuthError::TokenExpired);
        }

        let user = self
            .user_repository
            .find_by_id(&session.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.is_active {
            return Err(AuthError::UserInactive);
        }

        let roles = self.role_names_or_empty(&user.id).await;
        let access_token = self.issue_access_token(&user, &roles)?;

        tracing::debug!(user_id = %user.id, session_id = %session.id, "Access token refreshed");

        Ok(AccessTokenResult {
            access_token,
            token_type: TOKEN_TYPE,
            expires_in: self.settings.access_token_ttl.num_seconds(),
        })
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        let Some(session) = self
            .session_repository
            .find_by_refresh_token(refresh_token)
            .await?
        else {
            return Ok(());
        };

        match self.session_repository.delete(&session.id).await {
            Ok(()) => {}
            // Lost a race with a concurrent logout or the sweep.
            Err(SessionError::NotFound(_)) => return Ok(()),
            Err(e) => return Err(e.into()),
        }

        tracing::info!(user_id = %session.user_id, session_id = %session.id, "User logged out");

        self.publish(DomainEvent::user_logged_out(&session)).await;

        Ok(())
    }

    async fn logout_all(&self, user_id: &UserId) -> Result<u64, AuthError> {
        let removed = self.session_repository.delete_by_user(user_id).await?;

        tracing::info!(user_id = %user_id, removed, "Ended all sessions");

        Ok(removed)
    }

    async fn verify_token(&self, token: &str) -> Result<TokenInfo, AuthError> {
        self.token_authority
            .validate_access(token)
            .map(TokenInfo::from)
            .map_err(|e| {
                tracing::debug!("Access token rejected: {}", e);
                AuthError::TokenInvalid
            })
    }

    async fn change_password(&self, command: ChangePasswordCommand) -> Result<(), AuthError> {
        let ChangePasswordCommand {
            user_id,
            old_password,
            new_password,
        } = command;

        let mut user = self
            .user_repository
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !self
            .verify_password(old_password, user.password_hash.clone())
            .await?
        {
            return Err(AuthError::InvalidCredentials);
        }

        let new_password = Password::new(new_password)?;
        user.password_hash = self.hash_password(new_password.into_inner()).await?;
        user.updated_at = Utc::now();

        let user = self.user_repository.update(user).await?;

        let removed = self
            .session_repository
            .delete_by_user(&user.id)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %user.id, "Failed to end sessions after password change: {}", e);
                AuthError::Database(e.to_string())
            })?;

        tracing::info!(user_id = %user.id, removed, "Password changed");

        self.publish(DomainEvent::password_changed(&user)).await;

        Ok(())
    }

    async fn active_sessions(&self, user_id: &UserId) -> Result<Vec<Session>, AuthError> {
        Ok(self
            .session_repository
            .find_active_by_user(user_id, Utc::now())
            .await?)
    }

    async fn revoke_session(
        &self,
        user_id: &UserId,
        session_id: &SessionId,
    ) -> Result<(), AuthError> {
        let mut session = self
            .session_repository
            .find_by_id(session_id)
            .await?
            .filter(|session| session.user_id == *user_id)
            .ok_or_else(|| AuthError::NotFound("Session not found".to_string()))?;

        session.revoke();
        let session = self.session_repository.update(session).await?;

        tracing::info!(user_id = %user_id, session_id = %session_id, "Session revoked");

        self.publish(DomainEvent::user_logged_out(&session)).await;

        Ok(())
    }

    async fn purge_expired_sessions(&self) -> Result<u64, AuthError> {
        let removed = self
            .session_repository
            .delete_expired(Utc::now())
            .await?;

        if removed > 0 {
            tracing::info!(removed, "Purged expired sessions");
        }

        Ok(removed)
    }
}
