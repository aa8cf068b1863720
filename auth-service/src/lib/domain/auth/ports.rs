use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::AccessTokenResult;
use crate::domain::auth::models::AuthResult;
use crate::domain::auth::models::ChangePasswordCommand;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::TokenInfo;
use crate::domain::session::models::Session;
use crate::domain::session::models::SessionId;
use crate::domain::user::models::UserId;

/// Port for the authentication orchestrator.
///
/// Dropping a returned future abandons the operation; storage writes that
/// already committed stay committed.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Create an account and its first session.
    ///
    /// # Arguments
    /// * `command` - Validated registration input
    ///
    /// # Returns
    /// Access and refresh tokens plus the public user projection
    ///
    /// # Errors
    /// * `EmailExists` - Email is already registered
    /// * `UsernameExists` - Username is already taken
    /// * `Database` - User or session could not be persisted
    /// * `Internal` - Hashing or signing failed
    async fn register(&self, command: RegisterCommand) -> Result<AuthResult, AuthError>;

    /// Authenticate with email and password and open a session.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `UserInactive` - Correct password, deactivated account
    /// * `UserNotVerified` - Correct password, unverified account, verification required
    /// * `Database` - Role resolution or session persistence failed
    async fn login(&self, command: LoginCommand) -> Result<AuthResult, AuthError>;

    /// Mint a new access token from a refresh token. The refresh token is not rotated.
    ///
    /// # Errors
    /// * `TokenInvalid` - No session holds this refresh token
    /// * `TokenExpired` - Session is revoked or past expiry
    /// * `UserNotFound` - Session owner no longer exists
    /// * `UserInactive` - Session owner is deactivated
    async fn refresh_token(&self, refresh_token: &str) -> Result<AccessTokenResult, AuthError>;

    /// End the session holding `refresh_token`. Unknown tokens succeed.
    ///
    /// # Errors
    /// * `Database` - Session lookup or deletion failed
    async fn logout(&self, refresh_token: &str) -> Result<(), AuthError>;

    /// End every session of a user.
    ///
    /// # Returns
    /// Number of sessions removed
    ///
    /// # Errors
    /// * `Database` - Session deletion failed
    async fn logout_all(&self, user_id: &UserId) -> Result<u64, AuthError>;

    /// Validate an access token.
    ///
    /// # Errors
    /// * `TokenInvalid` - Token is malformed, forged or expired
    async fn verify_token(&self, token: &str) -> Result<TokenInfo, AuthError>;

    /// Replace a password and end every existing session of the user.
    ///
    /// # Errors
    /// * `UserNotFound` - User does not exist
    /// * `InvalidCredentials` - Old password does not match
    /// * `WeakPassword` - New password fails the strength policy
    /// * `Database` - Persisting the hash or ending sessions failed
    async fn change_password(&self, command: ChangePasswordCommand) -> Result<(), AuthError>;

    /// Sessions of a user that are currently usable, newest first.
    ///
    /// # Errors
    /// * `Database` - Session lookup failed
    async fn active_sessions(&self, user_id: &UserId) -> Result<Vec<Session>, AuthError>;

    /// Revoke one session owned by `user_id`.
    ///
    /// # Errors
    /// * `NotFound` - Session does not exist or belongs to another user
    /// * `Database` - Session update failed
    async fn revoke_session(&self, user_id: &UserId, session_id: &SessionId)
        -> Result<(), AuthError>;

    /// Delete every session that has expired.
    ///
    /// # Returns
    /// Number of sessions removed
    ///
    /// # Errors
    /// * `Database` - Session deletion failed
    async fn purge_expired_sessions(&self) -> Result<u64, AuthError>;
}
