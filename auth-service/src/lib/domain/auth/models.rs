use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::session::models::ClientContext;
use crate::domain::user::models::normalize_name;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;
use crate::domain::user::models::Username;

/// Token type reported alongside every access token.
pub const TOKEN_TYPE: &str = "Bearer";

/// Immutable policy injected into the authentication service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    pub default_role: String,
    pub require_verified_email: bool,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            access_token_ttl: Duration::minutes(15),
            refresh_token_ttl: Duration::hours(168),
            default_role: "user".to_string(),
            require_verified_email: false,
        }
    }
}

/// Command to register a new account.
///
/// Every field is validated on construction, so a built command never
/// needs to touch storage to be rejected.
#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub email: EmailAddress,
    pub username: Username,
    pub password: Password,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub client: ClientContext,
}

impl RegisterCommand {
    /// Validate raw registration input.
    ///
    /// # Arguments
    /// * `email` - Raw email address
    /// * `username` - Raw username
    /// * `password` - Plaintext password
    /// * `first_name` - Optional first name
    /// * `last_name` - Optional last name
    /// * `client` - Caller's client context
    ///
    /// # Errors
    /// * `Validation` - Email, username or names are malformed
    /// * `WeakPassword` - Password fails the strength policy
    pub fn new(
        email: String,
        username: String,
        password: String,
        first_name: Option<String>,
        last_name: Option<String>,
        client: ClientContext,
    ) -> Result<Self, AuthError> {
        Ok(Self {
            email: EmailAddress::new(email)?,
            username: Username::new(username)?,
            password: Password::new(password)?,
            first_name: normalize_name(first_name)?,
            last_name: normalize_name(last_name)?,
            client,
        })
    }
}

/// Command to log in with email and password.
///
/// The email is kept raw: a malformed address must fail exactly like an
/// unknown one.
pub struct LoginCommand {
    pub email: String,
    pub password: String,
    pub client: ClientContext,
}

impl fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCommand")
            .field("email", &self.email)
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

/// Command to replace a user's password.
pub struct ChangePasswordCommand {
    pub user_id: UserId,
    pub old_password: String,
    pub new_password: String,
}

impl fmt::Debug for ChangePasswordCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangePasswordCommand")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

/// Tokens and account projection returned by register and login.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthResult {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: UserProfile,
    pub roles: Vec<String>,
}

impl fmt::Debug for AuthResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResult")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("user", &self.user)
            .field("roles", &self.roles)
            .finish_non_exhaustive()
    }
}

/// Fresh access token minted from a refresh token.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessTokenResult {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

impl fmt::Debug for AccessTokenResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessTokenResult")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

/// Decoded identity of a valid access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenInfo {
    pub user_id: Uuid,
    pub email: String,
    pub username: String,
    pub roles: Vec<String>,
    pub expires_at: DateTime<Utc>,
    pub issued_at: DateTime<Utc>,
}

impl From<auth::AccessClaims> for TokenInfo {
    fn from(claims: auth::AccessClaims) -> Self {
        Self {
            user_id: claims.user_id,
            expires_at: claims.registered.expires_at(),
            issued_at: claims.registered.issued_at(),
            email: claims.email,
            username: claims.username,
            roles: claims.roles,
        }
    }
}
