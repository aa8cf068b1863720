use thiserror::Error;

use crate::domain::role::errors::RoleError;
use crate::domain::role::errors::RoleNameError;
use crate::domain::session::errors::SessionError;
use crate::domain::user::errors::EmailError;
use crate::domain::user::errors::NameError;
use crate::domain::user::errors::PasswordPolicyError;
use crate::domain::user::errors::UserError;
use crate::domain::user::errors::UserIdError;
use crate::domain::user::errors::UsernameError;

/// Failure taxonomy shared by the authentication and account services.
///
/// Every variant maps to a stable machine-readable code. `Database` and
/// `Internal` carry the underlying cause for logging only; callers see
/// [`AuthError::public_message`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Password does not meet strength requirements: {0}")]
    WeakPassword(#[from] PasswordPolicyError),

    #[error("Email is already registered")]
    EmailExists,

    #[error("Username is already taken")]
    UsernameExists,

    #[error("Role already exists")]
    RoleExists,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Token is invalid")]
    TokenInvalid,

    #[error("Token has expired")]
    TokenExpired,

    #[error("User account is inactive")]
    UserInactive,

    #[error("User account is not verified")]
    UserNotVerified,

    #[error("Access denied")]
    Forbidden,

    #[error("User not found")]
    UserNotFound,

    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "VALIDATION_ERROR",
            AuthError::WeakPassword(_) => "WEAK_PASSWORD",
            AuthError::EmailExists => "EMAIL_EXISTS",
            AuthError::UsernameExists => "USERNAME_EXISTS",
            AuthError::RoleExists => "ALREADY_EXISTS",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::TokenInvalid => "TOKEN_INVALID",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::UserInactive => "USER_INACTIVE",
            AuthError::UserNotVerified => "USER_NOT_VERIFIED",
            AuthError::Forbidden => "FORBIDDEN",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::NotFound(_) => "NOT_FOUND",
            AuthError::Database(_) => "DATABASE_ERROR",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to return to callers. Infrastructure causes are hidden.
    pub fn public_message(&self) -> String {
        match self {
            AuthError::Database(_) | AuthError::Internal(_) => {
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        }
    }

    /// True for failures caused by infrastructure rather than the request.
    pub fn is_internal(&self) -> bool {
        matches!(self, AuthError::Database(_) | AuthError::Internal(_))
    }
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidUserId(e) => AuthError::Validation(e.to_string()),
            UserError::InvalidUsername(e) => AuthError::Validation(e.to_string()),
            UserError::InvalidEmail(e) => AuthError::Validation(e.to_string()),
            UserError::NotFound(_) => AuthError::UserNotFound,
            UserError::UsernameAlreadyExists(_) => AuthError::UsernameExists,
            UserError::EmailAlreadyExists(_) => AuthError::EmailExists,
            UserError::Session(e) => AuthError::from(e),
            UserError::DatabaseError(msg) => AuthError::Database(msg),
        }
    }
}

impl From<SessionError> for AuthError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(_) => AuthError::NotFound("Session not found".to_string()),
            SessionError::TokenCollision => {
                AuthError::Database("refresh token collision".to_string())
            }
            SessionError::DatabaseError(msg) => AuthError::Database(msg),
        }
    }
}

impl From<RoleError> for AuthError {
    fn from(err: RoleError) -> Self {
        match err {
            RoleError::InvalidName(e) => AuthError::Validation(e.to_string()),
            RoleError::NotFound(_) => AuthError::NotFound("Role not found".to_string()),
            RoleError::AlreadyExists(_) => AuthError::RoleExists,
            RoleError::NotAssigned => {
                AuthError::NotFound("Role is not assigned to user".to_string())
            }
            RoleError::DatabaseError(msg) => AuthError::Database(msg),
        }
    }
}

impl From<auth::PasswordError> for AuthError {
    fn from(err: auth::PasswordError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<auth::JwtError> for AuthError {
    fn from(err: auth::JwtError) -> Self {
        match err {
            auth::JwtError::TokenExpired => AuthError::TokenExpired,
            auth::JwtError::InvalidToken(_) | auth::JwtError::MalformedHeader => {
                AuthError::TokenInvalid
            }
            auth::JwtError::EncodingFailed(msg) => AuthError::Internal(msg),
        }
    }
}

impl From<UserIdError> for AuthError {
    fn from(err: UserIdError) -> Self {
        AuthError::Validation(err.to_string())
    }
}

impl From<UsernameError> for AuthError {
    fn from(err: UsernameError) -> Self {
        AuthError::Validation(err.to_string())
    }
}

impl From<EmailError> for AuthError {
    fn from(err: EmailError) -> Self {
        AuthError::Validation(err.to_string())
    }
}

impl From<NameError> for AuthError {
    fn from(err: NameError) -> Self {
        AuthError::Validation(err.to_string())
    }
}

impl From<RoleNameError> for AuthError {
    fn from(err: RoleNameError) -> Self {
        AuthError::Validation(err.to_string())
    }
}
