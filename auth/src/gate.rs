use std::sync::Arc;

use uuid::Uuid;

use crate::jwt::extract_bearer_token;
use crate::jwt::AccessClaims;
use crate::jwt::JwtError;
use crate::jwt::TokenAuthority;

/// Identity of an authenticated caller, derived from a valid access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: String,
    pub username: String,
    pub roles: Vec<String>,
}

impl AuthContext {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.has_role(role))
    }
}

impl From<AccessClaims> for AuthContext {
    fn from(claims: AccessClaims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
            username: claims.username,
            roles: claims.roles,
        }
    }
}

/// Authorization failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    #[error("Authorization header is required")]
    MissingToken,

    #[error("Authorization header must be 'Bearer <token>'")]
    InvalidTokenFormat,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Insufficient permissions")]
    InsufficientPermissions,
}

impl GateError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            GateError::MissingToken => "MISSING_TOKEN",
            GateError::InvalidTokenFormat => "INVALID_TOKEN_FORMAT",
            GateError::InvalidToken => "INVALID_TOKEN",
            GateError::InsufficientPermissions => "INSUFFICIENT_PERMISSIONS",
        }
    }
}

impl From<JwtError> for GateError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::MalformedHeader => GateError::InvalidTokenFormat,
            _ => GateError::InvalidToken,
        }
    }
}

/// Request-level authorization built on top of [`TokenAuthority`].
///
/// Transport adapters hand it the raw `Authorization` header value and get
/// back an [`AuthContext`] or a [`GateError`].
#[derive(Clone)]
pub struct AuthorizationGate {
    authority: Arc<TokenAuthority>,
}

impl AuthorizationGate {
    pub fn new(authority: Arc<TokenAuthority>) -> Self {
        Self { authority }
    }

    /// Authenticate a request from its `Authorization` header.
    ///
    /// # Errors
    /// * `MissingToken` - No header was supplied
    /// * `InvalidTokenFormat` - Header is not `Bearer <token>`
    /// * `InvalidToken` - Token failed validation or has expired
    pub fn authenticate(&self, header: Option<&str>) -> Result<AuthContext, GateError> {
        let header = header.ok_or(GateError::MissingToken)?;
        let token = extract_bearer_token(header)?;
        let claims = self.authority.validate_access(token)?;

        Ok(claims.into())
    }

    /// Authenticate when a header is present, otherwise continue anonymously.
    ///
    /// Any failure, including a malformed or expired token, yields `None`.
    pub fn authenticate_optional(&self, header: Option<&str>) -> Option<AuthContext> {
        header?;
        self.authenticate(header).ok()
    }

    /// Authenticate and require `role`.
    ///
    /// # Errors
    /// * `InsufficientPermissions` - Caller lacks the role
    /// * Any error from [`AuthorizationGate::authenticate`]
    pub fn require_role(&self, header: Option<&str>, role: &str) -> Result<AuthContext, GateError> {
        let context = self.authenticate(header)?;

        if !context.has_role(role) {
            return Err(GateError::InsufficientPermissions);
        }

        Ok(context)
    }

    /// Authenticate and require at least one of `roles`.
    ///
    /// # Errors
    /// * `InsufficientPermissions` - Caller holds none of the roles
    /// * Any error from [`AuthorizationGate::authenticate`]
    pub fn require_any_role(
        &self,
        header: Option<&str>,
        roles: &[&str],
    ) -> Result<AuthContext, GateError> {
        let context = self.authenticate(header)?;

        if !context.has_any_role(roles) {
            return Err(GateError::InsufficientPermissions);
        }

        Ok(context)
    }
}
