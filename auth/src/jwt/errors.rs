use thiserror::Error;

/// Error type for JWT operations.
///
/// Expiry is reported separately from every other validation failure so
/// callers can choose between a silent refresh and a forced re-login.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token is invalid: {0}")]
    InvalidToken(String),

    #[error("Invalid authorization header format. Expected: Bearer <token>")]
    MalformedHeader,
}
