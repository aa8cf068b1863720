use thiserror::Error;

/// Error for session persistence operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Refresh token already exists")]
    TokenCollision,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
