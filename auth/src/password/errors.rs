use thiserror::Error;

/// Error type for password operations.
///
/// Messages never carry the plaintext password.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format: {0}")]
    InvalidHashFormat(String),

    #[error("Invalid hashing parameters: {0}")]
    InvalidParams(String),
}
