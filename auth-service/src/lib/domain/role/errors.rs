use thiserror::Error;

/// Error for RoleName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleNameError {
    #[error("Role name must be between {min} and {max} characters")]
    InvalidLength { min: usize, max: usize },

    #[error("Role name may only contain lowercase letters, digits, and underscore")]
    InvalidCharacters,
}

/// Top-level error for role operations
#[derive(Debug, Clone, Error)]
pub enum RoleError {
    #[error("Invalid role name: {0}")]
    InvalidName(#[from] RoleNameError),

    #[error("Role not found: {0}")]
    NotFound(String),

    #[error("Role already exists: {0}")]
    AlreadyExists(String),

    #[error("Role is not assigned to user")]
    NotAssigned,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
