use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::role::errors::RoleNameError;

/// Named permission group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: RoleId,
    pub name: RoleName,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    pub fn new(name: RoleName, description: Option<String>) -> Self {
        let now = Utc::now();

        Self {
            id: RoleId::new(),
            name,
            description,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Role unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoleId(pub Uuid);

impl RoleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RoleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Role name value type: 2-50 lowercase ASCII letters, digits or underscores.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoleName(String);

impl RoleName {
    const MIN_LENGTH: usize = 2;
    const MAX_LENGTH: usize = 50;

    /// # Errors
    /// * `InvalidLength` - Outside 2-50 characters after trimming
    /// * `InvalidCharacters` - Anything other than lowercase letters, digits and `_`
    pub fn new(name: String) -> Result<Self, RoleNameError> {
        let name = name.trim().to_lowercase();

        if name.len() < Self::MIN_LENGTH || name.len() > Self::MAX_LENGTH {
            return Err(RoleNameError::InvalidLength {
                min: Self::MIN_LENGTH,
                max: Self::MAX_LENGTH,
            });
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(RoleNameError::InvalidCharacters);
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Public projection of a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleInfo {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Role> for RoleInfo {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id.0,
            name: role.name.as_str().to_string(),
            description: role.description.clone(),
            created_at: role.created_at,
            updated_at: role.updated_at,
        }
    }
}

/// Command to create a role
#[derive(Debug)]
pub struct CreateRoleCommand {
    pub name: RoleName,
    pub description: Option<String>,
}
