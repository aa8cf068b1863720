use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::role::errors::RoleError;
use crate::domain::role::models::Role;
use crate::domain::role::models::RoleId;
use crate::domain::role::models::RoleName;
use crate::domain::role::ports::RoleRepository;
use crate::domain::user::models::UserId;

#[derive(FromRow)]
struct RoleRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RoleRow> for Role {
    type Error = RoleError;

    fn try_from(row: RoleRow) -> Result<Self, Self::Error> {
        Ok(Role {
            id: RoleId(row.id),
            name: RoleName::new(row.name)?,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn database_error(e: sqlx::Error) -> RoleError {
    RoleError::DatabaseError(e.to_string())
}

fn into_roles(rows: Vec<RoleRow>) -> Result<Vec<Role>, RoleError> {
    rows.into_iter().map(Role::try_from).collect()
}

pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn create(&self, role: Role) -> Result<Role, RoleError> {
        sqlx::query(
            r#"
            INSERT INTO roles (id, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(role.id.0)
        .bind(role.name.as_str())
        .bind(&role.description)
        .bind(role.created_at)
        .bind(role.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() && db_err.constraint() == Some("roles_name_key") {
                    return RoleError::AlreadyExists(role.name.as_str().to_string());
                }
            }
            database_error(e)
        })?;

        Ok(role)
    }

    async fn find_by_id(&self, id: &RoleId) -> Result<Option<Role>, RoleError> {
        sqlx::query_as::<_, RoleRow>(
            "SELECT id, name, description, created_at, updated_at FROM roles WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?
        .map(Role::try_from)
        .transpose()
    }

    async fn find_by_name(&self, name: &RoleName) -> Result<Option<Role>, RoleError> {
        sqlx::query_as::<_, RoleRow>(
            "SELECT id, name, description, created_at, updated_at FROM roles WHERE name = $1",
        )
        .bind(name.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?
        .map(Role::try_from)
        .transpose()
    }

    async fn list(&self) -> Result<Vec<Role>, RoleError> {
        let rows = sqlx::query_as::<_, RoleRow>(
            "SELECT id, name, description, created_at, updated_at FROM roles ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        into_roles(rows)
    }

    async fn update(&self, role: Role) -> Result<Role, RoleError> {
        let result = sqlx::query(
            "UPDATE roles SET description = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(role.id.0)
        .bind(&role.description)
        .bind(role.updated_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(RoleError::NotFound(role.id.to_string()));
        }

        Ok(role)
    }

    async fn delete(&self, id: &RoleId) -> Result<(), RoleError> {
        // Assignments go with the role through ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(RoleError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn assign_to_user(&self, user_id: &UserId, role_id: &RoleId) -> Result<(), RoleError> {
        sqlx::query(
            r#"
            INSERT INTO user_roles (id, user_id, role_id, created_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (user_id, role_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id.0)
        .bind(role_id.0)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(())
    }

    async fn remove_from_user(
        &self,
        user_id: &UserId,
        role_id: &RoleId,
    ) -> Result<(), RoleError> {
        let result = sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND role_id = $2")
            .bind(user_id.0)
            .bind(role_id.0)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(RoleError::NotAssigned);
        }

        Ok(())
    }

    async fn roles_for_user(&self, user_id: &UserId) -> Result<Vec<Role>, RoleError> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT r.id, r.name, r.description, r.created_at, r.updated_at
            FROM roles r
            INNER JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = $1
            ORDER BY r.name
            "#,
        )
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        into_roles(rows)
    }
}
