use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::session::models::Session;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Pagination;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::outbound::repositories::session::insert_session;

const USER_COLUMNS: &str = r#"
    id, email, username, password_hash, first_name, last_name, is_active,
    is_verified, last_login_at, created_at, updated_at, deleted_at
"#;

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    username: String,
    password_hash: String,
    first_name: Option<String>,
    last_name: Option<String>,
    is_active: bool,
    is_verified: bool,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(row.id),
            email: EmailAddress::new(row.email)?,
            username: Username::new(row.username)?,
            password_hash: row.password_hash,
            first_name: row.first_name,
            last_name: row.last_name,
            is_active: row.is_active,
            is_verified: row.is_verified,
            last_login_at: row.last_login_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        })
    }
}

/// Map unique violations on the partial email/username indexes.
fn map_write_error(e: sqlx::Error, user: &User) -> UserError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            if db_err.constraint() == Some("users_username_key") {
                return UserError::UsernameAlreadyExists(user.username.as_str().to_string());
            }
            if db_err.constraint() == Some("users_email_key") {
                return UserError::EmailAlreadyExists(user.email.as_str().to_string());
            }
        }
    }
    UserError::DatabaseError(e.to_string())
}

fn database_error(e: sqlx::Error) -> UserError {
    UserError::DatabaseError(e.to_string())
}

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_optional(
        &self,
        query: sqlx::query::QueryAs<'_, sqlx::Postgres, UserRow, sqlx::postgres::PgArguments>,
    ) -> Result<Option<User>, UserError> {
        query
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?
            .map(User::try_from)
            .transpose()
    }
}

fn select_user_where(predicate: &str) -> String {
    format!(
        "SELECT {} FROM users WHERE {} AND deleted_at IS NULL",
        USER_COLUMNS, predicate
    )
}

async fn insert_user<'e, E>(executor: E, user: &User) -> Result<(), UserError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO users (
            id, email, username, password_hash, first_name, last_name,
            is_active, is_verified, last_login_at, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(user.id.0)
    .bind(user.email.as_str())
    .bind(user.username.as_str())
    .bind(&user.password_hash)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(user.is_active)
    .bind(user.is_verified)
    .bind(user.last_login_at)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(executor)
    .await
    .map_err(|e| map_write_error(e, user))?;

    Ok(())
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create_with_session(
        &self,
        user: User,
        session: Session,
    ) -> Result<(User, Session), UserError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        insert_user(&mut *tx, &user).await?;
        insert_session(&mut *tx, &session).await?;

        tx.commit().await.map_err(database_error)?;

        Ok((user, session))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let sql = select_user_where("id = $1");
        self.fetch_optional(sqlx::query_as(&sql).bind(id.0)).await
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let sql = select_user_where("email = $1");
        self.fetch_optional(sqlx::query_as(&sql).bind(email.as_str()))
            .await
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let sql = select_user_where("username = $1");
        self.fetch_optional(sqlx::query_as(&sql).bind(username.as_str()))
            .await
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, UserError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND deleted_at IS NULL)",
        )
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)
    }

    async fn exists_by_username(&self, username: &Username) -> Result<bool, UserError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 AND deleted_at IS NULL)",
        )
        .bind(username.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)
    }

    async fn list(&self, pagination: &Pagination) -> Result<Vec<User>, UserError> {
        let sql = format!(
            "SELECT {} FROM users WHERE deleted_at IS NULL \
             ORDER BY created_at ASC, id ASC LIMIT $1 OFFSET $2",
            USER_COLUMNS
        );

        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(database_error)?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn count(&self) -> Result<u64, UserError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE deleted_at IS NULL",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET email = $2, username = $3, password_hash = $4, first_name = $5,
                last_name = $6, is_active = $7, is_verified = $8, updated_at = $9
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(user.id.0)
        .bind(user.email.as_str())
        .bind(user.username.as_str())
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.is_active)
        .bind(user.is_verified)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &user))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(user.id.to_string()));
        }

        Ok(user)
    }

    async fn update_last_login(&self, id: &UserId, at: DateTime<Utc>) -> Result<(), UserError> {
        let result = sqlx::query(
            "UPDATE users SET last_login_at = $2 WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id.0)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET deleted_at = NOW(), updated_at = NOW(), is_active = FALSE
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
