use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::Session;
use crate::domain::session::models::SessionId;
use crate::domain::session::ports::SessionRepository;
use crate::domain::user::models::UserId;

const SESSION_COLUMNS: &str = r#"
    id, user_id, refresh_token, user_agent, ip_address, is_active,
    expires_at, created_at, updated_at
"#;

#[derive(FromRow)]
struct SessionRow {
    id: Uuid,
    user_id: Uuid,
    refresh_token: String,
    user_agent: String,
    ip_address: String,
    is_active: bool,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            id: SessionId(row.id),
            user_id: UserId(row.user_id),
            refresh_token: row.refresh_token,
            user_agent: row.user_agent,
            ip_address: row.ip_address,
            is_active: row.is_active,
            expires_at: row.expires_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn database_error(e: sqlx::Error) -> SessionError {
    SessionError::DatabaseError(e.to_string())
}

/// Insert a session row through any executor, so account creation can do it
/// inside its transaction.
pub(crate) async fn insert_session<'e, E>(executor: E, session: &Session) -> Result<(), SessionError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO sessions (
            id, user_id, refresh_token, user_agent, ip_address, is_active,
            expires_at, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(session.id.0)
    .bind(session.user_id.0)
    .bind(&session.refresh_token)
    .bind(&session.user_agent)
    .bind(&session.ip_address)
    .bind(session.is_active)
    .bind(session.expires_at)
    .bind(session.created_at)
    .bind(session.updated_at)
    .execute(executor)
    .await
    .map_err(|e| {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation()
                && db_err.constraint() == Some("sessions_refresh_token_key")
            {
                return SessionError::TokenCollision;
            }
        }
        database_error(e)
    })?;

    Ok(())
}

pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn create(&self, session: Session) -> Result<Session, SessionError> {
        insert_session(&self.pool, &session).await?;

        tracing::debug!(
            session_id = %session.id,
            user_id = %session.user_id,
            refresh_token_len = session.refresh_token.len(),
            "Session stored"
        );

        Ok(session)
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, SessionError> {
        let sql = format!("SELECT {} FROM sessions WHERE id = $1", SESSION_COLUMNS);

        let row = sqlx::query_as::<_, SessionRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(row.map(Session::from))
    }

    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<Session>, SessionError> {
        let sql = format!(
            "SELECT {} FROM sessions WHERE refresh_token = $1",
            SESSION_COLUMNS
        );

        let row = sqlx::query_as::<_, SessionRow>(&sql)
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(row.map(Session::from))
    }

    async fn find_active_by_user(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<Session>, SessionError> {
        let sql = format!(
            "SELECT {} FROM sessions \
             WHERE user_id = $1 AND is_active = TRUE AND expires_at > $2 \
             ORDER BY created_at DESC",
            SESSION_COLUMNS
        );

        let rows = sqlx::query_as::<_, SessionRow>(&sql)
            .bind(user_id.0)
            .bind(now)
            .fetch_all(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(rows.into_iter().map(Session::from).collect())
    }

    async fn update(&self, session: Session) -> Result<Session, SessionError> {
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET user_agent = $2, ip_address = $3, is_active = $4, expires_at = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(session.id.0)
        .bind(&session.user_agent)
        .bind(&session.ip_address)
        .bind(session.is_active)
        .bind(session.expires_at)
        .bind(session.updated_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(SessionError::NotFound(session.id.to_string()));
        }

        Ok(session)
    }

    async fn delete(&self, id: &SessionId) -> Result<(), SessionError> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(SessionError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn delete_by_user(&self, user_id: &UserId) -> Result<u64, SessionError> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id.0)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(result.rows_affected())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, SessionError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(result.rows_affected())
    }
}
