use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::Session;
use crate::domain::session::models::SessionId;
use crate::domain::user::models::UserId;

/// Persistence operations for refresh-token sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync + 'static {
    /// Persist a new session.
    ///
    /// # Errors
    /// * `TokenCollision` - Refresh token value already exists
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, session: Session) -> Result<Session, SessionError>;

    /// Retrieve session by identifier.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, SessionError>;

    /// Retrieve session by refresh token value.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<Session>, SessionError>;

    /// Retrieve the sessions of a user that are usable at `now`, newest first.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_active_by_user(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<Session>, SessionError>;

    /// Update an existing session.
    ///
    /// # Errors
    /// * `NotFound` - Session does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, session: Session) -> Result<Session, SessionError>;

    /// Delete a session.
    ///
    /// # Errors
    /// * `NotFound` - Session does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &SessionId) -> Result<(), SessionError>;

    /// Delete every session of a user.
    ///
    /// # Returns
    /// Number of deleted sessions
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn delete_by_user(&self, user_id: &UserId) -> Result<u64, SessionError>;

    /// Delete every session with `expires_at <= now`.
    ///
    /// # Returns
    /// Number of deleted sessions
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, SessionError>;
}
