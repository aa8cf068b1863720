use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::errors::EventPublisherError;
use crate::domain::role::models::Role;
use crate::domain::session::models::Session;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Notification emitted after a state change.
///
/// Consumers are external; delivery is best-effort.
#[derive(Debug, Clone)]
pub struct DomainEvent {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub payload: EventPayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventPayload {
    UserRegistered {
        user_id: UserId,
        email: String,
        username: String,
        first_name: Option<String>,
        last_name: Option<String>,
    },
    UserLoggedIn {
        user_id: UserId,
        email: String,
        ip_address: String,
        user_agent: String,
    },
    UserLoggedOut {
        user_id: UserId,
        session_id: Uuid,
    },
    PasswordChanged {
        user_id: UserId,
        email: String,
    },
    UserActivated {
        user_id: UserId,
        email: String,
    },
    UserDeactivated {
        user_id: UserId,
        email: String,
    },
    UserDeleted {
        user_id: UserId,
        email: String,
    },
    RoleAssigned {
        user_id: UserId,
        role_id: Uuid,
        role_name: String,
    },
    RoleRemoved {
        user_id: UserId,
        role_id: Uuid,
        role_name: String,
    },
}

impl DomainEvent {
    pub fn new(payload: EventPayload) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            payload,
        }
    }

    pub fn user_registered(user: &User) -> Self {
        Self::new(EventPayload::UserRegistered {
            user_id: user.id,
            email: user.email.as_str().to_string(),
            username: user.username.as_str().to_string(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        })
    }

    pub fn user_logged_in(user: &User, session: &Session) -> Self {
        Self::new(EventPayload::UserLoggedIn {
            user_id: user.id,
            email: user.email.as_str().to_string(),
            ip_address: session.ip_address.clone(),
            user_agent: session.user_agent.clone(),
        })
    }

    pub fn user_logged_out(session: &Session) -> Self {
        Self::new(EventPayload::UserLoggedOut {
            user_id: session.user_id,
            session_id: session.id.0,
        })
    }

    pub fn password_changed(user: &User) -> Self {
        Self::new(EventPayload::PasswordChanged {
            user_id: user.id,
            email: user.email.as_str().to_string(),
        })
    }

    pub fn user_activated(user: &User) -> Self {
        Self::new(EventPayload::UserActivated {
            user_id: user.id,
            email: user.email.as_str().to_string(),
        })
    }

    pub fn user_deactivated(user: &User) -> Self {
        Self::new(EventPayload::UserDeactivated {
            user_id: user.id,
            email: user.email.as_str().to_string(),
        })
    }

    pub fn user_deleted(user: &User) -> Self {
        Self::new(EventPayload::UserDeleted {
            user_id: user.id,
            email: user.email.as_str().to_string(),
        })
    }

    pub fn role_assigned(user_id: UserId, role: &Role) -> Self {
        Self::new(EventPayload::RoleAssigned {
            user_id,
            role_id: role.id.0,
            role_name: role.name.as_str().to_string(),
        })
    }

    pub fn role_removed(user_id: UserId, role: &Role) -> Self {
        Self::new(EventPayload::RoleRemoved {
            user_id,
            role_id: role.id.0,
            role_name: role.name.as_str().to_string(),
        })
    }

    /// Event type name, also used as the topic.
    pub fn event_type(&self) -> &'static str {
        match self.payload {
            EventPayload::UserRegistered { .. } => "user.registered",
            EventPayload::UserLoggedIn { .. } => "user.logged_in",
            EventPayload::UserLoggedOut { .. } => "user.logged_out",
            EventPayload::PasswordChanged { .. } => "user.password_changed",
            EventPayload::UserActivated { .. } => "user.activated",
            EventPayload::UserDeactivated { .. } => "user.deactivated",
            EventPayload::UserDeleted { .. } => "user.deleted",
            EventPayload::RoleAssigned { .. } => "user.role_assigned",
            EventPayload::RoleRemoved { .. } => "user.role_removed",
        }
    }

    /// The user this event relates to.
    pub fn user_id(&self) -> UserId {
        match &self.payload {
            EventPayload::UserRegistered { user_id, .. }
            | EventPayload::UserLoggedIn { user_id, .. }
            | EventPayload::UserLoggedOut { user_id, .. }
            | EventPayload::PasswordChanged { user_id, .. }
            | EventPayload::UserActivated { user_id, .. }
            | EventPayload::UserDeactivated { user_id, .. }
            | EventPayload::UserDeleted { user_id, .. }
            | EventPayload::RoleAssigned { user_id, .. }
            | EventPayload::RoleRemoved { user_id, .. } => *user_id,
        }
    }
}

/// Event publishing for domain events.
#[async_trait]
pub trait EventPublisher: Send + Sync + 'static {
    /// Publish a domain event.
    ///
    /// # Arguments
    /// * `event` - Event to publish
    ///
    /// # Returns
    /// Unit on success
    ///
    /// # Errors
    /// * `SerializationFailed` - Event serialization failed
    /// * `PublishFailed` - Failed to publish to broker
    /// * `Timeout` - Publishing timed out
    async fn publish(&self, event: &DomainEvent) -> Result<(), EventPublisherError>;
}
