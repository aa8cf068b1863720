use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::events::DomainEvent;
use crate::domain::events::EventPayload;

pub const SCHEMA_VERSION: &str = "1.0";

/// Serializable envelope for every published event.
///
/// Infrastructure representation for event publishing (Kafka, etc.). The
/// type-specific fields sit next to the envelope fields at the top level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventMessage {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    #[serde(flatten)]
    pub data: EventData,
}

/// Type-specific event fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EventData {
    UserRegistered {
        user_id: String,
        email: String,
        username: String,
        first_name: Option<String>,
        last_name: Option<String>,
    },
    UserLoggedIn {
        user_id: String,
        email: String,
        ip_address: String,
        user_agent: String,
    },
    UserLoggedOut {
        user_id: String,
        session_id: String,
    },
    RoleChanged {
        user_id: String,
        role_id: String,
        role_name: String,
    },
    /// Password change, activation, deactivation and deletion.
    AccountChanged {
        user_id: String,
        email: String,
    },
}

impl From<&DomainEvent> for EventMessage {
    fn from(event: &DomainEvent) -> Self {
        Self {
            id: event.event_id.to_string(),
            event_type: event.event_type().to_string(),
            timestamp: event.occurred_at,
            version: SCHEMA_VERSION.to_string(),
            data: EventData::from(&event.payload),
        }
    }
}

impl From<&EventPayload> for EventData {
    fn from(payload: &EventPayload) -> Self {
        match payload {
            EventPayload::UserRegistered {
                user_id,
                email,
                username,
                first_name,
                last_name,
            } => EventData::UserRegistered {
                user_id: user_id.to_string(),
                email: email.clone(),
                username: username.clone(),
                first_name: first_name.clone(),
                last_name: last_name.clone(),
            },
            EventPayload::UserLoggedIn {
                user_id,
                email,
                ip_address,
                user_agent,
            } => EventData::UserLoggedIn {
                user_id: user_id.to_string(),
                email: email.clone(),
                ip_address: ip_address.clone(),
                user_agent: user_agent.clone(),
            },
            EventPayload::UserLoggedOut {
                user_id,
                session_id,
            } => EventData::UserLoggedOut {
                user_id: user_id.to_string(),
                session_id: session_id.to_string(),
            },
            EventPayload::RoleAssigned {
                user_id,
                role_id,
                role_name,
            }
            | EventPayload::RoleRemoved {
                user_id,
                role_id,
                role_name,
            } => EventData::RoleChanged {
                user_id: user_id.to_string(),
                role_id: role_id.to_string(),
                role_name: role_name.clone(),
            },
            EventPayload::PasswordChanged { user_id, email }
            | EventPayload::UserActivated { user_id, email }
            | EventPayload::UserDeactivated { user_id, email }
            | EventPayload::UserDeleted { user_id, email } => EventData::AccountChanged {
                user_id: user_id.to_string(),
                email: email.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::User;
    use crate::domain::user::models::Username;

    fn user() -> User {
        User::new(
            EmailAddress::new("a@x.com".to_string()).unwrap(),
            Username::new("alice".to_string()).unwrap(),
            "hash".to_string(),
            Some("Alice".to_string()),
            None,
        )
    }

    #[test]
    fn test_envelope_fields_are_flat() {
        let user = user();
        let event = DomainEvent::user_registered(&user);
        let json: Value = serde_json::to_value(EventMessage::from(&event)).unwrap();

        assert_eq!(json["id"], event.event_id.to_string());
        assert_eq!(json["type"], "user.registered");
        assert_eq!(json["version"], "1.0");
        assert!(json["timestamp"].is_string());
        assert_eq!(json["user_id"], user.id.to_string());
        assert_eq!(json["username"], "alice");
        assert_eq!(json["first_name"], "Alice");
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_account_events_carry_email() {
        let user = user();
        let json: Value =
            serde_json::to_value(EventMessage::from(&DomainEvent::user_deactivated(&user)))
                .unwrap();

        assert_eq!(json["type"], "user.deactivated");
        assert_eq!(json["email"], "a@x.com");
    }
}
