use std::fmt;
use std::net::IpAddr;
use std::net::Ipv4Addr;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::user::models::UserId;

/// Session unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Where a request came from, as far as the transport can tell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientContext {
    pub ip_address: IpAddr,
    pub user_agent: String,
}

impl ClientContext {
    const UNKNOWN_USER_AGENT: &'static str = "Unknown";

    /// Build a client context from untrusted transport values.
    ///
    /// Missing or unparsable addresses fall back to `127.0.0.1`, missing or
    /// blank user agents to `Unknown`.
    pub fn new(ip_address: Option<&str>, user_agent: Option<&str>) -> Self {
        let ip_address = ip_address
            .and_then(|ip| ip.trim().parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));

        let user_agent = user_agent
            .map(str::trim)
            .filter(|ua| !ua.is_empty())
            .unwrap_or(Self::UNKNOWN_USER_AGENT)
            .to_string();

        Self {
            ip_address,
            user_agent,
        }
    }
}

impl Default for ClientContext {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// A live refresh-token grant bound to a client.
///
/// Usable only while `is_active` and strictly before `expires_at`.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    pub refresh_token: String,
    pub user_agent: String,
    pub ip_address: String,
    pub is_active: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Open a new active session expiring `ttl` from now.
    pub fn new(user_id: UserId, refresh_token: String, client: &ClientContext, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            id: SessionId::new(),
            user_id,
            refresh_token,
            user_agent: client.user_agent.clone(),
            ip_address: client.ip_address.to_string(),
            is_active: true,
            expires_at: now + ttl,
            created_at: now,
            updated_at: now,
        }
    }

    /// A session whose expiry equals `now` is already expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.is_expired_at(now)
    }

    /// Mark the session inactive.
    pub fn revoke(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }
}

// Refresh tokens are credentials; only their length is ever printed.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("refresh_token_len", &self.refresh_token.len())
            .field("user_agent", &self.user_agent)
            .field("ip_address", &self.ip_address)
            .field("is_active", &self.is_active)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Public projection of a session, without the refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    pub id: Uuid,
    pub user_agent: String,
    pub ip_address: String,
    pub is_active: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<&Session> for SessionInfo {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id.0,
            user_agent: session.user_agent.clone(),
            ip_address: session.ip_address.clone(),
            is_active: session.is_active,
            expires_at: session.expires_at,
            created_at: session.created_at,
        }
    }
}
