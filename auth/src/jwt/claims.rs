use chrono::DateTime;
use chrono::Duration;
use chrono::TimeZone;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Registered (RFC 7519) claims shared by access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisteredClaims {
    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Subject (user identifier)
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp), equal to `iat`
    pub nbf: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// JWT ID (unique token identifier)
    pub jti: String,
}

impl RegisteredClaims {
    /// Create registered claims starting now and expiring after `ttl`.
    ///
    /// # Arguments
    /// * `subject` - Subject identifier
    /// * `issuer` - Token issuer
    /// * `audience` - Intended audience
    /// * `ttl` - Lifetime of the token
    ///
    /// # Returns
    /// Claims with a random `jti` and `nbf == iat`
    pub fn new(subject: impl ToString, issuer: &str, audience: &str, ttl: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + ttl;

        Self {
            iss: issuer.to_string(),
            aud: audience.to_string(),
            sub: subject.to_string(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Check if token is expired.
    ///
    /// A token whose expiry equals the current second is expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0).single().unwrap_or_default()
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.iat, 0).single().unwrap_or_default()
    }
}

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    pub user_id: Uuid,
    pub email: String,
    pub username: String,
    pub roles: Vec<String>,

    #[serde(flatten)]
    pub registered: RegisteredClaims,
}

impl AccessClaims {
    pub fn new(
        user_id: Uuid,
        email: &str,
        username: &str,
        roles: &[String],
        registered: RegisteredClaims,
    ) -> Self {
        Self {
            user_id,
            email: email.to_string(),
            username: username.to_string(),
            roles: roles.to_vec(),
            registered,
        }
    }

    /// Check whether the token grants `role`.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Claims carried by a signed refresh token.
///
/// Deliberately limited to the user id and registered claims.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshClaims {
    pub user_id: Uuid,

    #[serde(flatten)]
    pub registered: RegisteredClaims,
}
