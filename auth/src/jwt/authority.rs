use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

use super::claims::AccessClaims;
use super::claims::RefreshClaims;
use super::claims::RegisteredClaims;
use super::errors::JwtError;
use super::handler::JwtHandler;

const BEARER_PREFIX: &str = "Bearer ";

/// Signs and verifies access and refresh tokens.
///
/// Access and refresh tokens are signed with independent secrets, so a
/// leaked refresh secret cannot mint access tokens and vice versa.
/// Immutable after construction and safe to share across requests.
pub struct TokenAuthority {
    access: JwtHandler,
    refresh: JwtHandler,
    issuer: String,
    audience: String,
}

impl TokenAuthority {
    /// Create a token authority.
    ///
    /// # Arguments
    /// * `access_secret` - HMAC secret for access tokens
    /// * `refresh_secret` - HMAC secret for refresh tokens
    /// * `issuer` - Value of the `iss` claim, required on validation
    /// * `audience` - Value of the `aud` claim, required on validation
    pub fn new(access_secret: &[u8], refresh_secret: &[u8], issuer: &str, audience: &str) -> Self {
        Self {
            access: JwtHandler::new(access_secret).with_issuer_and_audience(issuer, audience),
            refresh: JwtHandler::new(refresh_secret).with_issuer_and_audience(issuer, audience),
            issuer: issuer.to_string(),
            audience: audience.to_string(),
        }
    }

    /// Issue a signed access token carrying identity and role claims.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed
    pub fn issue_access(
        &self,
        user_id: Uuid,
        email: &str,
        username: &str,
        roles: &[String],
        ttl: Duration,
    ) -> Result<String, JwtError> {
        let registered = RegisteredClaims::new(user_id, &self.issuer, &self.audience, ttl);
        let claims = AccessClaims::new(user_id, email, username, roles, registered);

        self.access.encode(&claims)
    }

    /// Issue a signed refresh token carrying only the user id.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed
    pub fn issue_refresh(&self, user_id: Uuid, ttl: Duration) -> Result<String, JwtError> {
        let claims = RefreshClaims {
            user_id,
            registered: RegisteredClaims::new(user_id, &self.issuer, &self.audience, ttl),
        };

        self.refresh.encode(&claims)
    }

    /// Validate an access token and return its claims.
    ///
    /// # Errors
    /// * `TokenExpired` - Token expiry has passed
    /// * `InvalidToken` - Signature, algorithm, issuer, audience or payload is invalid
    pub fn validate_access(&self, token: &str) -> Result<AccessClaims, JwtError> {
        let claims: AccessClaims = self.access.decode(token)?;
        Self::ensure_not_expired(&claims.registered)?;
        Ok(claims)
    }

    /// Validate a signed refresh token and return its claims.
    ///
    /// # Errors
    /// * `TokenExpired` - Token expiry has passed
    /// * `InvalidToken` - Signature, algorithm, issuer, audience or payload is invalid
    pub fn validate_refresh(&self, token: &str) -> Result<RefreshClaims, JwtError> {
        let claims: RefreshClaims = self.refresh.decode(token)?;
        Self::ensure_not_expired(&claims.registered)?;
        Ok(claims)
    }

    /// Extract the token from an `Authorization` header value.
    ///
    /// # Errors
    /// * `MalformedHeader` - Header is not exactly `Bearer <token>`
    pub fn extract_bearer_token<'a>(&self, header: &'a str) -> Result<&'a str, JwtError> {
        extract_bearer_token(header)
    }

    fn ensure_not_expired(claims: &RegisteredClaims) -> Result<(), JwtError> {
        if claims.is_expired(Utc::now().timestamp()) {
            return Err(JwtError::TokenExpired);
        }
        Ok(())
    }
}

/// Extract the token from an `Authorization` header value.
///
/// The header must be exactly `Bearer <token>`: case-sensitive scheme, a
/// single space, and a non-empty token without whitespace.
pub fn extract_bearer_token(header: &str) -> Result<&str, JwtError> {
    let token = header
        .strip_prefix(BEARER_PREFIX)
        .ok_or(JwtError::MalformedHeader)?;

    if token.is_empty() || token.chars().any(char::is_whitespace) {
        return Err(JwtError::MalformedHeader);
    }

    Ok(token)
}
