use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::errors::JwtError;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Signs and verifies HS256 tokens for one secret.
///
/// Tokens whose header names another algorithm are rejected before the
/// signature is checked. Expiry and `nbf` are enforced without leeway.
pub struct JwtHandler {
    signing_key: EncodingKey,
    verifying_key: DecodingKey,
    rules: Validation,
}

impl JwtHandler {
    /// # Arguments
    /// * `secret` - HMAC key; at least 32 bytes for HS256
    pub fn new(secret: &[u8]) -> Self {
        let mut rules = Validation::new(ALGORITHM);
        rules.leeway = 0;
        rules.validate_nbf = true;

        Self {
            signing_key: EncodingKey::from_secret(secret),
            verifying_key: DecodingKey::from_secret(secret),
            rules,
        }
    }

    /// Only accept tokens minted for `audience` by `issuer`.
    pub fn with_issuer_and_audience(mut self, issuer: &str, audience: &str) -> Self {
        self.rules.set_issuer(&[issuer]);
        self.rules.set_audience(&[audience]);
        self.rules
            .set_required_spec_claims(&["exp", "nbf", "iss", "aud", "sub"]);
        self
    }

    /// Sign `claims` into a compact token.
    ///
    /// # Errors
    /// * `EncodingFailed` - claims could not be serialized or signed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        jsonwebtoken::encode(&Header::new(ALGORITHM), claims, &self.signing_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify `token` and return its claims.
    ///
    /// # Errors
    /// * `TokenExpired` - `exp` is in the past
    /// * `InvalidToken` - bad signature, algorithm, issuer, audience or shape
    pub fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<T, JwtError> {
        match jsonwebtoken::decode::<T>(token, &self.verifying_key, &self.rules) {
            Ok(data) => Ok(data.claims),
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
                Err(JwtError::TokenExpired)
            }
            Err(e) => Err(JwtError::InvalidToken(e.to_string())),
        }
    }
}
