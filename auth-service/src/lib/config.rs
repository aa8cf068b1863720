use std::env;

use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::domain::auth::models::AuthSettings;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordConfig,
    pub kafka: KafkaConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    #[serde(default = "default_audience")]
    pub audience: String,
    #[serde(default = "default_access_token_expiry_minutes")]
    pub access_token_expiry_minutes: i64,
    #[serde(default = "default_refresh_token_expiry_hours")]
    pub refresh_token_expiry_hours: i64,
}

// Secrets stay out of logs.
impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_secret", &"<redacted>")
            .field("refresh_secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field(
                "access_token_expiry_minutes",
                &self.access_token_expiry_minutes,
            )
            .field(
                "refresh_token_expiry_hours",
                &self.refresh_token_expiry_hours,
            )
            .finish()
    }
}

/// Argon2id cost parameters for newly created hashes.
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: 65536,
            iterations: 3,
            parallelism: 2,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub require_verified_email: bool,
    pub default_role: String,
    pub session_cleanup_interval_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            require_verified_email: false,
            default_role: "user".to_string(),
            session_cleanup_interval_seconds: 3600,
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_http_port() -> u16 {
    8080
}

fn default_request_timeout_seconds() -> u64 {
    30
}

fn default_issuer() -> String {
    "auth-service".to_string()
}

fn default_audience() -> String {
    "auth-clients".to_string()
}

fn default_access_token_expiry_minutes() -> i64 {
    15
}

fn default_refresh_token_expiry_hours() -> i64 {
    168
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__ACCESS_SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: JWT__ACCESS_SECRET=... overrides jwt.access_secret
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject configurations the service cannot run safely with.
    ///
    /// # Errors
    /// * `ConfigError::Message` - A JWT secret is empty, both secrets are equal,
    ///   or a token lifetime is not positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.access_secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "jwt.access_secret must not be empty".to_string(),
            ));
        }

        if self.jwt.refresh_secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "jwt.refresh_secret must not be empty".to_string(),
            ));
        }

        if self.jwt.access_secret == self.jwt.refresh_secret {
            return Err(ConfigError::Message(
                "jwt.access_secret and jwt.refresh_secret must differ".to_string(),
            ));
        }

        if self.jwt.access_token_expiry_minutes <= 0 || self.jwt.refresh_token_expiry_hours <= 0 {
            return Err(ConfigError::Message(
                "token lifetimes must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Orchestrator settings derived from the `jwt` and `auth` sections.
    pub fn auth_settings(&self) -> AuthSettings {
        AuthSettings {
            access_token_ttl: Duration::minutes(self.jwt.access_token_expiry_minutes),
            refresh_token_ttl: Duration::hours(self.jwt.refresh_token_expiry_hours),
            default_role: self.auth.default_role.clone(),
            require_verified_email: self.auth.require_verified_email,
        }
    }
}
