//! Authentication primitives library
//!
//! Provides the credential and token building blocks used by the auth service:
//! - Password hashing (Argon2id, PHC string format)
//! - Access and refresh token signing and validation (HS256)
//! - Opaque refresh token generation
//! - Request authorization from bearer tokens
//!
//! Nothing in this crate performs I/O; persistence and transport stay in the
//! services that use it.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::{HashingParams, PasswordHasher};
//!
//! let hasher = PasswordHasher::with_params(HashingParams::new(1024, 1, 1)).unwrap();
//! let hash = hasher.hash("Correct-Horse-9").unwrap();
//! assert!(hasher.verify("Correct-Horse-9", &hash).unwrap());
//! ```
//!
//! ## Tokens and Authorization
//! ```
//! use std::sync::Arc;
//!
//! use auth::{AuthorizationGate, TokenAuthority};
//! use chrono::Duration;
//! use uuid::Uuid;
//!
//! let authority = Arc::new(TokenAuthority::new(
//!     b"access_secret_at_least_32_bytes_long!",
//!     b"refresh_secret_at_least_32_bytes_long",
//!     "auth-service",
//!     "auth-clients",
//! ));
//!
//! let roles = vec!["admin".to_string()];
//! let token = authority
//!     .issue_access(Uuid::new_v4(), "a@x.com", "alice", &roles, Duration::minutes(15))
//!     .unwrap();
//!
//! let gate = AuthorizationGate::new(authority);
//! let header = format!("Bearer {}", token);
//! let context = gate.require_role(Some(&header), "admin").unwrap();
//! assert_eq!(context.username, "alice");
//! ```

pub mod gate;
pub mod jwt;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use gate::AuthContext;
pub use gate::AuthorizationGate;
pub use gate::GateError;
pub use jwt::extract_bearer_token;
pub use jwt::AccessClaims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::RefreshClaims;
pub use jwt::TokenAuthority;
pub use password::HashingParams;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::generate_opaque_token;
