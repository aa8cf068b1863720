pub mod authority;
pub mod claims;
pub mod errors;
pub mod handler;

pub use authority::extract_bearer_token;
pub use authority::TokenAuthority;
pub use claims::AccessClaims;
pub use claims::RefreshClaims;
pub use claims::RegisteredClaims;
pub use errors::JwtError;
pub use handler::JwtHandler;
