pub mod account;
pub mod auth;
pub mod errors;
pub mod events;
pub mod role;
pub mod session;
pub mod user;
