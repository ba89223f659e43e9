//! Data models for the login form.
//!
//! - `Credentials`: the username/password pair posted on login
//! - `Endpoint`: the four role-gated test endpoints

pub mod credentials;
pub mod endpoint;

pub use credentials::Credentials;
pub use endpoint::Endpoint;
