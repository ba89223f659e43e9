//! REST API client module for the insurance portal backend.
//!
//! This module provides the `ApiClient` for the login endpoint, the
//! role-gated test endpoints, and logout.
//!
//! The backend issues a JWT on login which is then presented as a
//! bearer token on every other request.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
