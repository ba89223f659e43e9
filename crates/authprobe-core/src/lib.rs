//! Core library for authprobe.
//!
//! Provides the login form component and everything it touches:
//!
//! - `api`: HTTP client for the login, logout and role-gated test endpoints
//! - `auth`: session model and origin-scoped local storage
//! - `form`: the `LoginForm` state and its submit/probe/logout handlers
//! - `models`: credentials and endpoint types
//! - `config`: base URL and last-username configuration
//! - `utils`: display helpers

pub mod api;
pub mod auth;
pub mod config;
pub mod form;
pub mod models;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use auth::{LocalStorage, SessionData};
pub use config::Config;
pub use form::LoginForm;
pub use models::{Credentials, Endpoint};
pub use reqwest::Url;
