//! Session persistence for the login form.
//!
//! This module provides:
//! - `SessionData`: the login response, kept verbatim apart from the two
//!   fields the form reads (`token` and `username`)
//! - `LocalStorage`: an origin-scoped string key-value store on disk
//!
//! Sessions are never refreshed or expired client-side; they live until
//! logout overwrites or removes them.

pub mod session;
pub mod storage;

pub use session::SessionData;
pub use storage::{LocalStorage, TOKEN_KEY, USER_KEY};
