use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Login response from `/api/auth/login`.
///
/// Only `token` and `username` are required. Everything else the server
/// sends (`id`, `email`, `role`, ...) is carried in `extra` so the stored
/// `user` entry matches the response object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub token: String,
    pub username: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// When this process received the response. Not part of the stored object.
    #[serde(skip)]
    pub received_at: Option<DateTime<Utc>>,
}

impl SessionData {
    pub fn new(token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            username: username.into(),
            extra: Map::new(),
            received_at: None,
        }
    }

    /// Stamp the time the login response arrived
    pub fn received_now(mut self) -> Self {
        self.received_at = Some(Utc::now());
        self
    }

    fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }

    pub fn role(&self) -> Option<&str> {
        self.extra_str("role")
    }

    pub fn email(&self) -> Option<&str> {
        self.extra_str("email")
    }

    pub fn user_id(&self) -> Option<i64> {
        self.extra.get("id").and_then(Value::as_i64)
    }

    pub fn welcome_message(&self) -> String {
        format!("Login successful! Welcome {}", self.username)
    }

    /// Minutes since login, if known
    pub fn minutes_since_login(&self) -> Option<i64> {
        self.received_at.map(|at| (Utc::now() - at).num_minutes().max(0))
    }
}
