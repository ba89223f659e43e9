//! The login form component.
//!
//! `LoginForm` owns the form state (username, password, status message,
//! token) and the three handlers that talk to the backend: `submit`,
//! `probe` and `logout`. Front ends only edit the fields, call the
//! handlers and render what the form exposes.
//!
//! Every outcome overwrites the single status message. Failures collapse
//! to one generic string per handler; the underlying error is logged.

use anyhow::Result;
use tracing::{debug, error, info, warn};

use crate::api::ApiClient;
use crate::auth::{LocalStorage, SessionData};
use crate::models::credentials::{can_add_password_char, can_add_username_char};
use crate::models::{Credentials, Endpoint};

pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please check your credentials.";
pub const MISSING_FIELDS_MESSAGE: &str = "Username and password are required.";
pub const LOGGED_OUT_MESSAGE: &str = "Logged out successfully!";

#[derive(Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    message: String,
    message_is_error: bool,
    token: String,
    session: Option<SessionData>,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Form pre-filled with a username (from env or the last login)
    pub fn with_username(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }

    /// Form holding a session loaded from local storage.
    /// Used by the headless commands; the interactive form always starts
    /// without a token.
    pub fn from_stored_session(session: SessionData) -> Self {
        Self {
            username: session.username.clone(),
            token: session.token.clone(),
            session: Some(session),
            ..Self::default()
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the current message reports a failure
    pub fn message_is_error(&self) -> bool {
        self.message_is_error
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }

    pub fn session(&self) -> Option<&SessionData> {
        self.session.as_ref()
    }

    pub fn can_submit(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }

    /// Probe buttons to show. Empty until a token exists.
    pub fn probe_buttons(&self) -> &'static [Endpoint] {
        if self.has_token() {
            &Endpoint::ALL
        } else {
            &[]
        }
    }

    fn set_message(&mut self, message: impl Into<String>, is_error: bool) {
        self.message = message.into();
        self.message_is_error = is_error;
    }

    // =========================================================================
    // Field editing
    // =========================================================================

    pub fn push_username_char(&mut self, c: char) -> bool {
        let accepted = can_add_username_char(self.username.chars().count(), c);
        if accepted {
            self.username.push(c);
        }
        accepted
    }

    pub fn push_password_char(&mut self, c: char) -> bool {
        let accepted = can_add_password_char(self.password.chars().count(), c);
        if accepted {
            self.password.push(c);
        }
        accepted
    }

    pub fn pop_username_char(&mut self) {
        self.username.pop();
    }

    pub fn pop_password_char(&mut self) {
        self.password.pop();
    }

    // =========================================================================
    // Handlers
    // =========================================================================

    /// Submit the credentials.
    ///
    /// With either field empty nothing is sent. On success the token and
    /// response are stored in the form and in `storage`; on failure the
    /// form token and storage are left as they were.
    pub async fn submit(&mut self, api: &ApiClient, storage: &mut LocalStorage) -> Result<()> {
        if !self.can_submit() {
            self.set_message(MISSING_FIELDS_MESSAGE, true);
            anyhow::bail!(MISSING_FIELDS_MESSAGE);
        }

        let credentials = Credentials::new(self.username.clone(), self.password.clone());

        match api.authenticate(&credentials).await {
            Ok(session) => {
                self.token = session.token.clone();
                self.set_message(session.welcome_message(), false);

                if let Err(e) = storage.store_session(&session) {
                    warn!(error = %e, "Failed to store session in local storage");
                }

                self.password.clear();
                info!(username = %session.username, role = ?session.role(), "Login successful");
                self.session = Some(session);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                self.set_message(LOGIN_FAILED_MESSAGE, true);
                Err(e)
            }
        }
    }

    /// Probe one role-gated endpoint with the current token.
    /// Does nothing while no token exists.
    pub async fn probe(&mut self, api: &ApiClient, endpoint: Endpoint) -> Result<()> {
        if !self.has_token() {
            debug!(%endpoint, "Probe ignored, no token");
            return Ok(());
        }

        match api.probe(endpoint, &self.token).await {
            Ok(body) => {
                debug!(%endpoint, "Probe allowed");
                self.set_message(body, false);
                Ok(())
            }
            Err(e) => {
                error!(%endpoint, error = %e, "API error");
                self.set_message(endpoint.denied_message(), true);
                Err(e)
            }
        }
    }

    /// Log out: notify the server, then drop the token from the form and
    /// from `storage`. Server failures are only logged.
    pub async fn logout(&mut self, api: &ApiClient, storage: &mut LocalStorage) -> Result<()> {
        let token = self.has_token().then_some(self.token.as_str());

        let acknowledgement = match api.logout(token).await {
            Ok(body) if !body.is_empty() => body,
            Ok(_) => LOGGED_OUT_MESSAGE.to_string(),
            Err(e) => {
                warn!(error = %e, "Logout request failed");
                LOGGED_OUT_MESSAGE.to_string()
            }
        };

        self.token.clear();
        self.session = None;
        self.password.clear();
        self.set_message(acknowledgement, false);
        info!("Logged out");

        storage.clear_session()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{TOKEN_KEY, USER_KEY};
    use reqwest::Url;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Harness {
        server: MockServer,
        api: ApiClient,
        storage: LocalStorage,
        _dir: tempfile::TempDir,
    }

    async fn harness() -> Harness {
        let server = MockServer::start().await;
        let api = ApiClient::new(Url::parse(&server.uri()).unwrap()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::open(dir.path().to_path_buf()).unwrap();
        Harness { server, api, storage, _dir: dir }
    }

    async fn mount_login_ok(server: &MockServer, token: &str, username: &str) {
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": token,
                "id": 3,
                "username": username,
                "email": "alice@example.com",
                "role": "CUSTOMER"
            })))
            .mount(server)
            .await;
    }

    fn filled(username: &str, password: &str) -> LoginForm {
        let mut form = LoginForm::new();
        form.username = username.to_string();
        form.password = password.to_string();
        form
    }

    #[tokio::test]
    async fn test_submit_posts_credentials_once() {
        let mut h = harness().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({"username": "alice", "password": "pw123"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "jwt-abc",
                "username": "alice"
            })))
            .expect(1)
            .mount(&h.server)
            .await;

        let mut form = filled("alice", "pw123");
        form.submit(&h.api, &mut h.storage).await.unwrap();

        let requests = h.server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method.to_string(), "POST");
    }

    #[tokio::test]
    async fn test_successful_login_updates_message_and_storage() {
        let mut h = harness().await;
        mount_login_ok(&h.server, "jwt-abc", "alice").await;

        let mut form = filled("alice", "pw123");
        form.submit(&h.api, &mut h.storage).await.unwrap();

        assert_eq!(form.message(), "Login successful! Welcome alice");
        assert_eq!(form.token(), "jwt-abc");
        assert!(form.password.is_empty());
        assert_eq!(h.storage.get_item(TOKEN_KEY), Some("jwt-abc"));

        let user: serde_json::Value =
            serde_json::from_str(h.storage.get_item(USER_KEY).unwrap()).unwrap();
        assert_eq!(user["username"], "alice");
        assert_eq!(user["role"], "CUSTOMER");
        assert_eq!(user["token"], "jwt-abc");
    }

    #[tokio::test]
    async fn test_welcome_uses_server_username() {
        let mut h = harness().await;
        mount_login_ok(&h.server, "jwt-abc", "alice.smith").await;

        let mut form = filled("alice@example.com", "pw123");
        form.submit(&h.api, &mut h.storage).await.unwrap();
        assert_eq!(form.message(), "Login successful! Welcome alice.smith");
    }

    #[tokio::test]
    async fn test_failed_login_shows_generic_message_and_stores_nothing() {
        let mut h = harness().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Bad credentials"))
            .mount(&h.server)
            .await;

        let mut form = filled("alice", "wrong");
        assert!(form.submit(&h.api, &mut h.storage).await.is_err());

        assert_eq!(form.message(), LOGIN_FAILED_MESSAGE);
        assert!(!form.has_token());
        assert!(form.probe_buttons().is_empty());
        assert_eq!(h.storage.get_item(TOKEN_KEY), None);
        assert_eq!(h.storage.get_item(USER_KEY), None);
    }

    #[tokio::test]
    async fn test_server_error_and_malformed_body_use_same_message() {
        let mut h = harness().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&h.server)
            .await;

        let mut form = filled("alice", "pw");
        assert!(form.submit(&h.api, &mut h.storage).await.is_err());
        assert_eq!(form.message(), LOGIN_FAILED_MESSAGE);
        assert!(h.storage.is_empty());
    }

    #[tokio::test]
    async fn test_failed_relogin_keeps_previous_token() {
        let mut h = harness().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({"username": "alice", "password": "good"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "jwt-first",
                "username": "alice"
            })))
            .mount(&h.server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({"username": "alice", "password": "bad"})))
            .respond_with(ResponseTemplate::new(500))
            .mount(&h.server)
            .await;

        let mut form = filled("alice", "good");
        form.submit(&h.api, &mut h.storage).await.unwrap();

        form.password = "bad".to_string();
        assert!(form.submit(&h.api, &mut h.storage).await.is_err());
        assert_eq!(form.message(), LOGIN_FAILED_MESSAGE);
        assert_eq!(form.token(), "jwt-first");
        assert_eq!(h.storage.get_item(TOKEN_KEY), Some("jwt-first"));
    }

    #[tokio::test]
    async fn test_empty_fields_send_nothing() {
        let mut h = harness().await;

        let mut form = filled("alice", "");
        assert!(form.submit(&h.api, &mut h.storage).await.is_err());
        assert_eq!(form.message(), MISSING_FIELDS_MESSAGE);

        let mut form = filled("", "pw");
        assert!(form.submit(&h.api, &mut h.storage).await.is_err());

        assert!(h.server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_buttons_hidden_without_token() {
        let form = LoginForm::new();
        assert!(form.probe_buttons().is_empty());
        assert_eq!(form.token(), "");
    }

    #[tokio::test]
    async fn test_each_button_probes_its_path_with_bearer() {
        let mut h = harness().await;
        mount_login_ok(&h.server, "jwt-abc", "alice").await;
        for endpoint in Endpoint::ALL {
            Mock::given(method("GET"))
                .and(path(endpoint.path()))
                .and(header("authorization", "Bearer jwt-abc"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_string(format!("{} body", endpoint.label())),
                )
                .expect(1)
                .mount(&h.server)
                .await;
        }

        let mut form = filled("alice", "pw");
        form.submit(&h.api, &mut h.storage).await.unwrap();
        assert_eq!(form.probe_buttons(), &Endpoint::ALL);

        for &endpoint in form.probe_buttons() {
            form.probe(&h.api, endpoint).await.unwrap();
            assert_eq!(form.message(), format!("{} body", endpoint.label()));
        }
    }

    #[tokio::test]
    async fn test_failed_probe_shows_denial_and_keeps_token() {
        let mut h = harness().await;
        mount_login_ok(&h.server, "jwt-abc", "alice").await;
        Mock::given(method("GET"))
            .and(path("/api/test/admin"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({"error": "Forbidden"})))
            .mount(&h.server)
            .await;

        let mut form = filled("alice", "pw");
        form.submit(&h.api, &mut h.storage).await.unwrap();

        assert!(form.probe(&h.api, Endpoint::Admin).await.is_err());
        assert_eq!(form.message(), "Access denied to admin endpoint");
        assert!(form.message_is_error());
        assert_eq!(form.token(), "jwt-abc");
        assert_eq!(h.storage.get_item(TOKEN_KEY), Some("jwt-abc"));
    }

    #[tokio::test]
    async fn test_probe_without_token_sends_nothing() {
        let h = harness().await;
        let mut form = LoginForm::new();
        form.probe(&h.api, Endpoint::All).await.unwrap();
        assert_eq!(form.message(), "");
        assert!(h.server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_json_string_probe_body_is_unquoted() {
        let h = harness().await;
        Mock::given(method("GET"))
            .and(path("/api/test/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!("Public Content.")))
            .mount(&h.server)
            .await;

        let mut form = LoginForm::from_stored_session(SessionData::new("jwt-abc", "alice"));
        form.probe(&h.api, Endpoint::All).await.unwrap();
        assert_eq!(form.message(), "Public Content.");
    }

    #[tokio::test]
    async fn test_logout_clears_token_and_storage() {
        let mut h = harness().await;
        mount_login_ok(&h.server, "jwt-abc", "alice").await;
        Mock::given(method("GET"))
            .and(path("/api/auth/logout"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Logged out successfully!"))
            .expect(1)
            .mount(&h.server)
            .await;

        let mut form = filled("alice", "pw");
        form.submit(&h.api, &mut h.storage).await.unwrap();
        form.logout(&h.api, &mut h.storage).await.unwrap();

        assert!(!form.has_token());
        assert!(form.probe_buttons().is_empty());
        assert_eq!(form.message(), LOGGED_OUT_MESSAGE);
        assert_eq!(h.storage.get_item(TOKEN_KEY), None);
        assert_eq!(h.storage.get_item(USER_KEY), None);
    }

    #[tokio::test]
    async fn test_logout_succeeds_locally_when_server_fails() {
        let mut h = harness().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/logout"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&h.server)
            .await;
        h.storage.store_session(&SessionData::new("jwt-abc", "alice")).unwrap();

        let mut form = LoginForm::from_stored_session(SessionData::new("jwt-abc", "alice"));
        form.logout(&h.api, &mut h.storage).await.unwrap();

        assert!(!form.has_token());
        assert_eq!(form.message(), LOGGED_OUT_MESSAGE);
        assert!(h.storage.load_session().unwrap().is_none());
    }

    #[test]
    fn test_field_editing_limits() {
        let mut form = LoginForm::new();
        for c in "alice".chars() {
            assert!(form.push_username_char(c));
        }
        assert!(!form.push_username_char('\n'));
        assert_eq!(form.username, "alice");
        form.pop_username_char();
        assert_eq!(form.username, "alic");

        for _ in 0..200 {
            form.push_password_char('x');
        }
        assert_eq!(form.password.len(), 128);
        form.pop_password_char();
        assert_eq!(form.password.len(), 127);
    }
}
