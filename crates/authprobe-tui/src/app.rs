//! Application state for the interactive login form.
//!
//! `App` wraps the core `LoginForm` with the terminal-only state: which
//! control has focus, whether the help overlay is open, and where the
//! config is saved.

use std::path::PathBuf;

use tracing::{debug, warn};

use authprobe_core::{ApiClient, Config, Endpoint, LocalStorage, LoginForm};

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    Quitting,
}

/// Focusable controls, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Username,
    Password,
    LoginButton,
    Probe(Endpoint),
    LogoutButton,
}

/// Direction for cycling focus
#[derive(Debug, Clone, Copy)]
pub enum CycleDirection {
    Forward,
    Backward,
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    pub config: Config,
    /// Where `config` is saved after a login. `None` skips saving.
    config_path: Option<PathBuf>,
    pub api: ApiClient,
    pub storage: LocalStorage,
    pub form: LoginForm,

    pub state: AppState,
    pub focus: Focus,
}

impl App {
    pub fn new(
        config: Config,
        config_path: Option<PathBuf>,
        api: ApiClient,
        storage: LocalStorage,
    ) -> Self {
        let form = LoginForm::with_username(config.initial_username());
        let focus = if form.username.is_empty() {
            Focus::Username
        } else {
            Focus::Password
        };
        debug!(base_url = %api.base_url(), storage = %storage.path().display(), "App created");

        Self {
            config,
            config_path,
            api,
            storage,
            form,
            state: AppState::Normal,
            focus,
        }
    }

    /// Controls currently on screen, in tab order
    pub fn focus_order(&self) -> Vec<Focus> {
        let mut order = vec![Focus::Username, Focus::Password, Focus::LoginButton];
        if self.form.has_token() {
            order.extend(self.form.probe_buttons().iter().map(|&e| Focus::Probe(e)));
            order.push(Focus::LogoutButton);
        }
        order
    }

    pub fn cycle_focus(&mut self, direction: CycleDirection) {
        let order = self.focus_order();
        let current = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = match direction {
            CycleDirection::Forward => (current + 1) % order.len(),
            CycleDirection::Backward => (current + order.len() - 1) % order.len(),
        };
        self.focus = order[next];
    }

    /// Activate the focused control (Enter).
    /// Network handlers run to completion before this returns.
    pub async fn activate(&mut self) {
        match self.focus {
            Focus::Username => self.focus = Focus::Password,
            Focus::Password => self.focus = Focus::LoginButton,
            Focus::LoginButton => self.attempt_login().await,
            Focus::Probe(endpoint) => {
                // Outcome is already in the form message
                let _ = self.form.probe(&self.api, endpoint).await;
            }
            Focus::LogoutButton => {
                if let Err(e) = self.form.logout(&self.api, &mut self.storage).await {
                    warn!(error = %e, "Failed to clear local storage");
                }
                self.focus = Focus::Username;
            }
        }
    }

    async fn attempt_login(&mut self) {
        if self.form.submit(&self.api, &mut self.storage).await.is_err() {
            if !self.form.can_submit() {
                self.focus = if self.form.username.is_empty() {
                    Focus::Username
                } else {
                    Focus::Password
                };
            }
            return;
        }

        if let Some(session) = self.form.session() {
            self.config.last_username = Some(session.username.clone());
        }
        if let Some(ref path) = self.config_path {
            if let Err(e) = self.config.save_to(path) {
                warn!(error = %e, "Failed to save config");
            }
        }
        self.focus = Focus::Probe(Endpoint::All);
    }

    pub fn input_char(&mut self, c: char) {
        match self.focus {
            Focus::Username => {
                self.form.push_username_char(c);
            }
            Focus::Password => {
                self.form.push_password_char(c);
            }
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            Focus::Username => self.form.pop_username_char(),
            Focus::Password => self.form.pop_password_char(),
            _ => {}
        }
    }

    pub fn quit(&mut self) {
        self.state = AppState::Quitting;
    }

    pub fn should_quit(&self) -> bool {
        matches!(self.state, AppState::Quitting)
    }

    /// Status line text for the session, if logged in
    pub fn session_status(&self) -> Option<String> {
        let session = self.form.session()?;
        let role = session.role().unwrap_or("unknown role");
        Some(format!(
            "{} ({}) logged in {}",
            session.username,
            role,
            authprobe_core::utils::welcome_age(session.minutes_since_login())
        ))
    }
}
