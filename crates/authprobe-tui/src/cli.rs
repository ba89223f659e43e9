//! Headless subcommands.
//!
//! These run the same form handlers as the interactive screen but print
//! the status message instead of drawing it. `probe` and `logout` pick up
//! the session a previous `login` left in local storage.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;

use authprobe_core::{ApiClient, Config, Endpoint, LocalStorage, LoginForm};

#[derive(Parser, Debug)]
#[command(
    name = "authprobe",
    version,
    about = "Log in to the portal backend and probe its role-gated endpoints"
)]
pub struct Cli {
    /// Backend base URL (overrides AUTHPROBE_BASE_URL and the config file)
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Without a subcommand the interactive form is started
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and store the session in local storage
    Login {
        /// Username or email; prompted when omitted
        #[arg(short, long)]
        username: Option<String>,
    },
    /// Probe role-gated endpoints with the stored token
    Probe {
        /// Endpoints to probe: all, customer, agent, admin
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        endpoints: Vec<Endpoint>,

        /// Probe all four endpoints
        #[arg(long)]
        all: bool,
    },
    /// Log out and remove the stored session
    Logout,
    /// Show the stored session
    Status,
}

/// Services shared by the headless commands
pub struct Headless {
    pub config: Config,
    pub config_path: Option<PathBuf>,
    pub api: ApiClient,
    pub storage: LocalStorage,
}

impl Headless {
    pub async fn login(
        &mut self,
        username: String,
        password: String,
        out: &mut dyn Write,
    ) -> Result<bool> {
        let mut form = LoginForm::with_username(username);
        form.password = password;

        let result = form.submit(&self.api, &mut self.storage).await;
        writeln!(out, "{}", form.message())?;
        if result.is_err() {
            return Ok(false);
        }

        if let Some(session) = form.session() {
            self.config.last_username = Some(session.username.clone());
        }
        if let Some(ref path) = self.config_path {
            if let Err(e) = self.config.save_to(path) {
                warn!(error = %e, "Failed to save config");
            }
        }
        Ok(true)
    }

    /// Probe each endpoint in order, one message line per endpoint.
    /// Returns false when any probe was denied.
    pub async fn probe(&mut self, endpoints: &[Endpoint], out: &mut dyn Write) -> Result<bool> {
        let mut form = self.stored_form()?;
        let mut denied = 0;

        for &endpoint in endpoints {
            if form.probe(&self.api, endpoint).await.is_err() {
                denied += 1;
            }
            writeln!(out, "{:<9} {}", endpoint.segment(), form.message())?;
        }

        Ok(denied == 0)
    }

    pub async fn logout(&mut self, out: &mut dyn Write) -> Result<bool> {
        let mut form = match self.storage.load_session()? {
            Some(session) => LoginForm::from_stored_session(session),
            None => LoginForm::new(),
        };
        form.logout(&self.api, &mut self.storage).await?;
        writeln!(out, "{}", form.message())?;
        Ok(true)
    }

    pub fn status(&self, out: &mut dyn Write) -> Result<bool> {
        writeln!(out, "Backend:  {}", self.api.base_url())?;
        writeln!(out, "Storage:  {}", self.storage.path().display())?;
        match self.storage.load_session()? {
            Some(session) => {
                writeln!(out, "User:     {}", session.username)?;
                if let Some(id) = session.user_id() {
                    writeln!(out, "User ID:  {}", id)?;
                }
                if let Some(role) = session.role() {
                    writeln!(out, "Role:     {}", role)?;
                }
                if let Some(email) = session.email() {
                    writeln!(out, "Email:    {}", email)?;
                }
            }
            None => writeln!(out, "Not logged in")?,
        }
        Ok(true)
    }

    fn stored_form(&self) -> Result<LoginForm> {
        let session = self
            .storage
            .load_session()?
            .ok_or_else(|| anyhow::anyhow!("No stored session. Run `authprobe login` first."))?;
        Ok(LoginForm::from_stored_session(session))
    }
}

/// Run a subcommand against the real terminal
pub async fn run(command: Command, mut headless: Headless) -> Result<ExitCode> {
    let mut stdout = io::stdout();
    let succeeded = match command {
        Command::Login { username } => {
            let username = match username {
                Some(u) => u,
                None => prompt_username(&headless.config.initial_username())?,
            };
            let password = rpassword::prompt_password("Password: ")
                .context("Failed to read password")?;
            headless.login(username, password, &mut stdout).await
        }
        Command::Probe { endpoints, all } => {
            let endpoints = if all { Endpoint::ALL.to_vec() } else { endpoints };
            headless.probe(&endpoints, &mut stdout).await
        }
        Command::Logout => headless.logout(&mut stdout).await,
        Command::Status => headless.status(&mut stdout),
    }?;

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn prompt_username(default: &str) -> Result<String> {
    if default.is_empty() {
        print!("Username: ");
    } else {
        print!("Username [{}]: ", default);
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    Ok(if input.is_empty() {
        default.to_string()
    } else {
        input.to_string()
    })
}
