//! authprobe - a terminal login form for the portal backend.
//!
//! Without a subcommand this opens the interactive form: log in, then
//! probe the role-gated test endpoints with the returned token. The
//! `login`, `probe`, `logout` and `status` subcommands do the same
//! headlessly for scripts.

mod app;
mod cli;
mod ui;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use authprobe_core::{ApiClient, Config, LocalStorage};

use app::App;
use cli::{Cli, Headless};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file name prefix inside the log directory
const LOG_FILE_PREFIX: &str = "authprobe.log";

fn env_filter(verbose: bool) -> EnvFilter {
    // RUST_LOG wins; otherwise warn, or debug with -v
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }))
}

/// Log to stderr for headless commands
fn init_stderr_tracing(verbose: bool) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter(verbose))
        .init();
}

/// Log to a daily rolling file so the interactive screen stays clean
fn init_file_tracing(log_dir: PathBuf, verbose: bool) -> WorkerGuard {
    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(env_filter(verbose))
        .init();
    guard
}

fn load_config() -> Config {
    match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return run_interactive(cli.base_url.as_deref(), cli.verbose).await;
    };

    init_stderr_tracing(cli.verbose);
    let config = load_config();
    let api = ApiClient::new(config.base_url(cli.base_url.as_deref())?)?;
    let storage = LocalStorage::for_origin(&config.storage_root()?, api.base_url())?;

    let headless = Headless {
        config,
        config_path: Config::default_path().ok(),
        api,
        storage,
    };
    cli::run(command, headless).await
}

async fn run_interactive(base_url: Option<&str>, verbose: bool) -> Result<ExitCode> {
    let _guard = Config::log_dir()
        .ok()
        .map(|dir| init_file_tracing(dir, verbose));
    let config = load_config();
    info!("authprobe starting");

    let api = ApiClient::new(config.base_url(base_url)?)?;
    let storage = LocalStorage::for_origin(&config.storage_root()?, api.base_url())?;
    let mut app = App::new(config, Config::default_path().ok(), api, storage);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        return Ok(ExitCode::FAILURE);
    }

    info!("authprobe shutting down");
    Ok(ExitCode::SUCCESS)
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Windows reports releases too
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                // Handlers await their request here, so only one is ever in flight
                if handle_input(app, key).await? {
                    return Ok(());
                }
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
