//! Keyboard input handling for the TUI.
//!
//! This module translates key events into application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, CycleDirection};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    match key.code {
        KeyCode::Esc => {
            app.quit();
            return Ok(true);
        }
        KeyCode::F(1) => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Down | KeyCode::Tab => app.cycle_focus(CycleDirection::Forward),
        KeyCode::Up | KeyCode::BackTab => app.cycle_focus(CycleDirection::Backward),
        KeyCode::Enter => app.activate().await,
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(c) => app.input_char(c),
        _ => {}
    }
    Ok(false)
}
