use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use authprobe_core::utils::{mask, truncate};

use crate::app::{App, AppState, Focus};

use super::styles;

/// Width of the login dialog
const DIALOG_WIDTH: u16 = 50;

/// Visible width of the username/password fields
const FIELD_WIDTH: usize = 24;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title bar
            Constraint::Min(10),   // Form
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, chunks[0]);
    render_login_form(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, area: Rect) {
    let title = "  authprobe";
    let help_hint = "[F1] Help";

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            area.width
                .saturating_sub(title.len() as u16 + help_hint.len() as u16 + 2)
                as usize,
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

/// A `[ label ]` button, with arrows when focused
fn button_line(label: &str, focused: bool) -> Line<'static> {
    let text = if focused {
        format!(" ▶ {} ◀ ", label)
    } else {
        format!("   {}   ", label)
    };
    let pad = (DIALOG_WIDTH as usize)
        .saturating_sub(text.chars().count() + 4)
        / 2;
    Line::from(vec![
        Span::raw(" ".repeat(pad)),
        Span::raw("["),
        Span::styled(text, styles::field_style(focused)),
        Span::raw("]"),
    ])
}

fn field_line(label: &'static str, value: String, focused: bool) -> Line<'static> {
    let cursor = if focused { "▌" } else { " " };
    let shown = truncate(&value, FIELD_WIDTH);
    Line::from(vec![
        Span::raw("   "),
        Span::styled(label, styles::muted_style()),
        Span::styled(" [", styles::muted_style()),
        Span::styled(
            format!("{:<width$}{}", shown, cursor, width = FIELD_WIDTH),
            styles::field_style(focused),
        ),
        Span::styled("]", styles::muted_style()),
    ])
}

fn render_login_form(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.form;
    let mut lines = vec![
        Line::from(Span::styled("   Login", styles::highlight_style())),
        Line::from(""),
        field_line("Username:", form.username.clone(), app.focus == Focus::Username),
        field_line(
            "Password:",
            mask(&form.password, FIELD_WIDTH),
            app.focus == Focus::Password,
        ),
        Line::from(""),
        button_line("Login", app.focus == Focus::LoginButton),
    ];

    let buttons = form.probe_buttons();
    if !buttons.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "   Test Endpoints",
            styles::highlight_style(),
        )));
        for &endpoint in buttons {
            lines.push(button_line(endpoint.label(), app.focus == Focus::Probe(endpoint)));
        }
        lines.push(Line::from(""));
        lines.push(button_line("Logout", app.focus == Focus::LogoutButton));
    }

    let message_width = usize::from(DIALOG_WIDTH.saturating_sub(4).max(1));
    let mut rows = lines.len() + 2;
    if !form.message().is_empty() {
        let style = styles::message_style(form.message_is_error());
        lines.push(Line::from(""));
        rows += 1;
        for text in form.message().lines() {
            lines.push(Line::from(Span::styled(format!(" {}", text), style)));
            // Rough wrapped height of this line
            rows += (text.chars().count() + 1) / message_width + 1;
        }
    }
    let height = u16::try_from(rows).unwrap_or(u16::MAX);

    let dialog = centered_rect_fixed(DIALOG_WIDTH, height, area);
    frame.render_widget(Clear, dialog);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, dialog);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left_text = format!(" {} ", app.api.base_url().as_str().trim_end_matches('/'));
    let right_text = match app.session_status() {
        Some(status) => format!(" {} | [Esc] quit ", status),
        None => " [Tab] next | [Enter] select | [Esc] quit ".to_string(),
    };

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());
    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(DIALOG_WIDTH, 14, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_line = |key: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<12}", key), styles::help_key_style()),
            Span::styled(desc, styles::help_desc_style()),
        ])
    };

    let help_text = vec![
        Line::from(Span::styled(
            format!(" authprobe {}", version),
            styles::title_style(),
        )),
        Line::from(""),
        help_line("Tab / ↓", "Next field or button"),
        help_line("S-Tab / ↑", "Previous field or button"),
        help_line("Enter", "Next field / press button"),
        help_line("Backspace", "Delete character"),
        help_line("Esc", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            " Probe buttons appear after a successful login.",
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("F1", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
