// Application View
// Main application layout and rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{render_list_panel, Styles};
use crate::core::{App, CollectionKind, InputMode};
use crate::operations::Dispatcher;

/// Render the entire application
pub fn render_app<D: Dispatcher>(f: &mut Frame, app: &App<D>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Lists
            Constraint::Length(4), // Footer
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_lists(f, app, chunks[1]);
    render_footer(f, app, chunks[2]);
}

/// Render the header bar
fn render_header<D: Dispatcher>(f: &mut Frame, app: &App<D>, area: Rect) {
    let pending = app.controller.in_flight();
    let mut spans = vec![Span::styled(
        format!("DNS Filter Console  {}", app.appliance),
        Styles::header(),
    )];
    if pending > 0 {
        spans.push(Span::styled(format!("  [{pending} pending]"), Styles::busy()));
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

/// Render the three lists side by side
fn render_lists<D: Dispatcher>(f: &mut Frame, app: &App<D>, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    for (kind, column) in CollectionKind::ALL.iter().zip(columns.iter()) {
        render_list_panel(f, app.panel(*kind), app.focus == *kind, *column);
    }
}

/// Render the footer bar: key help, then the rename prompt or latest notice
fn render_footer<D: Dispatcher>(f: &mut Frame, app: &App<D>, area: Rect) {
    let help_text = key_help(app);

    let status = match &app.mode {
        InputMode::Rename { device, buffer } => Line::from(vec![
            Span::styled(format!("Rename {device}: "), Styles::input_prompt()),
            Span::raw(format!("{buffer}_")),
        ]),
        InputMode::Browse => match app.controller.failures().current(app.notice_ttl) {
            Some(notice) => Line::from(Span::styled(notice.message.clone(), Styles::notice())),
            None => Line::default(),
        },
    };

    let footer = Paragraph::new(vec![Line::from(Span::styled(help_text, Styles::footer())), status])
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}

/// Key help for the current mode. Ctrl-C is listed wherever `q` types text.
pub fn key_help<D: Dispatcher>(app: &App<D>) -> &'static str {
    match &app.mode {
        InputMode::Rename { .. } => "Enter: Save name | Esc: Cancel | Backspace: Delete | Ctrl-C: Quit",
        InputMode::Browse if app.is_typing() => {
            "Type a name | Enter: Add | Tab: Next list | ↑/↓: Navigate | Esc: Dismiss notice | Ctrl-C: Quit"
        }
        InputMode::Browse => {
            "q: Quit | Tab: Next list | ↑/↓: Navigate | Enter/Space: Remove/Toggle | n: Rename | r/R: Refresh | Esc: Dismiss"
        }
    }
}
