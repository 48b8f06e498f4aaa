//! Layout components (header, status bar)

use crate::app::App;
use crate::backend::SessionState;
use crate::platform::{NEWLINE_SHORTCUT, SWITCH_AUTH_SHORTCUT};
use crate::state::Page;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Split the screen into header, content and status bar
pub fn create_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1], chunks[2])
}

/// Draw the header with the page title and who is signed in
pub fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let title = Span::styled(
        format!(" {} ", app.state.location.route.title()),
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    );

    let session = match &app.state.session {
        SessionState::Unknown => {
            Span::styled("checking session… ", Style::default().fg(Color::Gray))
        }
        SessionState::Present(user) => Span::styled(
            format!("● {} ", user.email.as_deref().unwrap_or(&user.id)),
            Style::default().fg(Color::Green),
        ),
        SessionState::Absent => Span::styled("○ signed out ", Style::default().fg(Color::Gray)),
    };
    let session_width = session.width() as u16;

    frame.render_widget(Paragraph::new(Line::from(title)), area);
    let session_area = Rect {
        x: area.x + area.width.saturating_sub(session_width),
        y: area.y,
        width: session_width.min(area.width),
        height: 1,
    };
    frame.render_widget(Paragraph::new(Line::from(session)), session_area);
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let spans = match &app.state.status_message {
        Some(msg) => vec![Span::styled(
            format!(" {msg}"),
            Style::default().fg(Color::Green),
        )],
        None => vec![Span::styled(
            format!(" {}", page_hints(&app.state.page)),
            Style::default().fg(Color::Gray),
        )],
    };

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);

    let quit_hint = " ^C:quit ";
    let quit_area = Rect {
        x: area.x + area.width.saturating_sub(quit_hint.len() as u16),
        y: area.y,
        width: (quit_hint.len() as u16).min(area.width),
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Keyboard hints for the current page
fn page_hints(page: &Page) -> String {
    match page {
        Page::Loading(_) => String::new(),
        Page::Home => "c:create listing  q:quit".to_string(),
        Page::Login(_) | Page::Register(_) => {
            format!("Tab:next  Enter:submit  {SWITCH_AUTH_SHORTCUT}:switch  Esc:back")
        }
        Page::BasicInfo(_) | Page::AdditionalDetails(_) => {
            format!("Tab:next  ←/→:choose  {NEWLINE_SHORTCUT}:new line  Enter:continue  Esc:back")
        }
        Page::Confirmation(_) => "Enter:submit  Esc:back".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_page_has_no_hints() {
        assert!(page_hints(&Page::Loading(crate::state::Route::Confirmation)).is_empty());
    }

    #[test]
    fn test_home_hints() {
        assert!(page_hints(&Page::Home).contains("c:create listing"));
    }
}
