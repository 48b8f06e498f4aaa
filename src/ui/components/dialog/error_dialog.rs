//! Error dialog component

use super::base::Dialog;
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    Frame,
};

/// Overlay the oldest queued error; Enter or Esc dismisses it
pub fn render_error_dialog(frame: &mut Frame, message: &str) {
    let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    Dialog {
        title: "Something went wrong",
        accent: Color::Red,
        body: message,
        footer: vec![
            Span::styled("Enter", key),
            Span::raw(" / "),
            Span::styled("Esc", key),
            Span::raw(" dismiss"),
        ],
    }
    .render(frame);
}
