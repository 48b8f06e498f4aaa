//! Field rendering utilities for forms

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Everything needed to draw one boxed field
pub struct FieldView<'a> {
    pub label: &'a str,
    pub value: &'a str,
    /// Shown dimmed when the value is empty and the field is not focused
    pub placeholder: &'a str,
    pub is_active: bool,
    pub is_multiline: bool,
    /// Draw the box in red
    pub is_invalid: bool,
    /// Enumerated fields show arrows instead of a text cursor
    pub is_select: bool,
}

/// Rows a field box needs, borders included
pub fn field_height(is_multiline: bool) -> u16 {
    if is_multiline {
        6
    } else {
        3
    }
}

/// Draw a form field
pub fn draw_field(frame: &mut Frame, area: Rect, field: &FieldView) {
    let accent = if field.is_invalid {
        Color::Red
    } else if field.is_active {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let value_style = if field.is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let cursor_style = Style::default().fg(Color::Cyan);

    let content = if field.value.is_empty() && !field.is_active {
        Paragraph::new(Line::from(Span::styled(
            field.placeholder,
            Style::default().fg(Color::DarkGray),
        )))
    } else if field.is_select {
        let arrows = if field.is_active { ("◀ ", " ▶") } else { ("", "") };
        let shown = if field.value.is_empty() {
            field.placeholder
        } else {
            field.value
        };
        Paragraph::new(Line::from(vec![
            Span::styled(arrows.0, cursor_style),
            Span::styled(shown, value_style),
            Span::styled(arrows.1, cursor_style),
        ]))
    } else if field.is_multiline {
        let mut lines: Vec<Line> = field
            .value
            .split('\n')
            .map(|l| Line::from(Span::styled(l.to_string(), value_style)))
            .collect();
        if field.is_active {
            if let Some(last) = lines.last_mut() {
                last.spans.push(Span::styled("▌", cursor_style));
            }
        }
        Paragraph::new(lines)
    } else {
        let cursor = if field.is_active { "▌" } else { "" };
        Paragraph::new(Line::from(vec![
            Span::styled(field.value, value_style),
            Span::styled(cursor, cursor_style),
        ]))
    };

    let block = Block::default()
        .title(format!(" {} ", field.label))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent));

    frame.render_widget(content.wrap(Wrap { trim: false }).block(block), area);
}

/// Draw a one-line error message under a field
pub fn draw_field_error(frame: &mut Frame, area: Rect, message: &str) {
    let line = Line::from(Span::styled(
        format!(" {message}"),
        Style::default().fg(Color::Red),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw dimmed help text
pub fn draw_help_text(frame: &mut Frame, area: Rect, text: &str) {
    let help = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, area);
}
