//! Centered modal box

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Columns between the border and the text, per side
const INNER_MARGIN: u16 = 2;
const MAX_WIDTH: u16 = 60;

/// A modal with a title, a wrapped body and an optional footer line
pub struct Dialog<'a> {
    pub title: &'a str,
    /// Title and border colour
    pub accent: Color,
    pub body: &'a str,
    pub footer: Vec<Span<'a>>,
}

impl Dialog<'_> {
    pub fn render(self, frame: &mut Frame) {
        let screen = frame.area();
        let text_width = MAX_WIDTH.saturating_sub(2 * INNER_MARGIN + 2).max(1);
        let body = wrap_words(self.body, text_width as usize);

        let widest = body
            .iter()
            .map(|l| l.chars().count())
            .chain([self.title.chars().count()])
            .max()
            .unwrap_or(0) as u16;
        let footer_rows = if self.footer.is_empty() { 0 } else { 2 };
        let width = (widest + 2 * INNER_MARGIN + 2).min(MAX_WIDTH).min(screen.width);
        let height = (body.len() as u16 + footer_rows + 4).max(5).min(screen.height);
        let area = centered(screen, width, height);

        let mut lines = Vec::with_capacity(body.len() + 4);
        lines.push(Line::styled(
            self.title,
            Style::default().fg(self.accent).add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::default());
        lines.extend(body.into_iter().map(Line::from));
        if !self.footer.is_empty() {
            lines.push(Line::default());
            lines.push(Line::from(self.footer));
        }

        let background = Style::default().bg(Color::Black);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.accent))
            .style(background);

        frame.render_widget(Clear, area);
        frame.render_widget(Paragraph::new(lines).block(block).style(background), area);
    }
}

fn centered(outer: Rect, width: u16, height: u16) -> Rect {
    Rect::new(
        outer.x + outer.width.saturating_sub(width) / 2,
        outer.y + outer.height.saturating_sub(height) / 2,
        width,
        height,
    )
}

/// Greedy word wrap, measured in characters. Explicit line breaks are kept.
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for source_line in text.lines() {
        let mut row = String::new();
        for word in source_line.split_whitespace() {
            let needed = row.chars().count() + usize::from(!row.is_empty()) + word.chars().count();
            if needed > width && !row.is_empty() {
                out.push(std::mem::take(&mut row));
            }
            if !row.is_empty() {
                row.push(' ');
            }
            row.push_str(word);
        }
        out.push(row);
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}
