//! Review-and-submit page

use super::components::{render_button, BUTTON_HEIGHT};
use super::forms::{draw_help_text, step_heading};
use crate::state::submission::review_rows;
use crate::state::{ReviewController, WizardStep};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, review: &ReviewController) {
    let block = Block::default()
        .title(" Create a Listing ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),             // Heading
            Constraint::Min(0),                // Summary
            Constraint::Length(2),             // Inline error
            Constraint::Length(BUTTON_HEIGHT), // Buttons
            Constraint::Length(1),             // Help
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(step_heading(WizardStep::Confirmation)),
        chunks[0],
    );

    let rows: Vec<Row> = review_rows(review.drafts())
        .into_iter()
        .map(|(label, value)| {
            Row::new(vec![
                Cell::from(Span::styled(label, Style::default().fg(Color::DarkGray))),
                // Multiline descriptions are summarised on one row
                Cell::from(value.replace('\n', " ")),
            ])
        })
        .collect();
    let table = Table::new(rows, [Constraint::Length(20), Constraint::Min(0)]).column_spacing(2);
    frame.render_widget(table, chunks[1]);

    if let Some(error) = &review.error {
        let message = Paragraph::new(Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )))
        .wrap(Wrap { trim: true });
        frame.render_widget(message, chunks[2]);
    }

    let buttons = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(14),
            Constraint::Length(2),
            Constraint::Length(18),
            Constraint::Min(0),
        ])
        .split(chunks[3]);
    let submitting = review.is_submitting();
    render_button(frame, buttons[0], "Back", false, !submitting);
    let submit_label = if submitting { "Submitting..." } else { "Submit" };
    render_button(frame, buttons[2], submit_label, true, !submitting);

    let help = if submitting {
        "Saving your listing..."
    } else {
        "Enter submit · Esc back to edit"
    };
    draw_help_text(frame, chunks[4], help);
}
