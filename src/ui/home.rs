//! Home page

use super::components::{render_key_button, BUTTON_HEIGHT};
use crate::app::App;
use crate::backend::SessionState;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const BUTTON_WIDTH: u16 = 28;

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let signed_in = app.state.session.user().is_some();
    let signed_out = app.state.session == SessionState::Absent;

    // Account actions only appear once the session has resolved
    let mut buttons = vec![("c", "Create a listing")];
    if signed_out {
        buttons.push(("l", "Sign in"));
        buttons.push(("r", "Create an account"));
    }
    if signed_in {
        buttons.push(("o", "Sign out"));
    }
    buttons.push(("q", "Quit"));

    let mut constraints = vec![Constraint::Min(0), Constraint::Length(3)];
    constraints.extend(buttons.iter().map(|_| Constraint::Length(BUTTON_HEIGHT)));
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let intro = Paragraph::new(vec![
        Line::from(Span::styled(
            "Sell a spare appliance part",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Three short steps and your listing is live.",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(intro, chunks[1]);

    for (i, (key, label)) in buttons.iter().enumerate() {
        let row = chunks[i + 2];
        let width = BUTTON_WIDTH.min(row.width);
        let button_area = Rect {
            x: row.x + (row.width - width) / 2,
            width,
            ..row
        };
        render_key_button(frame, button_area, key, label);
    }
}
