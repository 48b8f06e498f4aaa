//! Wizard step forms

use super::field_renderer::{
    draw_field, draw_field_error, draw_help_text, field_height, FieldView,
};
use crate::platform::NEWLINE_SHORTCUT;
use crate::state::wizard::StepPhase;
use crate::state::{FieldEditor, FieldKey, FieldKind, Form, StepController, WizardStep};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Heading and progress line for a wizard step
pub fn step_heading(step: WizardStep) -> Line<'static> {
    let name = match step {
        WizardStep::BasicInfo => "Basic info",
        WizardStep::AdditionalDetails => "Additional details",
        WizardStep::Confirmation => "Review your details",
    };
    Line::from(vec![
        Span::styled(
            "Create a Listing  ",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("Step {} of 3: {name}", step.number()),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

/// Index of the first field to draw so that `active` fits in `viewport` rows
pub fn first_visible(heights: &[u16], active: usize, viewport: u16) -> usize {
    let active = active.min(heights.len().saturating_sub(1));
    let mut first = 0;
    while first < active {
        let needed: u16 = heights[first..=active].iter().sum();
        if needed <= viewport {
            break;
        }
        first += 1;
    }
    first
}

/// Draw a data-entry step
pub fn draw_step<K: FieldKey>(frame: &mut Frame, area: Rect, controller: &StepController<K>) {
    let form = &controller.form;

    let block = Block::default()
        .title(" Create a Listing ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Heading
            Constraint::Min(0),    // Fields
            Constraint::Length(1), // Help
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(step_heading(controller.step())), chunks[0]);

    // Each field takes its box plus one row for its error
    let heights: Vec<u16> = K::ALL
        .iter()
        .map(|k| field_height(k.spec().multiline) + 1)
        .collect();
    let first = first_visible(&heights, form.active_field(), chunks[1].height);

    let mut y = chunks[1].y;
    let bottom = chunks[1].y + chunks[1].height;
    for (index, field) in K::ALL.iter().enumerate().skip(first) {
        let spec = field.spec();
        let box_height = field_height(spec.multiline);
        if y + box_height > bottom {
            break;
        }

        let editor = FieldEditor::new(spec);
        let value = form.draft.get(*field);
        let placeholder = editor.display_value("");
        let error = form.error_for(*field);
        draw_field(
            frame,
            Rect::new(chunks[1].x, y, chunks[1].width, box_height),
            &FieldView {
                label: spec.label,
                value,
                placeholder: if placeholder.is_empty() {
                    "(empty)"
                } else {
                    &placeholder
                },
                is_active: index == form.active_field(),
                is_multiline: spec.multiline,
                is_invalid: error.is_some(),
                is_select: matches!(spec.kind, FieldKind::Enumerated(_)),
            },
        );
        y += box_height;

        if y < bottom {
            if let Some(message) = error {
                let row = Rect::new(chunks[1].x, y, chunks[1].width, 1);
                draw_field_error(frame, row, message);
            }
            y += 1;
        }
    }

    let help = match controller.phase() {
        StepPhase::SubmittingAdvance => "Saving...".to_string(),
        StepPhase::Editing | StepPhase::Advanced => format!(
            "Tab/↑↓ move · ←→ choose · Enter next · Esc back · {NEWLINE_SHORTCUT} new line"
        ),
    };
    draw_help_text(frame, chunks[2], &help);
}
