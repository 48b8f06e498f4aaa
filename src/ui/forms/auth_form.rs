//! Login and register forms

use super::field_renderer::{draw_field, draw_help_text, FieldView};
use crate::platform::SWITCH_AUTH_SHORTCUT;
use crate::state::{AuthFocus, AuthForm, AuthMode};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn mask(value: &str) -> String {
    "•".repeat(value.chars().count())
}

/// Draw the login or register form
pub fn draw_auth_form(frame: &mut Frame, area: Rect, form: &AuthForm) {
    let (title, action, busy, switch_to) = match form.mode {
        AuthMode::Login => (" Sign in ", "Enter sign in", "Signing in...", "create an account"),
        AuthMode::Register => (
            " Create account ",
            "Enter create account",
            "Creating account...",
            "sign in instead",
        ),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut constraints = vec![
        Constraint::Length(3), // Email
        Constraint::Length(3), // Password
    ];
    if form.mode == AuthMode::Register {
        constraints.push(Constraint::Length(3)); // Confirm password
    }
    constraints.push(Constraint::Length(3)); // Error
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(1)); // Help

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let password = mask(&form.password);
    let confirm = mask(&form.confirm_password);
    let mut fields = vec![
        ("Email", form.email.as_str(), AuthFocus::Email),
        ("Password", password.as_str(), AuthFocus::Password),
    ];
    if form.mode == AuthMode::Register {
        fields.push(("Confirm password", confirm.as_str(), AuthFocus::ConfirmPassword));
    }

    for (i, (label, value, focus)) in fields.iter().enumerate() {
        draw_field(
            frame,
            chunks[i],
            &FieldView {
                label: *label,
                value: *value,
                placeholder: "",
                is_active: !form.submitting && form.focus == *focus,
                is_multiline: false,
                is_invalid: false,
                is_select: false,
            },
        );
    }

    let error_area = chunks[fields.len()];
    if let Some(error) = &form.error {
        let style = if form.focus == AuthFocus::Error {
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(Color::Red)
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(format!(" {error} "), style)))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, error_area);
    }

    let help = if form.submitting {
        busy.to_string()
    } else {
        format!("Tab move · {action} · {SWITCH_AUTH_SHORTCUT} {switch_to} · Esc back")
    };
    draw_help_text(frame, chunks[chunks.len() - 1], &help);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_counts_characters() {
        assert_eq!(mask("pässword"), "••••••••");
        assert_eq!(mask(""), "");
    }
}
