//! Single-field editing rules

use super::schema::{FieldKind, FieldSpec};

/// Edits applied to one field's string value according to its schema entry
#[derive(Debug, Clone, Copy)]
pub struct FieldEditor {
    spec: &'static FieldSpec,
}

impl FieldEditor {
    pub fn new(spec: &'static FieldSpec) -> Self {
        Self { spec }
    }

    /// Type a character. Enumerated fields ignore typing.
    pub fn push_char(&self, value: &mut String, c: char) {
        match self.spec.kind {
            FieldKind::FreeText => {
                if c == '\n' && !self.spec.multiline {
                    return;
                }
                value.push(c);
            }
            FieldKind::Enumerated(_) => {}
        }
    }

    /// Delete the last character, or reset an enumerated field to unset
    pub fn pop_char(&self, value: &mut String) {
        match self.spec.kind {
            FieldKind::FreeText => {
                value.pop();
            }
            FieldKind::Enumerated(_) => value.clear(),
        }
    }

    /// Step through the options of an enumerated field.
    ///
    /// Unset sits before the first option, so cycling forward from unset
    /// picks the first option and cycling backward picks the last.
    pub fn cycle_option(&self, value: &mut String, forward: bool) {
        let Some(options) = self.spec.options() else {
            return;
        };
        if options.is_empty() {
            return;
        }
        let current = options.iter().position(|o| *o == value.as_str());
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => options.len() - 1,
            (Some(i), true) => (i + 1) % options.len(),
            (Some(0), false) => options.len() - 1,
            (Some(i), false) => i - 1,
        };
        *value = options[next].to_string();
    }

    /// Text shown for the value while editing
    pub fn display_value(&self, value: &str) -> String {
        match self.spec.kind {
            FieldKind::Enumerated(_) if value.is_empty() => {
                format!("Select {}", self.spec.label.to_lowercase())
            }
            _ => value.to_string(),
        }
    }
}
