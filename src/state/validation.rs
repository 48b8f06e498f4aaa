//! Step draft validation

use super::forms::{FieldFormat, FieldKey, StepDraft};
use once_cell::sync::Lazy;
use regex::Regex;

/// Optional whole part, optional fraction of one or two ASCII digits
static MONEY_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[0-9]*(\.[0-9]{1,2})?$").ok());

/// Field errors for one validation pass.
///
/// Only invalid fields appear; entries are in schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult<K: FieldKey> {
    errors: Vec<(K, String)>,
}

impl<K: FieldKey> ValidationResult<K> {
    pub fn empty() -> Self {
        Self { errors: Vec::new() }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: K) -> Option<&str> {
        self.errors
            .iter()
            .find(|(k, _)| *k == field)
            .map(|(_, message)| message.as_str())
    }

    /// First invalid field in schema order
    pub fn first_invalid(&self) -> Option<K> {
        self.errors.first().map(|(k, _)| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &str)> {
        self.errors.iter().map(|(k, m)| (*k, m.as_str()))
    }
}

impl<K: FieldKey> Default for ValidationResult<K> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Whether a trimmed, non-empty value is a valid money amount
pub fn is_money(value: &str) -> bool {
    MONEY_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(value))
}

/// Validate every field of a step draft.
///
/// Each field is required. Money fields must additionally match the money
/// pattern; that check only runs once the required check passes.
pub fn validate<K: FieldKey>(draft: &StepDraft<K>) -> ValidationResult<K> {
    let mut errors = Vec::new();

    for &field in K::ALL {
        let spec = field.spec();
        let value = draft.get(field).trim();

        if value.is_empty() {
            errors.push((field, format!("{} is required.", spec.label)));
        } else if spec.format == FieldFormat::Money && !is_money(value) {
            errors.push((
                field,
                format!("{} must be a valid number (e.g., 12.99).", spec.label),
            ));
        }
    }

    ValidationResult { errors }
}
