//! Form state for the wizard steps and the auth pages

use super::field::FieldEditor;
use super::schema::FieldKey;
use crate::state::validation::ValidationResult;
use serde::de::{Deserializer, Error as _};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Trait for common form operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
}

/// Field values for one wizard step. `""` means unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDraft<K: FieldKey> {
    values: HashMap<K, String>,
}

impl<K: FieldKey> StepDraft<K> {
    /// Every schema field present and unset
    pub fn new() -> Self {
        Self {
            values: K::ALL.iter().map(|k| (*k, String::new())).collect(),
        }
    }

    pub fn get(&self, field: K) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: K, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn value_mut(&mut self, field: K) -> &mut String {
        self.values.entry(field).or_default()
    }

    /// Values in schema order
    pub fn iter(&self) -> impl Iterator<Item = (K, &str)> + '_ {
        K::ALL.iter().map(move |k| (*k, self.get(*k)))
    }
}

impl<K: FieldKey> Default for StepDraft<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Persisted as a flat JSON object keyed by the schema's persisted keys
impl<K: FieldKey> Serialize for StepDraft<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(K::ALL.len()))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.key(), value)?;
        }
        map.end()
    }
}

/// Unknown keys are ignored and missing keys load as unset
impl<'de, K: FieldKey> Deserialize<'de> for StepDraft<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: HashMap<String, String> = HashMap::deserialize(deserializer)
            .map_err(|e| D::Error::custom(format!("draft must be a string map: {e}")))?;
        let mut draft = Self::new();
        for (key, value) in raw {
            if let Some(field) = K::from_key(&key) {
                draft.set(field, value);
            }
        }
        Ok(draft)
    }
}

/// In-memory state of one wizard step while it is being edited
#[derive(Debug, Clone)]
pub struct StepForm<K: FieldKey> {
    pub draft: StepDraft<K>,
    pub errors: ValidationResult<K>,
    pub active_field_index: usize,
}

impl<K: FieldKey> StepForm<K> {
    pub fn new() -> Self {
        Self::from_draft(StepDraft::new())
    }

    pub fn from_draft(draft: StepDraft<K>) -> Self {
        Self {
            draft,
            errors: ValidationResult::empty(),
            active_field_index: 0,
        }
    }

    pub fn active_key(&self) -> K {
        K::ALL[self.active_field_index.min(K::ALL.len() - 1)]
    }

    /// Focus a field, e.g. the first invalid one after validation
    pub fn focus(&mut self, field: K) {
        self.active_field_index = field.index();
    }

    /// Replace one field's value
    #[cfg(test)]
    pub fn edit(&mut self, field: K, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    pub fn push_char(&mut self, c: char) {
        let field = self.active_key();
        FieldEditor::new(field.spec()).push_char(self.draft.value_mut(field), c);
    }

    pub fn pop_char(&mut self) {
        let field = self.active_key();
        FieldEditor::new(field.spec()).pop_char(self.draft.value_mut(field));
    }

    pub fn cycle_option(&mut self, forward: bool) {
        let field = self.active_key();
        FieldEditor::new(field.spec()).cycle_option(self.draft.value_mut(field), forward);
    }

    pub fn error_for(&self, field: K) -> Option<&str> {
        self.errors.get(field)
    }
}

impl<K: FieldKey> Default for StepForm<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: FieldKey> Form for StepForm<K> {
    fn field_count(&self) -> usize {
        K::ALL.len()
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(K::ALL.len() - 1);
    }
}

/// Which auth page a form belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

/// Focus target on an auth form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthFocus {
    #[default]
    Email,
    Password,
    ConfirmPassword,
    /// The inline error message, for screen-reader users
    Error,
}

/// Login / register form
#[derive(Debug, Clone)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub focus: AuthFocus,
    pub error: Option<String>,
    pub submitting: bool,
    /// Already-validated return destination
    pub next: String,
}

impl AuthForm {
    pub fn new(mode: AuthMode, next: String) -> Self {
        Self {
            mode,
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            focus: AuthFocus::Email,
            error: None,
            submitting: false,
            next,
        }
    }

    fn fields(&self) -> &'static [AuthFocus] {
        match self.mode {
            AuthMode::Login => &[AuthFocus::Email, AuthFocus::Password],
            AuthMode::Register => &[
                AuthFocus::Email,
                AuthFocus::Password,
                AuthFocus::ConfirmPassword,
            ],
        }
    }

    fn active_value_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            AuthFocus::Email => Some(&mut self.email),
            AuthFocus::Password => Some(&mut self.password),
            AuthFocus::ConfirmPassword => Some(&mut self.confirm_password),
            AuthFocus::Error => None,
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(value) = self.active_value_mut() {
            value.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(value) = self.active_value_mut() {
            value.pop();
        }
    }

    /// Show an error and move focus to the given target
    pub fn show_error(&mut self, message: impl Into<String>, focus: AuthFocus) {
        self.error = Some(message.into());
        self.focus = focus;
    }
}

impl Form for AuthForm {
    fn field_count(&self) -> usize {
        self.fields().len()
    }
    fn active_field(&self) -> usize {
        self.fields()
            .iter()
            .position(|f| *f == self.focus)
            .unwrap_or(0)
    }
    fn set_active_field(&mut self, index: usize) {
        let fields = self.fields();
        self.focus = fields[index.min(fields.len() - 1)];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::{BasicField, DetailsField};
    use pretty_assertions::assert_eq;

    mod step_draft {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_new_has_every_field_unset() {
            let draft = StepDraft::<BasicField>::new();
            assert!(draft.iter().all(|(_, v)| v.is_empty()));
            assert_eq!(draft.iter().count(), 4);
        }

        #[test]
        fn test_serializes_with_persisted_keys() {
            let mut draft = StepDraft::<BasicField>::new();
            draft.set(BasicField::ApplianceType, "Oven");
            let json: serde_json::Value = serde_json::to_value(&draft).unwrap();
            assert_eq!(json["applianceType"], "Oven");
            assert_eq!(json["brand"], "");
        }

        #[test]
        fn test_deserialize_fills_missing_and_ignores_unknown() {
            let draft: StepDraft<DetailsField> =
                serde_json::from_str(r#"{"price":"10","createdAt":"x"}"#).unwrap();
            assert_eq!(draft.get(DetailsField::Price), "10");
            assert_eq!(draft.get(DetailsField::Location), "");
        }

        #[test]
        fn test_deserialize_rejects_non_string_values() {
            let result: Result<StepDraft<DetailsField>, _> =
                serde_json::from_str(r#"{"price":10}"#);
            assert!(result.is_err());
        }

        #[test]
        fn test_deserialize_rejects_non_object() {
            let result: Result<StepDraft<DetailsField>, _> = serde_json::from_str("[1,2]");
            assert!(result.is_err());
        }
    }

    mod step_form {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_next_field_wraps() {
            let mut form = StepForm::<BasicField>::new();
            for _ in 0..4 {
                form.next_field();
            }
            assert_eq!(form.active_field(), 0);
        }

        #[test]
        fn test_prev_field_wraps() {
            let mut form = StepForm::<BasicField>::new();
            form.prev_field();
            assert_eq!(form.active_key(), BasicField::ShortDescription);
        }

        #[test]
        fn test_edit_touches_exactly_one_key() {
            let mut form = StepForm::<DetailsField>::new();
            let before = form.draft.clone();
            form.edit(DetailsField::Location, "Cork");
            let changed: Vec<_> = form
                .draft
                .iter()
                .filter(|(k, v)| before.get(*k) != *v)
                .map(|(k, _)| k)
                .collect();
            assert_eq!(changed, vec![DetailsField::Location]);
        }

        #[test]
        fn test_typing_goes_to_active_field() {
            let mut form = StepForm::<DetailsField>::new();
            form.focus(DetailsField::Price);
            form.push_char('9');
            form.push_char('9');
            form.pop_char();
            assert_eq!(form.draft.get(DetailsField::Price), "9");
        }

        #[test]
        fn test_cycle_option_on_active_select() {
            let mut form = StepForm::<DetailsField>::new();
            form.cycle_option(true);
            assert_eq!(form.draft.get(DetailsField::Condition), "New");
        }
    }

    mod auth_form {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_login_has_two_fields() {
            let mut form = AuthForm::new(AuthMode::Login, "/".to_string());
            assert_eq!(form.field_count(), 2);
            form.next_field();
            form.next_field();
            assert_eq!(form.focus, AuthFocus::Email);
        }

        #[test]
        fn test_register_has_confirm_field() {
            let mut form = AuthForm::new(AuthMode::Register, "/".to_string());
            form.prev_field();
            assert_eq!(form.focus, AuthFocus::ConfirmPassword);
        }

        #[test]
        fn test_typing_into_focused_field() {
            let mut form = AuthForm::new(AuthMode::Register, "/".to_string());
            form.push_char('a');
            form.next_field();
            form.push_char('b');
            assert_eq!(form.email, "a");
            assert_eq!(form.password, "b");
        }

        #[test]
        fn test_show_error_moves_focus() {
            let mut form = AuthForm::new(AuthMode::Login, "/".to_string());
            form.show_error("nope", AuthFocus::Error);
            form.push_char('x');
            assert_eq!(form.error.as_deref(), Some("nope"));
            assert!(form.email.is_empty());
            form.next_field();
            assert_eq!(form.focus, AuthFocus::Password);
        }
    }
}
