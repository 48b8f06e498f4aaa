//! Form domain layer
//!
//! Strongly typed field schema and the editable state of the wizard
//! steps and the login/register pages.

mod field;
mod form_state;
mod schema;

pub use field::FieldEditor;
pub use form_state::{AuthFocus, AuthForm, AuthMode, Form, StepDraft, StepForm};
pub use schema::{BasicField, DetailsField, FieldFormat, FieldKey, FieldKind};
