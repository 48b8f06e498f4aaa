//! Credential input checks for the register and login forms

use super::forms::AuthFocus;
use once_cell::sync::Lazy;
use regex::Regex;

pub const PASSWORD_MIN_LENGTH: usize = 8;

pub const EMAIL_REQUIRED: &str = "Please enter your email address.";
pub const EMAIL_INVALID: &str = "Please enter a valid email address.";
pub const PASSWORD_REQUIRED: &str = "Please enter your password.";
pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match.";

/// Local part, `@`, and a domain with a dot followed by at least two characters
static EMAIL_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$").ok());

/// Trim and lower-case an email address
pub fn sanitise_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(email))
}

pub fn is_password_strong_enough(password: &str) -> bool {
    password.chars().count() >= PASSWORD_MIN_LENGTH
}

pub fn password_too_short_message() -> String {
    format!("Your password must be at least {PASSWORD_MIN_LENGTH} characters long.")
}

/// A failed input check: message plus the field to focus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputError {
    pub message: String,
    pub focus: AuthFocus,
}

impl InputError {
    fn new(message: impl Into<String>, focus: AuthFocus) -> Self {
        Self {
            message: message.into(),
            focus,
        }
    }
}

/// Login only needs both fields filled; the provider judges the rest.
/// Returns the cleaned email on success.
pub fn validate_login(email: &str, password: &str) -> Result<String, InputError> {
    let email = sanitise_email(email);
    if email.is_empty() {
        return Err(InputError::new(EMAIL_REQUIRED, AuthFocus::Email));
    }
    if password.is_empty() {
        return Err(InputError::new(PASSWORD_REQUIRED, AuthFocus::Password));
    }
    Ok(email)
}

/// Check register input in order, stopping at the first failure.
/// Returns the cleaned email on success.
pub fn validate_registration(
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<String, InputError> {
    let email = sanitise_email(email);
    if email.is_empty() {
        return Err(InputError::new(EMAIL_REQUIRED, AuthFocus::Email));
    }
    if !is_valid_email(&email) {
        return Err(InputError::new(EMAIL_INVALID, AuthFocus::Email));
    }
    if !is_password_strong_enough(password) {
        return Err(InputError::new(
            password_too_short_message(),
            AuthFocus::Password,
        ));
    }
    if password != confirm_password {
        return Err(InputError::new(
            PASSWORDS_DO_NOT_MATCH,
            AuthFocus::ConfirmPassword,
        ));
    }
    Ok(email)
}
