//! Backend error type and user-facing auth messages

use thiserror::Error;

/// Errors raised while talking to the remote data store
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request never produced a response
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with an error payload
    #[error("{message}")]
    Provider { status: u16, message: String },

    /// The response body did not have the expected shape
    #[error("unexpected response: {0}")]
    Decode(String),

    /// No project URL or anon key configured
    #[error("backend is not configured: {0}")]
    NotConfigured(&'static str),

    /// Reading or writing the persisted session failed
    #[error("session storage: {0}")]
    SessionStorage(#[from] std::io::Error),
}

impl BackendError {
    /// Raw provider text, used for logging and message mapping
    pub fn provider_message(&self) -> String {
        match self {
            Self::Provider { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Which auth operation failed; picks the fallback text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorContext {
    SignIn,
    SignUp,
}

pub const EMAIL_ALREADY_REGISTERED: &str =
    "This email is already registered. Try logging in instead.";
pub const PASSWORD_REQUIREMENTS: &str = "Your password doesn't meet the requirements.";
pub const GENERIC_SIGNUP_ERROR: &str = "We couldn't sign you up. Please try again.";
pub const INVALID_CREDENTIALS: &str = "Incorrect email or password. Please try again.";
pub const GENERIC_LOGIN_ERROR: &str = "We couldn't sign you in. Please try again.";

/// Map a raw provider message onto the fixed set of user-facing strings
pub fn auth_error_message(raw: &str, context: AuthErrorContext) -> &'static str {
    let m = raw.to_lowercase();

    if m.contains("already") && m.contains("registered") {
        return EMAIL_ALREADY_REGISTERED;
    }
    if m.contains("password") {
        return PASSWORD_REQUIREMENTS;
    }
    if m.contains("invalid") || m.contains("credentials") {
        return INVALID_CREDENTIALS;
    }
    if m.contains("signin") || m.contains("login") {
        return GENERIC_LOGIN_ERROR;
    }

    match context {
        AuthErrorContext::SignIn => GENERIC_LOGIN_ERROR,
        AuthErrorContext::SignUp => GENERIC_SIGNUP_ERROR,
    }
}
