//! Application state definitions

use super::forms::{AuthForm, BasicField, DetailsField};
use super::submission::ReviewController;
use super::wizard::StepController;
use crate::backend::SessionState;
use std::collections::VecDeque;
use std::fmt;
use url::form_urlencoded;

/// Location paths, kept identical to the web routes so `next` values interoperate
pub mod paths {
    pub const HOME: &str = "/";
    pub const LOGIN: &str = "/login";
    pub const REGISTER: &str = "/register";
    pub const BASIC_INFO: &str = "/create-listing/basic-info";
    pub const ADDITIONAL_DETAILS: &str = "/create-listing/additional-details";
    pub const CONFIRMATION: &str = "/create-listing/listing-confirmation";
}

/// Addressable pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    Login,
    Register,
    BasicInfo,
    AdditionalDetails,
    Confirmation,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => paths::HOME,
            Self::Login => paths::LOGIN,
            Self::Register => paths::REGISTER,
            Self::BasicInfo => paths::BASIC_INFO,
            Self::AdditionalDetails => paths::ADDITIONAL_DETAILS,
            Self::Confirmation => paths::CONFIRMATION,
        }
    }

    /// Unknown paths resolve to Home
    pub fn from_path(path: &str) -> Self {
        match path {
            paths::LOGIN => Self::Login,
            paths::REGISTER => Self::Register,
            paths::BASIC_INFO => Self::BasicInfo,
            paths::ADDITIONAL_DETAILS => Self::AdditionalDetails,
            paths::CONFIRMATION => Self::Confirmation,
            _ => Self::Home,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Login => "Sign In",
            Self::Register => "Create Account",
            Self::BasicInfo | Self::AdditionalDetails => "Create a Listing",
            Self::Confirmation => "Review your details",
        }
    }

    /// Pages that belong to the listing wizard
    pub fn is_wizard_step(self) -> bool {
        matches!(
            self,
            Self::BasicInfo | Self::AdditionalDetails | Self::Confirmation
        )
    }

    /// Login and register bounce signed-in users away
    pub fn is_auth_page(self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }
}

/// A route plus its optional return destination
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub route: Route,
    /// Raw (decoded, unvalidated) `next` parameter
    pub next: Option<String>,
}

impl Location {
    pub fn new(route: Route) -> Self {
        Self { route, next: None }
    }

    pub fn with_next(route: Route, next: impl Into<String>) -> Self {
        Self {
            route,
            next: Some(next.into()),
        }
    }

    /// Parse `path[?query]`. Only the `next` query parameter is kept.
    pub fn parse(raw: &str) -> Self {
        let (path, query) = match raw.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (raw, None),
        };
        let next = query.and_then(|q| {
            form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == "next")
                .map(|(_, value)| value.into_owned())
        });
        Self {
            route: Route::from_path(path),
            next,
        }
    }
}

impl From<Route> for Location {
    fn from(route: Route) -> Self {
        Self::new(route)
    }
}

/// Renders as `path?next=<percent-encoded>`
impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route.path())?;
        if let Some(next) = &self.next {
            let query = form_urlencoded::Serializer::new(String::new())
                .append_pair("next", next)
                .finish();
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}

/// State of the page currently on screen
#[derive(Debug, Default)]
pub enum Page {
    /// A gated page waiting for the session to resolve; renders nothing
    Loading(Route),
    #[default]
    Home,
    Login(AuthForm),
    Register(AuthForm),
    BasicInfo(StepController<BasicField>),
    AdditionalDetails(StepController<DetailsField>),
    Confirmation(ReviewController),
}

#[cfg(test)]
impl Page {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading(_))
    }
}

/// Main application state
#[derive(Debug, Default)]
pub struct AppState {
    // Navigation
    pub location: Location,
    pub history: Vec<Location>,
    pub page: Page,

    // Session as last published by the auth client
    pub session: SessionState,

    // Feedback
    pub error_queue: VecDeque<String>,
    pub status_message: Option<String>,
}

impl AppState {
    /// Record the current location in history and move to `location`
    pub fn push_location(&mut self, location: Location) {
        let previous = std::mem::replace(&mut self.location, location);
        self.history.push(previous);
    }

    /// Move to `location` without a history entry
    pub fn replace_location(&mut self, location: Location) {
        self.location = location;
    }

    /// Pop the history; Home when it is empty
    pub fn back_location(&mut self) -> Location {
        let previous = self.history.pop().unwrap_or_default();
        self.location = previous.clone();
        previous
    }

    /// Queue an error for the error dialog
    pub fn push_error(&mut self, message: String) {
        self.error_queue.push_back(message);
    }

    /// Error currently shown, if any
    pub fn current_error(&self) -> Option<&str> {
        self.error_queue.front().map(String::as_str)
    }

    pub fn dismiss_error(&mut self) {
        self.error_queue.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    mod route {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_paths_round_trip() {
            for route in [
                Route::Home,
                Route::Login,
                Route::Register,
                Route::BasicInfo,
                Route::AdditionalDetails,
                Route::Confirmation,
            ] {
                assert_eq!(Route::from_path(route.path()), route);
            }
        }

        #[test]
        fn test_unknown_path_is_home() {
            assert_eq!(Route::from_path("/listings"), Route::Home);
            assert_eq!(Route::from_path(""), Route::Home);
        }

        #[test]
        fn test_wizard_and_auth_pages() {
            assert!(Route::AdditionalDetails.is_wizard_step());
            assert!(!Route::Login.is_wizard_step());
            assert!(Route::Register.is_auth_page());
            assert!(!Route::Home.is_auth_page());
        }
    }

    mod location {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_display_encodes_next() {
            let location = Location::with_next(Route::Login, paths::CONFIRMATION);
            assert_eq!(
                location.to_string(),
                "/login?next=%2Fcreate-listing%2Flisting-confirmation"
            );
        }

        #[test]
        fn test_display_without_next() {
            assert_eq!(Location::new(Route::BasicInfo).to_string(), paths::BASIC_INFO);
        }

        #[test]
        fn test_parse_decodes_next() {
            let location = Location::parse("/login?next=%2Fcreate-listing%2Flisting-confirmation");
            assert_eq!(location.route, Route::Login);
            assert_eq!(location.next.as_deref(), Some(paths::CONFIRMATION));
        }

        #[test]
        fn test_parse_ignores_other_params() {
            let location = Location::parse("/register?email=a%40b.c&next=%2F");
            assert_eq!(location.route, Route::Register);
            assert_eq!(location.next.as_deref(), Some("/"));
        }

        #[test]
        fn test_parse_display_round_trip() {
            let location = Location::with_next(Route::Register, "/create-listing/basic-info");
            assert_eq!(Location::parse(&location.to_string()), location);
        }
    }

    mod navigation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_push_records_history() {
            let mut state = AppState::default();
            state.push_location(Route::BasicInfo.into());
            assert_eq!(state.location.route, Route::BasicInfo);
            assert_eq!(state.history, vec![Location::new(Route::Home)]);
        }

        #[test]
        fn test_replace_does_not_record_history() {
            let mut state = AppState::default();
            state.replace_location(Route::Login.into());
            assert!(state.history.is_empty());
        }

        #[test]
        fn test_back_pops_and_defaults_to_home() {
            let mut state = AppState::default();
            state.push_location(Route::BasicInfo.into());
            state.push_location(Route::AdditionalDetails.into());
            assert_eq!(state.back_location().route, Route::BasicInfo);
            assert_eq!(state.back_location().route, Route::Home);
            assert_eq!(state.back_location().route, Route::Home);
        }
    }

    mod errors {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_error_queue_is_fifo() {
            let mut state = AppState::default();
            state.push_error("first".to_string());
            state.push_error("second".to_string());
            assert_eq!(state.current_error(), Some("first"));
            state.dismiss_error();
            assert_eq!(state.current_error(), Some("second"));
            state.dismiss_error();
            assert!(state.current_error().is_none());
        }
    }
}
