//! Session gating and return-destination safety

use super::app_state::{paths, Location, Route};
use crate::backend::{SessionState, User};
use url::Url;

/// What a gated page should do for the current session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Session unknown; render nothing yet
    Pending,
    Allow(User),
    Redirect(Location),
}

/// Login location that returns to `target` afterwards
pub fn login_location(target: Route) -> Location {
    Location::with_next(Route::Login, target.path())
}

/// Gate a page on an authenticated session.
///
/// The `next` parameter is attached unvalidated; it is checked with
/// [`safe_next`] where it is consumed.
pub fn require_auth(session: &SessionState, target: Route) -> GateDecision {
    match session {
        SessionState::Unknown => GateDecision::Pending,
        SessionState::Present(user) => GateDecision::Allow(user.clone()),
        SessionState::Absent => {
            tracing::debug!("No session for {}, redirecting to login", target.path());
            GateDecision::Redirect(login_location(target))
        }
    }
}

/// Reverse gate for login and register: a signed-in user is sent to
/// `destination` instead. `None` means stay (or keep waiting while unknown).
pub fn redirect_if_authenticated(session: &SessionState, destination: &str) -> Option<Location> {
    match session {
        SessionState::Present(_) => Some(Location::parse(destination)),
        SessionState::Unknown | SessionState::Absent => None,
    }
}

/// Accept `next` only as a site-relative path, otherwise use `fallback`.
///
/// A relative path starts with exactly one `/` and does not parse as an
/// absolute URL on its own.
pub fn safe_next(next: Option<&str>, fallback: &str) -> String {
    let Some(candidate) = next.map(str::trim).filter(|n| !n.is_empty()) else {
        return fallback.to_string();
    };
    if Url::parse(candidate).is_ok() {
        tracing::warn!("Rejected absolute return destination {candidate:?}");
        return fallback.to_string();
    }
    if candidate.starts_with('/') && !candidate.starts_with("//") && !candidate.contains('\\') {
        candidate.to_string()
    } else {
        tracing::warn!("Rejected return destination {candidate:?}");
        fallback.to_string()
    }
}

/// [`safe_next`] with Home as the fallback
pub fn safe_next_or_home(next: Option<&str>) -> String {
    safe_next(next, paths::HOME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn user() -> User {
        User {
            id: "u-42".to_string(),
            email: None,
        }
    }

    mod gate {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_unknown_session_is_pending() {
            assert_eq!(
                require_auth(&SessionState::Unknown, Route::Confirmation),
                GateDecision::Pending
            );
        }

        #[test]
        fn test_present_session_allows() {
            assert_eq!(
                require_auth(&SessionState::Present(user()), Route::Confirmation),
                GateDecision::Allow(user())
            );
        }

        #[test]
        fn test_scenario_d_absent_redirects_with_encoded_next() {
            let decision = require_auth(&SessionState::Absent, Route::Confirmation);
            let GateDecision::Redirect(location) = decision else {
                panic!("expected redirect, got {decision:?}");
            };
            assert_eq!(location.route, Route::Login);
            assert_eq!(location.next.as_deref(), Some(paths::CONFIRMATION));
            assert_eq!(
                location.to_string(),
                "/login?next=%2Fcreate-listing%2Flisting-confirmation"
            );
        }
    }

    mod reverse_gate {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_signed_in_user_leaves_login() {
            let target =
                redirect_if_authenticated(&SessionState::Present(user()), paths::BASIC_INFO);
            assert_eq!(target, Some(Location::new(Route::BasicInfo)));
        }

        #[test]
        fn test_waits_or_stays_without_session() {
            assert_eq!(redirect_if_authenticated(&SessionState::Unknown, "/"), None);
            assert_eq!(redirect_if_authenticated(&SessionState::Absent, "/"), None);
        }
    }

    mod next_param {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_relative_path_accepted() {
            assert_eq!(
                safe_next_or_home(Some(paths::CONFIRMATION)),
                paths::CONFIRMATION
            );
            assert_eq!(safe_next_or_home(Some("/")), "/");
        }

        #[test]
        fn test_scenario_e_absolute_url_rejected() {
            assert_eq!(safe_next_or_home(Some("http://evil.example/x")), "/");
        }

        #[test]
        fn test_protocol_relative_rejected() {
            assert_eq!(safe_next_or_home(Some("//evil.example/x")), "/");
            assert_eq!(safe_next_or_home(Some("/\\evil.example")), "/");
        }

        #[test]
        fn test_other_schemes_rejected() {
            assert_eq!(safe_next_or_home(Some("javascript:alert(1)")), "/");
            assert_eq!(safe_next_or_home(Some("mailto:a@b.c")), "/");
        }

        #[test]
        fn test_bare_words_and_empty_use_fallback() {
            assert_eq!(safe_next(Some("create-listing"), "/x"), "/x");
            assert_eq!(safe_next(Some(""), "/x"), "/x");
            assert_eq!(safe_next(None, "/x"), "/x");
        }
    }
}
