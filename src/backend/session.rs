//! Session state shared between the auth client and the views

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

/// The authenticated account, as far as the client cares
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// What the client currently knows about the session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// The first lookup has not resolved yet
    #[default]
    Unknown,
    Present(User),
    Absent,
}

impl SessionState {
    pub fn from_user(user: Option<User>) -> Self {
        match user {
            Some(user) => Self::Present(user),
            None => Self::Absent,
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Present(user) => Some(user),
            _ => None,
        }
    }
}

/// Push-updated session value.
///
/// The auth client owns the writing side and publishes every sign-in,
/// sign-out and lookup result. Views only ever hold a
/// [`SessionSubscription`] and react to its transitions.
#[derive(Debug, Clone)]
pub struct SessionWatch {
    sender: Arc<watch::Sender<SessionState>>,
}

impl SessionWatch {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(SessionState::Unknown);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Publish a new session state to every subscriber
    pub fn publish(&self, state: SessionState) {
        self.sender.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                tracing::debug!(?state, "Session state changed");
                *current = state;
                true
            }
        });
    }

    /// Latest published state
    pub fn current(&self) -> SessionState {
        self.sender.borrow().clone()
    }

    /// Subscribe to session changes; drop the subscription to unsubscribe
    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for SessionWatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side of [`SessionWatch`]
#[derive(Debug)]
pub struct SessionSubscription {
    receiver: watch::Receiver<SessionState>,
}

impl SessionSubscription {
    /// Latest state without marking it seen
    pub fn current(&self) -> SessionState {
        self.receiver.borrow().clone()
    }

    /// Returns the new state if it changed since the last call
    pub fn poll_change(&mut self) -> Option<SessionState> {
        match self.receiver.has_changed() {
            Ok(true) => Some(self.receiver.borrow_and_update().clone()),
            _ => None,
        }
    }
}
