//! Remote data store and authentication service
//!
//! The marketplace keeps accounts and listings in a Supabase-compatible
//! backend. This module wraps it behind [`MarketplaceBackend`] so the
//! wizard and the auth gates can be exercised against a mock.

mod client;
mod errors;
mod session;
mod traits;

pub use client::SupabaseClient;
pub use errors::{auth_error_message, AuthErrorContext, BackendError};
pub use session::{SessionState, SessionSubscription, SessionWatch, User};
pub use traits::MarketplaceBackend;

#[cfg(test)]
pub use traits::MockMarketplaceBackend;
