//! Trait abstraction for the remote data store to enable mocking in tests

use super::errors::BackendError;
use super::session::User;
use async_trait::async_trait;

/// Account and record operations the listing flow consumes
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketplaceBackend: Send + Sync {
    /// Look up the signed-in user, if any
    async fn current_user(&self) -> Result<Option<User>, BackendError>;

    /// Sign in with email and password
    async fn sign_in(&self, email: &str, password: &str) -> Result<User, BackendError>;

    /// Create an account. Returns the user when the provider opened a session right away.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<User>, BackendError>;

    /// End the current session
    async fn sign_out(&self) -> Result<(), BackendError>;

    /// Insert one record into a table
    async fn insert_record(
        &self,
        table: &str,
        payload: serde_json::Value,
    ) -> Result<(), BackendError>;
}
