//! HTTP client for the Supabase-compatible data store
//!
//! Speaks the GoTrue auth endpoints and the PostgREST insert endpoint.
//! The authenticated session is kept in memory, mirrored to a JSON file
//! so a restart keeps the user signed in, and published through
//! [`SessionWatch`] on every change.

use super::errors::BackendError;
use super::session::{SessionState, SessionWatch, User};
use super::traits::MarketplaceBackend;
use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tokio::sync::RwLock;
use url::Url;

/// Tokens and user returned by a successful sign-in
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AuthSession {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    user: User,
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Client for the remote data store
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: Option<Url>,
    anon_key: Option<String>,
    session: RwLock<Option<AuthSession>>,
    session_path: Option<PathBuf>,
    watch: SessionWatch,
}

impl SupabaseClient {
    /// Create a client. `session_path` is where the signed-in session is mirrored.
    pub fn new(
        base_url: Option<&str>,
        anon_key: Option<String>,
        session_path: Option<PathBuf>,
        watch: SessionWatch,
    ) -> Result<Self, BackendError> {
        let base_url = match base_url {
            Some(raw) => {
                let mut url = Url::parse(raw)
                    .map_err(|e| BackendError::Decode(format!("project url: {e}")))?;
                // Endpoints are joined relative to the project root
                if !url.path().ends_with('/') {
                    let path = format!("{}/", url.path());
                    url.set_path(&path);
                }
                Some(url)
            }
            None => None,
        };

        let http = reqwest::Client::builder()
            .user_agent(concat!("listing-tui/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            anon_key,
            session: RwLock::new(None),
            session_path,
            watch,
        })
    }

    /// Load the mirrored session, if any, and publish the result.
    ///
    /// This is a local read only; the session is verified against the
    /// server by [`MarketplaceBackend::current_user`].
    pub async fn restore_session(&self) {
        let restored = self.read_session_file();
        let state = SessionState::from_user(restored.as_ref().map(|s| s.user.clone()));
        *self.session.write().await = restored;
        self.watch.publish(state);
    }

    fn read_session_file(&self) -> Option<AuthSession> {
        let path = self.session_path.as_ref()?;
        if !path.exists() {
            return None;
        }
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Failed to read session file {}: {}", path.display(), e);
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!("Ignoring malformed session file {}: {}", path.display(), e);
                None
            }
        }
    }

    fn write_session_file(&self, session: &AuthSession) -> Result<(), BackendError> {
        if let Some(path) = &self.session_path {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(session)
                .map_err(|e| BackendError::Decode(e.to_string()))?;
            fs::write(path, content)?;
        }
        Ok(())
    }

    fn remove_session_file(&self) {
        if let Some(path) = &self.session_path {
            if path.exists() {
                if let Err(e) = fs::remove_file(path) {
                    tracing::warn!("Failed to remove session file {}: {}", path.display(), e);
                }
            }
        }
    }

    async fn store_session(&self, session: AuthSession) -> Result<User, BackendError> {
        let user = session.user.clone();
        self.write_session_file(&session)?;
        *self.session.write().await = Some(session);
        self.watch.publish(SessionState::Present(user.clone()));
        Ok(user)
    }

    async fn drop_session(&self) {
        *self.session.write().await = None;
        self.remove_session_file();
        self.watch.publish(SessionState::Absent);
    }

    async fn access_token(&self) -> Option<String> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        let base = self
            .base_url
            .as_ref()
            .ok_or(BackendError::NotConfigured("supabase_url"))?;
        base.join(path)
            .map_err(|e| BackendError::Decode(format!("endpoint {path}: {e}")))
    }

    fn anon_key(&self) -> Result<&str, BackendError> {
        self.anon_key
            .as_deref()
            .ok_or(BackendError::NotConfigured("supabase_anon_key"))
    }

    async fn post_credentials(
        &self,
        path: &str,
        email: &str,
        password: &str,
    ) -> Result<Value, BackendError> {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .post(url)
            .header("apikey", self.anon_key()?)
            .json(&Credentials { email, password })
            .send()
            .await?;

        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }
}

#[async_trait]
impl MarketplaceBackend for SupabaseClient {
    async fn current_user(&self) -> Result<Option<User>, BackendError> {
        let Some(token) = self.access_token().await else {
            self.watch.publish(SessionState::Absent);
            return Ok(None);
        };

        let url = self.endpoint("auth/v1/user")?;
        let response = self
            .http
            .get(url)
            .header("apikey", self.anon_key()?)
            .bearer_auth(token)
            .send()
            .await?;

        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            tracing::info!("Stored session was rejected, signing out locally");
            self.drop_session().await;
            return Ok(None);
        }

        let user: User = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        if let Some(session) = self.session.write().await.as_mut() {
            session.user = user.clone();
        }
        self.watch.publish(SessionState::Present(user.clone()));
        Ok(Some(user))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, BackendError> {
        let body = self
            .post_credentials("auth/v1/token?grant_type=password", email, password)
            .await?;
        let session: AuthSession =
            serde_json::from_value(body).map_err(|e| BackendError::Decode(e.to_string()))?;
        tracing::info!(user_id = %session.user.id, "Signed in");
        self.store_session(session).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<User>, BackendError> {
        let body = self.post_credentials("auth/v1/signup", email, password).await?;

        // Without email confirmation the provider opens a session immediately;
        // otherwise it returns only the pending user.
        if body.get("access_token").is_some() {
            let session: AuthSession =
                serde_json::from_value(body).map_err(|e| BackendError::Decode(e.to_string()))?;
            tracing::info!(user_id = %session.user.id, "Signed up");
            return self.store_session(session).await.map(Some);
        }

        tracing::info!("Signed up, confirmation pending");
        Ok(None)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        let token = self.access_token().await;
        // The local session goes away whatever the server says
        self.drop_session().await;

        let Some(token) = token else {
            return Ok(());
        };
        let url = self.endpoint("auth/v1/logout")?;
        let response = self
            .http
            .post(url)
            .header("apikey", self.anon_key()?)
            .bearer_auth(token)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn insert_record(&self, table: &str, payload: Value) -> Result<(), BackendError> {
        let url = self.endpoint(&format!("rest/v1/{table}"))?;
        let anon_key = self.anon_key()?;
        let token = self
            .access_token()
            .await
            .unwrap_or_else(|| anon_key.to_string());

        let response = self
            .http
            .post(url)
            .header("apikey", anon_key)
            .header("Prefer", "return=minimal")
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

/// Turn a non-success response into [`BackendError::Provider`]
async fn check_status(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = provider_message(status, &body);
    tracing::warn!(status = status.as_u16(), "Backend request failed: {}", message);
    Err(BackendError::Provider {
        status: status.as_u16(),
        message,
    })
}

/// Pull the human-readable message out of an error body
fn provider_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["error_description", "msg", "message", "error"] {
            if let Some(Value::String(message)) = map.get(key) {
                if !message.is_empty() {
                    return message.clone();
                }
            }
        }
    }
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn client_with(session_path: Option<PathBuf>, watch: SessionWatch) -> SupabaseClient {
        SupabaseClient::new(
            Some("https://project.supabase.co/"),
            Some("anon".to_string()),
            session_path,
            watch,
        )
        .unwrap()
    }

    mod provider_message {
        use super::*;

        #[test]
        fn test_prefers_error_description() {
            let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
            assert_eq!(
                provider_message(StatusCode::BAD_REQUEST, body),
                "Invalid login credentials"
            );
        }

        #[test]
        fn test_reads_msg() {
            let body = r#"{"code":422,"msg":"User already registered"}"#;
            assert_eq!(
                provider_message(StatusCode::UNPROCESSABLE_ENTITY, body),
                "User already registered"
            );
        }

        #[test]
        fn test_reads_postgrest_message() {
            let body = r#"{"code":"23502","message":"null value in column \"price\""}"#;
            assert_eq!(
                provider_message(StatusCode::BAD_REQUEST, body),
                "null value in column \"price\""
            );
        }

        #[test]
        fn test_falls_back_to_status_text() {
            assert_eq!(
                provider_message(StatusCode::SERVICE_UNAVAILABLE, "<html>"),
                "Service Unavailable"
            );
        }
    }

    mod configuration {
        use super::*;

        #[test]
        fn test_rejects_bad_project_url() {
            let result = SupabaseClient::new(Some("not a url"), None, None, SessionWatch::new());
            assert!(matches!(result, Err(BackendError::Decode(_))));
        }

        #[tokio::test]
        async fn test_insert_without_url_is_not_configured() {
            let client = SupabaseClient::new(None, None, None, SessionWatch::new()).unwrap();
            let result = client.insert_record("listings", Value::Null).await;
            assert!(matches!(
                result,
                Err(BackendError::NotConfigured("supabase_url"))
            ));
        }

        #[test]
        fn test_endpoint_joins_relative_path() {
            let client = client_with(None, SessionWatch::new());
            let url = client.endpoint("rest/v1/listings").unwrap();
            assert_eq!(url.as_str(), "https://project.supabase.co/rest/v1/listings");
        }
    }

    mod session_persistence {
        use super::*;

        #[tokio::test]
        async fn test_restore_without_file_publishes_absent() {
            let dir = tempdir().unwrap();
            let watch = SessionWatch::new();
            let client = client_with(Some(dir.path().join("session.json")), watch.clone());
            client.restore_session().await;
            assert_eq!(watch.current(), SessionState::Absent);
        }

        #[tokio::test]
        async fn test_stored_session_survives_restart() {
            let dir = tempdir().unwrap();
            let path = dir.path().join("session.json");
            let user = User {
                id: "user-9".to_string(),
                email: None,
            };

            let first = client_with(Some(path.clone()), SessionWatch::new());
            first
                .store_session(AuthSession {
                    access_token: "token".to_string(),
                    refresh_token: None,
                    user: user.clone(),
                })
                .await
                .unwrap();

            let watch = SessionWatch::new();
            let second = client_with(Some(path), watch.clone());
            second.restore_session().await;
            assert_eq!(watch.current(), SessionState::Present(user));
            assert_eq!(second.access_token().await.as_deref(), Some("token"));
        }

        #[tokio::test]
        async fn test_malformed_session_file_is_ignored() {
            let dir = tempdir().unwrap();
            let path = dir.path().join("session.json");
            fs::write(&path, "{not json").unwrap();
            let watch = SessionWatch::new();
            let client = client_with(Some(path), watch.clone());
            client.restore_session().await;
            assert_eq!(watch.current(), SessionState::Absent);
        }

        #[tokio::test]
        async fn test_sign_out_without_session_clears_locally() {
            let dir = tempdir().unwrap();
            let watch = SessionWatch::new();
            let client = client_with(Some(dir.path().join("session.json")), watch.clone());
            client.sign_out().await.unwrap();
            assert_eq!(watch.current(), SessionState::Absent);
        }

        #[tokio::test]
        async fn test_current_user_without_token_is_none() {
            let watch = SessionWatch::new();
            let client = client_with(None, watch.clone());
            assert!(client.current_user().await.unwrap().is_none());
            assert_eq!(watch.current(), SessionState::Absent);
        }
    }
}
