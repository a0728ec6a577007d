//! Backend abstraction layer for the hosted service.
//!
//! This module defines the interface to the remote backend: authentication and
//! session handling, table queries, and blob storage. Rows cross the boundary
//! as JSON values; the repository layer decodes them into entity structs.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub mod factory;
pub mod memory;
pub mod query;
pub mod supabase;

pub use factory::create_backend;
pub use memory::MemoryBackend;
pub use query::{Order, Query};
pub use supabase::SupabaseBackend;

/// Seconds before `expires_at` at which a session is already treated as expired.
const EXPIRY_MARGIN_SECS: i64 = 30;

/// Common error types for backend operations.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("No user logged in")]
    NotAuthenticated,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Backend error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::InvalidData(err.to_string())
        } else {
            BackendError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::InvalidData(err.to_string())
    }
}

/// Authenticated user as reported by the auth service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// A signed-in session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp (seconds) at which the access token expires
    pub expires_at: i64,
    pub user: User,
}

impl Session {
    /// Whether the access token is expired or about to expire.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= chrono::Utc::now().timestamp() + EXPIRY_MARGIN_SECS
    }
}

/// Callback for sessions a backend obtains by itself, such as a token refresh
/// in the middle of a request.
pub type SessionListener = Arc<dyn Fn(&Session) + Send + Sync>;

/// Backend trait that every remote service implementation must provide.
///
/// The three groups mirror the hosted service: auth/session, table rows and
/// blob storage. Row and storage calls run as the signed-in user.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Returns the backend type identifier (e.g., "supabase", "memory").
    fn backend_type(&self) -> &str;

    // Auth and session
    /// Register a new account. Returns `None` when the service requires the
    /// address to be confirmed before a session is issued.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Session>, BackendError>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError>;
    /// Drop the local session, then revoke it remotely where supported.
    async fn sign_out(&self) -> Result<(), BackendError>;
    /// Forget the local session without contacting the service.
    async fn clear_session(&self);
    async fn current_session(&self) -> Option<Session>;
    /// Adopt a session obtained earlier (e.g. loaded from disk).
    async fn restore_session(&self, session: Session);
    /// Exchange the refresh token of the current session for a new session.
    async fn refresh_session(&self) -> Result<Session, BackendError>;

    // Table rows
    async fn select(&self, query: &Query) -> Result<Vec<Value>, BackendError>;
    /// Insert one row and return the stored representation.
    async fn insert(&self, table: &str, row: Value) -> Result<Vec<Value>, BackendError>;
    /// Patch every row matching the query and return the updated rows.
    async fn update(&self, query: &Query, patch: Value) -> Result<Vec<Value>, BackendError>;
    async fn delete(&self, query: &Query) -> Result<(), BackendError>;

    // Blob storage
    /// Upload an object and return its key relative to the bucket.
    async fn upload(&self, bucket: &str, path: &str, bytes: Vec<u8>, content_type: &str)
        -> Result<String, BackendError>;
    fn public_url(&self, bucket: &str, path: &str) -> String;
    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), BackendError>;
}

/// Decode a list of JSON rows into typed records.
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, BackendError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(BackendError::from))
        .collect()
}

/// Decode the first row of a result, if any.
pub fn decode_first<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Option<T>, BackendError> {
    match rows.into_iter().next() {
        Some(row) => Ok(Some(serde_json::from_value(row)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_expiring_at(expires_at: i64) -> Session {
        Session {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at,
            user: User {
                id: "user-1".to_string(),
                email: None,
            },
        }
    }

    #[test]
    fn test_session_expiry() {
        let now = chrono::Utc::now().timestamp();
        assert!(session_expiring_at(now - 10).is_expired());
        assert!(session_expiring_at(now + 10).is_expired());
        assert!(!session_expiring_at(now + 3600).is_expired());
    }
}
