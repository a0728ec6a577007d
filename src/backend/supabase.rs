//! Supabase backend implementation.
//!
//! Talks to the three services of a Supabase project over HTTP:
//! GoTrue (`/auth/v1`), PostgREST (`/rest/v1`) and Storage (`/storage/v1`).

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

use super::{Backend, BackendError, Query, Session, SessionListener, User};

/// Supabase backend implementation.
pub struct SupabaseBackend {
    client: Client,
    base_url: String,
    api_key: String,
    session: RwLock<Option<Session>>,
    /// Held while an expired session is being refreshed
    refresh_lock: Mutex<()>,
    on_refresh: Option<SessionListener>,
}

/// Token grant response from `/auth/v1/token` and `/auth/v1/signup`.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: User,
}

impl TokenResponse {
    fn into_session(self) -> Session {
        let expires_at = self
            .expires_at
            .unwrap_or_else(|| chrono::Utc::now().timestamp() + self.expires_in.unwrap_or(3600));
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

/// Which service a request went to; decides how a 400 is classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Service {
    Auth,
    Rest,
    Storage,
}

impl SupabaseBackend {
    /// Create a backend for the project at `base_url` using the public API key.
    pub fn new(base_url: &str, api_key: String, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            session: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            on_refresh: None,
        })
    }

    /// Call `listener` with every session refreshed on the fly.
    pub fn with_session_listener(mut self, listener: SessionListener) -> Self {
        self.on_refresh = Some(listener);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn build(&self, method: Method, path: &str, bearer: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header("apikey", &self.api_key)
            .bearer_auth(bearer)
    }

    /// Build a request carrying the API key and the current bearer token.
    ///
    /// Without a session the API key itself is the bearer, which the service
    /// treats as the anonymous role.
    async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, BackendError> {
        let bearer = self.access_token().await?.unwrap_or_else(|| self.api_key.clone());
        Ok(self.build(method, path, &bearer))
    }

    /// Access token of the current session, refreshed first when expired.
    async fn access_token(&self) -> Result<Option<String>, BackendError> {
        // Concurrent requests wait for a single refresh
        let _guard = self.refresh_lock.lock().await;

        let session = self.session.read().await.clone();
        match session {
            Some(session) if session.is_expired() => {
                log::info!("Access token expired, refreshing session");
                let refreshed = self
                    .token_grant("refresh_token", json!({ "refresh_token": session.refresh_token }))
                    .await?;
                if let Some(listener) = &self.on_refresh {
                    listener(&refreshed);
                }
                Ok(Some(refreshed.access_token))
            }
            Some(session) => Ok(Some(session.access_token)),
            None => Ok(None),
        }
    }

    /// Turn a non-2xx response into an error, pass successful ones through.
    async fn check(response: Response, service: Service) -> Result<Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        log::warn!("Supabase request failed with {}: {}", status, body);
        Err(error_from_response(status, &body, service))
    }

    async fn token_grant(&self, grant_type: &str, body: Value) -> Result<Session, BackendError> {
        let response = self
            .build(Method::POST, "/auth/v1/token", &self.api_key)
            .query(&[("grant_type", grant_type)])
            .json(&body)
            .send()
            .await?;
        let response = Self::check(response, Service::Auth).await?;
        let token: TokenResponse = response.json().await?;
        let session = token.into_session();

        *self.session.write().await = Some(session.clone());
        Ok(session)
    }

    async fn rows(response: Response) -> Result<Vec<Value>, BackendError> {
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_str::<Value>(&text)? {
            Value::Array(rows) => Ok(rows),
            Value::Null => Ok(Vec::new()),
            row => Ok(vec![row]),
        }
    }
}

#[async_trait]
impl Backend for SupabaseBackend {
    fn backend_type(&self) -> &str {
        "supabase"
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Session>, BackendError> {
        let response = self
            .build(Method::POST, "/auth/v1/signup", &self.api_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let response = Self::check(response, Service::Auth).await?;
        let body: Value = response.json().await?;

        // Without an access token the account waits for email confirmation
        if body.get("access_token").is_none() {
            return Ok(None);
        }

        let token: TokenResponse = serde_json::from_value(body)?;
        let session = token.into_session();
        *self.session.write().await = Some(session.clone());
        Ok(Some(session))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        self.token_grant("password", json!({ "email": email, "password": password }))
            .await
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        let Some(session) = self.session.write().await.take() else {
            return Ok(());
        };

        // An expired access token cannot authorize the logout call
        if session.is_expired() {
            return Ok(());
        }

        let response = self
            .build(Method::POST, "/auth/v1/logout", &session.access_token)
            .send()
            .await?;
        match Self::check(response, Service::Auth).await {
            Ok(_) | Err(BackendError::Auth(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn clear_session(&self) {
        *self.session.write().await = None;
    }

    async fn current_session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    async fn restore_session(&self, session: Session) {
        *self.session.write().await = Some(session);
    }

    async fn refresh_session(&self) -> Result<Session, BackendError> {
        let _guard = self.refresh_lock.lock().await;
        let refresh_token = match self.session.read().await.as_ref() {
            Some(session) => session.refresh_token.clone(),
            None => return Err(BackendError::NotAuthenticated),
        };

        self.token_grant("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
    }

    async fn select(&self, query: &Query) -> Result<Vec<Value>, BackendError> {
        let path = format!("/rest/v1/{}", query.table_name());
        let response = self
            .request(Method::GET, &path)
            .await?
            .query(&query.to_pairs())
            .send()
            .await?;
        let response = Self::check(response, Service::Rest).await?;
        Self::rows(response).await
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Vec<Value>, BackendError> {
        let path = format!("/rest/v1/{}", table);
        let response = self
            .request(Method::POST, &path)
            .await?
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await?;
        let response = Self::check(response, Service::Rest).await?;
        Self::rows(response).await
    }

    async fn update(&self, query: &Query, patch: Value) -> Result<Vec<Value>, BackendError> {
        let path = format!("/rest/v1/{}", query.table_name());
        let response = self
            .request(Method::PATCH, &path)
            .await?
            .header("Prefer", "return=representation")
            .query(&query.filter_pairs())
            .json(&patch)
            .send()
            .await?;
        let response = Self::check(response, Service::Rest).await?;
        Self::rows(response).await
    }

    async fn delete(&self, query: &Query) -> Result<(), BackendError> {
        let path = format!("/rest/v1/{}", query.table_name());
        let response = self
            .request(Method::DELETE, &path)
            .await?
            .query(&query.filter_pairs())
            .send()
            .await?;
        Self::check(response, Service::Rest).await?;
        Ok(())
    }

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BackendError> {
        let object_path = format!("/storage/v1/object/{}/{}", bucket, path);
        let response = self
            .request(Method::POST, &object_path)
            .await?
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await?;
        Self::check(response, Service::Storage).await?;
        Ok(path.to_string())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        self.url(&format!("/storage/v1/object/public/{}/{}", bucket, path))
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), BackendError> {
        let object_path = format!("/storage/v1/object/{}", bucket);
        let response = self
            .request(Method::DELETE, &object_path)
            .await?
            .json(&json!({ "prefixes": paths }))
            .send()
            .await?;
        Self::check(response, Service::Storage).await?;
        Ok(())
    }
}

/// Pull a human-readable message out of an error body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            ["msg", "message", "error_description", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                "empty response".to_string()
            } else {
                body.trim().to_string()
            }
        })
}

fn error_from_response(status: StatusCode, body: &str, service: Service) -> BackendError {
    let message = error_message(body);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::Auth(message),
        StatusCode::NOT_FOUND => BackendError::NotFound(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY if service == Service::Auth => {
            BackendError::Auth(message)
        }
        s if s.is_client_error() && service == Service::Storage => BackendError::Storage(message),
        s if s.is_client_error() => BackendError::InvalidData(message),
        s if s.is_server_error() => BackendError::Network(format!("{}: {}", s, message)),
        s => BackendError::Other(format!("{}: {}", s, message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex as StdMutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    /// (method and path, bearer token, body) of one request
    type Seen = Arc<StdMutex<Vec<(String, String, String)>>>;

    const TOKEN_BODY: &str = r#"{"access_token":"fresh","refresh_token":"r2","expires_in":3600,"user":{"id":"u1","email":"ada@example.com"}}"#;

    /// Local HTTP server answering token grants and empty row selects.
    async fn spawn_server() -> (String, Seen) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let seen: Seen = Arc::new(StdMutex::new(Vec::new()));
        let log = seen.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let log = log.clone();
                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 4096];
                    let header_end = loop {
                        let n = socket.read(&mut chunk).await.unwrap();
                        if n == 0 {
                            return;
                        }
                        buf.extend_from_slice(&chunk[..n]);
                        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                            break pos + 4;
                        }
                    };

                    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
                    let header = |name: &str| {
                        head.lines().skip(1).find_map(|line| {
                            let (key, value) = line.split_once(':')?;
                            key.eq_ignore_ascii_case(name).then(|| value.trim().to_string())
                        })
                    };
                    let content_length = header("content-length").and_then(|v| v.parse().ok()).unwrap_or(0);
                    while buf.len() < header_end + content_length {
                        let n = socket.read(&mut chunk).await.unwrap();
                        if n == 0 {
                            break;
                        }
                        buf.extend_from_slice(&chunk[..n]);
                    }

                    let mut request_line = head.lines().next().unwrap_or_default().split_whitespace();
                    let method = request_line.next().unwrap_or_default().to_string();
                    let target = request_line.next().unwrap_or_default().to_string();
                    let path = target.split('?').next().unwrap_or_default().to_string();
                    let bearer = header("authorization")
                        .and_then(|v| v.strip_prefix("Bearer ").map(str::to_string))
                        .unwrap_or_default();
                    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();

                    let reply = if path == "/auth/v1/token" { TOKEN_BODY } else { "[]" };
                    log.lock().unwrap().push((format!("{} {}", method, path), bearer, body));

                    let response = format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        reply.len(),
                        reply
                    );
                    socket.write_all(response.as_bytes()).await.unwrap();
                    socket.shutdown().await.ok();
                });
            }
        });

        (url, seen)
    }

    fn session(access_token: &str, expires_at: i64) -> Session {
        Session {
            access_token: access_token.to_string(),
            refresh_token: "r1".to_string(),
            expires_at,
            user: User {
                id: "u1".to_string(),
                email: Some("ada@example.com".to_string()),
            },
        }
    }

    fn backend(url: &str) -> SupabaseBackend {
        SupabaseBackend::new(url, "anon".to_string(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_expired_session_is_refreshed_before_request() {
        let (url, seen) = spawn_server().await;
        let refreshed = Arc::new(StdMutex::new(Vec::new()));
        let sink = refreshed.clone();
        let backend = backend(&url).with_session_listener(Arc::new(move |s: &Session| {
            sink.lock().unwrap().push(s.clone());
        }));
        backend
            .restore_session(session("stale", chrono::Utc::now().timestamp() - 60))
            .await;

        let rows = backend.select(&Query::table("notes")).await.unwrap();
        assert!(rows.is_empty());

        let seen = seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, "POST /auth/v1/token");
        assert_eq!(seen[0].1, "anon");
        assert!(seen[0].2.contains("r1"));
        assert_eq!(seen[1].0, "GET /rest/v1/notes");
        assert_eq!(seen[1].1, "fresh");

        let current = backend.current_session().await.unwrap();
        assert_eq!(current.access_token, "fresh");
        assert!(!current.is_expired());
        let refreshed = refreshed.lock().unwrap();
        assert_eq!(refreshed.len(), 1);
        assert_eq!(refreshed[0].refresh_token, "r2");
    }

    #[tokio::test]
    async fn test_valid_session_is_used_as_is() {
        let (url, seen) = spawn_server().await;
        let backend = backend(&url);
        backend
            .restore_session(session("current", chrono::Utc::now().timestamp() + 3600))
            .await;

        backend.select(&Query::table("notes")).await.unwrap();

        let seen = seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "GET /rest/v1/notes");
        assert_eq!(seen[0].1, "current");
    }

    #[tokio::test]
    async fn test_sign_out_drops_local_session_when_offline() {
        // Nothing listens on port 1
        let backend = backend("http://127.0.0.1:1");
        backend
            .restore_session(session("current", chrono::Utc::now().timestamp() + 3600))
            .await;

        assert!(matches!(backend.sign_out().await, Err(BackendError::Network(_))));
        assert!(backend.current_session().await.is_none());
    }

    #[test]
    fn test_error_message_fields() {
        assert_eq!(error_message(r#"{"msg":"Invalid login credentials"}"#), "Invalid login credentials");
        assert_eq!(error_message(r#"{"message":"relation does not exist"}"#), "relation does not exist");
        assert_eq!(
            error_message(r#"{"error":"invalid_grant","error_description":"Refresh Token Not Found"}"#),
            "Refresh Token Not Found"
        );
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message(""), "empty response");
    }

    #[test]
    fn test_error_classification() {
        let body = r#"{"msg":"nope"}"#;
        assert!(matches!(
            error_from_response(StatusCode::BAD_REQUEST, body, Service::Auth),
            BackendError::Auth(_)
        ));
        assert!(matches!(
            error_from_response(StatusCode::BAD_REQUEST, body, Service::Rest),
            BackendError::InvalidData(_)
        ));
        assert!(matches!(
            error_from_response(StatusCode::BAD_REQUEST, body, Service::Storage),
            BackendError::Storage(_)
        ));
        assert!(matches!(
            error_from_response(StatusCode::UNAUTHORIZED, body, Service::Rest),
            BackendError::Auth(_)
        ));
        assert!(matches!(
            error_from_response(StatusCode::NOT_FOUND, body, Service::Rest),
            BackendError::NotFound(_)
        ));
        assert!(matches!(
            error_from_response(StatusCode::BAD_GATEWAY, body, Service::Rest),
            BackendError::Network(_)
        ));
    }

    #[test]
    fn test_public_url_includes_bucket() {
        let backend =
            SupabaseBackend::new("https://demo.supabase.co/", "key".to_string(), Duration::from_secs(5)).unwrap();
        assert_eq!(
            backend.public_url("materials", "categories/u1/1.jpg"),
            "https://demo.supabase.co/storage/v1/object/public/materials/categories/u1/1.jpg"
        );
    }

    #[test]
    fn test_token_response_without_expires_at() {
        let token: TokenResponse = serde_json::from_value(json!({
            "access_token": "a",
            "refresh_token": "r",
            "expires_in": 3600,
            "user": { "id": "u1", "email": "student@example.com" }
        }))
        .unwrap();
        let session = token.into_session();
        assert!(!session.is_expired());
        assert_eq!(session.user.id, "u1");
    }
}
