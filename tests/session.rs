use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use studynotes::backend::{Backend, BackendError, MemoryBackend, Query, Session, User};
use studynotes::repositories::Repositories;
use studynotes::session::{self, SessionStore};

fn temp_store(name: &str) -> (PathBuf, SessionStore) {
    let dir = std::env::temp_dir().join(format!("studynotes_session_{}_{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let path = dir.join("nested").join("session.json");
    (dir, SessionStore::at_path(&path))
}

fn sample_session(expires_at: i64) -> Session {
    Session {
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
        expires_at,
        user: User {
            id: "u1".to_string(),
            email: Some("ada@example.com".to_string()),
        },
    }
}

fn in_one_hour() -> i64 {
    chrono::Utc::now().timestamp() + 3600
}

#[test]
fn test_save_load_clear() {
    let (dir, store) = temp_store("roundtrip");
    assert!(store.load().is_none());

    let saved = sample_session(in_one_hour());
    store.save(&saved).unwrap();
    assert_eq!(store.load(), Some(saved));

    store.clear().unwrap();
    assert!(store.load().is_none());
    // Clearing twice is fine
    store.clear().unwrap();

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_disabled_store_keeps_nothing() {
    let store = SessionStore::disabled();
    store.save(&sample_session(in_one_hour())).unwrap();
    assert!(store.load().is_none());
    store.clear().unwrap();
}

#[test]
fn test_corrupt_file_ignored() {
    let (dir, store) = temp_store("corrupt");
    let path = dir.join("nested").join("session.json");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{ not json").unwrap();

    assert!(store.load().is_none());
    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_expiry() {
    assert!(sample_session(0).is_expired());
    assert!(!sample_session(in_one_hour()).is_expired());
}

#[tokio::test]
async fn test_restore_without_saved_session() {
    let backend = MemoryBackend::new();
    let restored = session::restore(&backend, &SessionStore::disabled()).await.unwrap();
    assert!(!restored);
    assert!(backend.current_session().await.is_none());
}

#[tokio::test]
async fn test_restore_valid_session() {
    let (dir, store) = temp_store("valid");
    let saved = sample_session(in_one_hour());
    store.save(&saved).unwrap();

    let backend = MemoryBackend::new();
    assert!(session::restore(&backend, &store).await.unwrap());
    assert_eq!(backend.current_session().await, Some(saved));

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn test_restore_refreshes_expired_session() {
    let (dir, store) = temp_store("expired");
    store.save(&sample_session(0)).unwrap();

    let backend = MemoryBackend::new();
    assert!(session::restore(&backend, &store).await.unwrap());

    let refreshed = store.load().unwrap();
    assert!(!refreshed.is_expired());
    assert_eq!(refreshed.user.id, "u1");
    assert_eq!(backend.current_session().await, Some(refreshed));

    std::fs::remove_dir_all(dir).ok();
}

/// Memory backend whose refresh and remote sign-out fail with a fixed error.
struct RefreshFails {
    inner: MemoryBackend,
    error: fn() -> BackendError,
}

impl RefreshFails {
    fn new(error: fn() -> BackendError) -> Self {
        Self {
            inner: MemoryBackend::new(),
            error,
        }
    }
}

#[async_trait]
impl Backend for RefreshFails {
    fn backend_type(&self) -> &str {
        "refresh-fails"
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Session>, BackendError> {
        self.inner.sign_up(email, password).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        self.inner.sign_in(email, password).await
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        Err((self.error)())
    }

    async fn clear_session(&self) {
        self.inner.clear_session().await
    }

    async fn current_session(&self) -> Option<Session> {
        self.inner.current_session().await
    }

    async fn restore_session(&self, session: Session) {
        self.inner.restore_session(session).await
    }

    async fn refresh_session(&self) -> Result<Session, BackendError> {
        Err((self.error)())
    }

    async fn select(&self, query: &Query) -> Result<Vec<Value>, BackendError> {
        self.inner.select(query).await
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Vec<Value>, BackendError> {
        self.inner.insert(table, row).await
    }

    async fn update(&self, query: &Query, patch: Value) -> Result<Vec<Value>, BackendError> {
        self.inner.update(query, patch).await
    }

    async fn delete(&self, query: &Query) -> Result<(), BackendError> {
        self.inner.delete(query).await
    }

    async fn upload(&self, bucket: &str, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, BackendError> {
        self.inner.upload(bucket, path, bytes, content_type).await
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        self.inner.public_url(bucket, path)
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), BackendError> {
        self.inner.remove(bucket, paths).await
    }
}

#[tokio::test]
async fn test_offline_refresh_keeps_saved_session_but_signs_out() {
    let (dir, store) = temp_store("offline");
    store.save(&sample_session(0)).unwrap();

    let backend = RefreshFails::new(|| BackendError::Network("connection refused".to_string()));
    assert!(!session::restore(&backend, &store).await.unwrap());

    assert!(backend.current_session().await.is_none());
    // The refresh token may still be good next time
    assert!(store.load().is_some());

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn test_rejected_refresh_drops_saved_session() {
    let (dir, store) = temp_store("rejected");
    store.save(&sample_session(0)).unwrap();

    let backend = RefreshFails::new(|| BackendError::Auth("Invalid Refresh Token".to_string()));
    assert!(!session::restore(&backend, &store).await.unwrap());

    assert!(backend.current_session().await.is_none());
    assert!(store.load().is_none());

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn test_logged_out_after_failed_restore() {
    let (dir, store) = temp_store("logged_out");
    store.save(&sample_session(0)).unwrap();

    let backend = std::sync::Arc::new(RefreshFails::new(|| BackendError::Network("offline".to_string())));
    session::restore(backend.as_ref(), &store).await.unwrap();

    let repositories = Repositories::new(
        backend,
        &studynotes::config::BackendConfig::default(),
        std::sync::Arc::new(SessionStore::disabled()),
    );
    assert!(!repositories.auth.is_user_logged_in().await);

    std::fs::remove_dir_all(dir).ok();
}
