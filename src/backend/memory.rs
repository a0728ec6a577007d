//! In-process backend.
//!
//! Keeps users, table rows and stored objects in memory. Row and storage calls
//! behave like the hosted service with row-level security: they require a
//! signed-in user and only see rows whose `user_id` belongs to that user.
//! Stored objects likewise can only be removed by the user who uploaded them.
//! Used by the offline demo mode (`backend_type = "memory"`) and by tests.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::query::compare_values;
use super::{Backend, BackendError, Query, Session, User};

const MIN_PASSWORD_LEN: usize = 6;
const SESSION_LIFETIME_SECS: i64 = 3600;

struct Account {
    id: String,
    password: String,
}

#[derive(Default)]
struct State {
    accounts: HashMap<String, Account>,
    tables: HashMap<String, Vec<Value>>,
    /// (bucket, path) to (owner id, contents)
    objects: HashMap<(String, String), (String, Vec<u8>)>,
    session: Option<Session>,
    last_created: Option<chrono::DateTime<chrono::Utc>>,
}

impl State {
    fn user_id(&self) -> Result<String, BackendError> {
        self.session
            .as_ref()
            .map(|s| s.user.id.clone())
            .ok_or(BackendError::NotAuthenticated)
    }

    /// Creation timestamps strictly increase so ordering by them is stable.
    fn next_created(&mut self) -> String {
        let mut now = chrono::Utc::now();
        if let Some(last) = self.last_created {
            if now <= last {
                now = last + chrono::Duration::microseconds(1);
            }
        }
        self.last_created = Some(now);
        now.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
    }
}

fn owned_by(row: &Value, user_id: &str) -> bool {
    row.get("user_id").and_then(Value::as_str) == Some(user_id)
}

fn new_session(user: User) -> Session {
    Session {
        access_token: Uuid::new_v4().to_string(),
        refresh_token: Uuid::new_v4().to_string(),
        expires_at: chrono::Utc::now().timestamp() + SESSION_LIFETIME_SECS,
        user,
    }
}

/// In-memory backend implementation.
#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
    require_confirmation: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `sign_up` behave like a project with email confirmation turned on:
    /// the account is created but no session is issued.
    pub fn with_email_confirmation() -> Self {
        Self {
            state: Mutex::new(State::default()),
            require_confirmation: true,
        }
    }

    /// Number of stored objects in a bucket, regardless of owner.
    pub async fn object_count(&self, bucket: &str) -> usize {
        self.state
            .lock()
            .await
            .objects
            .keys()
            .filter(|(b, _)| b == bucket)
            .count()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    fn backend_type(&self) -> &str {
        "memory"
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Session>, BackendError> {
        let mut state = self.state.lock().await;

        if email.trim().is_empty() || !email.contains('@') {
            return Err(BackendError::Auth("Unable to validate email address: invalid format".to_string()));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(BackendError::Auth(format!(
                "Password should be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if state.accounts.contains_key(email) {
            return Err(BackendError::Auth("User already registered".to_string()));
        }

        let id = Uuid::new_v4().to_string();
        state.accounts.insert(
            email.to_string(),
            Account {
                id: id.clone(),
                password: password.to_string(),
            },
        );

        if self.require_confirmation {
            return Ok(None);
        }

        let session = new_session(User {
            id,
            email: Some(email.to_string()),
        });
        state.session = Some(session.clone());
        Ok(Some(session))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let mut state = self.state.lock().await;

        let id = match state.accounts.get(email) {
            Some(account) if account.password == password => account.id.clone(),
            _ => return Err(BackendError::Auth("Invalid login credentials".to_string())),
        };

        let session = new_session(User {
            id,
            email: Some(email.to_string()),
        });
        state.session = Some(session.clone());
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        self.clear_session().await;
        Ok(())
    }

    async fn clear_session(&self) {
        self.state.lock().await.session = None;
    }

    async fn current_session(&self) -> Option<Session> {
        self.state.lock().await.session.clone()
    }

    async fn restore_session(&self, session: Session) {
        self.state.lock().await.session = Some(session);
    }

    async fn refresh_session(&self) -> Result<Session, BackendError> {
        let mut state = self.state.lock().await;
        let user = state
            .session
            .as_ref()
            .map(|s| s.user.clone())
            .ok_or(BackendError::NotAuthenticated)?;

        let session = new_session(user);
        state.session = Some(session.clone());
        Ok(session)
    }

    async fn select(&self, query: &Query) -> Result<Vec<Value>, BackendError> {
        let state = self.state.lock().await;
        let user_id = state.user_id()?;

        let mut rows: Vec<Value> = state
            .tables
            .get(query.table_name())
            .map(|rows| {
                rows.iter()
                    .filter(|row| owned_by(row, &user_id) && query.matches(row))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some((column, order)) = query.ordering() {
            rows.sort_by(|a, b| {
                let ordering = compare_values(
                    a.get(column).unwrap_or(&Value::Null),
                    b.get(column).unwrap_or(&Value::Null),
                );
                match order {
                    super::Order::Ascending => ordering,
                    super::Order::Descending => ordering.reverse(),
                }
            });
        }
        if let Some(limit) = query.row_limit() {
            rows.truncate(limit);
        }

        Ok(rows.iter().map(|row| query.project(row)).collect())
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Vec<Value>, BackendError> {
        let mut state = self.state.lock().await;
        let user_id = state.user_id()?;

        let mut fields: Map<String, Value> = match row {
            Value::Object(fields) => fields,
            other => return Err(BackendError::InvalidData(format!("Expected a JSON object, got {}", other))),
        };

        if !owned_by(&Value::Object(fields.clone()), &user_id) {
            return Err(BackendError::Auth(format!(
                "new row violates row-level security policy for table \"{}\"",
                table
            )));
        }

        if !fields.get("id").is_some_and(|id| !id.is_null()) {
            fields.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
        }
        if table == crate::constants::TABLE_NOTES && !fields.get("date_created").is_some_and(|d| !d.is_null()) {
            let created = state.next_created();
            fields.insert("date_created".to_string(), Value::String(created));
        }

        let stored = Value::Object(fields);
        state.tables.entry(table.to_string()).or_default().push(stored.clone());
        Ok(vec![stored])
    }

    async fn update(&self, query: &Query, patch: Value) -> Result<Vec<Value>, BackendError> {
        let mut state = self.state.lock().await;
        let user_id = state.user_id()?;

        let patch = match patch {
            Value::Object(fields) => fields,
            other => return Err(BackendError::InvalidData(format!("Expected a JSON object, got {}", other))),
        };

        let mut updated = Vec::new();
        if let Some(rows) = state.tables.get_mut(query.table_name()) {
            for row in rows
                .iter_mut()
                .filter(|row| owned_by(row, &user_id) && query.matches(row))
            {
                if let Value::Object(fields) = row {
                    for (key, value) in &patch {
                        // id and owner are not writable through a patch
                        if key != "id" && key != "user_id" {
                            fields.insert(key.clone(), value.clone());
                        }
                    }
                }
                updated.push(row.clone());
            }
        }

        Ok(updated)
    }

    async fn delete(&self, query: &Query) -> Result<(), BackendError> {
        let mut state = self.state.lock().await;
        let user_id = state.user_id()?;

        if let Some(rows) = state.tables.get_mut(query.table_name()) {
            rows.retain(|row| !(owned_by(row, &user_id) && query.matches(row)));
        }
        Ok(())
    }

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, BackendError> {
        let mut state = self.state.lock().await;
        let user_id = state.user_id()?;

        let key = (bucket.to_string(), path.to_string());
        if state.objects.contains_key(&key) {
            return Err(BackendError::Storage(format!("The resource already exists: {}", path)));
        }
        state.objects.insert(key, (user_id, bytes));
        Ok(path.to_string())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("memory://{}/{}", bucket, path)
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), BackendError> {
        let mut state = self.state.lock().await;
        let user_id = state.user_id()?;

        // Objects of other users are skipped, as with storage policies
        for path in paths {
            let key = (bucket.to_string(), path.clone());
            if state.objects.get(&key).is_some_and(|(owner, _)| *owner == user_id) {
                state.objects.remove(&key);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_rows_are_scoped_to_the_signed_in_user() {
        let backend = MemoryBackend::new();
        let alice = backend.sign_up("alice@example.com", "secret1").await.unwrap().unwrap();
        backend
            .insert("categories", json!({ "user_id": alice.user.id, "name": "Math" }))
            .await
            .unwrap();

        backend.sign_up("bob@example.com", "secret2").await.unwrap();
        let rows = backend.select(&Query::table("categories")).await.unwrap();
        assert!(rows.is_empty());

        let err = backend
            .insert("categories", json!({ "user_id": alice.user.id, "name": "Physics" }))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Auth(_)));
    }

    #[tokio::test]
    async fn test_rows_require_a_session() {
        let backend = MemoryBackend::new();
        let err = backend.select(&Query::table("notes")).await.unwrap_err();
        assert!(matches!(err, BackendError::NotAuthenticated));
    }

    #[tokio::test]
    async fn test_note_timestamps_increase() {
        let backend = MemoryBackend::new();
        let session = backend.sign_up("carol@example.com", "secret3").await.unwrap().unwrap();
        let first = backend
            .insert("notes", json!({ "user_id": session.user.id, "title": "a" }))
            .await
            .unwrap();
        let second = backend
            .insert("notes", json!({ "user_id": session.user.id, "title": "b" }))
            .await
            .unwrap();

        let a = first[0]["date_created"].as_str().unwrap();
        let b = second[0]["date_created"].as_str().unwrap();
        assert!(b > a);
    }

    #[tokio::test]
    async fn test_objects_removed_only_by_owner() {
        let backend = MemoryBackend::new();
        backend.sign_up("alice@example.com", "secret1").await.unwrap();
        let key = backend
            .upload("materials", "categories/alice/1.jpg", vec![1, 2, 3], "image/jpeg")
            .await
            .unwrap();

        backend.sign_up("bob@example.com", "secret2").await.unwrap();
        backend.remove("materials", &[key.clone()]).await.unwrap();
        assert_eq!(backend.object_count("materials").await, 1);

        backend.sign_in("alice@example.com", "secret1").await.unwrap();
        backend.remove("materials", &[key]).await.unwrap();
        assert_eq!(backend.object_count("materials").await, 0);
    }
}
