//! Auth repository: sign-up, sign-in and sign-out.

use std::sync::Arc;

use crate::backend::{Backend, BackendError, Session};
use crate::session::SessionStore;

/// Repository for account and session operations.
#[derive(Clone)]
pub struct AuthRepository {
    backend: Arc<dyn Backend>,
    sessions: Arc<SessionStore>,
}

impl AuthRepository {
    pub fn new(backend: Arc<dyn Backend>, sessions: Arc<SessionStore>) -> Self {
        Self { backend, sessions }
    }

    pub async fn is_user_logged_in(&self) -> bool {
        self.backend.current_session().await.is_some()
    }

    pub async fn current_user_id(&self) -> Option<String> {
        super::current_user_id(self.backend.as_ref()).await
    }

    pub async fn current_user_email(&self) -> Option<String> {
        self.backend.current_session().await.and_then(|s| s.user.email)
    }

    /// Register an account. `None` means the address must be confirmed first.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Session>, BackendError> {
        let session = self.backend.sign_up(email, password).await?;
        if let Some(session) = &session {
            self.persist(session);
        }
        Ok(session)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let session = self.backend.sign_in(email, password).await?;
        self.persist(&session);
        Ok(session)
    }

    /// Sign out. Once the local session is gone a failed remote revocation
    /// is only logged.
    pub async fn sign_out(&self) -> Result<(), BackendError> {
        if let Err(e) = self.backend.sign_out().await {
            if self.backend.current_session().await.is_some() {
                return Err(e);
            }
            log::warn!("Remote sign-out failed, signed out locally: {}", e);
        }
        if let Err(e) = self.sessions.clear() {
            log::warn!("Failed to clear saved session: {:#}", e);
        }
        Ok(())
    }

    fn persist(&self, session: &Session) {
        if let Err(e) = self.sessions.save(session) {
            log::warn!("Failed to save session: {:#}", e);
        }
    }
}
