//! Persistence of the signed-in session between runs.
//!
//! The session is written as JSON to `$XDG_DATA_HOME/studynotes/session.json`
//! so the next start can skip the login screen.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::backend::{Backend, BackendError, Session};

/// File-backed session store. A store without a path keeps nothing.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    path: Option<PathBuf>,
}

impl SessionStore {
    /// Store at the default location, or a disabled one when `persist` is off.
    pub fn new(persist: bool) -> Result<Self> {
        if !persist {
            return Ok(Self::disabled());
        }

        let path = dirs::data_dir()
            .context("Could not determine data directory")?
            .join("studynotes")
            .join("session.json");
        Ok(Self::at_path(path))
    }

    pub fn at_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
        }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// Load the saved session. A missing or unreadable file yields `None`.
    pub fn load(&self) -> Option<Session> {
        let path = self.path.as_ref()?;
        let content = std::fs::read_to_string(path).ok()?;

        match serde_json::from_str(&content) {
            Ok(session) => Some(session),
            Err(e) => {
                log::warn!("Ignoring corrupt session file {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create session directory: {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(session).context("Failed to serialize session")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write session file: {}", path.display()))?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if path.exists() {
            std::fs::remove_file(path)
                .with_context(|| format!("Failed to remove session file: {}", path.display()))?;
        }
        Ok(())
    }
}

/// Restore a saved session into the backend, refreshing it when expired.
///
/// Returns whether a usable session is active afterwards. When the refresh
/// fails the backend is left signed out. The saved file is deleted only when
/// the service rejected the refresh token; after a network failure it is kept
/// for the next start.
pub async fn restore(backend: &dyn Backend, store: &SessionStore) -> Result<bool> {
    let Some(session) = store.load() else {
        return Ok(false);
    };

    let expired = session.is_expired();
    backend.restore_session(session).await;
    if !expired {
        log::info!("Restored saved session");
        return Ok(true);
    }

    match backend.refresh_session().await {
        Ok(refreshed) => {
            store.save(&refreshed)?;
            log::info!("Refreshed expired session");
            Ok(true)
        }
        Err(e) => {
            log::warn!("Saved session could not be refreshed: {}", e);
            backend.clear_session().await;
            if matches!(e, BackendError::Auth(_) | BackendError::NotAuthenticated) {
                store.clear()?;
            }
            Ok(false)
        }
    }
}
