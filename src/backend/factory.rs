//! Backend factory for creating backend instances from configuration.

use anyhow::{anyhow, Result};
use std::sync::Arc;
use std::time::Duration;

use super::{memory::MemoryBackend, supabase::SupabaseBackend, Backend, Session};
use crate::config::BackendConfig;
use crate::session::SessionStore;

/// Create the shared backend client described by the `[backend]` section.
///
/// Sessions the client refreshes on its own are saved to `sessions`.
///
/// # Errors
/// Returns error if:
/// - Backend type is unknown
/// - The API key environment variable is unset (supabase)
/// - The HTTP client cannot be built
pub fn create_backend(config: &BackendConfig, sessions: Arc<SessionStore>) -> Result<Arc<dyn Backend>> {
    match config.backend_type.as_str() {
        "supabase" => {
            let api_key = config
                .api_key()
                .ok_or_else(|| anyhow!("Environment variable '{}' is not set", config.api_key_env))?;
            let backend = SupabaseBackend::new(
                &config.url,
                api_key,
                Duration::from_secs(config.request_timeout_secs),
            )?
            .with_session_listener(Arc::new(move |session: &Session| {
                if let Err(e) = sessions.save(session) {
                    log::warn!("Failed to save refreshed session: {:#}", e);
                }
            }));
            Ok(Arc::new(backend))
        }
        "memory" => Ok(Arc::new(MemoryBackend::new())),
        _ => Err(anyhow!("Unknown backend type: {}", config.backend_type)),
    }
}
