//! Login and registration state.

use super::Observable;
use crate::constants::{ERROR_CREDENTIALS_REQUIRED, ERROR_LOGIN_FAILED, ERROR_LOGOUT_FAILED, ERROR_REGISTER_FAILED, SUCCESS_REGISTERED};
use crate::repositories::AuthRepository;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthUiState {
    pub email: String,
    pub password: String,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Informational message, e.g. after registering
    pub message: Option<String>,
    /// A session is active and the home screen may open
    pub is_success: bool,
}

#[derive(Clone)]
pub struct AuthViewState {
    repository: AuthRepository,
    state: Observable<AuthUiState>,
}

impl AuthViewState {
    pub fn new(repository: AuthRepository) -> Self {
        Self {
            repository,
            state: Observable::new(AuthUiState::default()),
        }
    }

    pub fn state(&self) -> &Observable<AuthUiState> {
        &self.state
    }

    pub fn snapshot(&self) -> AuthUiState {
        self.state.get()
    }

    pub fn on_email_change(&self, email: &str) {
        self.state.update(|s| {
            s.email = email.to_string();
            s.error = None;
        });
    }

    pub fn on_password_change(&self, password: &str) {
        self.state.update(|s| {
            s.password = password.to_string();
            s.error = None;
        });
    }

    /// Mark the state as signed in when a restored session is active.
    pub async fn check_session(&self) {
        let logged_in = self.repository.is_user_logged_in().await;
        let email = if logged_in {
            self.repository.current_user_email().await
        } else {
            None
        };
        self.state.update(|s| {
            s.is_success = logged_in;
            if let Some(email) = email {
                s.email = email;
            }
        });
    }

    pub async fn login(&self) {
        let Some((email, password)) = self.credentials() else {
            return;
        };

        self.state.update(|s| {
            s.is_loading = true;
            s.error = None;
            s.message = None;
        });

        match self.repository.sign_in(&email, &password).await {
            Ok(_) => {
                log::info!("Signed in as {}", email);
                self.state.update(|s| {
                    s.is_loading = false;
                    s.password.clear();
                    s.is_success = true;
                });
            }
            Err(e) => {
                log::warn!("Sign-in failed: {}", e);
                self.state.update(|s| {
                    s.is_loading = false;
                    s.error = Some(format!("{}: {}", ERROR_LOGIN_FAILED, e));
                });
            }
        }
    }

    /// Register a new account.
    ///
    /// When the service requires email confirmation the user stays on the
    /// login screen with a message; otherwise the new session signs them in.
    pub async fn register(&self) {
        let Some((email, password)) = self.credentials() else {
            return;
        };

        self.state.update(|s| {
            s.is_loading = true;
            s.error = None;
            s.message = None;
        });

        match self.repository.sign_up(&email, &password).await {
            Ok(Some(_)) => {
                log::info!("Registered and signed in as {}", email);
                self.state.update(|s| {
                    s.is_loading = false;
                    s.password.clear();
                    s.is_success = true;
                });
            }
            Ok(None) => {
                log::info!("Registered {}, waiting for email confirmation", email);
                self.state.update(|s| {
                    s.is_loading = false;
                    s.message = Some(SUCCESS_REGISTERED.to_string());
                });
            }
            Err(e) => {
                log::warn!("Registration failed: {}", e);
                self.state.update(|s| {
                    s.is_loading = false;
                    s.error = Some(format!("{}: {}", ERROR_REGISTER_FAILED, e));
                });
            }
        }
    }

    /// Sign out and reset the whole state.
    pub async fn logout(&self) {
        match self.repository.sign_out().await {
            Ok(()) => {
                log::info!("Signed out");
                self.state.set(AuthUiState::default());
            }
            Err(e) => {
                log::warn!("Sign-out failed: {}", e);
                self.state.update(|s| s.error = Some(format!("{}: {}", ERROR_LOGOUT_FAILED, e)));
            }
        }
    }

    pub fn clear_error(&self) {
        self.state.update(|s| s.error = None);
    }

    fn credentials(&self) -> Option<(String, String)> {
        let state = self.state.get();
        let email = state.email.trim().to_string();
        if email.is_empty() || state.password.is_empty() {
            self.state
                .update(|s| s.error = Some(ERROR_CREDENTIALS_REQUIRED.to_string()));
            return None;
        }
        Some((email, state.password))
    }
}
