//! Repository layer for remote table and bucket operations.
//!
//! Each method maps to one remote call. Nothing is retried or cached; failures
//! propagate to the caller as [`BackendError`].

use std::sync::Arc;

use crate::backend::{Backend, BackendError};
use crate::config::BackendConfig;
use crate::session::SessionStore;

pub mod auth;
pub mod category;
pub mod favorite;
pub mod note;
pub mod storage;
pub mod study_plan;

pub use auth::AuthRepository;
pub use category::CategoryRepository;
pub use favorite::FavoriteRepository;
pub use note::NoteRepository;
pub use storage::StorageRepository;
pub use study_plan::StudyPlanRepository;

/// Content type sent with every image upload; object names end in `.jpg`.
pub(crate) const IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// All repositories, sharing one backend client.
#[derive(Clone)]
pub struct Repositories {
    pub auth: AuthRepository,
    pub notes: NoteRepository,
    pub categories: CategoryRepository,
    pub study_plans: StudyPlanRepository,
    pub favorites: FavoriteRepository,
    pub storage: StorageRepository,
}

impl Repositories {
    pub fn new(backend: Arc<dyn Backend>, config: &BackendConfig, sessions: Arc<SessionStore>) -> Self {
        Self {
            auth: AuthRepository::new(backend.clone(), sessions),
            notes: NoteRepository::new(backend.clone(), &config.note_image_bucket),
            categories: CategoryRepository::new(backend.clone()),
            study_plans: StudyPlanRepository::new(backend.clone()),
            favorites: FavoriteRepository::new(backend.clone()),
            storage: StorageRepository::new(backend, &config.category_image_bucket),
        }
    }
}

/// Id of the signed-in user, if any.
pub(crate) async fn current_user_id(backend: &dyn Backend) -> Option<String> {
    backend.current_session().await.map(|session| session.user.id)
}

/// Id of the signed-in user, or `NotAuthenticated`.
pub(crate) async fn require_user_id(backend: &dyn Backend) -> Result<String, BackendError> {
    current_user_id(backend).await.ok_or(BackendError::NotAuthenticated)
}

/// Object name suffix used for uploaded images.
pub(crate) fn unix_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
