//! Category list state, including cover image upload.

use super::Observable;
use crate::backend::BackendError;
use crate::constants::{ERROR_CATEGORY_NAME_REQUIRED, ERROR_IMAGE_READ_FAILED};
use crate::entities::Category;
use crate::repositories::{AuthRepository, CategoryRepository, StorageRepository};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryUiState {
    pub categories: Vec<Category>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// What to do with a category's cover image on update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoverImage {
    /// Leave the current image as it is
    Keep,
    /// Remove the current image
    Clear,
    /// Upload these bytes as the new image
    Replace(Vec<u8>),
}

#[derive(Clone)]
pub struct CategoryViewState {
    categories: CategoryRepository,
    storage: StorageRepository,
    auth: AuthRepository,
    state: Observable<CategoryUiState>,
}

impl CategoryViewState {
    pub fn new(categories: CategoryRepository, storage: StorageRepository, auth: AuthRepository) -> Self {
        Self {
            categories,
            storage,
            auth,
            state: Observable::new(CategoryUiState::default()),
        }
    }

    pub fn state(&self) -> &Observable<CategoryUiState> {
        &self.state
    }

    pub fn snapshot(&self) -> CategoryUiState {
        self.state.get()
    }

    pub async fn load_categories(&self) {
        self.state.update(|s| {
            s.is_loading = true;
            s.error = None;
        });

        match self.categories.get_categories().await {
            Ok(categories) => {
                log::info!("Loaded {} categories", categories.len());
                self.state.update(|s| {
                    s.categories = categories;
                    s.is_loading = false;
                });
            }
            Err(e) => self.fail("load categories", e.to_string()),
        }
    }

    /// Create a category, uploading the cover image first when one is given.
    pub async fn add_category_with_image(&self, name: &str, image: Option<Vec<u8>>) {
        let name = name.trim();
        if name.is_empty() {
            self.state
                .update(|s| s.error = Some(ERROR_CATEGORY_NAME_REQUIRED.to_string()));
            return;
        }

        self.state.update(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let image_url = match image {
            Some(bytes) => match self.upload_cover(bytes).await {
                Ok(url) => Some(url),
                Err(e) => return self.fail("add category", e.to_string()),
            },
            None => None,
        };

        match self.categories.add_category(name, image_url.clone()).await {
            Ok(_) => {
                log::info!("Added category '{}'", name);
                self.load_categories().await;
            }
            Err(e) => {
                self.remove_cover(image_url.as_deref()).await;
                self.fail("add category", e.to_string());
            }
        }
    }

    /// Rename a category and keep, clear or replace its cover image.
    ///
    /// A replaced or cleared image is also removed from the bucket.
    pub async fn update_category_with_image(&self, id: &str, name: &str, current_image_url: Option<String>, image: CoverImage) {
        let name = name.trim();
        if name.is_empty() {
            self.state
                .update(|s| s.error = Some(ERROR_CATEGORY_NAME_REQUIRED.to_string()));
            return;
        }

        self.state.update(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let (image_url, uploaded) = match image {
            CoverImage::Keep => (current_image_url.clone(), None),
            CoverImage::Clear => (None, None),
            CoverImage::Replace(bytes) => match self.upload_cover(bytes).await {
                Ok(url) => (Some(url.clone()), Some(url)),
                Err(e) => return self.fail("update category", e.to_string()),
            },
        };
        let replaces_image = image_url != current_image_url;

        let result = self
            .categories
            .update_category(id, name, image_url)
            .await
            .and_then(|updated| updated.ok_or_else(|| BackendError::NotFound(format!("category {}", id))));

        match result {
            Ok(_) => {
                log::info!("Updated category {}", id);
                if replaces_image {
                    self.remove_cover(current_image_url.as_deref()).await;
                }
                self.load_categories().await;
            }
            Err(e) => {
                self.remove_cover(uploaded.as_deref()).await;
                self.fail("update category", e.to_string());
            }
        }
    }

    pub async fn delete_category(&self, id: &str) {
        self.state.update(|s| s.is_loading = true);

        let image_url = self
            .state
            .get()
            .categories
            .iter()
            .find(|c| c.id.as_deref() == Some(id))
            .and_then(|c| c.image_url.clone());

        match self.categories.delete_category(id).await {
            Ok(()) => {
                log::info!("Deleted category {}", id);
                self.remove_cover(image_url.as_deref()).await;
                self.load_categories().await;
            }
            Err(e) => self.fail("delete category", e.to_string()),
        }
    }

    pub fn reset(&self) {
        self.state.set(CategoryUiState::default());
    }

    pub fn reset_error(&self) {
        self.state.update(|s| s.error = None);
    }

    /// Read a local image file for upload, reporting failures in the state.
    pub async fn read_image(&self, path: &str) -> Option<Vec<u8>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                self.fail("read image", format!("{} {}: {}", ERROR_IMAGE_READ_FAILED, path, e));
                None
            }
        }
    }

    /// Upload to `categories/<user id>/<unix millis>.jpg` and return the public URL.
    async fn upload_cover(&self, bytes: Vec<u8>) -> Result<String, BackendError> {
        let user_id = self
            .auth
            .current_user_id()
            .await
            .ok_or(BackendError::NotAuthenticated)?;
        let path = format!("categories/{}/{}.jpg", user_id, crate::repositories::unix_millis());

        let key = self.storage.upload_image(bytes, &path).await?;
        Ok(self.storage.get_public_url(&key))
    }

    async fn remove_cover(&self, image_url: Option<&str>) {
        let Some(path) = image_url.and_then(|url| self.storage.path_from_public_url(url)) else {
            return;
        };
        if let Err(e) = self.storage.delete_image(&path).await {
            log::warn!("Failed to remove old cover image {}: {}", path, e);
        }
    }

    fn fail(&self, action: &str, message: String) {
        log::error!("Failed to {}: {}", action, message);
        self.state.update(|s| {
            s.is_loading = false;
            s.error = Some(message);
        });
    }
}
