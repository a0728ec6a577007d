//! Storage repository for category cover images.

use std::sync::Arc;

use super::IMAGE_CONTENT_TYPE;
use crate::backend::{Backend, BackendError};

/// Repository for objects in the category image bucket.
#[derive(Clone)]
pub struct StorageRepository {
    backend: Arc<dyn Backend>,
    bucket: String,
}

impl StorageRepository {
    pub fn new(backend: Arc<dyn Backend>, bucket: &str) -> Self {
        Self {
            backend,
            bucket: bucket.to_string(),
        }
    }

    /// Upload bytes to `path` and return the stored key.
    pub async fn upload_image(&self, bytes: Vec<u8>, path: &str) -> Result<String, BackendError> {
        self.backend
            .upload(&self.bucket, path, bytes, IMAGE_CONTENT_TYPE)
            .await
    }

    pub fn get_public_url(&self, path: &str) -> String {
        self.backend.public_url(&self.bucket, path)
    }

    pub async fn delete_image(&self, path: &str) -> Result<(), BackendError> {
        self.backend.remove(&self.bucket, &[path.to_string()]).await
    }

    /// Key of an object in this bucket given its public URL.
    pub fn path_from_public_url(&self, url: &str) -> Option<String> {
        let prefix = self.backend.public_url(&self.bucket, "");
        url.strip_prefix(&prefix)
            .filter(|path| !path.is_empty())
            .map(str::to_string)
    }
}
