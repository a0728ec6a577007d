//! Category repository for the `categories` table.

use serde_json::json;
use std::sync::Arc;

use super::{current_user_id, require_user_id};
use crate::backend::{decode_first, decode_rows, Backend, BackendError, Order, Query};
use crate::constants::TABLE_CATEGORIES;
use crate::entities::Category;

/// Repository for category-related remote operations.
#[derive(Clone)]
pub struct CategoryRepository {
    backend: Arc<dyn Backend>,
}

impl CategoryRepository {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Categories of the signed-in user sorted by name.
    pub async fn get_categories(&self) -> Result<Vec<Category>, BackendError> {
        let Some(user_id) = current_user_id(self.backend.as_ref()).await else {
            return Ok(Vec::new());
        };

        let query = Query::table(TABLE_CATEGORIES)
            .eq("user_id", user_id)
            .order("name", Order::Ascending);
        decode_rows(self.backend.select(&query).await?)
    }

    pub async fn add_category(&self, name: &str, image_url: Option<String>) -> Result<Option<Category>, BackendError> {
        let user_id = require_user_id(self.backend.as_ref()).await?;
        let category = Category {
            id: None,
            user_id,
            name: name.to_string(),
            image_url,
        };
        let row = serde_json::to_value(&category)?;
        decode_first(self.backend.insert(TABLE_CATEGORIES, row).await?)
    }

    /// Set the name and cover image. `None` clears the image.
    pub async fn update_category(
        &self,
        id: &str,
        name: &str,
        image_url: Option<String>,
    ) -> Result<Option<Category>, BackendError> {
        let patch = json!({ "name": name, "image_url": image_url });
        let query = Query::table(TABLE_CATEGORIES).eq("id", id);
        decode_first(self.backend.update(&query, patch).await?)
    }

    pub async fn delete_category(&self, id: &str) -> Result<(), BackendError> {
        self.backend.delete(&Query::table(TABLE_CATEGORIES).eq("id", id)).await
    }
}
