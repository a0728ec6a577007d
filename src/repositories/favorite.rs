//! Favorite repository for the `favorites` table.

use std::collections::HashSet;
use std::sync::Arc;

use super::{current_user_id, require_user_id};
use crate::backend::{decode_rows, Backend, BackendError, Query};
use crate::constants::TABLE_FAVORITES;
use crate::entities::Favorite;

/// Repository for favorite markers.
#[derive(Clone)]
pub struct FavoriteRepository {
    backend: Arc<dyn Backend>,
}

impl FavoriteRepository {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Ids of the notes the signed-in user marked as favorite.
    pub async fn get_favorite_note_ids(&self) -> Result<HashSet<String>, BackendError> {
        let Some(user_id) = current_user_id(self.backend.as_ref()).await else {
            return Ok(HashSet::new());
        };

        let query = Query::table(TABLE_FAVORITES).eq("user_id", user_id);
        let favorites: Vec<Favorite> = decode_rows(self.backend.select(&query).await?)?;
        Ok(favorites.into_iter().map(|f| f.note_id).collect())
    }

    pub async fn add_favorite(&self, note_id: &str) -> Result<(), BackendError> {
        let user_id = require_user_id(self.backend.as_ref()).await?;
        let favorite = Favorite {
            id: None,
            user_id,
            note_id: note_id.to_string(),
        };
        self.backend
            .insert(TABLE_FAVORITES, serde_json::to_value(&favorite)?)
            .await?;
        Ok(())
    }

    pub async fn remove_favorite(&self, note_id: &str) -> Result<(), BackendError> {
        let user_id = require_user_id(self.backend.as_ref()).await?;
        let query = Query::table(TABLE_FAVORITES)
            .eq("user_id", user_id)
            .eq("note_id", note_id);
        self.backend.delete(&query).await
    }

    /// Flip the favorite state of a note and return the new state.
    ///
    /// `currently_favorite` is the caller's view; no remote read happens first.
    pub async fn toggle_favorite(&self, note_id: &str, currently_favorite: bool) -> Result<bool, BackendError> {
        if currently_favorite {
            self.remove_favorite(note_id).await?;
        } else {
            self.add_favorite(note_id).await?;
        }
        Ok(!currently_favorite)
    }
}
