//! Note repository for the `notes` table and the note image bucket.

use serde_json::json;
use std::sync::Arc;

use super::{current_user_id, require_user_id, unix_millis, IMAGE_CONTENT_TYPE};
use crate::backend::{decode_first, decode_rows, Backend, BackendError, Order, Query};
use crate::constants::TABLE_NOTES;
use crate::entities::{NewNote, Note};

/// Columns fetched for the note list.
const NOTE_COLUMNS: [&str; 7] = [
    "id",
    "user_id",
    "title",
    "content",
    "date_created",
    "image_url",
    "category_id",
];

/// Repository for note-related remote operations.
#[derive(Clone)]
pub struct NoteRepository {
    backend: Arc<dyn Backend>,
    image_bucket: String,
}

impl NoteRepository {
    pub fn new(backend: Arc<dyn Backend>, image_bucket: &str) -> Self {
        Self {
            backend,
            image_bucket: image_bucket.to_string(),
        }
    }

    /// Fetch every note of the signed-in user, newest first.
    ///
    /// Each call is a fresh fetch. Signed out, the list is empty.
    pub async fn get_notes(&self) -> Result<Vec<Note>, BackendError> {
        let Some(user_id) = current_user_id(self.backend.as_ref()).await else {
            return Ok(Vec::new());
        };

        let query = Query::table(TABLE_NOTES)
            .columns(&NOTE_COLUMNS)
            .eq("user_id", user_id)
            .order("date_created", Order::Descending);
        decode_rows(self.backend.select(&query).await?)
    }

    pub async fn get_note_by_id(&self, id: &str) -> Result<Option<Note>, BackendError> {
        let query = Query::table(TABLE_NOTES).eq("id", id).limit(1);
        decode_first(self.backend.select(&query).await?)
    }

    /// Insert a note owned by the signed-in user and return the stored row.
    pub async fn insert_note(&self, note: NewNote) -> Result<Option<Note>, BackendError> {
        let user_id = require_user_id(self.backend.as_ref()).await?;
        let row = serde_json::to_value(note.into_note(&user_id))?;
        decode_first(self.backend.insert(TABLE_NOTES, row).await?)
    }

    /// Overwrite the editable fields of an existing note.
    pub async fn update_note(&self, note: &Note) -> Result<Option<Note>, BackendError> {
        let id = note
            .id
            .as_deref()
            .ok_or_else(|| BackendError::InvalidData("Note ID cannot be empty".to_string()))?;

        let patch = json!({
            "title": note.title,
            "content": note.content,
            "image_url": note.image_url,
            "category_id": note.category_id,
        });
        let query = Query::table(TABLE_NOTES).eq("id", id);
        decode_first(self.backend.update(&query, patch).await?)
    }

    pub async fn delete_note(&self, id: &str) -> Result<(), BackendError> {
        self.backend.delete(&Query::table(TABLE_NOTES).eq("id", id)).await
    }

    /// Upload an image as `img_<unix millis>.jpg` and return its public URL.
    pub async fn upload_note_image(&self, bytes: Vec<u8>) -> Result<String, BackendError> {
        let file_name = format!("img_{}.jpg", unix_millis());
        let key = self
            .backend
            .upload(&self.image_bucket, &file_name, bytes, IMAGE_CONTENT_TYPE)
            .await?;
        Ok(self.backend.public_url(&self.image_bucket, &key))
    }
}
