//! Note list and note entry state.
//!
//! The list joins three remote reads (notes, categories, favorite ids) and
//! applies the category, favorites-only and search filters in memory. The
//! entry state backs the add/edit dialog.

use std::collections::HashSet;

use super::Observable;
use crate::constants::{
    ERROR_IMAGE_READ_FAILED, ERROR_LOAD_FAILED, ERROR_NOTE_NOT_FOUND, ERROR_NOTE_SAVE_FAILED, ERROR_REQUIRED_FIELDS,
    HEADER_UNCATEGORIZED, NEW_NOTE_ID,
};
use crate::entities::{Category, NewNote, Note};
use crate::repositories::{CategoryRepository, FavoriteRepository, NoteRepository};

/// State of the note list screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotesListUiState {
    pub notes: Vec<Note>,
    pub categories: Vec<Category>,
    pub favorite_ids: HashSet<String>,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Only show notes of this category
    pub category_filter: Option<String>,
    pub favorites_only: bool,
    pub search: String,
}

impl Default for NotesListUiState {
    fn default() -> Self {
        Self {
            notes: Vec::new(),
            categories: Vec::new(),
            favorite_ids: HashSet::new(),
            is_loading: true,
            error: None,
            category_filter: None,
            favorites_only: false,
            search: String::new(),
        }
    }
}

impl NotesListUiState {
    pub fn is_favorite(&self, note: &Note) -> bool {
        note.id.as_ref().is_some_and(|id| self.favorite_ids.contains(id))
    }

    pub fn category_name(&self, category_id: Option<&str>) -> Option<&str> {
        let id = category_id?;
        self.categories
            .iter()
            .find(|c| c.id.as_deref() == Some(id))
            .map(|c| c.name.as_str())
    }

    /// Notes passing the active filters, newest first.
    pub fn visible_notes(&self) -> Vec<Note> {
        let needle = self.search.trim().to_lowercase();

        self.notes
            .iter()
            .filter(|note| match &self.category_filter {
                Some(category_id) => note.category_id.as_ref() == Some(category_id),
                None => true,
            })
            .filter(|note| !self.favorites_only || self.is_favorite(note))
            .filter(|note| {
                needle.is_empty()
                    || note.title.to_lowercase().contains(&needle)
                    || note
                        .content
                        .as_deref()
                        .is_some_and(|content| content.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }

    /// Visible notes grouped under their category name.
    ///
    /// Groups follow the category order; notes without a known category come
    /// last under "Uncategorized". Empty groups are left out.
    pub fn grouped_by_category(&self) -> Vec<(String, Vec<Note>)> {
        let visible = self.visible_notes();
        let mut groups: Vec<(String, Vec<Note>)> = Vec::new();

        for category in &self.categories {
            let notes: Vec<Note> = visible
                .iter()
                .filter(|n| n.category_id.is_some() && n.category_id == category.id)
                .cloned()
                .collect();
            if !notes.is_empty() {
                groups.push((category.name.clone(), notes));
            }
        }

        let uncategorized: Vec<Note> = visible
            .into_iter()
            .filter(|n| self.category_name(n.category_id.as_deref()).is_none())
            .collect();
        if !uncategorized.is_empty() {
            groups.push((HEADER_UNCATEGORIZED.to_string(), uncategorized));
        }

        groups
    }
}

/// State of the note add/edit dialog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoteEntryUiState {
    /// The note being edited; `None` when adding
    pub current_note: Option<Note>,
    pub title: String,
    pub content: String,
    pub category_id: Option<String>,
    /// Local file chosen as the new image
    pub selected_image_path: Option<String>,
    /// Image already attached to the note
    pub existing_image_url: Option<String>,
    pub is_saving: bool,
    pub is_ready: bool,
    pub error: Option<String>,
}

impl NoteEntryUiState {
    pub fn is_edit_mode(&self) -> bool {
        self.current_note.is_some()
    }

    pub fn is_save_enabled(&self) -> bool {
        !self.title.trim().is_empty() && !self.content.trim().is_empty() && !self.is_saving
    }
}

#[derive(Clone)]
pub struct NotesViewState {
    notes: NoteRepository,
    categories: CategoryRepository,
    favorites: FavoriteRepository,
    list: Observable<NotesListUiState>,
    entry: Observable<NoteEntryUiState>,
}

impl NotesViewState {
    pub fn new(notes: NoteRepository, categories: CategoryRepository, favorites: FavoriteRepository) -> Self {
        Self {
            notes,
            categories,
            favorites,
            list: Observable::new(NotesListUiState::default()),
            entry: Observable::new(NoteEntryUiState::default()),
        }
    }

    pub fn list(&self) -> &Observable<NotesListUiState> {
        &self.list
    }

    pub fn entry(&self) -> &Observable<NoteEntryUiState> {
        &self.entry
    }

    /// Fetch notes, categories and favorite ids afresh.
    pub async fn load_notes(&self) {
        self.list.update(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let result = async {
            let notes = self.notes.get_notes().await?;
            let categories = self.categories.get_categories().await?;
            let favorite_ids = self.favorites.get_favorite_note_ids().await?;
            Ok::<_, crate::backend::BackendError>((notes, categories, favorite_ids))
        }
        .await;

        match result {
            Ok((notes, categories, favorite_ids)) => {
                log::info!("Loaded {} notes", notes.len());
                self.list.update(|s| {
                    // Drop a filter pointing at a category that no longer exists
                    if let Some(filter) = &s.category_filter {
                        if !categories.iter().any(|c| c.id.as_ref() == Some(filter)) {
                            s.category_filter = None;
                        }
                    }
                    s.notes = notes;
                    s.categories = categories;
                    s.favorite_ids = favorite_ids;
                    s.is_loading = false;
                });
            }
            Err(e) => {
                log::error!("Failed to load notes: {}", e);
                self.list.update(|s| {
                    s.is_loading = false;
                    s.error = Some(format!("{}: {}", ERROR_LOAD_FAILED, e));
                });
            }
        }
    }

    pub async fn delete_note(&self, note_id: &str) {
        match self.notes.delete_note(note_id).await {
            Ok(()) => {
                log::info!("Deleted note {}", note_id);
                self.list.update(|s| {
                    s.notes.retain(|n| n.id.as_deref() != Some(note_id));
                    s.favorite_ids.remove(note_id);
                });
            }
            Err(e) => {
                log::error!("Failed to delete note {}: {}", note_id, e);
                self.list.update(|s| s.error = Some(e.to_string()));
            }
        }
    }

    /// Prepare the entry dialog for an existing note, or for a new one when
    /// `note_id` is `"new"`.
    pub async fn load_note_detail(&self, note_id: &str) {
        if note_id == NEW_NOTE_ID {
            let category_id = self.list.get().category_filter;
            self.entry.set(NoteEntryUiState {
                category_id,
                is_ready: true,
                ..NoteEntryUiState::default()
            });
            return;
        }

        self.entry.set(NoteEntryUiState::default());

        match self.notes.get_note_by_id(note_id).await {
            Ok(Some(note)) => self.entry.update(|s| {
                s.title = note.title.clone();
                s.content = note.content.clone().unwrap_or_default();
                s.category_id = note.category_id.clone();
                s.existing_image_url = note.image_url.clone();
                s.current_note = Some(note);
                s.is_ready = true;
            }),
            Ok(None) => self.entry.update(|s| {
                s.error = Some(ERROR_NOTE_NOT_FOUND.to_string());
                s.is_ready = true;
            }),
            Err(e) => {
                log::error!("Failed to load note {}: {}", note_id, e);
                self.entry.update(|s| {
                    s.error = Some(e.to_string());
                    s.is_ready = true;
                });
            }
        }
    }

    pub fn update_title(&self, title: &str) {
        self.entry.update(|s| s.title = title.to_string());
    }

    pub fn update_content(&self, content: &str) {
        self.entry.update(|s| s.content = content.to_string());
    }

    pub fn update_category(&self, category_id: Option<String>) {
        self.entry.update(|s| s.category_id = category_id);
    }

    /// Choose a local image file; a blank path clears the selection.
    pub fn update_selected_image(&self, path: Option<String>) {
        let path = path.filter(|p| !p.trim().is_empty());
        self.entry.update(|s| s.selected_image_path = path);
    }

    /// Detach the image currently stored on the note.
    pub fn remove_existing_image(&self) {
        self.entry.update(|s| s.existing_image_url = None);
    }

    /// Upload the selected image if any, then insert or update the note.
    ///
    /// Returns whether the note was stored.
    pub async fn save_note(&self) -> bool {
        let state = self.entry.get();
        if !state.is_save_enabled() {
            self.entry
                .update(|s| s.error = Some(ERROR_REQUIRED_FIELDS.to_string()));
            return false;
        }

        self.entry.update(|s| {
            s.is_saving = true;
            s.error = None;
        });

        let mut image_url = state.existing_image_url.clone();
        if let Some(path) = &state.selected_image_path {
            let bytes = match tokio::fs::read(path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    self.fail_save(format!("{} {}: {}", ERROR_IMAGE_READ_FAILED, path, e));
                    return false;
                }
            };
            match self.notes.upload_note_image(bytes).await {
                Ok(url) => image_url = Some(url),
                Err(e) => {
                    self.fail_save(format!("Error: {}", e));
                    return false;
                }
            }
        }

        let content = Some(state.content.clone());
        let saved = match &state.current_note {
            Some(current) => {
                let updated = Note {
                    title: state.title.clone(),
                    content,
                    image_url,
                    category_id: state.category_id.clone(),
                    ..current.clone()
                };
                self.notes.update_note(&updated).await
            }
            None => {
                let new_note = NewNote {
                    title: state.title.clone(),
                    content,
                    image_url,
                    category_id: state.category_id.clone(),
                };
                self.notes.insert_note(new_note).await
            }
        };

        match saved {
            Ok(Some(note)) => {
                log::info!("Saved note {}", note.id.as_deref().unwrap_or_default());
                self.entry.update(|s| {
                    s.is_saving = false;
                    s.selected_image_path = None;
                    s.existing_image_url = note.image_url.clone();
                    s.current_note = Some(note);
                });
                true
            }
            Ok(None) => {
                self.fail_save(ERROR_NOTE_SAVE_FAILED.to_string());
                false
            }
            Err(e) => {
                self.fail_save(format!("Error: {}", e));
                false
            }
        }
    }

    /// Flip a note's favorite marker based on the list's current view of it.
    pub async fn toggle_favorite(&self, note_id: &str) {
        let currently_favorite = self.list.get().favorite_ids.contains(note_id);

        match self.favorites.toggle_favorite(note_id, currently_favorite).await {
            Ok(now_favorite) => self.list.update(|s| {
                if now_favorite {
                    s.favorite_ids.insert(note_id.to_string());
                } else {
                    s.favorite_ids.remove(note_id);
                }
            }),
            Err(e) => {
                log::error!("Failed to toggle favorite for {}: {}", note_id, e);
                self.list.update(|s| s.error = Some(e.to_string()));
            }
        }
    }

    pub fn set_category_filter(&self, category_id: Option<String>) {
        self.list.update(|s| s.category_filter = category_id);
    }

    /// Step the category filter: all, then each category in order, then all.
    pub fn cycle_category_filter(&self) {
        self.list.update(|s| {
            let ids: Vec<String> = s.categories.iter().filter_map(|c| c.id.clone()).collect();
            s.category_filter = match &s.category_filter {
                None => ids.first().cloned(),
                Some(current) => ids
                    .iter()
                    .position(|id| id == current)
                    .and_then(|pos| ids.get(pos + 1).cloned()),
            };
        });
    }

    pub fn toggle_favorites_only(&self) {
        self.list.update(|s| s.favorites_only = !s.favorites_only);
    }

    pub fn set_search(&self, search: &str) {
        self.list.update(|s| s.search = search.to_string());
    }

    /// Drop the signed-in user's notes, filters and draft.
    pub fn reset(&self) {
        self.list.set(NotesListUiState::default());
        self.entry.set(NoteEntryUiState::default());
    }

    pub fn clear_list_error(&self) {
        self.list.update(|s| s.error = None);
    }

    pub fn clear_entry_error(&self) {
        self.entry.update(|s| s.error = None);
    }

    fn fail_save(&self, message: String) {
        log::error!("Failed to save note: {}", message);
        self.entry.update(|s| {
            s.is_saving = false;
            s.error = Some(message);
        });
    }
}
