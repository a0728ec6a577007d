//! Favorite notes state.

use std::collections::HashSet;

use super::Observable;
use crate::constants::ERROR_LOAD_FAILED;
use crate::entities::Note;
use crate::repositories::{FavoriteRepository, NoteRepository};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FavoriteUiState {
    /// Notes marked as favorite, newest first
    pub notes: Vec<Note>,
    pub favorite_ids: HashSet<String>,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct FavoriteViewState {
    notes: NoteRepository,
    favorites: FavoriteRepository,
    state: Observable<FavoriteUiState>,
}

impl FavoriteViewState {
    pub fn new(notes: NoteRepository, favorites: FavoriteRepository) -> Self {
        Self {
            notes,
            favorites,
            state: Observable::new(FavoriteUiState::default()),
        }
    }

    pub fn state(&self) -> &Observable<FavoriteUiState> {
        &self.state
    }

    pub fn snapshot(&self) -> FavoriteUiState {
        self.state.get()
    }

    pub async fn load(&self) {
        self.state.update(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let result = async {
            let notes = self.notes.get_notes().await?;
            let favorite_ids = self.favorites.get_favorite_note_ids().await?;
            Ok::<_, crate::backend::BackendError>((notes, favorite_ids))
        }
        .await;

        match result {
            Ok((notes, favorite_ids)) => {
                let notes: Vec<Note> = notes
                    .into_iter()
                    .filter(|n| n.id.as_ref().is_some_and(|id| favorite_ids.contains(id)))
                    .collect();
                log::info!("Loaded {} favorite notes", notes.len());
                self.state.set(FavoriteUiState {
                    notes,
                    favorite_ids,
                    is_loading: false,
                    error: None,
                });
            }
            Err(e) => {
                log::error!("Failed to load favorites: {}", e);
                self.state.update(|s| {
                    s.is_loading = false;
                    s.error = Some(format!("{}: {}", ERROR_LOAD_FAILED, e));
                });
            }
        }
    }

    /// Toggle a note; unfavorited notes leave the list right away.
    pub async fn toggle_favorite(&self, note_id: &str) {
        let currently_favorite = self.state.get().favorite_ids.contains(note_id);

        match self.favorites.toggle_favorite(note_id, currently_favorite).await {
            Ok(true) => self.state.update(|s| {
                s.favorite_ids.insert(note_id.to_string());
            }),
            Ok(false) => self.state.update(|s| {
                s.favorite_ids.remove(note_id);
                s.notes.retain(|n| n.id.as_deref() != Some(note_id));
            }),
            Err(e) => {
                log::error!("Failed to toggle favorite for {}: {}", note_id, e);
                self.state.update(|s| s.error = Some(e.to_string()));
            }
        }
    }

    pub fn reset(&self) {
        self.state.set(FavoriteUiState::default());
    }

    pub fn clear_error(&self) {
        self.state.update(|s| s.error = None);
    }
}
