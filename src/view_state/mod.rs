//! Observable state holders backing each screen.
//!
//! A holder owns the repositories it needs and one [`Observable`] UI state.
//! Every async operation marks the state as loading, calls the repositories and
//! writes either the data or a display-only `error` message. Errors never
//! escape a holder; the screen shows them and the user retries by hand.

use std::sync::Arc;
use tokio::sync::watch;

pub mod auth;
pub mod categories;
pub mod favorites;
pub mod notes;
pub mod study_plan;

pub use auth::{AuthUiState, AuthViewState};
pub use categories::{CategoryUiState, CategoryViewState, CoverImage};
pub use favorites::{FavoriteUiState, FavoriteViewState};
pub use notes::{NoteEntryUiState, NotesListUiState, NotesViewState};
pub use study_plan::{StudyPlanSection, StudyPlanUiState, StudyPlanViewState};

use crate::repositories::Repositories;

/// A value that can be read, updated and watched from several tasks.
#[derive(Debug)]
pub struct Observable<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<T: Clone> Observable<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    /// Receiver notified on every change.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

/// Every screen's view state, created once at startup.
#[derive(Clone)]
pub struct ViewStates {
    pub auth: AuthViewState,
    pub notes: NotesViewState,
    pub favorites: FavoriteViewState,
    pub categories: CategoryViewState,
    pub study_plan: StudyPlanViewState,
}

impl ViewStates {
    pub fn new(repositories: &Repositories) -> Self {
        Self {
            auth: AuthViewState::new(repositories.auth.clone()),
            notes: NotesViewState::new(
                repositories.notes.clone(),
                repositories.categories.clone(),
                repositories.favorites.clone(),
            ),
            favorites: FavoriteViewState::new(repositories.notes.clone(), repositories.favorites.clone()),
            categories: CategoryViewState::new(
                repositories.categories.clone(),
                repositories.storage.clone(),
                repositories.auth.clone(),
            ),
            study_plan: StudyPlanViewState::new(repositories.study_plans.clone()),
        }
    }

    /// Forget everything loaded for the previous user. Auth state is left alone.
    pub fn reset_user_data(&self) {
        self.notes.reset();
        self.favorites.reset();
        self.categories.reset();
        self.study_plan.reset();
    }
}
