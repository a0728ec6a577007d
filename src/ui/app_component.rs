use crate::config::Config;
use crate::constants::{NEW_NOTE_ID, SUCCESS_NOTE_SAVED};
use crate::icons::IconService;
use crate::logger::Logger;
use crate::ui::components::{
    AuthComponent, CategoryListComponent, DialogComponent, NoteListComponent, NoteListMode, SidebarComponent,
    StatusBar, StudyPlanComponent,
};
use crate::ui::core::{
    actions::{Action, CoverChange, DialogType, View},
    event_handler::EventType,
    task_manager::TaskManager,
    Component,
};
use crate::ui::layout::LayoutManager;
use crate::view_state::{CoverImage, ViewStates};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{layout::Rect, Frame};
use std::future::Future;
use tokio::sync::mpsc;

pub struct AppComponent {
    // Component composition
    sidebar: SidebarComponent,
    notes_list: NoteListComponent,
    favorites_list: NoteListComponent,
    categories: CategoryListComponent,
    study_plan: StudyPlanComponent,
    auth: AuthComponent,
    dialog: DialogComponent,

    // Services
    view_states: ViewStates,
    task_manager: TaskManager,
    background_action_rx: mpsc::UnboundedReceiver<Action>,
    logger: Logger,
    icons: IconService,

    // Simple UI state
    start_view: View,
    sidebar_width: u16,
    signed_in: bool,
    should_quit: bool,
}

impl AppComponent {
    pub fn new(config: &Config, logger: Logger, view_states: ViewStates) -> Self {
        let (task_manager, background_action_rx) = TaskManager::new();
        let icons = IconService::new(config.display.icon_theme);

        let mut notes_list = NoteListComponent::new(NoteListMode::All);
        notes_list.show_content_preview = config.display.show_content_preview;
        let mut favorites_list = NoteListComponent::new(NoteListMode::Favorites);
        favorites_list.show_content_preview = config.display.show_content_preview;

        let mut study_plan = StudyPlanComponent::new();
        study_plan.date_format = config.display.date_format.clone();

        let mut dialog = DialogComponent::new();
        dialog.set_logger(logger.clone());

        let mut app = Self {
            sidebar: SidebarComponent::new(),
            notes_list,
            favorites_list,
            categories: CategoryListComponent::new(),
            study_plan,
            auth: AuthComponent::new(),
            dialog,
            view_states,
            task_manager,
            background_action_rx,
            logger,
            icons: icons.clone(),
            start_view: View::from_config_name(&config.ui.start_view),
            sidebar_width: config.ui.sidebar_width,
            signed_in: false,
            should_quit: false,
        };
        app.apply_icons(icons);
        app
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn current_view(&self) -> View {
        self.sidebar.selection
    }

    /// Check for a restored session and open the start view when there is one
    pub async fn start(&mut self) {
        self.logger.log("AppComponent: Checking for an active session".to_string());
        self.view_states.auth.check_session().await;
        self.dispatch(Action::AuthFinished);
    }

    fn apply_icons(&mut self, icons: IconService) {
        self.sidebar.icons = icons.clone();
        self.notes_list.icons = icons.clone();
        self.favorites_list.icons = icons.clone();
        self.categories.icons = icons.clone();
        self.study_plan.icons = icons.clone();
        self.auth.icons = icons.clone();
        self.dialog.icons = icons.clone();
        self.icons = icons;
    }

    /// Update all components with the current view state snapshots
    fn sync_component_data(&mut self) {
        let notes = self.view_states.notes.list().get();
        let favorites = self.view_states.favorites.snapshot();
        let categories = self.view_states.categories.snapshot();
        let plans = self.view_states.study_plan.snapshot();

        // Whichever screen loaded categories last has the freshest list
        let known_categories = if categories.categories.is_empty() {
            notes.categories.clone()
        } else {
            categories.categories.clone()
        };

        self.notes_list.update_from_notes(&notes);
        self.favorites_list.update_from_favorites(&favorites, &known_categories);
        self.categories.update_data(&categories);
        self.study_plan
            .update_data(&plans, chrono::Local::now().date_naive());
        self.auth.update_data(&self.view_states.auth.snapshot());

        self.sidebar.set_count(View::Notes, notes.notes.len());
        self.sidebar.set_count(View::Favorites, favorites.notes.len());
        self.sidebar.set_count(View::Categories, categories.categories.len());
        self.sidebar.set_count(View::StudyPlan, plans.study_plans.len());

        self.dialog.categories = known_categories;
    }

    /// Handle global keyboard shortcuts that aren't component-specific
    fn handle_global_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('q') => {
                self.logger.log("Global key: 'q' - quitting application".to_string());
                Action::Quit
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.logger.log("Global key: Ctrl+C - quitting application".to_string());
                Action::Quit
            }
            KeyCode::Char('?') => {
                self.logger.log("Global key: '?' - opening help dialog".to_string());
                Action::ShowDialog(DialogType::Help)
            }
            KeyCode::Char('G') => {
                self.logger.log("Global key: 'G' - opening logs dialog".to_string());
                Action::ShowDialog(DialogType::Logs)
            }
            KeyCode::Char('i') => {
                self.logger.log("Global key: 'i' - cycling icon theme".to_string());
                Action::CycleIconTheme
            }
            KeyCode::Char('L') => {
                self.logger.log("Global key: 'L' - logging out".to_string());
                Action::Logout
            }
            KeyCode::Esc => {
                let list = self.view_states.notes.list().get();
                if self.current_view() == View::Notes
                    && (list.category_filter.is_some() || list.favorites_only || !list.search.is_empty())
                {
                    self.logger.log("Global key: Esc - clearing note filters".to_string());
                    self.view_states.notes.set_category_filter(None);
                    self.view_states.notes.set_search("");
                    if list.favorites_only {
                        self.view_states.notes.toggle_favorites_only();
                    }
                }
                Action::None
            }
            _ => Action::None,
        }
    }

    /// Run a view state operation in the background and report its view when done
    fn spawn_for_view<F>(&mut self, description: &str, view: View, operation: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.logger.log(format!("Task: {}", description));
        self.task_manager.spawn_operation(description, async move {
            operation.await;
            Action::OperationCompleted(view)
        });
    }

    /// Fetch the data a screen shows. Every visit re-fetches.
    fn load_view(&mut self, view: View) {
        match view {
            View::Notes => {
                let notes = self.view_states.notes.clone();
                self.spawn_for_view("Loading notes", view, async move { notes.load_notes().await });
            }
            View::Favorites => {
                let favorites = self.view_states.favorites.clone();
                let categories = self.view_states.categories.clone();
                self.spawn_for_view("Loading favorites", view, async move {
                    favorites.load().await;
                    categories.load_categories().await;
                });
            }
            View::Categories => {
                let categories = self.view_states.categories.clone();
                self.spawn_for_view("Loading categories", view, async move {
                    categories.load_categories().await
                });
            }
            View::StudyPlan => {
                let plans = self.view_states.study_plan.clone();
                self.spawn_for_view("Loading study plans", view, async move {
                    plans.load_study_plans().await
                });
            }
        }
    }

    /// Take the error a finished operation left in a screen's state
    fn take_error(&self, view: View) -> Option<String> {
        let states = &self.view_states;
        match view {
            View::Notes => {
                let error = states.notes.list().get().error;
                states.notes.clear_list_error();
                error
            }
            View::Favorites => {
                let error = states.favorites.snapshot().error.or(states.categories.snapshot().error);
                states.favorites.clear_error();
                states.categories.reset_error();
                error
            }
            View::Categories => {
                let error = states.categories.snapshot().error;
                states.categories.reset_error();
                error
            }
            View::StudyPlan => {
                let error = states.study_plan.snapshot().error;
                states.study_plan.clear_error();
                error
            }
        }
    }

    /// Handle app-level actions that require business logic
    pub fn handle_app_action(&mut self, action: Action) -> Action {
        match action {
            Action::Quit => {
                self.logger.log("Quitting, cancelling background tasks".to_string());
                self.task_manager.cancel_all_tasks();
                self.should_quit = true;
                Action::None
            }
            Action::NavigateTo(view) => {
                self.logger.log(format!("Navigation: switched to {}", view.title()));
                self.load_view(view);
                Action::None
            }
            Action::Reload => {
                self.load_view(self.current_view());
                Action::None
            }
            Action::OperationCompleted(view) => {
                self.sync_component_data();
                match self.take_error(view) {
                    Some(error) => {
                        self.logger.log(format!("{}: operation failed: {}", view.title(), error));
                        Action::ShowDialog(DialogType::Error(error))
                    }
                    None => Action::None,
                }
            }
            Action::CycleIconTheme => {
                let mut icons = self.icons.clone();
                icons.cycle_icon_theme();
                self.logger.log(format!("Icon theme: {:?}", icons.theme()));
                self.apply_icons(icons);
                Action::None
            }

            // Authentication
            Action::Login { email, password } => {
                let auth = self.view_states.auth.clone();
                auth.on_email_change(&email);
                auth.on_password_change(&password);
                self.logger.log(format!("Auth: signing in as {}", email));
                self.task_manager.spawn_operation("Signing in", async move {
                    auth.login().await;
                    Action::AuthFinished
                });
                Action::None
            }
            Action::Register { email, password } => {
                let auth = self.view_states.auth.clone();
                auth.on_email_change(&email);
                auth.on_password_change(&password);
                self.logger.log(format!("Auth: registering {}", email));
                self.task_manager.spawn_operation("Creating account", async move {
                    auth.register().await;
                    Action::AuthFinished
                });
                Action::None
            }
            Action::Logout => {
                let auth = self.view_states.auth.clone();
                self.task_manager.cancel_all_tasks();
                self.task_manager.spawn_operation("Signing out", async move {
                    auth.logout().await;
                    Action::AuthFinished
                });
                Action::None
            }
            Action::AuthFinished => {
                let state = self.view_states.auth.snapshot();
                self.auth.update_data(&state);
                let was_signed_in = self.signed_in;
                self.signed_in = state.is_success;

                match (was_signed_in, self.signed_in) {
                    (false, true) => {
                        self.logger.log(format!("Auth: signed in as {}", state.email));
                        self.sidebar.user_email = Some(state.email).filter(|e| !e.is_empty());
                        Action::NavigateTo(self.start_view)
                    }
                    (true, false) => {
                        self.logger.log("Auth: signed out".to_string());
                        self.sidebar.user_email = None;
                        self.dialog.clear_dialog();
                        self.view_states.reset_user_data();
                        self.sync_component_data();
                        Action::None
                    }
                    (true, true) => match state.error {
                        Some(error) => {
                            self.view_states.auth.clear_error();
                            Action::ShowDialog(DialogType::Error(error))
                        }
                        None => Action::None,
                    },
                    (false, false) => Action::None,
                }
            }

            // Notes
            Action::OpenNoteEditor(note_id) => {
                let notes = self.view_states.notes.clone();
                let id = note_id.unwrap_or_else(|| NEW_NOTE_ID.to_string());
                self.task_manager.spawn_operation("Opening note", async move {
                    notes.load_note_detail(&id).await;
                    Action::NoteEditorReady
                });
                Action::None
            }
            Action::NoteEditorReady => {
                let entry = self.view_states.notes.entry().get();
                if let Some(error) = entry.error {
                    self.view_states.notes.clear_entry_error();
                    return Action::ShowDialog(DialogType::Error(error));
                }
                Action::ShowDialog(DialogType::NoteEditor {
                    note_id: entry.current_note.and_then(|note| note.id),
                    title: entry.title,
                    content: entry.content,
                    category_id: entry.category_id,
                    image_url: entry.existing_image_url,
                })
            }
            Action::SaveNote {
                title,
                content,
                category_id,
                image_path,
                remove_image,
            } => {
                let notes = self.view_states.notes.clone();
                notes.update_title(&title);
                notes.update_content(&content);
                notes.update_category(category_id);
                notes.update_selected_image(image_path);
                if remove_image {
                    notes.remove_existing_image();
                }

                let favorites = (self.current_view() == View::Favorites).then(|| self.view_states.favorites.clone());
                self.logger.log(format!("Note: saving '{}'", title));
                self.task_manager.spawn_operation("Saving note", async move {
                    let saved = notes.save_note().await;
                    if saved {
                        notes.load_notes().await;
                        if let Some(favorites) = favorites {
                            favorites.load().await;
                        }
                    }
                    Action::NoteSaved(saved)
                });
                Action::None
            }
            Action::NoteSaved(saved) => {
                self.sync_component_data();
                if saved {
                    Action::ShowDialog(DialogType::Info(SUCCESS_NOTE_SAVED.to_string()))
                } else {
                    let error = self.view_states.notes.entry().get().error.unwrap_or_default();
                    self.view_states.notes.clear_entry_error();
                    self.logger.log(format!("Note: save failed: {}", error));
                    Action::ShowDialog(DialogType::Error(error))
                }
            }
            Action::DeleteNote(id) => {
                let notes = self.view_states.notes.clone();
                let view = self.current_view();
                let favorites = (view == View::Favorites).then(|| self.view_states.favorites.clone());
                self.spawn_for_view("Deleting note", view, async move {
                    notes.delete_note(&id).await;
                    if let Some(favorites) = favorites {
                        favorites.load().await;
                    }
                });
                Action::None
            }
            Action::ToggleFavorite(id) => {
                let view = self.current_view();
                if view == View::Favorites {
                    let favorites = self.view_states.favorites.clone();
                    self.spawn_for_view("Updating favorites", view, async move {
                        favorites.toggle_favorite(&id).await
                    });
                } else {
                    let notes = self.view_states.notes.clone();
                    self.spawn_for_view("Updating favorites", view, async move { notes.toggle_favorite(&id).await });
                }
                Action::None
            }
            Action::CycleCategoryFilter => {
                self.view_states.notes.cycle_category_filter();
                self.sync_component_data();
                Action::None
            }
            Action::ToggleFavoritesOnly => {
                self.view_states.notes.toggle_favorites_only();
                self.sync_component_data();
                Action::None
            }
            Action::SearchNotes(query) => {
                self.view_states.notes.set_search(&query);
                let matches = self.view_states.notes.list().get().visible_notes().len();
                self.dialog.search_match_count = Some(matches);
                self.sync_component_data();
                Action::None
            }
            Action::ShowCategoryNotes(category_id) => {
                self.logger.log(format!("Navigation: notes of category {}", category_id));
                self.view_states.notes.set_category_filter(Some(category_id));
                Action::NavigateTo(View::Notes)
            }

            // Categories
            Action::CreateCategory { name, image_path } => {
                let categories = self.view_states.categories.clone();
                self.spawn_for_view("Creating category", View::Categories, async move {
                    let image = match image_path {
                        Some(path) => match categories.read_image(&path).await {
                            Some(bytes) => Some(bytes),
                            None => return,
                        },
                        None => None,
                    };
                    categories.add_category_with_image(&name, image).await;
                });
                Action::None
            }
            Action::EditCategory {
                id,
                name,
                current_image_url,
                cover,
            } => {
                let categories = self.view_states.categories.clone();
                self.spawn_for_view("Updating category", View::Categories, async move {
                    let image = match cover {
                        CoverChange::Keep => CoverImage::Keep,
                        CoverChange::Clear => CoverImage::Clear,
                        CoverChange::Replace(path) => match categories.read_image(&path).await {
                            Some(bytes) => CoverImage::Replace(bytes),
                            None => return,
                        },
                    };
                    categories
                        .update_category_with_image(&id, &name, current_image_url, image)
                        .await;
                });
                Action::None
            }
            Action::DeleteCategory(id) => {
                let categories = self.view_states.categories.clone();
                self.spawn_for_view("Deleting category", View::Categories, async move {
                    categories.delete_category(&id).await
                });
                Action::None
            }

            // Study plans
            Action::CreateStudyPlan { title, date } => {
                let plans = self.view_states.study_plan.clone();
                self.spawn_for_view("Scheduling study session", View::StudyPlan, async move {
                    plans.add_study_plan(&title, &date).await
                });
                Action::None
            }
            Action::EditStudyPlan { id, title, date } => {
                let plans = self.view_states.study_plan.clone();
                self.spawn_for_view("Updating study plan", View::StudyPlan, async move {
                    plans.update_study_plan(&id, &title, &date).await
                });
                Action::None
            }
            Action::DeleteStudyPlan(id) => {
                let plans = self.view_states.study_plan.clone();
                self.spawn_for_view("Deleting study plan", View::StudyPlan, async move {
                    plans.delete_study_plan(&id).await
                });
                Action::None
            }

            _ => Action::None,
        }
    }

    /// Pass an action through the component hierarchy, then the app, until nothing follows
    pub fn dispatch(&mut self, action: Action) {
        let mut next = action;
        while !matches!(next, Action::None) {
            let routed = self.update(next);
            next = self.handle_app_action(routed);
        }
        self.sync_component_data();
    }

    /// Process background actions from task manager
    pub fn process_background_actions(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();

        // Process all available background actions
        while let Ok(action) = self.background_action_rx.try_recv() {
            self.logger.log(format!("Background: Received action {:?}", action));
            actions.push(action);
        }

        // Clean up finished tasks
        let completed_tasks = self.task_manager.cleanup_finished_tasks();
        if !completed_tasks.is_empty() {
            self.logger.log(format!(
                "Background: Cleaned up {} finished tasks",
                completed_tasks.len()
            ));
        }

        actions
    }

    /// Check if any background operations are running
    pub fn is_busy(&self) -> bool {
        self.task_manager.task_count() > 0
    }

    /// Process an event through the component hierarchy
    pub fn handle_event(&mut self, event_type: EventType) {
        let action = match event_type {
            EventType::Key(key) => self.route_key(key),
            EventType::Resize(_, _) | EventType::Tick | EventType::Other => Action::None,
        };
        self.dispatch(action);
    }

    fn route_key(&mut self, key: KeyEvent) -> Action {
        if !self.signed_in {
            return self.auth.handle_key_events(key);
        }
        if self.dialog.is_visible() {
            // Dialog has priority when visible
            return self.dialog.handle_key_events(key);
        }

        // Try sidebar first (for J/K navigation)
        let sidebar_action = self.sidebar.handle_key_events(key);
        if !matches!(sidebar_action, Action::None) {
            return sidebar_action;
        }

        // Then the active screen
        let list_action = match self.current_view() {
            View::Notes => self.notes_list.handle_key_events(key),
            View::Favorites => self.favorites_list.handle_key_events(key),
            View::Categories => self.categories.handle_key_events(key),
            View::StudyPlan => self.study_plan.handle_key_events(key),
        };
        if !matches!(list_action, Action::None) {
            return list_action;
        }

        // Finally try global keys
        self.handle_global_key(key)
    }
}

impl Component for AppComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        self.route_key(key)
    }

    fn update(&mut self, action: Action) -> Action {
        // Process through component hierarchy
        let action = self.dialog.update(action);
        let action = self.sidebar.update(action);
        let action = self.auth.update(action);

        // Only the visible screen reacts to list movement
        match self.current_view() {
            View::Notes => self.notes_list.update(action),
            View::Favorites => self.favorites_list.update(action),
            View::Categories => self.categories.update(action),
            View::StudyPlan => self.study_plan.update(action),
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        if !self.signed_in {
            self.auth.render(f, rect);
            return;
        }

        let (top, status) = LayoutManager::main_layout(rect);
        let (sidebar_area, list_area) = LayoutManager::top_pane_layout(top, self.sidebar_width);

        self.sidebar.render(f, sidebar_area);
        match self.current_view() {
            View::Notes => self.notes_list.render(f, list_area),
            View::Favorites => self.favorites_list.render(f, list_area),
            View::Categories => self.categories.render(f, list_area),
            View::StudyPlan => self.study_plan.render(f, list_area),
        }

        let running = self.task_manager.running_descriptions();
        StatusBar::render(f, status, &self.icons, self.current_view(), &running);

        // Render dialog on top if visible (includes help dialog)
        if self.dialog.is_visible() {
            self.dialog.render(f, rect);
        }
    }
}
