//! Reusable UI components

// Component architecture
pub mod auth_component;
pub mod category_list_component;
pub mod dialog_component;
pub mod dialogs;
pub mod note_list_component;
pub mod scrollbar_helper;
pub mod sidebar_component;
pub mod status_bar;
pub mod study_plan_component;
pub mod text_input;

// Component exports
pub use auth_component::AuthComponent;
pub use category_list_component::CategoryListComponent;
pub use dialog_component::DialogComponent;
pub use note_list_component::{NoteListComponent, NoteListMode};
pub use sidebar_component::SidebarComponent;
pub use status_bar::StatusBar;
pub use study_plan_component::StudyPlanComponent;
