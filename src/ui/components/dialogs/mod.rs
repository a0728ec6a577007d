//! Dialog rendering helpers used by the dialog component

pub mod category_dialogs;
pub mod common;
pub mod note_dialogs;
pub mod scroll_behavior;
pub mod study_plan_dialogs;
pub mod system_dialogs;
