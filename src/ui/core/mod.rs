//! Core UI functionality for the Studynotes application.
//!
//! This module contains the building blocks shared by every screen:
//!
//! - [`actions`] - Action definitions and UI state transitions
//! - [`component`] - Base component trait
//! - [`event_handler`] - Terminal event polling
//! - [`task_manager`] - Background operations and their result actions
//!
//! Components turn key presses into [`Action`]s. The app component runs
//! remote work through the [`TaskManager`], whose results come back as
//! further actions on the next tick.

pub mod actions;
pub mod component;
pub mod event_handler;
pub mod task_manager;

pub use actions::{Action, CoverChange, DialogType, View};
pub use component::Component;
pub use event_handler::{EventHandler, EventType};
pub use task_manager::{TaskId, TaskManager};
