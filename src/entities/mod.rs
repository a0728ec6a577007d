//! Plain data models mirroring the remote table rows.
//!
//! Field names follow the remote column names. `id` is optional so insert
//! payloads can omit it and let the backend generate one.

pub mod category;
pub mod favorite;
pub mod note;
pub mod study_plan;

pub use category::Category;
pub use favorite::Favorite;
pub use note::{NewNote, Note};
pub use study_plan::StudyPlan;
