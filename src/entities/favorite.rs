use serde::{Deserialize, Serialize};

/// A row of the `favorites` table: one user marking one note.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    pub note_id: String,
}
