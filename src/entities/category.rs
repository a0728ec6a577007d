use serde::{Deserialize, Serialize};

/// A row of the `categories` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    pub name: String,
    /// Public URL of the cover image
    #[serde(default)]
    pub image_url: Option<String>,
}
