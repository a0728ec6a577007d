use serde::{Deserialize, Serialize};

/// A row of the `notes` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    /// Server-generated creation timestamp (RFC3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
}

/// Fields of a note about to be created; the repository adds the owner.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewNote {
    pub title: String,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub category_id: Option<String>,
}

impl NewNote {
    pub fn into_note(self, user_id: &str) -> Note {
        Note {
            id: None,
            user_id: user_id.to_string(),
            title: self.title,
            content: self.content,
            image_url: self.image_url,
            category_id: self.category_id,
            date_created: None,
        }
    }
}

impl Note {
    /// First non-blank line of the content, for list previews.
    pub fn preview(&self) -> Option<&str> {
        self.content
            .as_deref()?
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
    }
}
