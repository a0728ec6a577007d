use serde::{Deserialize, Serialize};

/// A row of the `study_plan` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    pub title: String,
    /// Target date, `YYYY-MM-DD`
    pub date: String,
}
