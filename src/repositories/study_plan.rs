//! Study plan repository for the `study_plan` table.

use serde_json::json;
use std::sync::Arc;

use super::{current_user_id, require_user_id};
use crate::backend::{decode_first, decode_rows, Backend, BackendError, Query};
use crate::constants::TABLE_STUDY_PLAN;
use crate::entities::StudyPlan;

/// Repository for study plan remote operations.
#[derive(Clone)]
pub struct StudyPlanRepository {
    backend: Arc<dyn Backend>,
}

impl StudyPlanRepository {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub async fn get_study_plans(&self) -> Result<Vec<StudyPlan>, BackendError> {
        let Some(user_id) = current_user_id(self.backend.as_ref()).await else {
            return Ok(Vec::new());
        };

        let query = Query::table(TABLE_STUDY_PLAN).eq("user_id", user_id);
        decode_rows(self.backend.select(&query).await?)
    }

    pub async fn add_study_plan(&self, title: &str, date: &str) -> Result<Option<StudyPlan>, BackendError> {
        let user_id = require_user_id(self.backend.as_ref()).await?;
        let plan = StudyPlan {
            id: None,
            user_id,
            title: title.to_string(),
            date: date.to_string(),
        };
        let row = serde_json::to_value(&plan)?;
        decode_first(self.backend.insert(TABLE_STUDY_PLAN, row).await?)
    }

    pub async fn update_study_plan(&self, id: &str, title: &str, date: &str) -> Result<Option<StudyPlan>, BackendError> {
        let patch = json!({ "title": title, "date": date });
        let query = Query::table(TABLE_STUDY_PLAN).eq("id", id);
        decode_first(self.backend.update(&query, patch).await?)
    }

    pub async fn delete_study_plan(&self, id: &str) -> Result<(), BackendError> {
        self.backend.delete(&Query::table(TABLE_STUDY_PLAN).eq("id", id)).await
    }
}
