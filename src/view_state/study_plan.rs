//! Study plan state: the schedule list, its validation and date grouping.

use chrono::NaiveDate;

use super::Observable;
use crate::constants::{ERROR_INVALID_DATE, ERROR_LOAD_FAILED, ERROR_STUDY_PLAN_FIELDS, HEADER_OVERDUE, HEADER_TODAY, HEADER_UPCOMING};
use crate::entities::StudyPlan;
use crate::repositories::StudyPlanRepository;
use crate::utils::datetime;

/// Where a plan falls relative to today.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StudyPlanSection {
    Overdue,
    Today,
    Upcoming,
}

impl StudyPlanSection {
    pub fn header(self) -> &'static str {
        match self {
            StudyPlanSection::Overdue => HEADER_OVERDUE,
            StudyPlanSection::Today => HEADER_TODAY,
            StudyPlanSection::Upcoming => HEADER_UPCOMING,
        }
    }

    /// Dates that do not parse are treated as upcoming.
    pub fn of(plan: &StudyPlan, today: NaiveDate) -> Self {
        match datetime::parse_date(&plan.date) {
            Ok(date) if date < today => StudyPlanSection::Overdue,
            Ok(date) if date == today => StudyPlanSection::Today,
            _ => StudyPlanSection::Upcoming,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StudyPlanUiState {
    /// Plans sorted by date, then title
    pub study_plans: Vec<StudyPlan>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl StudyPlanUiState {
    /// Plans split into Overdue, Today and Upcoming, skipping empty sections.
    pub fn sections(&self, today: NaiveDate) -> Vec<(StudyPlanSection, Vec<StudyPlan>)> {
        [StudyPlanSection::Overdue, StudyPlanSection::Today, StudyPlanSection::Upcoming]
            .into_iter()
            .map(|section| {
                let plans: Vec<StudyPlan> = self
                    .study_plans
                    .iter()
                    .filter(|plan| StudyPlanSection::of(plan, today) == section)
                    .cloned()
                    .collect();
                (section, plans)
            })
            .filter(|(_, plans)| !plans.is_empty())
            .collect()
    }
}

#[derive(Clone)]
pub struct StudyPlanViewState {
    repository: StudyPlanRepository,
    state: Observable<StudyPlanUiState>,
}

impl StudyPlanViewState {
    pub fn new(repository: StudyPlanRepository) -> Self {
        Self {
            repository,
            state: Observable::new(StudyPlanUiState::default()),
        }
    }

    pub fn state(&self) -> &Observable<StudyPlanUiState> {
        &self.state
    }

    pub fn snapshot(&self) -> StudyPlanUiState {
        self.state.get()
    }

    pub async fn load_study_plans(&self) {
        self.state.update(|s| {
            s.is_loading = true;
            s.error = None;
        });

        match self.repository.get_study_plans().await {
            Ok(mut plans) => {
                plans.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.title.cmp(&b.title)));
                log::info!("Loaded {} study plans", plans.len());
                self.state.update(|s| {
                    s.study_plans = plans;
                    s.is_loading = false;
                });
            }
            Err(e) => self.fail(format!("{}: {}", ERROR_LOAD_FAILED, e)),
        }
    }

    /// Add a plan. Blank input is ignored; a malformed date is reported.
    pub async fn add_study_plan(&self, title: &str, date: &str) {
        let (title, date) = (title.trim(), date.trim());
        if title.is_empty() || date.is_empty() {
            return;
        }
        if !datetime::is_valid_date(date) {
            self.state.update(|s| s.error = Some(ERROR_INVALID_DATE.to_string()));
            return;
        }

        self.state.update(|s| s.is_loading = true);
        match self.repository.add_study_plan(title, date).await {
            Ok(_) => {
                log::info!("Added study plan '{}' on {}", title, date);
                self.load_study_plans().await;
            }
            Err(e) => self.fail(e.to_string()),
        }
    }

    pub async fn update_study_plan(&self, id: &str, title: &str, date: &str) {
        let (title, date) = (title.trim(), date.trim());
        if title.is_empty() || date.is_empty() {
            self.state
                .update(|s| s.error = Some(ERROR_STUDY_PLAN_FIELDS.to_string()));
            return;
        }
        if !datetime::is_valid_date(date) {
            self.state.update(|s| s.error = Some(ERROR_INVALID_DATE.to_string()));
            return;
        }

        match self.repository.update_study_plan(id, title, date).await {
            Ok(_) => {
                log::info!("Updated study plan {}", id);
                self.load_study_plans().await;
            }
            Err(e) => self.fail(e.to_string()),
        }
    }

    pub async fn delete_study_plan(&self, id: &str) {
        match self.repository.delete_study_plan(id).await {
            Ok(()) => {
                log::info!("Deleted study plan {}", id);
                self.load_study_plans().await;
            }
            Err(e) => self.fail(e.to_string()),
        }
    }

    pub fn reset(&self) {
        self.state.set(StudyPlanUiState::default());
    }

    pub fn clear_error(&self) {
        self.state.update(|s| s.error = None);
    }

    fn fail(&self, message: String) {
        log::error!("Study plan operation failed: {}", message);
        self.state.update(|s| {
            s.is_loading = false;
            s.error = Some(message);
        });
    }
}
