//! Study plan pane: plans grouped into overdue, today and upcoming.

use crate::entities::StudyPlan;
use crate::icons::IconService;
use crate::ui::components::scrollbar_helper::ScrollbarHelper;
use crate::ui::core::{
    actions::{Action, DialogType},
    Component,
};
use crate::utils::datetime;
use crate::view_state::{StudyPlanSection, StudyPlanUiState};
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{block::BorderType, Block, Borders, List, ListItem, ListState},
    Frame,
};

enum PlanRow {
    Header(StudyPlanSection),
    Plan(StudyPlanSection, StudyPlan),
}

pub struct StudyPlanComponent {
    pub icons: IconService,
    /// chrono format used for the plan date column
    pub date_format: String,
    rows: Vec<PlanRow>,
    plans: Vec<StudyPlan>,
    is_loading: bool,
    selected_index: usize,
    list_state: ListState,
    scrollbar_helper: ScrollbarHelper,
}

impl Default for StudyPlanComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl StudyPlanComponent {
    pub fn new() -> Self {
        Self {
            icons: IconService::default(),
            date_format: datetime::DATE_FORMAT.to_string(),
            rows: Vec::new(),
            plans: Vec::new(),
            is_loading: true,
            selected_index: 0,
            list_state: ListState::default(),
            scrollbar_helper: ScrollbarHelper::new(),
        }
    }

    /// Rebuild the sections relative to `today`
    pub fn update_data(&mut self, state: &StudyPlanUiState, today: NaiveDate) {
        self.rows.clear();
        self.plans.clear();

        for (section, plans) in state.sections(today) {
            self.rows.push(PlanRow::Header(section));
            for plan in plans {
                self.plans.push(plan.clone());
                self.rows.push(PlanRow::Plan(section, plan));
            }
        }
        self.is_loading = state.is_loading;

        if self.plans.is_empty() {
            self.selected_index = 0;
            self.list_state.select(None);
        } else {
            self.selected_index = self.selected_index.min(self.plans.len() - 1);
            self.list_state.select(Some(self.rendered_index()));
        }
    }

    pub fn selected_plan(&self) -> Option<&StudyPlan> {
        self.plans.get(self.selected_index)
    }

    fn rendered_index(&self) -> usize {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| matches!(row, PlanRow::Plan(..)))
            .nth(self.selected_index)
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn move_selection(&mut self, forward: bool) {
        if self.plans.is_empty() {
            return;
        }
        let len = self.plans.len();
        self.selected_index = if forward {
            (self.selected_index + 1) % len
        } else {
            (self.selected_index + len - 1) % len
        };
        self.list_state.select(Some(self.rendered_index()));
    }

    fn create_plan_item(&self, section: StudyPlanSection, plan: &StudyPlan) -> ListItem<'static> {
        let date_color = match section {
            StudyPlanSection::Overdue => Color::Red,
            StudyPlanSection::Today => Color::Green,
            StudyPlanSection::Upcoming => Color::Blue,
        };

        ListItem::new(Line::from(vec![
            Span::styled(format!("  {} ", self.icons.date()), Style::default().fg(date_color)),
            Span::styled(plan.title.clone(), Style::default().fg(Color::White)),
            Span::styled(
                format!(
                    "  {} ({})",
                    datetime::reformat_date(&plan.date, &self.date_format),
                    datetime::format_human_date(&plan.date)
                ),
                Style::default().fg(date_color),
            ),
        ]))
    }
}

impl Component for StudyPlanComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        let selected_id = self.selected_plan().and_then(|p| p.id.clone());

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => Action::NextItem,
            KeyCode::Up | KeyCode::Char('k') => Action::PreviousItem,
            KeyCode::Char('a') => Action::ShowDialog(DialogType::StudyPlanCreation),
            KeyCode::Char('e') | KeyCode::Enter => match (selected_id, self.selected_plan()) {
                (Some(plan_id), Some(plan)) => Action::ShowDialog(DialogType::StudyPlanEdit {
                    plan_id,
                    title: plan.title.clone(),
                    date: plan.date.clone(),
                }),
                _ => Action::None,
            },
            KeyCode::Char('d') => match selected_id {
                Some(id) => Action::ShowDialog(DialogType::DeleteConfirmation {
                    item_type: "study plan".to_string(),
                    item_id: id,
                }),
                None => Action::None,
            },
            KeyCode::Char('r') => Action::Reload,
            _ => Action::None,
        }
    }

    fn update(&mut self, action: Action) -> Action {
        match action {
            Action::NextItem => {
                self.move_selection(true);
                Action::None
            }
            Action::PreviousItem => {
                self.move_selection(false);
                Action::None
            }
            _ => action,
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let (list_area, scrollbar_area) = ScrollbarHelper::calculate_areas(rect, self.rows.len());

        let items: Vec<ListItem> = if self.rows.is_empty() {
            let message = if self.is_loading {
                format!("{} Loading study plans...", self.icons.loading())
            } else {
                "Nothing planned. Press 'a' to schedule a study session.".to_string()
            };
            vec![ListItem::new(Line::from(Span::styled(
                message,
                Style::default().fg(Color::Gray),
            )))]
        } else {
            self.rows
                .iter()
                .map(|row| match row {
                    PlanRow::Header(section) => ListItem::new(Line::from(Span::styled(
                        section.header(),
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    ))),
                    PlanRow::Plan(section, plan) => self.create_plan_item(*section, plan),
                })
                .collect()
        };

        let title = format!(" {} Study Plan ", self.icons.icons().ui.study_plan_title);
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(title),
            )
            .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

        f.render_stateful_widget(list, list_area, &mut self.list_state);

        let viewport = list_area.height.saturating_sub(2) as usize;
        self.scrollbar_helper
            .update_state(self.rows.len(), self.list_state.selected().unwrap_or(0), viewport);
        self.scrollbar_helper.render(f, scrollbar_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(id: &str, title: &str, date: &str) -> StudyPlan {
        StudyPlan {
            id: Some(id.to_string()),
            user_id: "u1".to_string(),
            title: title.to_string(),
            date: date.to_string(),
        }
    }

    #[test]
    fn test_rows_are_grouped_by_section() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date");
        let state = StudyPlanUiState {
            study_plans: vec![
                plan("p1", "Old", "2025-03-01"),
                plan("p2", "Now", "2025-03-10"),
                plan("p3", "Later", "2025-04-01"),
            ],
            is_loading: false,
            error: None,
        };

        let mut component = StudyPlanComponent::new();
        component.update_data(&state, today);

        // Three headers and three plans
        assert_eq!(component.rows.len(), 6);
        assert_eq!(component.list_state.selected(), Some(1));

        component.update(Action::NextItem);
        assert_eq!(component.selected_plan().map(|p| p.title.as_str()), Some("Now"));
        assert_eq!(component.list_state.selected(), Some(3));

        component.update(Action::PreviousItem);
        component.update(Action::PreviousItem);
        assert_eq!(component.selected_plan().map(|p| p.title.as_str()), Some("Later"));
    }
}
