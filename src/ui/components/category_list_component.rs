//! Category list pane.

use crate::entities::Category;
use crate::icons::IconService;
use crate::ui::components::scrollbar_helper::ScrollbarHelper;
use crate::ui::core::{
    actions::{Action, CoverChange, DialogType},
    Component,
};
use crate::view_state::CategoryUiState;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{block::BorderType, Block, Borders, List, ListItem, ListState},
    Frame,
};

pub struct CategoryListComponent {
    pub icons: IconService,
    categories: Vec<Category>,
    is_loading: bool,
    selected_index: usize,
    list_state: ListState,
    scrollbar_helper: ScrollbarHelper,
}

impl Default for CategoryListComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryListComponent {
    pub fn new() -> Self {
        Self {
            icons: IconService::default(),
            categories: Vec::new(),
            is_loading: true,
            selected_index: 0,
            list_state: ListState::default(),
            scrollbar_helper: ScrollbarHelper::new(),
        }
    }

    pub fn update_data(&mut self, state: &CategoryUiState) {
        self.categories = state.categories.clone();
        self.is_loading = state.is_loading;

        if self.categories.is_empty() {
            self.selected_index = 0;
            self.list_state.select(None);
        } else {
            self.selected_index = self.selected_index.min(self.categories.len() - 1);
            self.list_state.select(Some(self.selected_index));
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn selected_category(&self) -> Option<&Category> {
        self.categories.get(self.selected_index)
    }
}

impl Component for CategoryListComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        let selected = self
            .selected_category()
            .and_then(|c| c.id.clone().map(|id| (id, c.clone())));

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => Action::NextItem,
            KeyCode::Up | KeyCode::Char('k') => Action::PreviousItem,
            KeyCode::Char('a') => Action::ShowDialog(DialogType::CategoryCreation),
            KeyCode::Char('e') => match selected {
                Some((id, category)) => Action::ShowDialog(DialogType::CategoryEdit {
                    category_id: id,
                    name: category.name,
                    image_url: category.image_url,
                }),
                None => Action::None,
            },
            KeyCode::Char('x') => match selected {
                Some((id, category)) if category.image_url.is_some() => Action::EditCategory {
                    id,
                    name: category.name,
                    current_image_url: category.image_url,
                    cover: CoverChange::Clear,
                },
                _ => Action::None,
            },
            KeyCode::Char('d') => match selected {
                Some((id, _)) => Action::ShowDialog(DialogType::DeleteConfirmation {
                    item_type: "category".to_string(),
                    item_id: id,
                }),
                None => Action::None,
            },
            KeyCode::Enter => match selected {
                Some((id, _)) => Action::ShowCategoryNotes(id),
                None => Action::None,
            },
            KeyCode::Char('r') => Action::Reload,
            _ => Action::None,
        }
    }

    fn update(&mut self, action: Action) -> Action {
        match action {
            Action::NextItem => {
                if !self.categories.is_empty() {
                    self.selected_index = (self.selected_index + 1) % self.categories.len();
                    self.list_state.select(Some(self.selected_index));
                }
                Action::None
            }
            Action::PreviousItem => {
                if !self.categories.is_empty() {
                    self.selected_index = self
                        .selected_index
                        .checked_sub(1)
                        .unwrap_or(self.categories.len() - 1);
                    self.list_state.select(Some(self.selected_index));
                }
                Action::None
            }
            _ => action,
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let (list_area, scrollbar_area) = ScrollbarHelper::calculate_areas(rect, self.categories.len());

        let items: Vec<ListItem> = if self.categories.is_empty() {
            let message = if self.is_loading {
                format!("{} Loading categories...", self.icons.loading())
            } else {
                "No categories yet. Press 'a' to add one.".to_string()
            };
            vec![ListItem::new(Line::from(Span::styled(
                message,
                Style::default().fg(Color::Gray),
            )))]
        } else {
            let categories_icon = self.icons.icons().ui.categories_title;
            self.categories
                .iter()
                .map(|category| {
                    let mut spans = vec![
                        Span::styled(format!("{} ", categories_icon), Style::default().fg(Color::Cyan)),
                        Span::styled(category.name.clone(), Style::default().fg(Color::White)),
                    ];
                    if category.image_url.is_some() {
                        spans.push(Span::styled(
                            format!(" {}", self.icons.image()),
                            Style::default().fg(Color::Magenta),
                        ));
                    }
                    ListItem::new(Line::from(spans))
                })
                .collect()
        };

        let title = format!(" {} Categories ", self.icons.icons().ui.categories_title);
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
            .update_state(self.categories.len(), self.selected_index, viewport);
        self.scrollbar_helper.render(f, scrollbar_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn state() -> CategoryUiState {
        CategoryUiState {
            categories: vec![
                Category {
                    id: Some("c1".to_string()),
                    user_id: "u1".to_string(),
                    name: "Biology".to_string(),
                    image_url: Some("https://example.com/cover.jpg".to_string()),
                },
                Category {
                    id: Some("c2".to_string()),
                    user_id: "u1".to_string(),
                    name: "History".to_string(),
                    image_url: None,
                },
            ],
            is_loading: false,
            error: None,
        }
    }

    #[test]
    fn test_clear_cover_only_when_present() {
        let mut list = CategoryListComponent::new();
        list.update_data(&state());
        let x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);

        assert!(matches!(
            list.handle_key_events(x),
            Action::EditCategory { cover: CoverChange::Clear, ref id, .. } if id == "c1"
        ));

        list.update(Action::NextItem);
        assert!(matches!(list.handle_key_events(x), Action::None));
    }

    #[test]
    fn test_selection_is_clamped_after_reload() {
        let mut list = CategoryListComponent::new();
        list.update_data(&state());
        list.update(Action::PreviousItem);
        assert_eq!(list.selected_category().map(|c| c.name.as_str()), Some("History"));

        let mut shorter = state();
        shorter.categories.truncate(1);
        list.update_data(&shorter);
        assert_eq!(list.selected_category().map(|c| c.name.as_str()), Some("Biology"));
    }
}
