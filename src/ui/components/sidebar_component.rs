//! Sidebar navigation between the notes, favorites, categories and study
//! plan screens.

use crate::icons::IconService;
use crate::ui::core::{actions::Action, Component, View};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{block::BorderType, Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

pub struct SidebarComponent {
    pub selection: View,
    pub icons: IconService,
    /// Item count shown next to each view, once loaded
    pub counts: [Option<usize>; 4],
    pub user_email: Option<String>,
    list_state: ListState,
}

impl Default for SidebarComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl SidebarComponent {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            selection: View::default(),
            icons: IconService::default(),
            counts: [None; 4],
            user_email: None,
            list_state,
        }
    }

    pub fn set_count(&mut self, view: View, count: usize) {
        self.counts[view.index()] = Some(count);
    }

    fn view_icon(&self, view: View) -> &'static str {
        let ui = self.icons.icons().ui;
        match view {
            View::Notes => ui.notes_title,
            View::Favorites => ui.favorites_title,
            View::Categories => ui.categories_title,
            View::StudyPlan => ui.study_plan_title,
        }
    }

    fn navigate(&self, offset: isize) -> Action {
        let len = View::ALL.len() as isize;
        let next = (self.selection.index() as isize + offset).rem_euclid(len) as usize;
        Action::NavigateTo(View::ALL[next])
    }
}

impl Component for SidebarComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('J') => self.navigate(1),
            KeyCode::Char('K') => self.navigate(-1),
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                Action::NavigateTo(View::ALL[index])
            }
            _ => Action::None,
        }
    }

    fn update(&mut self, action: Action) -> Action {
        if let Action::NavigateTo(view) = &action {
            self.selection = *view;
            self.list_state.select(Some(view.index()));
        }
        action
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let chunks = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).split(rect);

        let items: Vec<ListItem> = View::ALL
            .iter()
            .enumerate()
            .map(|(i, view)| {
                let count = self.counts[view.index()]
                    .map(|c| format!(" ({})", c))
                    .unwrap_or_default();
                let style = if *view == self.selection {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{} ", i + 1), Style::default().fg(Color::DarkGray)),
                    Span::styled(format!("{} {}", self.view_icon(*view), view.title()), style),
                    Span::styled(count, Style::default().fg(Color::Gray)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(" Studynotes "),
            )
            .highlight_style(Style::default().bg(Color::DarkGray));

        f.render_stateful_widget(list, chunks[0], &mut self.list_state);

        if let Some(email) = &self.user_email {
            let user = Paragraph::new(format!("{} {}", self.icons.user(), email))
                .style(Style::default().fg(Color::Gray));
            f.render_widget(user, chunks[1]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_navigation_wraps_around() {
        let mut sidebar = SidebarComponent::new();
        let action = sidebar.handle_key_events(KeyEvent::new(KeyCode::Char('K'), KeyModifiers::SHIFT));
        assert!(matches!(action, Action::NavigateTo(View::StudyPlan)));

        sidebar.update(action);
        assert_eq!(sidebar.selection, View::StudyPlan);

        let action = sidebar.handle_key_events(KeyEvent::new(KeyCode::Char('J'), KeyModifiers::SHIFT));
        assert!(matches!(action, Action::NavigateTo(View::Notes)));
    }

    #[test]
    fn test_number_keys_jump_to_view() {
        let mut sidebar = SidebarComponent::new();
        let action = sidebar.handle_key_events(KeyEvent::new(KeyCode::Char('3'), KeyModifiers::NONE));
        assert!(matches!(action, Action::NavigateTo(View::Categories)));
    }
}
