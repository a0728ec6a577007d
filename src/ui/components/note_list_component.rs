//! Note list pane, shared by the notes and favorites screens.

use std::collections::HashSet;

use crate::entities::{Category, Note};
use crate::icons::IconService;
use crate::ui::components::scrollbar_helper::ScrollbarHelper;
use crate::ui::core::{
    actions::{Action, DialogType},
    Component,
};
use crate::ui::layout::LayoutManager;
use crate::utils::datetime;
use crate::view_state::{FavoriteUiState, NotesListUiState};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{block::BorderType, Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Which screen the list belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteListMode {
    /// Every note, grouped by category and filterable
    All,
    /// Only favorite notes, flat
    Favorites,
}

enum NoteRow {
    Header(String),
    Note(Note),
}

pub struct NoteListComponent {
    pub mode: NoteListMode,
    pub icons: IconService,
    pub show_content_preview: bool,
    rows: Vec<NoteRow>,
    /// Selectable notes in display order
    notes: Vec<Note>,
    categories: Vec<Category>,
    favorite_ids: HashSet<String>,
    category_filter: Option<String>,
    favorites_only: bool,
    search: String,
    is_loading: bool,
    selected_index: usize,
    list_state: ListState,
    scrollbar_helper: ScrollbarHelper,
}

impl NoteListComponent {
    pub fn new(mode: NoteListMode) -> Self {
        Self {
            mode,
            icons: IconService::default(),
            show_content_preview: true,
            rows: Vec::new(),
            notes: Vec::new(),
            categories: Vec::new(),
            favorite_ids: HashSet::new(),
            category_filter: None,
            favorites_only: false,
            search: String::new(),
            is_loading: true,
            selected_index: 0,
            list_state: ListState::default(),
            scrollbar_helper: ScrollbarHelper::new(),
        }
    }

    /// Rebuild rows from the notes screen state, grouped by category
    pub fn update_from_notes(&mut self, state: &NotesListUiState) {
        self.rows.clear();
        self.notes.clear();

        for (header, notes) in state.grouped_by_category() {
            self.rows.push(NoteRow::Header(header));
            for note in notes {
                self.notes.push(note.clone());
                self.rows.push(NoteRow::Note(note));
            }
        }

        self.categories = state.categories.clone();
        self.favorite_ids = state.favorite_ids.clone();
        self.category_filter = state.category_filter.clone();
        self.favorites_only = state.favorites_only;
        self.search = state.search.clone();
        self.is_loading = state.is_loading;
        self.update_list_state();
    }

    /// Rebuild rows from the favorites screen state
    pub fn update_from_favorites(&mut self, state: &FavoriteUiState, categories: &[Category]) {
        self.notes = state.notes.clone();
        self.rows = state.notes.iter().cloned().map(NoteRow::Note).collect();
        self.categories = categories.to_vec();
        self.favorite_ids = state.favorite_ids.clone();
        self.is_loading = state.is_loading;
        self.update_list_state();
    }

    pub fn selected_note(&self) -> Option<&Note> {
        self.notes.get(self.selected_index)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    fn selected_note_id(&self) -> Option<String> {
        self.selected_note().and_then(|note| note.id.clone())
    }

    fn update_list_state(&mut self) {
        if self.notes.is_empty() {
            self.selected_index = 0;
            self.list_state.select(None);
            return;
        }

        if self.selected_index >= self.notes.len() {
            self.selected_index = self.notes.len() - 1;
        }
        self.list_state.select(Some(self.rendered_index()));
    }

    /// Row index of the selected note once headers are counted
    fn rendered_index(&self) -> usize {
        let mut seen = 0;
        for (row_index, row) in self.rows.iter().enumerate() {
            if let NoteRow::Note(_) = row {
                if seen == self.selected_index {
                    return row_index;
                }
                seen += 1;
            }
        }
        0
    }

    fn category_name(&self, category_id: Option<&str>) -> Option<&str> {
        let id = category_id?;
        self.categories
            .iter()
            .find(|c| c.id.as_deref() == Some(id))
            .map(|c| c.name.as_str())
    }

    fn title(&self) -> String {
        let ui = self.icons.icons().ui;
        let mut title = match self.mode {
            NoteListMode::All => format!(" {} Notes", ui.notes_title),
            NoteListMode::Favorites => format!(" {} Favorites", ui.favorites_title),
        };

        if let Some(name) = self.category_name(self.category_filter.as_deref()) {
            title.push_str(&format!(" · {}", name));
        }
        if self.favorites_only {
            title.push_str(" · favorites only");
        }
        if !self.search.trim().is_empty() {
            title.push_str(&format!(" · \"{}\"", self.search.trim()));
        }
        title.push(' ');
        title
    }

    fn create_note_item(&self, note: &Note, width: u16) -> ListItem<'static> {
        let is_favorite = note.id.as_ref().is_some_and(|id| self.favorite_ids.contains(id));
        let marker = self.icons.favorite_marker(is_favorite);

        let mut suffix = Vec::new();
        if note.image_url.is_some() {
            suffix.push(Span::styled(
                format!(" {}", self.icons.image()),
                Style::default().fg(Color::Magenta),
            ));
        }
        if self.mode == NoteListMode::Favorites {
            if let Some(name) = self.category_name(note.category_id.as_deref()) {
                suffix.push(Span::styled(format!(" #{}", name), Style::default().fg(Color::Cyan)));
            }
        }
        if let Some(created) = &note.date_created {
            suffix.push(Span::styled(
                format!(" {} {}", self.icons.date(), datetime::format_human_datetime(created)),
                Style::default().fg(Color::DarkGray),
            ));
        }

        let suffix_width: usize = suffix.iter().map(|span| span.content.chars().count()).sum();
        let text_width = LayoutManager::row_text_width(width, marker.chars().count() + 3, suffix_width);

        let mut text = note.title.clone();
        if self.show_content_preview {
            if let Some(preview) = note.preview() {
                text.push_str(" - ");
                text.push_str(preview);
            }
        }
        let text = truncate(&text, text_width);
        let title_len = note.title.chars().count().min(text.chars().count());
        let (title_part, preview_part): (String, String) =
            (text.chars().take(title_len).collect(), text.chars().skip(title_len).collect());

        let mut spans = vec![
            Span::styled(format!("{} ", marker), Style::default().fg(Color::Yellow)),
            Span::styled(format!("{} ", self.icons.note()), Style::default().fg(Color::Gray)),
            Span::styled(title_part, Style::default().fg(Color::White)),
            Span::styled(preview_part, Style::default().fg(Color::Gray)),
        ];
        spans.extend(suffix);

        ListItem::new(Line::from(spans))
    }
}

/// Cut `text` to `max` chars, ending with an ellipsis when shortened
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut cut: String = text.chars().take(max - 1).collect();
    cut.push('…');
    cut
}

impl Component for NoteListComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => Action::NextItem,
            KeyCode::Up | KeyCode::Char('k') => Action::PreviousItem,
            KeyCode::Char('a') => Action::OpenNoteEditor(None),
            KeyCode::Char('e') | KeyCode::Enter => match self.selected_note_id() {
                Some(id) => Action::OpenNoteEditor(Some(id)),
                None => Action::None,
            },
            KeyCode::Char('d') => match self.selected_note_id() {
                Some(id) => Action::ShowDialog(DialogType::DeleteConfirmation {
                    item_type: "note".to_string(),
                    item_id: id,
                }),
                None => Action::None,
            },
            KeyCode::Char('f') => match self.selected_note_id() {
                Some(id) => Action::ToggleFavorite(id),
                None => Action::None,
            },
            KeyCode::Char('c') if self.mode == NoteListMode::All => Action::CycleCategoryFilter,
            KeyCode::Char('v') if self.mode == NoteListMode::All => Action::ToggleFavoritesOnly,
            KeyCode::Char('/') if self.mode == NoteListMode::All => Action::ShowDialog(DialogType::NoteSearch {
                query: self.search.clone(),
            }),
            KeyCode::Char('r') => Action::Reload,
            _ => Action::None,
        }
    }

    fn update(&mut self, action: Action) -> Action {
        match action {
            Action::NextItem => {
                if !self.notes.is_empty() {
                    self.selected_index = (self.selected_index + 1) % self.notes.len();
                    self.update_list_state();
                }
                Action::None
            }
            Action::PreviousItem => {
                if !self.notes.is_empty() {
                    self.selected_index = if self.selected_index == 0 {
                        self.notes.len() - 1
                    } else {
                        self.selected_index - 1
                    };
                    self.update_list_state();
                }
                Action::None
            }
            _ => action,
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let (list_area, scrollbar_area) = ScrollbarHelper::calculate_areas(rect, self.rows.len());

        let items: Vec<ListItem> = if self.rows.is_empty() {
            let message = if self.is_loading {
                format!("{} Loading notes...", self.icons.loading())
            } else {
                match self.mode {
                    NoteListMode::All => "No notes yet. Press 'a' to write one.".to_string(),
                    NoteListMode::Favorites => "No favorites yet. Press 'f' on a note to mark it.".to_string(),
                }
            };
            vec![ListItem::new(Line::from(Span::styled(
                message,
                Style::default().fg(Color::Gray),
            )))]
        } else {
            self.rows
                .iter()
                .map(|row| match row {
                    NoteRow::Header(header) => ListItem::new(Line::from(Span::styled(
                        header.clone(),
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    ))),
                    NoteRow::Note(note) => self.create_note_item(note, list_area.width),
                })
                .collect()
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(self.title()),
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
    use crossterm::event::KeyModifiers;

    fn note(id: &str, title: &str, category_id: Option<&str>) -> Note {
        Note {
            id: Some(id.to_string()),
            user_id: "u1".to_string(),
            title: title.to_string(),
            content: Some("body".to_string()),
            image_url: None,
            category_id: category_id.map(str::to_string),
            date_created: None,
        }
    }

    fn state() -> NotesListUiState {
        NotesListUiState {
            notes: vec![note("n1", "Cells", Some("c1")), note("n2", "Loose", None)],
            categories: vec![Category {
                id: Some("c1".to_string()),
                user_id: "u1".to_string(),
                name: "Biology".to_string(),
                image_url: None,
            }],
            is_loading: false,
            ..NotesListUiState::default()
        }
    }

    #[test]
    fn test_selection_skips_group_headers() {
        let mut list = NoteListComponent::new(NoteListMode::All);
        list.update_from_notes(&state());

        assert_eq!(list.len(), 2);
        assert_eq!(list.selected_note().and_then(|n| n.id.as_deref()), Some("n1"));
        // Header "Biology" sits at row 0
        assert_eq!(list.list_state.selected(), Some(1));

        list.update(Action::NextItem);
        assert_eq!(list.selected_note().and_then(|n| n.id.as_deref()), Some("n2"));
        // Second header "Uncategorized" sits at row 2
        assert_eq!(list.list_state.selected(), Some(3));

        list.update(Action::NextItem);
        assert_eq!(list.selected_note().and_then(|n| n.id.as_deref()), Some("n1"));
    }

    #[test]
    fn test_keys_target_selected_note() {
        let mut list = NoteListComponent::new(NoteListMode::All);
        list.update_from_notes(&state());

        let key = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
        assert!(matches!(list.handle_key_events(key('f')), Action::ToggleFavorite(id) if id == "n1"));
        assert!(matches!(list.handle_key_events(key('e')), Action::OpenNoteEditor(Some(id)) if id == "n1"));
        assert!(matches!(
            list.handle_key_events(key('d')),
            Action::ShowDialog(DialogType::DeleteConfirmation { item_id, .. }) if item_id == "n1"
        ));
    }

    #[test]
    fn test_favorites_mode_ignores_filter_keys() {
        let mut list = NoteListComponent::new(NoteListMode::Favorites);
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        assert!(matches!(list.handle_key_events(key), Action::None));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer title", 6), "a lon…");
        assert_eq!(truncate("abc", 0), "");
    }
}
