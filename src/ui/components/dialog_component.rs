//! Modal dialogs: note, category and study plan forms, search, confirmations,
//! messages, help and logs.

use crate::entities::Category;
use crate::icons::IconService;
use crate::logger::Logger;
use crate::ui::components::dialogs::{
    category_dialogs::{self, CATEGORY_FIELD_IMAGE},
    note_dialogs::{self, NoteEditorView, NOTE_FIELD_CATEGORY, NOTE_FIELD_CONTENT, NOTE_FIELD_COUNT, NOTE_FIELD_IMAGE},
    scroll_behavior,
    study_plan_dialogs::{self, PLAN_FIELD_DATE},
    system_dialogs,
};
use crate::ui::components::text_input::TextInput;
use crate::ui::core::{
    actions::{Action, CoverChange, DialogType},
    Component,
};
use crate::utils::datetime;
use chrono::{Duration, Weekday};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{layout::Rect, widgets::ScrollbarState, Frame};

pub struct DialogComponent {
    pub dialog_type: Option<DialogType>,
    pub icons: IconService,
    /// Categories offered by the note editor
    pub categories: Vec<Category>,
    /// Number of notes matching the current search, shown in the search dialog
    pub search_match_count: Option<usize>,
    logger: Logger,
    inputs: Vec<TextInput>,
    focus: usize,
    /// Index into `categories`; `None` means no category
    category_index: Option<usize>,
    remove_image: bool,
    scroll_offset: usize,
    scrollbar_state: ScrollbarState,
}

impl Default for DialogComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogComponent {
    pub fn new() -> Self {
        Self {
            dialog_type: None,
            icons: IconService::default(),
            categories: Vec::new(),
            search_match_count: None,
            logger: Logger::new(),
            inputs: Vec::new(),
            focus: 0,
            category_index: None,
            remove_image: false,
            scroll_offset: 0,
            scrollbar_state: ScrollbarState::new(0),
        }
    }

    pub fn set_logger(&mut self, logger: Logger) {
        self.logger = logger;
    }

    pub fn is_visible(&self) -> bool {
        self.dialog_type.is_some()
    }

    pub fn clear_dialog(&mut self) {
        self.dialog_type = None;
        self.inputs.clear();
        self.focus = 0;
        self.category_index = None;
        self.remove_image = false;
        self.scroll_offset = 0;
        self.scrollbar_state = ScrollbarState::new(0);
    }

    fn input(&self, index: usize) -> &str {
        self.inputs.get(index).map(TextInput::value).unwrap_or_default()
    }

    fn trimmed(&self, index: usize) -> String {
        self.input(index).trim().to_string()
    }

    fn optional_path(&self, index: usize) -> Option<String> {
        Some(self.trimmed(index)).filter(|path| !path.is_empty())
    }

    fn field_count(&self) -> usize {
        match self.dialog_type {
            Some(DialogType::NoteEditor { .. }) => NOTE_FIELD_COUNT,
            _ => self.inputs.len().max(1),
        }
    }

    /// Input edited by the focused field. The note editor's category field
    /// has no text input.
    fn focused_input_index(&self) -> Option<usize> {
        match self.dialog_type {
            Some(DialogType::NoteEditor { .. }) => match self.focus {
                NOTE_FIELD_CATEGORY => None,
                NOTE_FIELD_IMAGE => Some(2),
                focus => Some(focus),
            },
            _ => Some(self.focus),
        }
    }

    fn selected_category_id(&self) -> Option<String> {
        self.category_index
            .and_then(|i| self.categories.get(i))
            .and_then(|c| c.id.clone())
    }

    fn category_label(&self) -> String {
        self.category_index
            .and_then(|i| self.categories.get(i))
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "None".to_string())
    }

    /// Step through None, then each category, then back to None
    fn cycle_category(&mut self, forward: bool) {
        let len = self.categories.len();
        if len == 0 {
            self.category_index = None;
            return;
        }
        self.category_index = match (self.category_index, forward) {
            (None, true) => Some(0),
            (None, false) => Some(len - 1),
            (Some(i), true) if i + 1 < len => Some(i + 1),
            (Some(i), false) if i > 0 => Some(i - 1),
            _ => None,
        };
    }

    fn open(&mut self, dialog_type: &DialogType) {
        self.clear_dialog();
        match dialog_type {
            DialogType::NoteEditor {
                title,
                content,
                category_id,
                ..
            } => {
                self.inputs = vec![TextInput::new(title.as_str()), TextInput::new(content.as_str()), TextInput::default()];
                self.category_index = category_id
                    .as_ref()
                    .and_then(|id| self.categories.iter().position(|c| c.id.as_ref() == Some(id)));
            }
            DialogType::NoteSearch { query } => {
                self.inputs = vec![TextInput::new(query.as_str())];
            }
            DialogType::CategoryCreation => {
                self.inputs = vec![TextInput::default(), TextInput::default()];
            }
            DialogType::CategoryEdit { name, .. } => {
                self.inputs = vec![TextInput::new(name.as_str()), TextInput::default()];
            }
            DialogType::StudyPlanCreation => {
                self.inputs = vec![TextInput::default(), TextInput::new(datetime::format_today())];
            }
            DialogType::StudyPlanEdit { title, date, .. } => {
                self.inputs = vec![TextInput::new(title.as_str()), TextInput::new(date.as_str())];
            }
            _ => {}
        }
    }

    fn handle_submit(&mut self) -> Action {
        let action = match &self.dialog_type {
            Some(DialogType::NoteEditor { .. }) => Action::SaveNote {
                title: self.input(0).to_string(),
                content: self.input(1).to_string(),
                category_id: self.selected_category_id(),
                image_path: self.optional_path(2),
                remove_image: self.remove_image,
            },
            Some(DialogType::NoteSearch { .. }) => Action::None,
            Some(DialogType::CategoryCreation) => {
                let name = self.trimmed(0);
                if name.is_empty() {
                    return Action::None;
                }
                Action::CreateCategory {
                    name,
                    image_path: self.optional_path(1),
                }
            }
            Some(DialogType::CategoryEdit {
                category_id, image_url, ..
            }) => {
                let name = self.trimmed(0);
                if name.is_empty() {
                    return Action::None;
                }
                let cover = match self.optional_path(1) {
                    Some(path) => CoverChange::Replace(path),
                    None if self.remove_image => CoverChange::Clear,
                    None => CoverChange::Keep,
                };
                Action::EditCategory {
                    id: category_id.clone(),
                    name,
                    current_image_url: image_url.clone(),
                    cover,
                }
            }
            Some(DialogType::StudyPlanCreation) => Action::CreateStudyPlan {
                title: self.trimmed(0),
                date: self.trimmed(1),
            },
            Some(DialogType::StudyPlanEdit { plan_id, .. }) => Action::EditStudyPlan {
                id: plan_id.clone(),
                title: self.trimmed(0),
                date: self.trimmed(1),
            },
            Some(DialogType::DeleteConfirmation { item_type, item_id }) => match item_type.as_str() {
                "note" => Action::DeleteNote(item_id.clone()),
                "category" => Action::DeleteCategory(item_id.clone()),
                "study plan" => Action::DeleteStudyPlan(item_id.clone()),
                other => {
                    self.logger.log(format!("Dialog: unknown delete target '{}'", other));
                    Action::None
                }
            },
            _ => Action::HideDialog,
        };

        self.clear_dialog();
        action
    }

    fn handle_scroll_keys(&mut self, key: KeyEvent) -> bool {
        let (offset, state) = (&mut self.scroll_offset, &mut self.scrollbar_state);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => scroll_behavior::scroll_up(offset, state),
            KeyCode::Down | KeyCode::Char('j') => scroll_behavior::scroll_down(offset, state),
            KeyCode::PageUp => scroll_behavior::page_up(offset, state),
            KeyCode::PageDown => scroll_behavior::page_down(offset, state),
            KeyCode::Home => scroll_behavior::scroll_to_top(offset, state),
            KeyCode::End => scroll_behavior::scroll_to_bottom(offset, state),
            _ => return false,
        }
        true
    }

    /// Date field shortcuts of the study plan dialogs
    fn handle_date_key(&mut self, key: KeyEvent) -> bool {
        let Some(date_input) = self.inputs.get_mut(PLAN_FIELD_DATE) else {
            return false;
        };
        let current = datetime::parse_date(date_input.value().trim()).ok();
        let today = chrono::Local::now().date_naive();

        match key.code {
            KeyCode::Up => date_input.set(datetime::format_ymd(current.unwrap_or(today) + Duration::days(1))),
            KeyCode::Down => date_input.set(datetime::format_ymd(current.unwrap_or(today) - Duration::days(1))),
            KeyCode::Char('t') => date_input.set(datetime::format_ymd(today)),
            KeyCode::Char('w') => date_input.set(datetime::format_ymd(datetime::next_weekday(today, Weekday::Mon))),
            KeyCode::Char(c) if !c.is_ascii_digit() && c != '-' => {}
            _ => return false,
        }
        true
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let is_note_editor = matches!(self.dialog_type, Some(DialogType::NoteEditor { .. }));

        match key.code {
            KeyCode::Esc => return Action::HideDialog,
            KeyCode::Char('s') if ctrl => return self.handle_submit(),
            KeyCode::Tab => {
                self.focus = (self.focus + 1) % self.field_count();
                return Action::None;
            }
            KeyCode::BackTab => {
                let count = self.field_count();
                self.focus = (self.focus + count - 1) % count;
                return Action::None;
            }
            KeyCode::Enter if is_note_editor && self.focus == NOTE_FIELD_CONTENT => {
                if let Some(content) = self.inputs.get_mut(1) {
                    content.insert('\n');
                }
                return Action::None;
            }
            KeyCode::Enter => return self.handle_submit(),
            KeyCode::Char('x') if ctrl => {
                let on_image_field = match self.dialog_type {
                    Some(DialogType::NoteEditor { .. }) => self.focus == NOTE_FIELD_IMAGE,
                    Some(DialogType::CategoryEdit { .. }) => self.focus == CATEGORY_FIELD_IMAGE,
                    _ => false,
                };
                if on_image_field {
                    self.remove_image = !self.remove_image;
                }
                return Action::None;
            }
            _ => {}
        }

        if is_note_editor && self.focus == NOTE_FIELD_CATEGORY {
            match key.code {
                KeyCode::Right | KeyCode::Char(' ') | KeyCode::Char('l') => self.cycle_category(true),
                KeyCode::Left | KeyCode::Char('h') => self.cycle_category(false),
                _ => {}
            }
            return Action::None;
        }

        let is_plan_dialog = matches!(
            self.dialog_type,
            Some(DialogType::StudyPlanCreation | DialogType::StudyPlanEdit { .. })
        );
        if is_plan_dialog && self.focus == PLAN_FIELD_DATE && self.handle_date_key(key) {
            return Action::None;
        }

        let Some(index) = self.focused_input_index() else {
            return Action::None;
        };
        let changed = self.inputs.get_mut(index).is_some_and(|input| input.handle_key(key));

        match &self.dialog_type {
            Some(DialogType::NoteSearch { .. }) if changed => Action::SearchNotes(self.input(0).to_string()),
            _ => Action::None,
        }
    }
}

impl Component for DialogComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        match &self.dialog_type {
            None => Action::None,
            Some(DialogType::Info(_)) | Some(DialogType::Error(_)) => {
                if self.handle_scroll_keys(key) {
                    Action::None
                } else {
                    Action::HideDialog
                }
            }
            Some(DialogType::Help) => match key.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => Action::HideDialog,
                _ => {
                    self.handle_scroll_keys(key);
                    Action::None
                }
            },
            Some(DialogType::Logs) => match key.code {
                KeyCode::Esc | KeyCode::Char('G') | KeyCode::Char('q') => Action::HideDialog,
                _ => {
                    self.handle_scroll_keys(key);
                    Action::None
                }
            },
            Some(DialogType::DeleteConfirmation { .. }) => match key.code {
                KeyCode::Esc | KeyCode::Char('n') => Action::HideDialog,
                KeyCode::Enter | KeyCode::Char('y') => self.handle_submit(),
                _ => Action::None,
            },
            Some(DialogType::NoteSearch { .. }) => match key.code {
                KeyCode::Esc => {
                    self.clear_dialog();
                    Action::SearchNotes(String::new())
                }
                KeyCode::Enter => Action::HideDialog,
                _ => self.handle_form_key(key),
            },
            Some(_) => self.handle_form_key(key),
        }
    }

    fn update(&mut self, action: Action) -> Action {
        match action {
            Action::ShowDialog(dialog_type) => {
                self.open(&dialog_type);
                self.dialog_type = Some(dialog_type);
                Action::None
            }
            Action::HideDialog => {
                self.clear_dialog();
                Action::None
            }
            _ => action,
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let Some(dialog_type) = self.dialog_type.clone() else {
            return;
        };
        let empty = TextInput::default();
        let input = |i: usize| self.inputs.get(i).unwrap_or(&empty);

        match dialog_type {
            DialogType::NoteEditor { note_id, image_url, .. } => {
                let view = NoteEditorView {
                    is_edit: note_id.is_some(),
                    title: input(0),
                    content: input(1),
                    image_path: input(2),
                    category_label: self.category_label(),
                    existing_image_url: image_url.as_deref(),
                    remove_image: self.remove_image,
                    focus: self.focus,
                };
                note_dialogs::render_note_editor_dialog(f, rect, &self.icons, &view);
            }
            DialogType::NoteSearch { .. } => {
                note_dialogs::render_note_search_dialog(f, rect, &self.icons, input(0), self.search_match_count);
            }
            DialogType::CategoryCreation => category_dialogs::render_category_dialog(
                f,
                rect,
                &self.icons,
                false,
                input(0),
                input(1),
                None,
                false,
                self.focus,
            ),
            DialogType::CategoryEdit { image_url, .. } => category_dialogs::render_category_dialog(
                f,
                rect,
                &self.icons,
                true,
                input(0),
                input(1),
                image_url.as_deref(),
                self.remove_image,
                self.focus,
            ),
            DialogType::StudyPlanCreation => {
                study_plan_dialogs::render_study_plan_dialog(f, rect, &self.icons, false, input(0), input(1), self.focus)
            }
            DialogType::StudyPlanEdit { .. } => {
                study_plan_dialogs::render_study_plan_dialog(f, rect, &self.icons, true, input(0), input(1), self.focus)
            }
            DialogType::DeleteConfirmation { item_type, .. } => {
                system_dialogs::render_delete_confirmation_dialog(f, rect, &self.icons, &item_type);
            }
            DialogType::Info(message) => system_dialogs::render_info_dialog(
                f,
                rect,
                &self.icons,
                &message,
                self.scroll_offset,
                &mut self.scrollbar_state,
            ),
            DialogType::Error(message) => system_dialogs::render_error_dialog(
                f,
                rect,
                &self.icons,
                &message,
                self.scroll_offset,
                &mut self.scrollbar_state,
            ),
            DialogType::Help => {
                system_dialogs::render_help_dialog(f, rect, self.scroll_offset, &mut self.scrollbar_state)
            }
            DialogType::Logs => system_dialogs::render_logs_dialog(
                f,
                rect,
                &self.logger,
                self.scroll_offset,
                &mut self.scrollbar_state,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(dialog: &mut DialogComponent, code: KeyCode) -> Action {
        dialog.handle_key_events(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(dialog: &mut DialogComponent, c: char) -> Action {
        dialog.handle_key_events(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn type_text(dialog: &mut DialogComponent, text: &str) {
        for c in text.chars() {
            press(dialog, KeyCode::Char(c));
        }
    }

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: Some(id.to_string()),
            user_id: "u1".to_string(),
            name: name.to_string(),
            image_url: None,
        }
    }

    fn new_note_dialog() -> DialogType {
        DialogType::NoteEditor {
            note_id: None,
            title: String::new(),
            content: String::new(),
            category_id: None,
            image_url: None,
        }
    }

    #[test]
    fn test_note_editor_submits_all_fields() {
        let mut dialog = DialogComponent::new();
        dialog.categories = vec![category("c1", "Biology"), category("c2", "History")];
        dialog.update(Action::ShowDialog(new_note_dialog()));

        type_text(&mut dialog, "Mitosis");
        press(&mut dialog, KeyCode::Tab);
        type_text(&mut dialog, "Phases");
        press(&mut dialog, KeyCode::Enter);
        type_text(&mut dialog, "PMAT");
        press(&mut dialog, KeyCode::Tab);
        press(&mut dialog, KeyCode::Right);
        press(&mut dialog, KeyCode::Right);
        press(&mut dialog, KeyCode::Tab);
        type_text(&mut dialog, "/tmp/cell.jpg");

        match ctrl(&mut dialog, 's') {
            Action::SaveNote {
                title,
                content,
                category_id,
                image_path,
                remove_image,
            } => {
                assert_eq!(title, "Mitosis");
                assert_eq!(content, "Phases\nPMAT");
                assert_eq!(category_id.as_deref(), Some("c2"));
                assert_eq!(image_path.as_deref(), Some("/tmp/cell.jpg"));
                assert!(!remove_image);
            }
            other => panic!("expected SaveNote, got {:?}", other),
        }
        assert!(!dialog.is_visible());
    }

    #[test]
    fn test_note_editor_prefills_category() {
        let mut dialog = DialogComponent::new();
        dialog.categories = vec![category("c1", "Biology"), category("c2", "History")];
        dialog.update(Action::ShowDialog(DialogType::NoteEditor {
            note_id: Some("n1".to_string()),
            title: "Old".to_string(),
            content: "Body".to_string(),
            category_id: Some("c2".to_string()),
            image_url: Some("https://example.com/a.jpg".to_string()),
        }));
        assert_eq!(dialog.category_label(), "History");

        // Past the last category comes "no category"
        dialog.cycle_category(true);
        assert_eq!(dialog.category_label(), "None");

        // Detach the existing image from the image field
        press(&mut dialog, KeyCode::Tab);
        press(&mut dialog, KeyCode::Tab);
        press(&mut dialog, KeyCode::Tab);
        ctrl(&mut dialog, 'x');
        match press(&mut dialog, KeyCode::Enter) {
            Action::SaveNote {
                title,
                category_id,
                remove_image,
                ..
            } => {
                assert_eq!(title, "Old");
                assert_eq!(category_id, None);
                assert!(remove_image);
            }
            other => panic!("expected SaveNote, got {:?}", other),
        }
    }

    #[test]
    fn test_category_edit_cover_changes() {
        let edit = DialogType::CategoryEdit {
            category_id: "c1".to_string(),
            name: "Biology".to_string(),
            image_url: Some("https://example.com/cover.jpg".to_string()),
        };

        let mut dialog = DialogComponent::new();
        dialog.update(Action::ShowDialog(edit.clone()));
        assert!(matches!(
            press(&mut dialog, KeyCode::Enter),
            Action::EditCategory { cover: CoverChange::Keep, .. }
        ));

        dialog.update(Action::ShowDialog(edit.clone()));
        press(&mut dialog, KeyCode::Tab);
        ctrl(&mut dialog, 'x');
        assert!(matches!(
            press(&mut dialog, KeyCode::Enter),
            Action::EditCategory { cover: CoverChange::Clear, .. }
        ));

        dialog.update(Action::ShowDialog(edit));
        press(&mut dialog, KeyCode::Tab);
        type_text(&mut dialog, "new.jpg");
        assert!(matches!(
            press(&mut dialog, KeyCode::Enter),
            Action::EditCategory { cover: CoverChange::Replace(ref path), .. } if path == "new.jpg"
        ));
    }

    #[test]
    fn test_blank_category_name_keeps_dialog_open() {
        let mut dialog = DialogComponent::new();
        dialog.update(Action::ShowDialog(DialogType::CategoryCreation));
        type_text(&mut dialog, "   ");
        assert!(matches!(press(&mut dialog, KeyCode::Enter), Action::None));
        assert!(dialog.is_visible());
    }

    #[test]
    fn test_study_plan_date_shortcuts() {
        let mut dialog = DialogComponent::new();
        dialog.update(Action::ShowDialog(DialogType::StudyPlanEdit {
            plan_id: "p1".to_string(),
            title: "Exam".to_string(),
            date: "2025-03-10".to_string(),
        }));
        press(&mut dialog, KeyCode::Tab);
        press(&mut dialog, KeyCode::Up);
        // Letters other than the shortcuts are not typed into the date
        press(&mut dialog, KeyCode::Char('z'));

        match press(&mut dialog, KeyCode::Enter) {
            Action::EditStudyPlan { id, title, date } => {
                assert_eq!(id, "p1");
                assert_eq!(title, "Exam");
                assert_eq!(date, "2025-03-11");
            }
            other => panic!("expected EditStudyPlan, got {:?}", other),
        }
    }

    #[test]
    fn test_delete_confirmation_maps_item_type() {
        let mut dialog = DialogComponent::new();
        dialog.update(Action::ShowDialog(DialogType::DeleteConfirmation {
            item_type: "study plan".to_string(),
            item_id: "p1".to_string(),
        }));
        assert!(matches!(press(&mut dialog, KeyCode::Enter), Action::DeleteStudyPlan(ref id) if id == "p1"));
    }

    #[test]
    fn test_search_emits_query_as_typed() {
        let mut dialog = DialogComponent::new();
        dialog.update(Action::ShowDialog(DialogType::NoteSearch { query: String::new() }));
        assert!(matches!(press(&mut dialog, KeyCode::Char('m')), Action::SearchNotes(ref q) if q == "m"));
        assert!(matches!(press(&mut dialog, KeyCode::Esc), Action::SearchNotes(ref q) if q.is_empty()));
        assert!(!dialog.is_visible());
    }

    #[test]
    fn test_error_dialog_hides_on_other_keys() {
        let mut dialog = DialogComponent::new();
        dialog.update(Action::ShowDialog(DialogType::Error("boom".to_string())));
        assert!(matches!(press(&mut dialog, KeyCode::Char('j')), Action::None));
        assert!(matches!(press(&mut dialog, KeyCode::Char('x')), Action::HideDialog));
    }
}
