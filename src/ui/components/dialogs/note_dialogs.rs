use super::common::{
    create_dialog_block, create_input_paragraph, create_instructions_paragraph, create_selection_paragraph,
    shortcuts, InstructionShortcut,
};
use crate::icons::IconService;
use crate::ui::components::text_input::TextInput;
use crate::ui::layout::LayoutManager;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Focus positions of the note editor
pub const NOTE_FIELD_TITLE: usize = 0;
pub const NOTE_FIELD_CONTENT: usize = 1;
pub const NOTE_FIELD_CATEGORY: usize = 2;
pub const NOTE_FIELD_IMAGE: usize = 3;
pub const NOTE_FIELD_COUNT: usize = 4;

pub struct NoteEditorView<'a> {
    pub is_edit: bool,
    pub title: &'a TextInput,
    pub content: &'a TextInput,
    pub image_path: &'a TextInput,
    pub category_label: String,
    pub existing_image_url: Option<&'a str>,
    pub remove_image: bool,
    pub focus: usize,
}

pub fn render_note_editor_dialog(f: &mut Frame, area: Rect, icons: &IconService, view: &NoteEditorView) {
    let dialog_area = LayoutManager::centered_rect_lines(70, 22, area);
    f.render_widget(Clear, dialog_area);

    let title = if view.is_edit {
        format!(" {} Edit Note ", icons.note())
    } else {
        format!(" {} New Note ", icons.note())
    };
    let block = create_dialog_block(title, Color::Cyan);
    let inner = block.inner(dialog_area);
    f.render_widget(block, dialog_area);

    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(4),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .split(inner);

    f.render_widget(
        create_input_paragraph(view.title, "Title", view.focus == NOTE_FIELD_TITLE),
        chunks[0],
    );

    let content_focused = view.focus == NOTE_FIELD_CONTENT;
    let content_text = if content_focused {
        view.content.display_with_cursor()
    } else {
        view.content.value().to_string()
    };
    let content_color = if content_focused { Color::Cyan } else { Color::Gray };
    let content = Paragraph::new(content_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" Content ")
                .style(Style::default().fg(content_color)),
        )
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false });
    f.render_widget(content, chunks[1]);

    f.render_widget(
        create_selection_paragraph(
            view.category_label.clone(),
            "Category",
            view.focus == NOTE_FIELD_CATEGORY,
        ),
        chunks[2],
    );

    f.render_widget(
        create_input_paragraph(view.image_path, "Image file (optional)", view.focus == NOTE_FIELD_IMAGE),
        chunks[3],
    );

    let image_status = match (view.existing_image_url, view.remove_image) {
        (Some(_), true) => format!("{} Current image will be removed", icons.warning()),
        (Some(url), false) => format!("{} Attached: {}", icons.image(), url),
        (None, _) => String::new(),
    };
    f.render_widget(
        Paragraph::new(image_status).style(Style::default().fg(Color::Magenta)),
        chunks[4],
    );

    let instructions: [InstructionShortcut; 5] = [
        shortcuts::CTRL_S_SAVE,
        shortcuts::SEPARATOR,
        shortcuts::TAB_SWITCH,
        shortcuts::SEPARATOR,
        shortcuts::ESC_CANCEL,
    ];
    f.render_widget(create_instructions_paragraph(&instructions), chunks[5]);
}

pub fn render_note_search_dialog(
    f: &mut Frame,
    area: Rect,
    icons: &IconService,
    query: &TextInput,
    match_count: Option<usize>,
) {
    let dialog_area = LayoutManager::centered_rect_lines(60, 7, area);
    f.render_widget(Clear, dialog_area);

    let block = create_dialog_block(format!(" {} Search Notes ", icons.info()), Color::Yellow);
    let inner = block.inner(dialog_area);
    f.render_widget(block, dialog_area);

    let chunks = Layout::vertical([Constraint::Length(3), Constraint::Length(1), Constraint::Length(1)]).split(inner);

    f.render_widget(create_input_paragraph(query, "Title or content", true), chunks[0]);

    if let Some(count) = match_count {
        let text = match count {
            1 => "1 matching note".to_string(),
            n => format!("{} matching notes", n),
        };
        f.render_widget(Paragraph::new(text).style(Style::default().fg(Color::Gray)), chunks[1]);
    }

    let instructions: [InstructionShortcut; 3] = [
        ("Enter", Color::Green, " Keep filter"),
        shortcuts::SEPARATOR,
        ("Esc", Color::Red, " Clear search"),
    ];
    f.render_widget(create_instructions_paragraph(&instructions), chunks[2]);
}
