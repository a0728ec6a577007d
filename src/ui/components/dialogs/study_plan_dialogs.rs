use super::common::{
    create_dialog_block, create_input_paragraph, create_instructions_paragraph, shortcuts, InstructionShortcut,
};
use crate::icons::IconService;
use crate::ui::components::text_input::TextInput;
use crate::ui::layout::LayoutManager;
use crate::utils::datetime;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::{Clear, Paragraph},
    Frame,
};

pub const PLAN_FIELD_TITLE: usize = 0;
pub const PLAN_FIELD_DATE: usize = 1;

pub fn render_study_plan_dialog(
    f: &mut Frame,
    area: Rect,
    icons: &IconService,
    is_edit: bool,
    title_input: &TextInput,
    date_input: &TextInput,
    focus: usize,
) {
    let dialog_area = LayoutManager::centered_rect_lines(60, 11, area);
    f.render_widget(Clear, dialog_area);

    let title = if is_edit {
        format!(" {} Edit Study Plan ", icons.date())
    } else {
        format!(" {} Plan a Study Session ", icons.date())
    };
    let block = create_dialog_block(title, Color::Blue);
    let inner = block.inner(dialog_area);
    f.render_widget(block, dialog_area);

    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .split(inner);

    f.render_widget(
        create_input_paragraph(title_input, "Title", focus == PLAN_FIELD_TITLE),
        chunks[0],
    );
    f.render_widget(
        create_input_paragraph(date_input, "Date (YYYY-MM-DD)", focus == PLAN_FIELD_DATE),
        chunks[1],
    );

    let date = date_input.value().trim();
    let (hint, color) = if date.is_empty() {
        ("↑/↓ step a day • t today • w next Monday".to_string(), Color::Gray)
    } else if datetime::is_valid_date(date) {
        (datetime::format_human_date(date), Color::Green)
    } else {
        ("Not a valid YYYY-MM-DD date".to_string(), Color::Red)
    };
    f.render_widget(Paragraph::new(hint).style(Style::default().fg(color)), chunks[2]);

    let instructions: [InstructionShortcut; 5] = [
        shortcuts::ENTER_SAVE,
        shortcuts::SEPARATOR,
        shortcuts::TAB_SWITCH,
        shortcuts::SEPARATOR,
        shortcuts::ESC_CANCEL,
    ];
    f.render_widget(create_instructions_paragraph(&instructions), chunks[3]);
}
