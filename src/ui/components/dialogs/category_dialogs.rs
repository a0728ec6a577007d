use super::common::{
    create_dialog_block, create_input_paragraph, create_instructions_paragraph, shortcuts, InstructionShortcut,
};
use crate::icons::IconService;
use crate::ui::components::text_input::TextInput;
use crate::ui::layout::LayoutManager;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::{Clear, Paragraph},
    Frame,
};

pub const CATEGORY_FIELD_NAME: usize = 0;
pub const CATEGORY_FIELD_IMAGE: usize = 1;

/// Render the add or edit dialog; `current_image` is set only when editing.
#[allow(clippy::too_many_arguments)]
pub fn render_category_dialog(
    f: &mut Frame,
    area: Rect,
    icons: &IconService,
    is_edit: bool,
    name: &TextInput,
    image_path: &TextInput,
    current_image: Option<&str>,
    remove_image: bool,
    focus: usize,
) {
    let dialog_area = LayoutManager::centered_rect_lines(60, 11, area);
    f.render_widget(Clear, dialog_area);

    let categories_icon = icons.icons().ui.categories_title;
    let title = if is_edit {
        format!(" {} Edit Category ", categories_icon)
    } else {
        format!(" {} New Category ", categories_icon)
    };
    let block = create_dialog_block(title, Color::Green);
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
        create_input_paragraph(name, "Name", focus == CATEGORY_FIELD_NAME),
        chunks[0],
    );
    f.render_widget(
        create_input_paragraph(image_path, "Cover image file (optional)", focus == CATEGORY_FIELD_IMAGE),
        chunks[1],
    );

    let status = match (current_image, remove_image) {
        (Some(_), true) => format!("{} Cover will be removed", icons.warning()),
        (Some(_), false) if !image_path.value().trim().is_empty() => {
            format!("{} Cover will be replaced", icons.image())
        }
        (Some(_), false) => format!("{} Keeping the current cover (Ctrl+X removes it)", icons.image()),
        (None, _) => String::new(),
    };
    f.render_widget(Paragraph::new(status).style(Style::default().fg(Color::Magenta)), chunks[2]);

    let instructions: [InstructionShortcut; 5] = [
        shortcuts::ENTER_SAVE,
        shortcuts::SEPARATOR,
        shortcuts::TAB_SWITCH,
        shortcuts::SEPARATOR,
        shortcuts::ESC_CANCEL,
    ];
    f.render_widget(create_instructions_paragraph(&instructions), chunks[3]);
}
