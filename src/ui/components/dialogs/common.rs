use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::ui::components::text_input::TextInput;

/// Creates a styled main dialog block
pub fn create_dialog_block(title: String, theme_color: Color) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(title)
        .title_style(Style::default().fg(theme_color).add_modifier(Modifier::BOLD))
        .style(Style::default().fg(theme_color))
}

/// Creates an input field block; the focused field shows a block cursor
pub fn create_input_paragraph(input: &TextInput, field_title: &str, focused: bool) -> Paragraph<'static> {
    let text = if focused {
        input.display_with_cursor()
    } else {
        input.value().to_string()
    };

    Paragraph::new(text)
        .block(field_block(field_title, focused))
        .style(Style::default().fg(Color::White))
}

/// Creates a selection field block (read-only display with title)
pub fn create_selection_paragraph(value: String, field_title: &str, focused: bool) -> Paragraph<'static> {
    let value = if focused { format!("◀ {} ▶", value) } else { value };
    Paragraph::new(value)
        .block(field_block(field_title, focused))
        .style(Style::default().fg(Color::White))
}

fn field_block(field_title: &str, focused: bool) -> Block<'static> {
    let (title_color, border_color) = if focused {
        (Color::Cyan, Color::Cyan)
    } else {
        (Color::White, Color::Gray)
    };

    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(format!(" {} ", field_title))
        .title_style(Style::default().fg(title_color))
        .style(Style::default().fg(border_color))
}

/// Instruction shortcut definition: (key, color, description)
pub type InstructionShortcut = (&'static str, Color, &'static str);

/// Creates a paragraph with color-coded instruction shortcuts
pub fn create_instructions_paragraph(instructions: &[InstructionShortcut]) -> Paragraph<'static> {
    let mut instruction_text = Vec::new();
    for (key, color, desc) in instructions {
        instruction_text.push(Span::styled(
            *key,
            Style::default().fg(*color).add_modifier(Modifier::BOLD),
        ));
        instruction_text.push(Span::styled(*desc, Style::default().fg(Color::Gray)));
    }

    Paragraph::new(Line::from(instruction_text)).alignment(Alignment::Center)
}

/// Common instruction shortcuts used across dialogs
pub mod shortcuts {
    use super::*;

    pub const SEPARATOR: InstructionShortcut = (" • ", Color::Gray, "");
    pub const ESC_CANCEL: InstructionShortcut = ("Esc", Color::Red, " Cancel");
    pub const TAB_SWITCH: InstructionShortcut = ("Tab", Color::Cyan, " Next field");
    pub const ENTER_SAVE: InstructionShortcut = ("Enter", Color::Green, " Save");
    pub const CTRL_S_SAVE: InstructionShortcut = ("Ctrl+S", Color::Green, " Save");
}
