use super::common::{create_dialog_block, create_instructions_paragraph, shortcuts};
use super::scroll_behavior::visible_window;
use crate::constants::DIALOG_TITLE_LOGS;
use crate::icons::IconService;
use crate::logger::Logger;
use crate::ui::layout::LayoutManager;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
    Frame,
};

const HELP_TEXT: &str = r"
STUDYNOTES - Study notes in your terminal
=========================================

NAVIGATION
----------
J/K         Switch screen (down/up)
1-4         Jump to Notes, Favorites, Categories, Study Plan
j/k         Move through the list (down/up)
Esc         Cancel action or close dialogs

NOTES
-----
a           Write a new note
e / Enter   Edit selected note
d           Delete note (with confirmation)
f           Toggle favorite
c           Cycle category filter
v           Show favorites only
/           Search titles and content
r           Reload

NOTE EDITOR
-----------
Tab         Next field (title, content, category, image)
←/→         Pick the category when the category field is focused
Ctrl+X      Detach the current image when the image field is focused
Enter       Save (new line in the content field)
Ctrl+S      Save from any field

CATEGORIES
----------
a           Add category (name and optional cover image path)
e           Edit selected category
x           Remove the cover image
d           Delete category (with confirmation)
Enter       Show the category's notes

STUDY PLAN
----------
a           Schedule a study session
e / Enter   Edit selected plan
d           Delete plan (with confirmation)
↑/↓         Step the date by a day in the date field
t/w         Set the date field to today or next Monday

GENERAL CONTROLS
----------------
?           Toggle help panel
G           Show logs
i           Change icon theme
L           Log out
q / Ctrl+C  Quit application

Press 'Esc' or '?' to close this help panel
";

pub fn render_delete_confirmation_dialog(f: &mut Frame, area: Rect, icons: &IconService, item_type: &str) {
    let dialog_area = LayoutManager::centered_rect_lines(50, 6, area);
    f.render_widget(Clear, dialog_area);

    let block = create_dialog_block(format!(" {} Confirm Delete ", icons.warning()), Color::Red);
    let inner = block.inner(dialog_area);
    f.render_widget(block, dialog_area);

    let chunks = Layout::vertical([Constraint::Length(2), Constraint::Length(1)]).split(inner);

    let message = Paragraph::new(format!("Are you sure you want to delete this {}?", item_type))
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center);
    f.render_widget(message, chunks[0]);

    let instructions = [("Enter", Color::Green, " Delete"), shortcuts::SEPARATOR, shortcuts::ESC_CANCEL];
    f.render_widget(create_instructions_paragraph(&instructions), chunks[1]);
}

pub fn render_info_dialog(
    f: &mut Frame,
    area: Rect,
    icons: &IconService,
    message: &str,
    scroll_offset: usize,
    scrollbar_state: &mut ScrollbarState,
) {
    let title = format!(" {} Info ", icons.info());
    render_message_dialog(f, area, title, Color::Blue, message, scroll_offset, scrollbar_state);
}

pub fn render_error_dialog(
    f: &mut Frame,
    area: Rect,
    icons: &IconService,
    message: &str,
    scroll_offset: usize,
    scrollbar_state: &mut ScrollbarState,
) {
    let title = format!(" {} Error ", icons.error());
    render_message_dialog(f, area, title, Color::Red, message, scroll_offset, scrollbar_state);
}

fn render_message_dialog(
    f: &mut Frame,
    area: Rect,
    title: String,
    color: Color,
    message: &str,
    scroll_offset: usize,
    scrollbar_state: &mut ScrollbarState,
) {
    let dialog_area = LayoutManager::centered_rect_lines(60, 10, area);
    f.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().fg(color));
    f.render_widget(block, dialog_area);

    let content_area = Rect::new(
        dialog_area.x + 1,
        dialog_area.y + 1,
        dialog_area.width.saturating_sub(2),
        dialog_area.height.saturating_sub(4),
    );
    let instructions_area = Rect::new(
        dialog_area.x + 1,
        dialog_area.y + dialog_area.height.saturating_sub(2),
        dialog_area.width.saturating_sub(2),
        1,
    );

    let lines: Vec<&str> = message.lines().collect();
    let visible_height = content_area.height as usize;
    let text = visible_window(&lines, scroll_offset, visible_height, scrollbar_state).join("\n");

    let message_paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });
    f.render_widget(message_paragraph, content_area);

    let instructions = Paragraph::new("Press any key to continue • j/k to scroll if needed")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
    f.render_widget(instructions, instructions_area);

    if lines.len() > visible_height {
        render_scrollbar(f, content_area, scrollbar_state);
    }
}

pub fn render_help_dialog(f: &mut Frame, area: Rect, scroll_offset: usize, scrollbar_state: &mut ScrollbarState) {
    let lines: Vec<&str> = HELP_TEXT.lines().collect();
    render_scrollable_panel(
        f,
        area,
        "📖 Help - Press 'Esc' or '?' to close",
        &lines,
        scroll_offset,
        scrollbar_state,
    );
}

pub fn render_logs_dialog(
    f: &mut Frame,
    area: Rect,
    logger: &Logger,
    scroll_offset: usize,
    scrollbar_state: &mut ScrollbarState,
) {
    let logs = logger.get_logs();
    let mut content = if logs.is_empty() {
        "No logs yet".to_string()
    } else {
        logs.join("\n")
    };
    if let Some(path) = Logger::get_log_file_path() {
        content = format!("Log file: {}\n\n{}", path.display(), content);
    }

    let lines: Vec<&str> = content.lines().collect();
    render_scrollable_panel(f, area, DIALOG_TITLE_LOGS, &lines, scroll_offset, scrollbar_state);
}

fn render_scrollable_panel(
    f: &mut Frame,
    area: Rect,
    title: &str,
    lines: &[&str],
    scroll_offset: usize,
    scrollbar_state: &mut ScrollbarState,
) {
    let panel_area = LayoutManager::centered_rect(90, 90, area);
    f.render_widget(Clear, panel_area);

    let margin_x = 2;
    let margin_y = 1;
    let content_area = Rect::new(
        panel_area.x + margin_x,
        panel_area.y + margin_y,
        panel_area.width.saturating_sub(margin_x * 2),
        panel_area.height.saturating_sub(margin_y * 2),
    );

    let visible_height = content_area.height.saturating_sub(2) as usize;
    let text = visible_window(lines, scroll_offset, visible_height, scrollbar_state).join("\n");

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .title_alignment(Alignment::Center),
        )
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Left);
    f.render_widget(paragraph, content_area);

    if lines.len() > visible_height {
        render_scrollbar(f, content_area, scrollbar_state);
    }
}

fn render_scrollbar(f: &mut Frame, area: Rect, scrollbar_state: &mut ScrollbarState) {
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("↑"))
        .end_symbol(Some("↓"))
        .track_symbol(Some("│"))
        .thumb_symbol("▐")
        .style(Style::default().fg(Color::Gray))
        .thumb_style(Style::default().fg(Color::White));

    f.render_stateful_widget(scrollbar, area, scrollbar_state);
}
