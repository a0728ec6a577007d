//! Status bar component

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::icons::IconService;
use crate::ui::core::actions::View;

/// Status bar component
pub struct StatusBar;

impl StatusBar {
    /// Shortcuts shown while nothing is running
    pub fn shortcuts_for(view: View) -> &'static str {
        match view {
            View::Notes => "a: new • e: edit • f: favorite • c: category • /: search • ?: help • q: quit",
            View::Favorites => "e: edit • f: unfavorite • d: delete • r: reload • ?: help • q: quit",
            View::Categories => "a: add • e: edit • Enter: notes • d: delete • ?: help • q: quit",
            View::StudyPlan => "a: schedule • e: edit • d: delete • r: reload • ?: help • q: quit",
        }
    }

    /// Render the status bar; `running` holds the descriptions of in-flight operations
    pub fn render(f: &mut Frame, area: Rect, icons: &IconService, view: View, running: &[String]) {
        let (status_text, status_color) = match running.first() {
            Some(description) if running.len() > 1 => (
                format!("{} {} (+{} more)...", icons.loading(), description, running.len() - 1),
                Color::Yellow,
            ),
            Some(description) => (format!("{} {}...", icons.loading(), description), Color::Yellow),
            None => (Self::shortcuts_for(view).to_string(), Color::Gray),
        };

        let status_bar = Paragraph::new(status_text)
            .block(Block::default())
            .alignment(Alignment::Center)
            .style(Style::default().fg(status_color));

        f.render_widget(status_bar, area);
    }
}
