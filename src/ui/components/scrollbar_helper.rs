//! Scrollbar shared by the list components.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

pub struct ScrollbarHelper {
    state: ScrollbarState,
}

impl Default for ScrollbarHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollbarHelper {
    pub fn new() -> Self {
        Self {
            state: ScrollbarState::new(0),
        }
    }

    /// Update the scrollbar with the number of rows and the selected row.
    pub fn update_state(&mut self, total_items: usize, current_position: usize, viewport_height: usize) {
        self.state = self
            .state
            .content_length(total_items)
            .viewport_content_length(viewport_height)
            .position(current_position);
    }

    pub fn needs_scrollbar(total_items: usize, available_height: usize) -> bool {
        total_items > available_height
    }

    /// Split a bordered list area into the list and, when the rows overflow,
    /// a one-column scrollbar inside the right border.
    pub fn calculate_areas(rect: Rect, total_items: usize) -> (Rect, Option<Rect>) {
        let available_height = rect.height.saturating_sub(2) as usize;

        if Self::needs_scrollbar(total_items, available_height) {
            let content_area = Rect {
                width: rect.width.saturating_sub(1),
                ..rect
            };
            let scrollbar_area = Rect {
                x: rect.x + rect.width.saturating_sub(1),
                y: rect.y + 1,
                width: 1,
                height: rect.height.saturating_sub(2),
            };
            (content_area, Some(scrollbar_area))
        } else {
            (rect, None)
        }
    }

    pub fn render(&mut self, f: &mut Frame, scrollbar_area: Option<Rect>) {
        if let Some(area) = scrollbar_area {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"))
                .track_symbol(Some("│"))
                .thumb_symbol("█")
                .style(Style::default().fg(Color::DarkGray))
                .thumb_style(Style::default().fg(Color::DarkGray));

            f.render_stateful_widget(scrollbar, area, &mut self.state);
        }
    }
}
