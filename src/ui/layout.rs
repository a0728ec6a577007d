//! Layout management and calculations

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::constants::{SIDEBAR_MAX_WIDTH, SIDEBAR_MIN_WIDTH};

/// Manages layout calculations and constraints for the UI
pub struct LayoutManager;

impl LayoutManager {
    /// Split the screen into the content area and a one-line status bar below it
    #[must_use]
    pub fn main_layout(area: Rect) -> (Rect, Rect) {
        let top_height = area.height.saturating_sub(1);
        let top_area = Rect::new(area.x, area.y, area.width, top_height);
        let status_area = Rect::new(area.x, area.y + top_height, area.width, area.height.min(1));
        (top_area, status_area)
    }

    /// Split the content area into sidebar and list side by side.
    ///
    /// The configured width is clamped to the allowed range and to a third of
    /// the screen so narrow terminals keep room for the list.
    #[must_use]
    pub fn top_pane_layout(area: Rect, sidebar_width: u16) -> (Rect, Rect) {
        let sidebar_width = sidebar_width
            .clamp(SIDEBAR_MIN_WIDTH, SIDEBAR_MAX_WIDTH)
            .min(area.width / 3);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(sidebar_width), Constraint::Min(0)])
            .split(area);
        (chunks[0], chunks[1])
    }

    /// Calculate a centered rectangle within the given area
    #[must_use]
    pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ])
            .split(r);

        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ])
            .split(popup_layout[1])[1]
    }

    /// Calculate a centered rectangle with percentage width and fixed line height
    #[must_use]
    pub fn centered_rect_lines(percent_x: u16, height_lines: u16, r: Rect) -> Rect {
        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(height_lines),
                Constraint::Min(0),
            ])
            .split(r);

        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ])
            .split(popup_layout[1])[1]
    }

    /// Width left for a list row's text once borders, icon and suffix are drawn
    #[must_use]
    pub fn row_text_width(list_width: u16, icon_width: usize, suffix_width: usize) -> usize {
        (list_width.saturating_sub(4) as usize)
            .saturating_sub(icon_width)
            .saturating_sub(suffix_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_layout_reserves_status_line() {
        let (top, status) = LayoutManager::main_layout(Rect::new(0, 0, 100, 40));
        assert_eq!(top.height, 39);
        assert_eq!(status.y, 39);
        assert_eq!(status.height, 1);
    }

    #[test]
    fn test_sidebar_width_is_clamped() {
        let (sidebar, list) = LayoutManager::top_pane_layout(Rect::new(0, 0, 120, 40), 200);
        assert_eq!(sidebar.width, 40);
        assert_eq!(list.width, 80);

        let (sidebar, _) = LayoutManager::top_pane_layout(Rect::new(0, 0, 120, 40), 24);
        assert_eq!(sidebar.width, 24);
    }

    #[test]
    fn test_centered_rect_lines_height() {
        let area = LayoutManager::centered_rect_lines(50, 6, Rect::new(0, 0, 100, 30));
        assert_eq!(area.height, 6);
        assert_eq!(area.width, 50);
    }
}
