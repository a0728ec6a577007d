use ratatui::widgets::ScrollbarState;

const PAGE: usize = 10;

pub fn scroll_up(scroll_offset: &mut usize, scrollbar_state: &mut ScrollbarState) {
    set(scroll_offset, scrollbar_state, scroll_offset.saturating_sub(1));
}

pub fn scroll_down(scroll_offset: &mut usize, scrollbar_state: &mut ScrollbarState) {
    set(scroll_offset, scrollbar_state, scroll_offset.saturating_add(1));
}

pub fn page_up(scroll_offset: &mut usize, scrollbar_state: &mut ScrollbarState) {
    set(scroll_offset, scrollbar_state, scroll_offset.saturating_sub(PAGE));
}

pub fn page_down(scroll_offset: &mut usize, scrollbar_state: &mut ScrollbarState) {
    set(scroll_offset, scrollbar_state, scroll_offset.saturating_add(PAGE));
}

pub fn scroll_to_top(scroll_offset: &mut usize, scrollbar_state: &mut ScrollbarState) {
    set(scroll_offset, scrollbar_state, 0);
}

/// Jump past the end; renderers clamp the offset to the content height.
pub fn scroll_to_bottom(scroll_offset: &mut usize, scrollbar_state: &mut ScrollbarState) {
    set(scroll_offset, scrollbar_state, usize::MAX);
}

fn set(scroll_offset: &mut usize, scrollbar_state: &mut ScrollbarState, value: usize) {
    *scroll_offset = value;
    *scrollbar_state = scrollbar_state.position(value);
}

/// Clamp `scroll_offset` and return the visible window of `lines`.
pub fn visible_window<'a>(
    lines: &[&'a str],
    scroll_offset: usize,
    visible_height: usize,
    scrollbar_state: &mut ScrollbarState,
) -> Vec<&'a str> {
    let max_scroll = lines.len().saturating_sub(visible_height);
    let clamped_offset = scroll_offset.min(max_scroll);

    *scrollbar_state = scrollbar_state
        .content_length(lines.len())
        .viewport_content_length(visible_height)
        .position(clamped_offset);

    lines.iter().skip(clamped_offset).take(visible_height).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrolling_saturates() {
        let mut offset = 0;
        let mut state = ScrollbarState::new(100);

        scroll_up(&mut offset, &mut state);
        assert_eq!(offset, 0);
        page_down(&mut offset, &mut state);
        assert_eq!(offset, 10);
        scroll_to_bottom(&mut offset, &mut state);
        scroll_down(&mut offset, &mut state);
        assert_eq!(offset, usize::MAX);
    }

    #[test]
    fn test_visible_window_clamps_offset() {
        let lines = ["a", "b", "c", "d", "e"];
        let mut state = ScrollbarState::new(0);
        assert_eq!(visible_window(&lines, usize::MAX, 2, &mut state), vec!["d", "e"]);
        assert_eq!(visible_window(&lines, 1, 2, &mut state), vec!["b", "c"]);
        assert_eq!(visible_window(&lines, 0, 10, &mut state), lines.to_vec());
    }
}
