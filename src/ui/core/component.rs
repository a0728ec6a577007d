use super::actions::Action;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

/// A piece of the screen that turns key presses into [`Action`]s.
///
/// The app component routes each key to exactly one component, then feeds
/// every resulting action back through `update` so components can react to
/// actions raised elsewhere.
pub trait Component {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action;

    /// Observe an action; return it unchanged to let it propagate.
    fn update(&mut self, action: Action) -> Action {
        action
    }

    fn render(&mut self, f: &mut Frame, rect: Rect);
}
