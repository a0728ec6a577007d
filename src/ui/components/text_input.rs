//! Single-line text input with a character-indexed cursor.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    /// Cursor position counted in chars, not bytes
    cursor: usize,
}

impl TextInput {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Apply an editing key. Returns whether the key was consumed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.clear();
                true
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.insert(c);
                true
            }
            KeyCode::Backspace => {
                self.backspace();
                true
            }
            KeyCode::Delete => {
                self.delete();
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            }
            KeyCode::Right => {
                if self.cursor < self.value.chars().count() {
                    self.cursor += 1;
                }
                true
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = self.value.chars().count();
                true
            }
            _ => false,
        }
    }

    pub fn insert(&mut self, c: char) {
        let byte_pos = self.byte_pos(self.cursor);
        self.value.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let byte_pos = self.byte_pos(self.cursor - 1);
            self.value.remove(byte_pos);
            self.cursor -= 1;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let byte_pos = self.byte_pos(self.cursor);
            self.value.remove(byte_pos);
        }
    }

    /// Value with a block cursor drawn at the cursor position
    pub fn display_with_cursor(&self) -> String {
        let byte_pos = self.byte_pos(self.cursor);
        format!("{}█{}", &self.value[..byte_pos], &self.value[byte_pos..])
    }

    /// Value with every char replaced, for passwords
    pub fn masked(&self, with_cursor: bool) -> String {
        let mut masked: String = "•".repeat(self.value.chars().count());
        if with_cursor {
            let byte_pos = "•".len() * self.cursor;
            masked.insert(byte_pos, '█');
        }
        masked
    }

    fn byte_pos(&self, char_index: usize) -> usize {
        self.value.chars().take(char_index).map(char::len_utf8).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_editing_in_the_middle_of_multibyte_text() {
        let mut input = TextInput::new("héllo");
        input.handle_key(key(KeyCode::Home));
        input.handle_key(key(KeyCode::Right));
        input.handle_key(key(KeyCode::Right));
        input.handle_key(key(KeyCode::Backspace));
        assert_eq!(input.value(), "hllo");

        input.handle_key(key(KeyCode::Char('é')));
        assert_eq!(input.value(), "héllo");
        assert_eq!(input.cursor(), 2);

        input.handle_key(key(KeyCode::Delete));
        assert_eq!(input.value(), "hélo");
    }

    #[test]
    fn test_cursor_display_and_mask() {
        let mut input = TextInput::new("ab");
        input.handle_key(key(KeyCode::Left));
        assert_eq!(input.display_with_cursor(), "a█b");
        assert_eq!(input.masked(true), "•█•");
        assert_eq!(input.masked(false), "••");
    }

    #[test]
    fn test_ctrl_u_clears() {
        let mut input = TextInput::new("secret");
        assert!(input.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL)));
        assert_eq!(input.value(), "");
        assert!(!input.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)));
    }
}
