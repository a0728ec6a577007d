//! Login and registration screen shown while no session is active.

use crate::icons::IconService;
use crate::ui::components::dialogs::common::{create_instructions_paragraph, shortcuts, InstructionShortcut};
use crate::ui::components::text_input::TextInput;
use crate::ui::core::{actions::Action, Component};
use crate::ui::layout::LayoutManager;
use crate::view_state::AuthUiState;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{block::BorderType, Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthField {
    Email,
    Password,
}

pub struct AuthComponent {
    pub icons: IconService,
    email: TextInput,
    password: TextInput,
    focus: AuthField,
    is_loading: bool,
    error: Option<String>,
    message: Option<String>,
}

impl Default for AuthComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthComponent {
    pub fn new() -> Self {
        Self {
            icons: IconService::default(),
            email: TextInput::default(),
            password: TextInput::default(),
            focus: AuthField::Email,
            is_loading: false,
            error: None,
            message: None,
        }
    }

    /// Mirror the auth view state.
    ///
    /// The password field is cleared when a request finishes and the state
    /// dropped its copy, i.e. after a successful login or registration.
    pub fn update_data(&mut self, state: &AuthUiState) {
        let finished = self.is_loading && !state.is_loading;
        if finished && state.password.is_empty() {
            self.password.clear();
        }
        self.is_loading = state.is_loading;
        self.error = state.error.clone();
        self.message = state.message.clone();
    }

    fn credentials(&self) -> (String, String) {
        (self.email.value().to_string(), self.password.value().to_string())
    }

    fn focused_input(&mut self) -> &mut TextInput {
        match self.focus {
            AuthField::Email => &mut self.email,
            AuthField::Password => &mut self.password,
        }
    }

    fn render_field(&self, f: &mut Frame, area: Rect, field: AuthField) {
        let focused = self.focus == field;
        let (title, text) = match field {
            AuthField::Email => (
                " Email ",
                if focused {
                    self.email.display_with_cursor()
                } else {
                    self.email.value().to_string()
                },
            ),
            AuthField::Password => (" Password ", self.password.masked(focused)),
        };
        let border_color = if focused { Color::Cyan } else { Color::Gray };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(title)
            .style(Style::default().fg(border_color));
        f.render_widget(
            Paragraph::new(text).block(block).style(Style::default().fg(Color::White)),
            area,
        );
    }
}

impl Component for AuthComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        if self.is_loading {
            return Action::None;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
            KeyCode::Esc => Action::Quit,
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let (email, password) = self.credentials();
                Action::Register { email, password }
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.focus = match self.focus {
                    AuthField::Email => AuthField::Password,
                    AuthField::Password => AuthField::Email,
                };
                Action::None
            }
            KeyCode::Enter => {
                if self.focus == AuthField::Email && self.password.value().is_empty() {
                    self.focus = AuthField::Password;
                    return Action::None;
                }
                let (email, password) = self.credentials();
                Action::Login { email, password }
            }
            _ => {
                self.focused_input().handle_key(key);
                Action::None
            }
        }
    }

    fn update(&mut self, action: Action) -> Action {
        if matches!(action, Action::Login { .. } | Action::Register { .. }) {
            self.is_loading = true;
            self.error = None;
            self.message = None;
        }
        action
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let area = LayoutManager::centered_rect_lines(50, 16, rect);
        f.render_widget(Clear, area);

        let title = format!(" {} Studynotes - Sign in ", self.icons.user());
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(title)
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(2),
            Constraint::Length(1),
        ])
        .margin(1)
        .split(inner);

        self.render_field(f, chunks[0], AuthField::Email);
        self.render_field(f, chunks[1], AuthField::Password);

        let status = if self.is_loading {
            Some((format!("{} Please wait...", self.icons.loading()), Color::Yellow))
        } else if let Some(error) = &self.error {
            Some((format!("{} {}", self.icons.error(), error), Color::Red))
        } else {
            self.message
                .as_ref()
                .map(|message| (message.clone(), Color::Green))
        };
        if let Some((text, color)) = status {
            f.render_widget(
                Paragraph::new(text)
                    .style(Style::default().fg(color))
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true }),
                chunks[2],
            );
        }

        let instructions: [InstructionShortcut; 7] = [
            ("Enter", Color::Green, " Login"),
            shortcuts::SEPARATOR,
            ("Ctrl+R", Color::Yellow, " Register"),
            shortcuts::SEPARATOR,
            shortcuts::TAB_SWITCH,
            shortcuts::SEPARATOR,
            ("Esc", Color::Red, " Quit"),
        ];
        f.render_widget(create_instructions_paragraph(&instructions), chunks[3]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(component: &mut AuthComponent, code: KeyCode) -> Action {
        component.handle_key_events(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(component: &mut AuthComponent, text: &str) {
        for c in text.chars() {
            press(component, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_enter_moves_to_password_then_logs_in() {
        let mut auth = AuthComponent::new();
        type_text(&mut auth, "ada@example.com");
        assert!(matches!(press(&mut auth, KeyCode::Enter), Action::None));

        type_text(&mut auth, "secret");
        match press(&mut auth, KeyCode::Enter) {
            Action::Login { email, password } => {
                assert_eq!(email, "ada@example.com");
                assert_eq!(password, "secret");
            }
            other => panic!("expected login, got {:?}", other),
        }
    }

    #[test]
    fn test_ctrl_r_registers() {
        let mut auth = AuthComponent::new();
        type_text(&mut auth, "ada@example.com");
        let action = auth.handle_key_events(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));
        assert!(matches!(action, Action::Register { ref email, .. } if email == "ada@example.com"));
    }

    #[test]
    fn test_keys_ignored_while_loading() {
        let mut auth = AuthComponent::new();
        auth.update_data(&AuthUiState {
            is_loading: true,
            ..AuthUiState::default()
        });
        assert!(matches!(press(&mut auth, KeyCode::Enter), Action::None));
        assert!(matches!(press(&mut auth, KeyCode::Esc), Action::None));
    }

    #[test]
    fn test_password_cleared_after_request_finishes() {
        let mut auth = AuthComponent::new();
        type_text(&mut auth, "ada@example.com");
        press(&mut auth, KeyCode::Tab);
        type_text(&mut auth, "secret");

        let action = press(&mut auth, KeyCode::Enter);
        auth.update(action);
        auth.update_data(&AuthUiState {
            email: "ada@example.com".to_string(),
            is_success: true,
            ..AuthUiState::default()
        });

        assert!(auth.password.value().is_empty());
        assert_eq!(auth.email.value(), "ada@example.com");
    }
}
