//! Login screen
//!
//! Email and password inputs. Enter signs in, Ctrl+N creates an account with
//! the same values.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::services::AuthService;
use crate::tui::app::App;
use crate::tui::layout::centered_rect_fixed;
use crate::tui::widgets::TextInput;

/// Which login field has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

impl LoginField {
    pub fn toggle(self) -> Self {
        match self {
            Self::Email => Self::Password,
            Self::Password => Self::Email,
        }
    }
}

/// State for the login form
#[derive(Debug, Clone)]
pub struct LoginFormState {
    pub focused_field: LoginField,
    pub email_input: TextInput,
    pub password_input: TextInput,
    pub error_message: Option<String>,
}

impl Default for LoginFormState {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginFormState {
    pub fn new() -> Self {
        let mut state = Self {
            focused_field: LoginField::Email,
            email_input: TextInput::new().label("Email").placeholder("you@example.com"),
            password_input: TextInput::new().label("Password").masked(),
            error_message: None,
        };
        state.update_focus();
        state
    }

    fn update_focus(&mut self) {
        self.email_input.focused = self.focused_field == LoginField::Email;
        self.password_input.focused = self.focused_field == LoginField::Password;
    }

    pub fn next_field(&mut self) {
        self.focused_field = self.focused_field.toggle();
        self.update_focus();
    }

    pub fn focused_input(&mut self) -> &mut TextInput {
        match self.focused_field {
            LoginField::Email => &mut self.email_input,
            LoginField::Password => &mut self.password_input,
        }
    }
}

/// Render the login screen
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let area = centered_rect_fixed(56, 10, area);

    let block = Block::default()
        .title(" Sign in ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, area);

    let inner = Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(4),
        height: area.height.saturating_sub(2),
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Email
            Constraint::Length(1), // Password
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Error
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Hints
            Constraint::Min(0),
        ])
        .split(inner);

    let form = &app.login_form;
    frame.render_widget(form.email_input.clone(), chunks[1]);
    frame.render_widget(form.password_input.clone(), chunks[2]);

    if let Some(ref error) = form.error_message {
        let error_line = Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red),
        ));
        frame.render_widget(Paragraph::new(error_line), chunks[4]);
    }

    let hints = Line::from(vec![
        Span::styled("[Enter]", Style::default().fg(Color::Green)),
        Span::raw(" Log in  "),
        Span::styled("[Ctrl+N]", Style::default().fg(Color::Green)),
        Span::raw(" Sign up  "),
        Span::styled("[Esc]", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ]);
    frame.render_widget(Paragraph::new(hints), chunks[6]);
}

/// Handle key input on the login screen
pub fn handle_key(app: &mut App, key: KeyEvent) {
    let form = &mut app.login_form;

    match key.code {
        KeyCode::Esc => app.quit(),
        KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            submit(app, true);
        }
        KeyCode::Enter => submit(app, false),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => form.next_field(),
        KeyCode::Backspace => form.focused_input().backspace(),
        KeyCode::Delete => form.focused_input().delete(),
        KeyCode::Left => form.focused_input().move_left(),
        KeyCode::Right => form.focused_input().move_right(),
        KeyCode::Home => form.focused_input().move_start(),
        KeyCode::End => form.focused_input().move_end(),
        KeyCode::Char(c) => {
            form.error_message = None;
            form.focused_input().insert(c);
        }
        _ => {}
    }
}

fn submit(app: &mut App, sign_up: bool) {
    let auth = AuthService::new(app.storage, app.settings);
    let email = app.login_form.email_input.value().to_string();
    let password = app.login_form.password_input.take_secret();

    let result = if sign_up {
        auth.sign_up(&email, &password)
    } else {
        auth.sign_in(&email, &password)
    };

    match result {
        Ok(user) => {
            let message = format!("Signed in as {}", user.email);
            app.enter_expenses(user);
            app.set_status(message);
        }
        Err(e) => {
            app.login_form.error_message = Some(e.user_message());
            app.login_form.focused_field = LoginField::Password;
            app.login_form.update_focus();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::ExpensePaths;
    use crate::config::Settings;
    use crate::storage::Storage;
    use crate::tui::app::Screen;
    use tempfile::TempDir;

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_key(app, KeyEvent::from(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_sign_up_then_switch_screen() {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            Storage::open(ExpensePaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let settings = Settings::default();
        let mut app = App::new(&storage, &settings).unwrap();

        type_text(&mut app, "ana@example.com");
        handle_key(&mut app, KeyEvent::from(KeyCode::Tab));
        type_text(&mut app, "secret1");
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL),
        );

        assert_eq!(app.screen, Screen::Expenses);
        assert_eq!(app.user.as_ref().unwrap().email, "ana@example.com");
    }

    #[test]
    fn test_failed_sign_in_shows_error() {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            Storage::open(ExpensePaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let settings = Settings::default();
        let mut app = App::new(&storage, &settings).unwrap();

        type_text(&mut app, "nobody@example.com");
        handle_key(&mut app, KeyEvent::from(KeyCode::Tab));
        type_text(&mut app, "whatever");
        handle_key(&mut app, KeyEvent::from(KeyCode::Enter));

        assert_eq!(app.screen, Screen::Login);
        assert_eq!(
            app.login_form.error_message.as_deref(),
            Some("Invalid email or password.")
        );
        assert!(app.login_form.password_input.value().is_empty());
    }
}
