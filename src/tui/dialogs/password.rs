//! Password change dialog
//!
//! Current, new and confirmation inputs. The change only goes through after
//! the current password re-authenticates.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::services::AuthService;
use crate::tui::app::App;
use crate::tui::layout::centered_rect_fixed;
use crate::tui::widgets::TextInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasswordField {
    #[default]
    Current,
    New,
    Confirm,
}

impl PasswordField {
    pub fn next(self) -> Self {
        match self {
            Self::Current => Self::New,
            Self::New => Self::Confirm,
            Self::Confirm => Self::Current,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Current => Self::Confirm,
            Self::New => Self::Current,
            Self::Confirm => Self::New,
        }
    }
}

/// State for the password dialog
#[derive(Debug, Clone)]
pub struct PasswordFormState {
    pub focused_field: PasswordField,
    pub current_input: TextInput,
    pub new_input: TextInput,
    pub confirm_input: TextInput,
    pub error_message: Option<String>,
}

impl Default for PasswordFormState {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordFormState {
    pub fn new() -> Self {
        let mut state = Self {
            focused_field: PasswordField::Current,
            current_input: TextInput::new().label("  Current").masked(),
            new_input: TextInput::new().label("      New").masked(),
            confirm_input: TextInput::new().label("  Confirm").masked(),
            error_message: None,
        };
        state.update_focus();
        state
    }

    fn update_focus(&mut self) {
        self.current_input.focused = self.focused_field == PasswordField::Current;
        self.new_input.focused = self.focused_field == PasswordField::New;
        self.confirm_input.focused = self.focused_field == PasswordField::Confirm;
    }

    pub fn next_field(&mut self) {
        self.focused_field = self.focused_field.next();
        self.update_focus();
    }

    pub fn prev_field(&mut self) {
        self.focused_field = self.focused_field.prev();
        self.update_focus();
    }

    pub fn focused_input(&mut self) -> &mut TextInput {
        match self.focused_field {
            PasswordField::Current => &mut self.current_input,
            PasswordField::New => &mut self.new_input,
            PasswordField::Confirm => &mut self.confirm_input,
        }
    }
}

/// Render the password dialog
pub fn render(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(58, 11, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Change Password ")
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
            Constraint::Length(1),
            Constraint::Length(1), // Current
            Constraint::Length(1), // New
            Constraint::Length(1), // Confirm
            Constraint::Length(1),
            Constraint::Length(1), // Error
            Constraint::Length(1),
            Constraint::Length(1), // Hints
            Constraint::Min(0),
        ])
        .split(inner);

    let form = &app.password_form;
    frame.render_widget(form.current_input.clone(), chunks[1]);
    frame.render_widget(form.new_input.clone(), chunks[2]);
    frame.render_widget(form.confirm_input.clone(), chunks[3]);

    if let Some(ref error) = form.error_message {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                error.as_str(),
                Style::default().fg(Color::Red),
            ))),
            chunks[5],
        );
    }

    let hints = Line::from(vec![
        Span::styled("[Tab]", Style::default().fg(Color::Yellow)),
        Span::raw(" Next  "),
        Span::styled("[Enter]", Style::default().fg(Color::Green)),
        Span::raw(" Update  "),
        Span::styled("[Esc]", Style::default().fg(Color::Red)),
        Span::raw(" Cancel"),
    ]);
    frame.render_widget(Paragraph::new(hints), chunks[7]);
}

/// Handle key input for the password dialog
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    let form = &mut app.password_form;

    match key.code {
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
        KeyCode::Enter => submit(app),
        KeyCode::Backspace => form.focused_input().backspace(),
        KeyCode::Delete => form.focused_input().delete(),
        KeyCode::Left => form.focused_input().move_left(),
        KeyCode::Right => form.focused_input().move_right(),
        KeyCode::Char(c) => {
            form.error_message = None;
            form.focused_input().insert(c);
        }
        _ => return false,
    }

    true
}

fn submit(app: &mut App) {
    let Some(user) = app.user.clone() else {
        app.close_dialog();
        return;
    };

    let form = &app.password_form;
    let result = AuthService::new(app.storage, app.settings).update_password(
        &user,
        form.current_input.value(),
        form.new_input.value(),
        form.confirm_input.value(),
    );

    match result {
        Ok(updated) => {
            app.user = Some(updated);
            app.close_dialog();
            app.password_form = PasswordFormState::new();
            app.set_status("Password updated successfully!");
        }
        Err(e) => {
            app.password_form.error_message = Some(e.user_message());
        }
    }
}
