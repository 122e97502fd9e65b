//! Expense entry/edit dialog
//!
//! Modal form with amount, date and category fields, Tab navigation,
//! validation and save/cancel.

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::models::{Expense, ExpenseId, NewExpense, DATE_FORMAT};
use crate::tui::app::App;
use crate::tui::layout::centered_rect_fixed;
use crate::tui::widgets::TextInput;

/// Which field is currently focused in the expense form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpenseField {
    #[default]
    Amount,
    Date,
    Category,
}

impl ExpenseField {
    /// Get the next field (for Tab navigation)
    pub fn next(self) -> Self {
        match self {
            Self::Amount => Self::Date,
            Self::Date => Self::Category,
            Self::Category => Self::Amount,
        }
    }

    /// Get the previous field (for Shift+Tab navigation)
    pub fn prev(self) -> Self {
        match self {
            Self::Amount => Self::Category,
            Self::Date => Self::Amount,
            Self::Category => Self::Date,
        }
    }
}

/// State for the expense form dialog
#[derive(Debug, Clone)]
pub struct ExpenseFormState {
    pub focused_field: ExpenseField,
    pub amount_input: TextInput,
    pub date_input: TextInput,
    pub category_input: TextInput,
    /// Expense being edited, `None` when adding
    pub editing: Option<ExpenseId>,
    pub error_message: Option<String>,
}

impl Default for ExpenseFormState {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpenseFormState {
    /// Empty form dated today
    pub fn new() -> Self {
        let today = Local::now().date_naive();
        let mut state = Self {
            focused_field: ExpenseField::Amount,
            amount_input: TextInput::new().label("  Amount").placeholder("0.00"),
            date_input: TextInput::new()
                .label("    Date")
                .placeholder("YYYY-MM-DD")
                .content(today.format(DATE_FORMAT).to_string()),
            category_input: TextInput::new()
                .label("Category")
                .placeholder("e.g. Groceries"),
            editing: None,
            error_message: None,
        };
        state.update_focus();
        state
    }

    /// Form pre-populated from an existing expense
    pub fn from_expense(expense: &Expense) -> Self {
        let mut state = Self::new();
        state.editing = Some(expense.id);
        state.amount_input = TextInput::new()
            .label("  Amount")
            .content(expense.amount.to_string());
        state.date_input = TextInput::new()
            .label("    Date")
            .content(expense.date.format(DATE_FORMAT).to_string());
        state.category_input = TextInput::new()
            .label("Category")
            .content(expense.category.as_str());
        state.update_focus();
        state
    }

    fn update_focus(&mut self) {
        self.amount_input.focused = self.focused_field == ExpenseField::Amount;
        self.date_input.focused = self.focused_field == ExpenseField::Date;
        self.category_input.focused = self.focused_field == ExpenseField::Category;
    }

    pub fn next_field(&mut self) {
        self.focused_field = self.focused_field.next();
        self.update_focus();
    }

    pub fn prev_field(&mut self) {
        self.focused_field = self.focused_field.prev();
        self.update_focus();
    }

    /// Get the currently focused input
    pub fn focused_input(&mut self) -> &mut TextInput {
        match self.focused_field {
            ExpenseField::Amount => &mut self.amount_input,
            ExpenseField::Date => &mut self.date_input,
            ExpenseField::Category => &mut self.category_input,
        }
    }

    /// Validate the form into expense input
    pub fn build_input(&self) -> Result<NewExpense, String> {
        NewExpense::from_raw(
            self.amount_input.value(),
            self.date_input.value(),
            self.category_input.value(),
        )
        .map_err(|e| e.to_string())
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error_message = Some(msg.into());
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }
}

/// Render the expense dialog
pub fn render(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(60, 11, frame.area());
    frame.render_widget(Clear, area);

    let form = &app.expense_form;
    let title = if form.editing.is_some() {
        " Edit Expense "
    } else {
        " Add Expense "
    };

    let block = Block::default()
        .title(title)
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
            Constraint::Length(1), // Amount
            Constraint::Length(1), // Date
            Constraint::Length(1), // Category
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Error
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Hints
            Constraint::Min(0),
        ])
        .split(inner);

    frame.render_widget(form.amount_input.clone(), chunks[1]);
    frame.render_widget(form.date_input.clone(), chunks[2]);
    frame.render_widget(form.category_input.clone(), chunks[3]);

    if let Some(ref error) = form.error_message {
        let error_line = Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red),
        ));
        frame.render_widget(Paragraph::new(error_line), chunks[5]);
    }

    let hints = Line::from(vec![
        Span::styled("[Tab]", Style::default().fg(Color::Yellow)),
        Span::raw(" Next  "),
        Span::styled("[Shift+Tab]", Style::default().fg(Color::Yellow)),
        Span::raw(" Prev  "),
        Span::styled("[Enter]", Style::default().fg(Color::Green)),
        Span::raw(" Save  "),
        Span::styled("[Esc]", Style::default().fg(Color::Red)),
        Span::raw(" Cancel"),
    ]);
    frame.render_widget(Paragraph::new(hints), chunks[7]);
}

/// Handle key input for the expense dialog.
/// Returns true if the key was handled.
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    let form = &mut app.expense_form;

    match key.code {
        KeyCode::Esc => {
            app.close_dialog();
        }
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => form.prev_field(),
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
        KeyCode::Enter => {
            if let Err(e) = save_expense(app) {
                app.expense_form.set_error(e);
            }
        }
        KeyCode::Backspace => {
            form.clear_error();
            form.focused_input().backspace();
        }
        KeyCode::Delete => {
            form.clear_error();
            form.focused_input().delete();
        }
        KeyCode::Left => form.focused_input().move_left(),
        KeyCode::Right => form.focused_input().move_right(),
        KeyCode::Home => form.focused_input().move_start(),
        KeyCode::End => form.focused_input().move_end(),
        KeyCode::Char(c) => {
            form.clear_error();
            form.focused_input().insert(c);
        }
        _ => return false,
    }

    true
}

/// Save the form as a new or updated expense
fn save_expense(app: &mut App) -> Result<(), String> {
    let input = app.expense_form.build_input()?;
    let service = app
        .expense_service()
        .ok_or_else(|| "You must be signed in.".to_string())?;

    let message = match app.expense_form.editing {
        Some(id) => {
            let expense = service.update(id, input).map_err(|e| e.user_message())?;
            format!("Updated expense: {}", expense.id.short())
        }
        None => {
            let expense = service.create(input).map_err(|e| e.user_message())?;
            format!("Added expense: {}", expense.id.short())
        }
    };

    app.close_dialog();
    app.refresh();
    app.set_status(message);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::ExpensePaths;
    use crate::config::Settings;
    use crate::services::AuthService;
    use crate::storage::Storage;
    use crate::tui::app::ActiveDialog;
    use tempfile::TempDir;

    #[test]
    fn test_field_cycle() {
        let mut form = ExpenseFormState::new();
        assert!(form.amount_input.focused);
        form.next_field();
        form.next_field();
        assert_eq!(form.focused_field, ExpenseField::Category);
        form.next_field();
        assert_eq!(form.focused_field, ExpenseField::Amount);
        form.prev_field();
        assert!(form.category_input.focused);
    }

    #[test]
    fn test_missing_fields_rejected() {
        let form = ExpenseFormState::new();
        assert_eq!(form.build_input().unwrap_err(), "Amount is required");
    }

    #[test]
    fn test_save_adds_expense() {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            Storage::open(ExpensePaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let settings = Settings::default();
        AuthService::new(&storage, &settings)
            .sign_up("ana@example.com", "secret1")
            .unwrap();
        let mut app = App::new(&storage, &settings).unwrap();

        app.open_dialog(ActiveDialog::AddExpense);
        for c in "9.99".chars() {
            handle_key(&mut app, KeyEvent::from(KeyCode::Char(c)));
        }
        handle_key(&mut app, KeyEvent::from(KeyCode::Tab));
        handle_key(&mut app, KeyEvent::from(KeyCode::Tab));
        for c in "Books".chars() {
            handle_key(&mut app, KeyEvent::from(KeyCode::Char(c)));
        }
        handle_key(&mut app, KeyEvent::from(KeyCode::Enter));

        assert!(!app.has_dialog());
        assert_eq!(app.expenses.len(), 1);
        assert_eq!(app.expenses[0].category, "Books");
        assert_eq!(app.expenses[0].amount.to_string(), "9.99");
    }
}
