//! Application state for the TUI
//!
//! The App struct holds all state needed for rendering and handling events.

use crate::config::Settings;
use crate::error::ExpenseResult;
use crate::models::{Expense, ExpenseId, Month, User};
use crate::services::{AuthService, ExpenseFilter, ExpenseService, ExpenseSummary};
use crate::storage::Storage;

use super::dialogs::expense::ExpenseFormState;
use super::dialogs::import::ImportDialogState;
use super::dialogs::password::PasswordFormState;
use super::views::login::LoginFormState;

/// Which screen is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Login,
    Expenses,
}

/// Currently active dialog (if any)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveDialog {
    #[default]
    None,
    AddExpense,
    EditExpense(ExpenseId),
    ConfirmDelete(ExpenseId),
    ChangePassword,
    Import,
}

/// Main application state
pub struct App<'a> {
    /// The storage layer
    pub storage: &'a Storage,

    /// Application settings
    pub settings: &'a Settings,

    /// Whether the app should quit
    pub should_quit: bool,

    pub screen: Screen,

    /// Signed-in user
    pub user: Option<User>,

    /// Read-only expenses loaded with `--demo`
    pub demo: Option<Vec<Expense>>,

    /// Month filter; `None` lists everything
    pub filter_month: Option<Month>,

    /// Expenses currently listed, newest first
    pub expenses: Vec<Expense>,

    /// Selected row in the expense table
    pub selected_index: usize,

    /// Currently active dialog
    pub active_dialog: ActiveDialog,

    /// Status message to display
    pub status_message: Option<String>,

    pub login_form: LoginFormState,
    pub expense_form: ExpenseFormState,
    pub password_form: PasswordFormState,
    pub import_state: ImportDialogState,
}

impl<'a> App<'a> {
    /// Create the app, resuming a saved session if there is one
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> ExpenseResult<Self> {
        let mut app = Self::blank(storage, settings);
        if let Some(user) = AuthService::new(storage, settings).current_user()? {
            app.enter_expenses(user);
        }
        Ok(app)
    }

    /// Create a read-only app over the given expenses
    pub fn with_demo(storage: &'a Storage, settings: &'a Settings, expenses: Vec<Expense>) -> Self {
        let mut app = Self::blank(storage, settings);
        app.demo = Some(expenses);
        app.screen = Screen::Expenses;
        app.refresh();
        app.set_status("Demo mode: changes are disabled.");
        app
    }

    fn blank(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self {
            storage,
            settings,
            should_quit: false,
            screen: Screen::default(),
            user: None,
            demo: None,
            filter_month: None,
            expenses: Vec::new(),
            selected_index: 0,
            active_dialog: ActiveDialog::default(),
            status_message: None,
            login_form: LoginFormState::new(),
            expense_form: ExpenseFormState::new(),
            password_form: PasswordFormState::new(),
            import_state: ImportDialogState::new(),
        }
    }

    /// Request to quit the application
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Set a status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear the status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn is_demo(&self) -> bool {
        self.demo.is_some()
    }

    /// Refuse `action` in demo mode, leaving a status message.
    ///
    /// Returns true when the action may proceed.
    pub fn ensure_writable(&mut self, action: &str) -> bool {
        if self.is_demo() {
            self.set_status(format!("{} is disabled in demo mode.", action));
            return false;
        }
        true
    }

    /// Switch to the expense screen for a signed-in user
    pub fn enter_expenses(&mut self, user: User) {
        self.user = Some(user);
        self.screen = Screen::Expenses;
        self.filter_month = if self.settings.default_to_current_month {
            Some(Month::current())
        } else {
            None
        };
        self.selected_index = 0;
        self.login_form = LoginFormState::new();
        self.refresh();
    }

    /// Drop back to the login screen
    pub fn leave_expenses(&mut self) {
        self.user = None;
        self.screen = Screen::Login;
        self.expenses.clear();
        self.selected_index = 0;
        self.close_dialog();
    }

    /// Service for the signed-in user's expenses
    pub fn expense_service(&self) -> Option<ExpenseService<'a>> {
        self.user
            .as_ref()
            .map(|user| ExpenseService::new(self.storage, user.id))
    }

    /// Reload the listed expenses for the current filter
    pub fn refresh(&mut self) {
        let filter = match self.filter_month {
            Some(month) => ExpenseFilter::month(month),
            None => ExpenseFilter::all(),
        };

        if let Some(demo) = &self.demo {
            self.expenses = demo
                .iter()
                .filter(|e| filter.month.map_or(true, |m| m.contains(e.date)))
                .cloned()
                .collect();
        } else if let Some(service) = self.expense_service() {
            match service.list(filter) {
                Ok(expenses) => self.expenses = expenses,
                Err(e) => {
                    self.expenses.clear();
                    self.set_status(e.user_message());
                }
            }
        } else {
            self.expenses.clear();
        }

        self.selected_index = self
            .selected_index
            .min(self.expenses.len().saturating_sub(1));
    }

    /// Count and total of the listed expenses
    pub fn summary(&self) -> ExpenseSummary {
        ExpenseService::summarize(&self.expenses)
    }

    pub fn selected_expense(&self) -> Option<&Expense> {
        self.expenses.get(self.selected_index)
    }

    /// Step the month filter back; from "all" this starts at the current month
    pub fn prev_month(&mut self) {
        self.filter_month = Some(self.filter_month.unwrap_or_else(Month::current).prev());
        self.selected_index = 0;
        self.refresh();
    }

    pub fn next_month(&mut self) {
        self.filter_month = Some(self.filter_month.unwrap_or_else(Month::current).next());
        self.selected_index = 0;
        self.refresh();
    }

    pub fn current_month(&mut self) {
        self.filter_month = Some(Month::current());
        self.selected_index = 0;
        self.refresh();
    }

    /// Reset the filter to list everything
    pub fn show_all(&mut self) {
        self.filter_month = None;
        self.selected_index = 0;
        self.refresh();
    }

    /// Open a dialog
    pub fn open_dialog(&mut self, dialog: ActiveDialog) {
        match &dialog {
            ActiveDialog::AddExpense => {
                self.expense_form = ExpenseFormState::new();
            }
            ActiveDialog::EditExpense(id) => {
                if let Some(expense) = self.expenses.iter().find(|e| e.id == *id) {
                    self.expense_form = ExpenseFormState::from_expense(expense);
                }
            }
            ActiveDialog::ChangePassword => {
                self.password_form = PasswordFormState::new();
            }
            ActiveDialog::Import => {
                self.import_state = ImportDialogState::new();
            }
            ActiveDialog::ConfirmDelete(_) | ActiveDialog::None => {}
        }
        self.active_dialog = dialog;
    }

    /// Close the current dialog
    pub fn close_dialog(&mut self) {
        self.active_dialog = ActiveDialog::None;
    }

    /// Check if a dialog is active
    pub fn has_dialog(&self) -> bool {
        !matches!(self.active_dialog, ActiveDialog::None)
    }

    pub fn move_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected_index + 1 < self.expenses.len() {
            self.selected_index += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::ExpensePaths;
    use crate::models::{NewExpense, UserId};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ExpensePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn demo_expenses() -> Vec<Expense> {
        let owner = UserId::new();
        vec![
            Expense::new(owner, NewExpense::from_raw("5", "2025-01-10", "Lunch").unwrap()),
            Expense::new(owner, NewExpense::from_raw("7", "2024-12-31", "Gift").unwrap()),
        ]
    }

    #[test]
    fn test_starts_on_login_without_session() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let app = App::new(&storage, &settings).unwrap();
        assert_eq!(app.screen, Screen::Login);
        assert!(app.user.is_none());
    }

    #[test]
    fn test_resumes_saved_session() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        AuthService::new(&storage, &settings)
            .sign_up("ana@example.com", "secret1")
            .unwrap();

        let app = App::new(&storage, &settings).unwrap();
        assert_eq!(app.screen, Screen::Expenses);
        assert_eq!(app.filter_month, Some(Month::current()));
    }

    #[test]
    fn test_demo_month_navigation() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let mut app = App::with_demo(&storage, &settings, demo_expenses());
        assert_eq!(app.expenses.len(), 2);

        app.filter_month = Some(Month::new(2024, 12).unwrap());
        app.refresh();
        assert_eq!(app.expenses.len(), 1);
        assert_eq!(app.expenses[0].category, "Gift");

        app.next_month();
        assert_eq!(app.filter_month, Some(Month::new(2025, 1).unwrap()));
        assert_eq!(app.expenses[0].category, "Lunch");

        app.show_all();
        assert_eq!(app.summary().count, 2);
    }

    #[test]
    fn test_demo_refuses_writes() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let mut app = App::with_demo(&storage, &settings, demo_expenses());

        assert!(!app.ensure_writable("Adding expenses"));
        assert_eq!(
            app.status_message.as_deref(),
            Some("Adding expenses is disabled in demo mode.")
        );
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let mut app = App::with_demo(&storage, &settings, demo_expenses());

        app.move_down();
        app.move_down();
        assert_eq!(app.selected_index, 1);

        app.filter_month = Some(Month::new(2025, 1).unwrap());
        app.refresh();
        assert_eq!(app.selected_index, 0);
        app.move_up();
        assert_eq!(app.selected_index, 0);
    }
}
