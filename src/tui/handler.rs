//! Event handler for the TUI
//!
//! Routes keyboard events to the active dialog, the login form or the expense
//! screen.

use anyhow::Result;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::export::export_to_file;
use crate::models::ExpenseId;
use crate::services::{AuthService, ExpenseFilter};

use super::app::{ActiveDialog, App, Screen};
use super::dialogs;
use super::event::Event;
use super::views::login;

/// Handle an incoming event
pub fn handle_event(app: &mut App, event: Event) -> Result<()> {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Resize(_, _) | Event::Tick => Ok(()),
    }
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return Ok(());
    }

    if app.has_dialog() {
        handle_dialog_key(app, key);
        return Ok(());
    }

    match app.screen {
        Screen::Login => login::handle_key(app, key),
        Screen::Expenses => handle_expense_key(app, key),
    }
    Ok(())
}

/// Handle keys on the expense screen
fn handle_expense_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),

        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Home | KeyCode::Char('g') => app.selected_index = 0,
        KeyCode::End | KeyCode::Char('G') => {
            app.selected_index = app.expenses.len().saturating_sub(1);
        }

        // Month filter
        KeyCode::Char('[') | KeyCode::Left => app.prev_month(),
        KeyCode::Char(']') | KeyCode::Right => app.next_month(),
        KeyCode::Char('m') => app.current_month(),
        KeyCode::Char('r') => app.show_all(),

        KeyCode::Char('a') => {
            if app.ensure_writable("Adding expenses") {
                app.open_dialog(ActiveDialog::AddExpense);
            }
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            if app.ensure_writable("Editing expenses") {
                if let Some(id) = selected_id(app) {
                    app.open_dialog(ActiveDialog::EditExpense(id));
                }
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if app.ensure_writable("Deleting expenses") {
                if let Some(id) = selected_id(app) {
                    app.open_dialog(ActiveDialog::ConfirmDelete(id));
                }
            }
        }
        KeyCode::Char('x') => {
            if app.ensure_writable("Export") {
                export(app);
            }
        }
        KeyCode::Char('i') => {
            if app.ensure_writable("Import") {
                app.open_dialog(ActiveDialog::Import);
            }
        }
        KeyCode::Char('p') => {
            if app.ensure_writable("Password update") {
                app.open_dialog(ActiveDialog::ChangePassword);
            }
        }
        KeyCode::Char('L') => {
            if app.is_demo() {
                app.quit();
            } else {
                sign_out(app);
            }
        }

        _ => {}
    }
}

/// Handle keys while a dialog is open
fn handle_dialog_key(app: &mut App, key: KeyEvent) {
    match app.active_dialog {
        ActiveDialog::AddExpense | ActiveDialog::EditExpense(_) => {
            dialogs::expense::handle_key(app, key);
        }
        ActiveDialog::ConfirmDelete(id) => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.close_dialog();
                delete_expense(app, id);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.close_dialog();
            }
            _ => {}
        },
        ActiveDialog::ChangePassword => {
            dialogs::password::handle_key(app, key);
        }
        ActiveDialog::Import => {
            dialogs::import::handle_key(app, key);
        }
        ActiveDialog::None => {}
    }
}

fn selected_id(app: &App) -> Option<ExpenseId> {
    app.selected_expense().map(|e| e.id)
}

fn delete_expense(app: &mut App, id: ExpenseId) {
    let Some(service) = app.expense_service() else {
        return;
    };

    match service.delete(id) {
        Ok(deleted) => {
            app.refresh();
            app.set_status(format!(
                "Deleted expense: {} ({} {})",
                deleted.id.short(),
                deleted.date,
                deleted.category
            ));
        }
        Err(e) => app.set_status(e.user_message()),
    }
}

/// Export every expense of the user to the default file in the working directory
fn export(app: &mut App) {
    let Some(service) = app.expense_service() else {
        return;
    };

    let result = service.list(ExpenseFilter::all()).and_then(|expenses| {
        let dir = std::env::current_dir()?;
        let path = export_to_file(&expenses, None, &dir, Local::now().date_naive())?;
        Ok((expenses.len(), path))
    });

    match result {
        Ok((count, path)) => {
            app.set_status(format!("Exported {} expenses to {}", count, path.display()));
        }
        Err(e) => app.set_status(format!("Error exporting data: {}", e.user_message())),
    }
}

fn sign_out(app: &mut App) {
    match AuthService::new(app.storage, app.settings).sign_out() {
        Ok(_) => {
            app.leave_expenses();
            app.set_status("Signed out.");
        }
        Err(e) => app.set_status(e.user_message()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::ExpensePaths;
    use crate::config::Settings;
    use crate::models::{Expense, Month, NewExpense, UserId};
    use crate::storage::Storage;
    use tempfile::TempDir;

    fn press(app: &mut App, code: KeyCode) {
        handle_event(app, Event::Key(KeyEvent::from(code))).unwrap();
    }

    fn signed_in_storage() -> (TempDir, Storage, Settings) {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            Storage::open(ExpensePaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let settings = Settings::default();
        AuthService::new(&storage, &settings)
            .sign_up("ana@example.com", "secret1")
            .unwrap();
        (temp_dir, storage, settings)
    }

    #[test]
    fn test_month_keys() {
        let (_temp_dir, storage, settings) = signed_in_storage();
        let mut app = App::new(&storage, &settings).unwrap();
        let now = Month::current();

        press(&mut app, KeyCode::Char('['));
        assert_eq!(app.filter_month, Some(now.prev()));
        press(&mut app, KeyCode::Char(']'));
        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.filter_month, Some(now.next()));
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.filter_month, None);
        press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.filter_month, Some(now));
    }

    #[test]
    fn test_delete_with_confirmation() {
        let (_temp_dir, storage, settings) = signed_in_storage();
        let mut app = App::new(&storage, &settings).unwrap();
        let service = app.expense_service().unwrap();
        let today = Local::now().date_naive().to_string();
        service
            .create(NewExpense::from_raw("4", &today, "Snacks").unwrap())
            .unwrap();
        app.refresh();

        press(&mut app, KeyCode::Char('d'));
        assert!(matches!(app.active_dialog, ActiveDialog::ConfirmDelete(_)));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.expenses.len(), 1);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.expenses.is_empty());
        assert!(app.status_message.unwrap().starts_with("Deleted expense"));
    }

    #[test]
    fn test_sign_out_returns_to_login() {
        let (_temp_dir, storage, settings) = signed_in_storage();
        let mut app = App::new(&storage, &settings).unwrap();

        press(&mut app, KeyCode::Char('L'));

        assert_eq!(app.screen, Screen::Login);
        assert!(app.user.is_none());
        assert!(AuthService::new(&storage, &settings)
            .current_user()
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_demo_mode_refuses_mutations() {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            Storage::open(ExpensePaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let settings = Settings::default();
        let expense = Expense::new(
            UserId::new(),
            NewExpense::from_raw("1", "2025-01-01", "Gum").unwrap(),
        );
        let mut app = App::with_demo(&storage, &settings, vec![expense]);

        press(&mut app, KeyCode::Char('a'));
        assert!(!app.has_dialog());
        assert_eq!(
            app.status_message.as_deref(),
            Some("Adding expenses is disabled in demo mode.")
        );

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(
            app.status_message.as_deref(),
            Some("Deleting expenses is disabled in demo mode.")
        );

        press(&mut app, KeyCode::Char('x'));
        assert_eq!(
            app.status_message.as_deref(),
            Some("Export is disabled in demo mode.")
        );
        assert_eq!(app.expenses.len(), 1);
    }

    #[test]
    fn test_ctrl_c_quits_from_login() {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            Storage::open(ExpensePaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let settings = Settings::default();
        let mut app = App::new(&storage, &settings).unwrap();

        handle_event(
            &mut app,
            Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        )
        .unwrap();
        assert!(app.should_quit);
    }
}
