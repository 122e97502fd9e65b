//! TUI Views module
//!
//! The login screen, the expense list with its filter header, and the
//! status bar.

pub mod expenses;
pub mod login;
pub mod status_bar;

use ratatui::Frame;

use super::app::{ActiveDialog, App, Screen};
use super::dialogs;
use super::layout::AppLayout;

/// Render the entire application
pub fn render(frame: &mut Frame, app: &mut App) {
    let layout = AppLayout::new(frame.area());

    match app.screen {
        Screen::Login => {
            let area = layout.header.union(layout.main);
            login::render(frame, app, area);
        }
        Screen::Expenses => {
            expenses::render_header(frame, app, layout.header);
            expenses::render_table(frame, app, layout.main);
        }
    }

    status_bar::render(frame, app, layout.status_bar);

    if app.has_dialog() {
        render_dialog(frame, app);
    }
}

/// Render active dialog
fn render_dialog(frame: &mut Frame, app: &App) {
    match &app.active_dialog {
        ActiveDialog::AddExpense | ActiveDialog::EditExpense(_) => {
            dialogs::expense::render(frame, app);
        }
        ActiveDialog::ConfirmDelete(_) => {
            dialogs::confirm::render(frame, app);
        }
        ActiveDialog::ChangePassword => {
            dialogs::password::render(frame, app);
        }
        ActiveDialog::Import => {
            dialogs::import::render(frame, app);
        }
        ActiveDialog::None => {}
    }
}
