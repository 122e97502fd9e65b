//! Import dialog
//!
//! Asks for the path of a JSON export and imports it for the signed-in user.

use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::services::ImportService;
use crate::tui::app::App;
use crate::tui::layout::centered_rect_fixed;
use crate::tui::widgets::TextInput;

/// State for the import dialog
#[derive(Debug, Clone)]
pub struct ImportDialogState {
    pub path_input: TextInput,
    pub error_message: Option<String>,
}

impl Default for ImportDialogState {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportDialogState {
    pub fn new() -> Self {
        let mut path_input = TextInput::new()
            .label("File")
            .placeholder("expense_tracker_backup_YYYY-MM-DD.json");
        path_input.focused = true;
        Self {
            path_input,
            error_message: None,
        }
    }
}

/// Render the import dialog
pub fn render(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(64, 8, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Import Expenses ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, area);

    let row = |offset: u16| Rect {
        x: area.x + 2,
        y: area.y + offset,
        width: area.width.saturating_sub(4),
        height: 1,
    };

    let state = &app.import_state;
    frame.render_widget(state.path_input.clone(), row(2));

    if let Some(ref error) = state.error_message {
        frame.render_widget(
            Paragraph::new(Span::styled(error.as_str(), Style::default().fg(Color::Red))),
            row(4),
        );
    }

    let hints = Line::from(vec![
        Span::styled("[Enter]", Style::default().fg(Color::Green)),
        Span::raw(" Import  "),
        Span::styled("[Esc]", Style::default().fg(Color::Red)),
        Span::raw(" Cancel"),
    ]);
    frame.render_widget(Paragraph::new(hints), row(6));
}

/// Handle key input for the import dialog
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    let input = &mut app.import_state.path_input;

    match key.code {
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Enter => submit(app),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_start(),
        KeyCode::End => input.move_end(),
        KeyCode::Char(c) => {
            app.import_state.error_message = None;
            app.import_state.path_input.insert(c);
        }
        _ => return false,
    }

    true
}

fn submit(app: &mut App) {
    let path = app.import_state.path_input.value().trim().to_string();
    if path.is_empty() {
        app.import_state.error_message = Some("Enter the path of a JSON file.".into());
        return;
    }

    match import_file(app, Path::new(&path)) {
        Ok(message) => {
            app.close_dialog();
            app.refresh();
            app.set_status(message);
        }
        Err(message) => {
            app.import_state.error_message = Some(format!("Error importing data: {}", message));
        }
    }
}

fn import_file(app: &App, path: &Path) -> Result<String, String> {
    let user = app
        .user
        .as_ref()
        .ok_or_else(|| "You must be signed in.".to_string())?;
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    let result = ImportService::new(app.storage, user.id)
        .import_json(&text)
        .map_err(|e| e.user_message())?;

    let mut message = result.message();
    if !result.skipped.is_empty() {
        message.push_str(&format!(" Skipped {}.", result.skipped.len()));
    }
    if result.audit_error.is_some() {
        message.push_str(" (audit log not written)");
    }
    Ok(message)
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
    fn test_import_from_path() {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            Storage::open(ExpensePaths::with_base_dir(temp_dir.path().join("data"))).unwrap();
        let settings = Settings::default();
        AuthService::new(&storage, &settings)
            .sign_up("ana@example.com", "secret1")
            .unwrap();
        let mut app = App::new(&storage, &settings).unwrap();
        app.show_all();

        let file = temp_dir.path().join("backup.json");
        std::fs::write(
            &file,
            r#"[{"amount": "3.50", "date": "2024-05-01", "category": "Tea"},
                {"amount": "", "date": "2024-05-02", "category": "Skip"}]"#,
        )
        .unwrap();

        app.open_dialog(ActiveDialog::Import);
        for c in file.to_string_lossy().chars() {
            handle_key(&mut app, KeyEvent::from(KeyCode::Char(c)));
        }
        handle_key(&mut app, KeyEvent::from(KeyCode::Enter));

        assert!(!app.has_dialog());
        assert_eq!(app.expenses.len(), 1);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Successfully imported 1 expenses. Skipped 1.")
        );
    }

    #[test]
    fn test_missing_file_keeps_dialog_open() {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            Storage::open(ExpensePaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let settings = Settings::default();
        AuthService::new(&storage, &settings)
            .sign_up("ana@example.com", "secret1")
            .unwrap();
        let mut app = App::new(&storage, &settings).unwrap();

        app.open_dialog(ActiveDialog::Import);
        for c in "no-such-file.json".chars() {
            handle_key(&mut app, KeyEvent::from(KeyCode::Char(c)));
        }
        handle_key(&mut app, KeyEvent::from(KeyCode::Enter));

        assert_eq!(app.active_dialog, ActiveDialog::Import);
        assert!(app
            .import_state
            .error_message
            .as_deref()
            .unwrap()
            .starts_with("Error importing data: Failed to read"));
    }
}
