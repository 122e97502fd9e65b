//! Status bar view
//!
//! Shows the signed-in user, the last status message and key hints

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::app::{App, Screen};

/// Render the status bar
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let mut spans = vec![];

    let who = match (&app.user, app.is_demo()) {
        (_, true) => "demo".to_string(),
        (Some(user), false) => user.email.clone(),
        (None, false) => "not signed in".to_string(),
    };
    spans.push(Span::styled(format!(" {} ", who), Style::default().fg(Color::Cyan)));

    if let Some(ref message) = app.status_message {
        spans.push(Span::raw("│ "));
        spans.push(Span::styled(
            message.as_str(),
            Style::default().fg(Color::Yellow),
        ));
    }

    let hints = match app.screen {
        Screen::Login => " Tab:Field  Enter:Log in  Ctrl+N:Sign up  Esc:Quit ",
        Screen::Expenses => " a:Add e:Edit d:Del [/]:Month m:Now r:All x:Export i:Import p:Passwd L:Logout q:Quit ",
    };

    let left_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let padding_len = (area.width as usize).saturating_sub(left_len + hints.len());
    spans.push(Span::raw(" ".repeat(padding_len.max(1))));
    spans.push(Span::styled(hints, Style::default().fg(Color::White)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
