//! Delete confirmation dialog

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::app::{ActiveDialog, App};
use crate::tui::layout::centered_rect_fixed;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this expense?";

/// Render the delete confirmation for the pending expense
pub fn render(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(54, 8, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Delete expense ")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let pending = match app.active_dialog {
        ActiveDialog::ConfirmDelete(id) => app.expenses.iter().find(|e| e.id == id),
        _ => None,
    };
    let detail = pending
        .map(|e| {
            format!(
                "{}  {}  {}",
                app.settings.format_date(e.date),
                e.amount.format_with_symbol(&app.settings.currency_symbol),
                e.category
            )
        })
        .unwrap_or_default();

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(DELETE_PROMPT, Style::default().fg(Color::White))),
        Line::from(Span::styled(detail, Style::default().fg(Color::Cyan))),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Y]", Style::default().fg(Color::Green)),
            Span::raw(" Yes  "),
            Span::styled("[N]", Style::default().fg(Color::Red)),
            Span::raw(" No  "),
            Span::styled("[Esc]", Style::default().fg(Color::Yellow)),
            Span::raw(" Cancel"),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}
