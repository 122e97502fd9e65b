//! Expense list view
//!
//! Month filter header with the total of the listed expenses, and the expense
//! table newest first.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::tui::app::App;

/// Render the filter header
pub fn render_header(frame: &mut Frame, app: &mut App, area: Rect) {
    let symbol = app.settings.currency_symbol.as_str();
    let summary = app.summary();

    let filter_label = match app.filter_month {
        Some(month) => month.to_string(),
        None => "All months".to_string(),
    };

    let title = match (&app.user, app.is_demo()) {
        (_, true) => " Expenses (demo) ".to_string(),
        (Some(user), false) => format!(" Expenses - {} ", user.email),
        (None, false) => " Expenses ".to_string(),
    };

    let block = Block::default()
        .title(title)
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let line = Line::from(vec![
        Span::styled("Month: ", Style::default().fg(Color::White)),
        Span::styled(
            filter_label,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  │  "),
        Span::styled("Total: ", Style::default().fg(Color::White)),
        Span::styled(
            summary.total.format_with_symbol(symbol),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" ({} expense{})", summary.count, if summary.count == 1 { "" } else { "s" }),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Render the expense table
pub fn render_table(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if app.expenses.is_empty() {
        let text = Paragraph::new("No expenses. Press 'a' to add one.")
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(text, area);
        return;
    }

    let widths = [
        Constraint::Length(12), // Date
        Constraint::Length(14), // Amount
        Constraint::Min(12),    // Category
        Constraint::Length(14), // ID
    ];

    let header = Row::new(vec![
        Cell::from("Date"),
        Cell::from("Amount"),
        Cell::from("Category"),
        Cell::from("ID"),
    ])
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
    .height(1);

    let symbol = app.settings.currency_symbol.as_str();
    let rows: Vec<Row> = app
        .expenses
        .iter()
        .map(|expense| {
            Row::new(vec![
                Cell::from(app.settings.format_date(expense.date)),
                Cell::from(expense.amount.format_with_symbol(symbol))
                    .style(Style::default().fg(Color::Red)),
                Cell::from(truncate_string(&expense.category, 40)),
                Cell::from(expense.id.short()).style(Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(app.selected_index));

    frame.render_stateful_widget(table, area, &mut state);
}

/// Truncate a string to at most `max_len` characters
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Food", 10), "Food");
        assert_eq!(truncate_string("Groceries", 5), "Groc…");
        assert_eq!(truncate_string("Café au lait", 5), "Café…");
    }
}
