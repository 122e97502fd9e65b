//! Expense display formatting
//!
//! Formats expenses for terminal output in table and detail views.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::config::Settings;
use crate::models::{Expense, Money};

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "ID")]
    id: String,
}

/// Format expenses as a table followed by their total
pub fn format_expense_list(expenses: &[Expense], settings: &Settings) -> String {
    let symbol = settings.currency_symbol.as_str();
    if expenses.is_empty() {
        return "No expenses found.".to_string();
    }

    let rows = expenses.iter().map(|e| ExpenseRow {
        date: settings.format_date(e.date),
        amount: e.amount.format_with_symbol(symbol),
        category: e.category.clone(),
        id: e.id.short(),
    });

    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .with(Modify::new(Columns::single(1)).with(Alignment::right()));

    let total: Money = expenses.iter().map(|e| e.amount).sum();
    format!(
        "{}\n\nTotal: {} ({} expense{})",
        table,
        total.format_with_symbol(symbol),
        expenses.len(),
        if expenses.len() == 1 { "" } else { "s" }
    )
}

/// Format a single expense for display
pub fn format_expense_details(expense: &Expense, settings: &Settings) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense:  {}\n", expense.id));
    output.push_str(&format!(
        "Date:     {}\n",
        settings.format_date(expense.date)
    ));
    output.push_str(&format!(
        "Amount:   {}\n",
        expense.amount.format_with_symbol(&settings.currency_symbol)
    ));
    output.push_str(&format!("Category: {}\n", expense.category));
    output.push_str(&format!(
        "Created:  {}\n",
        expense.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if expense.updated_at != expense.created_at {
        output.push_str(&format!(
            "Updated:  {}\n",
            expense.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }

    output
}
