//! Expense CLI commands
//!
//! Implements CLI commands for recording and managing expenses. Every
//! command runs as the signed-in user.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_expense_details, format_expense_list};
use crate::error::ExpenseResult;
use crate::models::{Month, NewExpense};
use crate::services::{AuthService, ExpenseFilter, ExpenseService};
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a new expense
    Add {
        /// Amount (e.g. "12.50")
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Date (YYYY-MM-DD)
        date: String,
        /// Category label
        category: String,
    },
    /// List expenses (current month unless told otherwise)
    #[command(alias = "ls")]
    List {
        /// Only expenses in this month (YYYY-MM)
        #[arg(short, long, conflicts_with = "all")]
        month: Option<String>,
        /// List every expense
        #[arg(short, long)]
        all: bool,
    },
    /// Show expense details
    Show {
        /// Expense ID (full or short form)
        id: String,
    },
    /// Edit an expense
    Edit {
        /// Expense ID (full or short form)
        id: String,
        /// New amount
        #[arg(long, allow_hyphen_values = true)]
        amount: Option<String>,
        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// New category
        #[arg(long)]
        category: Option<String>,
    },
    /// Delete an expense
    #[command(alias = "rm")]
    Delete {
        /// Expense ID (full or short form)
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> ExpenseResult<()> {
    let user = AuthService::new(storage, settings).require_user()?;
    let service = ExpenseService::new(storage, user.id);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        ExpenseCommands::Add {
            amount,
            date,
            category,
        } => {
            let input = NewExpense::from_raw(&amount, &date, &category)?;
            let expense = service.create(input)?;

            println!("Added expense: {}", expense.id.short());
            println!("  Date:     {}", expense.date);
            println!("  Amount:   {}", expense.amount.format_with_symbol(symbol));
            println!("  Category: {}", expense.category);
        }

        ExpenseCommands::List { month, all } => {
            let filter = match month {
                Some(month) => ExpenseFilter::month(
                    month
                        .parse::<Month>()
                        .map_err(|e| crate::error::ExpenseError::Validation(e.to_string()))?,
                ),
                None if all || !settings.default_to_current_month => ExpenseFilter::all(),
                None => ExpenseFilter::month(Month::current()),
            };

            match filter.month {
                Some(month) => println!("Expenses for {}", month),
                None => println!("All expenses"),
            }
            println!();

            let expenses = service.list(filter)?;
            println!("{}", format_expense_list(&expenses, settings));
        }

        ExpenseCommands::Show { id } => {
            let expense = service.resolve(&id)?;
            print!("{}", format_expense_details(&expense, settings));
        }

        ExpenseCommands::Edit {
            id,
            amount,
            date,
            category,
        } => {
            let expense = service.resolve(&id)?;

            if amount.is_none() && date.is_none() && category.is_none() {
                println!("No changes specified. Use --amount, --date or --category.");
                return Ok(());
            }

            let input = NewExpense::from_raw(
                &amount.unwrap_or_else(|| expense.amount.to_string()),
                &date.unwrap_or_else(|| expense.date.to_string()),
                &category.unwrap_or_else(|| expense.category.clone()),
            )?;

            let updated = service.update(expense.id, input)?;
            println!("Updated expense: {}", updated.id.short());
            print!("{}", format_expense_details(&updated, settings));
        }

        ExpenseCommands::Delete { id, force } => {
            let expense = service.resolve(&id)?;

            if !force {
                println!("About to delete expense:");
                println!("  Date:     {}", expense.date);
                println!("  Amount:   {}", expense.amount.format_with_symbol(symbol));
                println!("  Category: {}", expense.category);
                println!();
                println!("Use --force to confirm deletion");
                return Ok(());
            }

            let deleted = service.delete(expense.id)?;
            println!(
                "Deleted expense: {} ({} {})",
                deleted.id.short(),
                deleted.date,
                deleted.category
            );
        }
    }

    Ok(())
}
