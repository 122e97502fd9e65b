//! JSON export
//!
//! Writes the signed-in user's expenses as a pretty-printed JSON array of
//! `{ id, owner, amount, date, category }` objects. The import service
//! accepts the same shape, so an export can be re-imported as-is.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Expense, ExpenseId, Money, NewExpense, UserId};

/// One exported record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedExpense {
    #[serde(default)]
    pub id: ExpenseId,
    #[serde(default, alias = "uid")]
    pub owner: UserId,
    pub amount: Money,
    pub date: NaiveDate,
    pub category: String,
}

impl From<&Expense> for ExportedExpense {
    fn from(expense: &Expense) -> Self {
        Self {
            id: expense.id,
            owner: expense.owner,
            amount: expense.amount,
            date: expense.date,
            category: expense.category.clone(),
        }
    }
}

impl ExportedExpense {
    /// Turn the record back into an expense with fresh timestamps
    pub fn into_expense(self) -> Expense {
        let input = NewExpense {
            amount: self.amount,
            date: self.date,
            category: self.category,
        };
        Expense::with_id(self.id, self.owner, input)
    }
}

/// `expense_tracker_backup_YYYY-MM-DD.json` for the given day
pub fn default_export_filename(today: NaiveDate) -> String {
    format!("expense_tracker_backup_{}.json", today.format("%Y-%m-%d"))
}

/// Write expenses to `writer`
pub fn export_expenses_json<W: Write>(expenses: &[Expense], writer: &mut W) -> ExpenseResult<()> {
    let records: Vec<ExportedExpense> = expenses.iter().map(ExportedExpense::from).collect();

    serde_json::to_writer_pretty(&mut *writer, &records)
        .map_err(|e| ExpenseError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| ExpenseError::Export(e.to_string()))?;

    Ok(())
}

/// Write expenses to a file, choosing the default name inside `dir` when no
/// explicit path is given. Returns the path written.
pub fn export_to_file(
    expenses: &[Expense],
    path: Option<&Path>,
    dir: &Path,
    today: NaiveDate,
) -> ExpenseResult<PathBuf> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => dir.join(default_export_filename(today)),
    };

    let mut file = std::fs::File::create(&path).map_err(|e| {
        ExpenseError::Export(format!("Failed to create {}: {}", path.display(), e))
    })?;
    export_expenses_json(expenses, &mut file)?;

    Ok(path)
}

/// Read an exported file back into expenses, newest first
pub fn load_expenses_json(path: &Path) -> ExpenseResult<Vec<Expense>> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        ExpenseError::Import(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let records: Vec<ExportedExpense> = serde_json::from_str(&text)?;

    let mut expenses: Vec<Expense> = records
        .into_iter()
        .map(ExportedExpense::into_expense)
        .collect();
    expenses.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(expenses)
}
