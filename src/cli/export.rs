//! CLI command for data export

use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Args;

use crate::config::Settings;
use crate::error::{ExpenseError, ExpenseResult};
use crate::export::{export_expenses_json, export_to_file};
use crate::services::{AuthService, ExpenseFilter, ExpenseService};
use crate::storage::Storage;

/// Arguments for `expenses export`
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output file; "-" writes to stdout. Defaults to
    /// expense_tracker_backup_YYYY-MM-DD.json in the current directory.
    pub output: Option<PathBuf>,
}

/// Export every expense of the signed-in user as JSON
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    args: ExportArgs,
) -> ExpenseResult<()> {
    let user = AuthService::new(storage, settings).require_user()?;
    let expenses = ExpenseService::new(storage, user.id).list(ExpenseFilter::all())?;

    if args.output.as_deref() == Some(std::path::Path::new("-")) {
        let stdout = std::io::stdout();
        let mut writer = BufWriter::new(stdout.lock());
        export_expenses_json(&expenses, &mut writer)?;
        return writer
            .flush()
            .map_err(|e| ExpenseError::Export(e.to_string()));
    }

    let cwd = std::env::current_dir()
        .map_err(|e| ExpenseError::Export(format!("Cannot determine current directory: {}", e)))?;
    let today = chrono::Local::now().date_naive();

    let path = export_to_file(&expenses, args.output.as_deref(), &cwd, today)?;
    println!(
        "Exported {} expenses to {}",
        expenses.len(),
        path.display()
    );

    Ok(())
}
