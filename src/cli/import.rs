//! CLI command for importing a JSON export

use std::io::Read;

use clap::Args;

use crate::config::Settings;
use crate::error::{ExpenseError, ExpenseResult};
use crate::services::{AuthService, ImportService};
use crate::storage::Storage;

/// Arguments for `expenses import`
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// JSON file to import, or "-" to read from stdin
    pub source: String,
}

/// Import expenses for the signed-in user
pub fn handle_import_command(
    storage: &Storage,
    settings: &Settings,
    args: ImportArgs,
) -> ExpenseResult<()> {
    let user = AuthService::new(storage, settings).require_user()?;

    let text = if args.source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| ExpenseError::Import(format!("Failed to read stdin: {}", e)))?;
        text
    } else {
        std::fs::read_to_string(&args.source)
            .map_err(|e| ExpenseError::Import(format!("Failed to read {}: {}", args.source, e)))?
    };

    let result = ImportService::new(storage, user.id).import_json(&text)?;

    println!("{}", result.message());
    if !result.skipped.is_empty() {
        println!("Skipped {} records:", result.skipped.len());
        for skipped in &result.skipped {
            println!("  #{}: {}", skipped.index + 1, skipped.reason);
        }
    }
    if let Some(err) = &result.audit_error {
        eprintln!("Warning: could not write the audit log: {}", err);
    }

    Ok(())
}
