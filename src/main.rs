use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use expense_tracker::cli::{
    handle_audit_command, handle_auth_command, handle_expense_command, handle_export_command,
    handle_import_command, AuditArgs, AuthCommands, ExpenseCommands, ExportArgs, ImportArgs,
};
use expense_tracker::config::{ExpensePaths, Settings};
use expense_tracker::export::load_expenses_json;
use expense_tracker::storage::Storage;
use expense_tracker::ExpenseError;

#[derive(Parser)]
#[command(
    name = "expenses",
    version,
    about = "Personal expense tracker",
    long_about = "Record expenses, filter them by month, and back them up as JSON. \
                  Every expense belongs to the signed-in account."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign up, log in and manage your password
    #[command(subcommand)]
    Auth(AuthCommands),

    /// Expense management commands
    #[command(subcommand, alias = "exp")]
    Expense(ExpenseCommands),

    /// Export your expenses as JSON
    Export(ExportArgs),

    /// Import expenses from a JSON export
    Import(ImportArgs),

    /// Launch the interactive TUI
    #[command(alias = "ui")]
    Tui {
        /// Show expenses from a JSON file read-only, without signing in
        #[arg(long, value_name = "FILE")]
        demo: Option<PathBuf>,
    },

    /// Show current configuration and paths
    Config,

    /// Show recent audit log entries
    Audit(AuditArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        match err.downcast_ref::<ExpenseError>() {
            Some(e) => eprintln!("Error: {}", e.user_message()),
            None => eprintln!("Error: {:#}", err),
        }
        std::process::exit(1);
    }

    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let paths = ExpensePaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let storage = Storage::open(paths.clone())?;

    match cli.command {
        Some(Commands::Auth(cmd)) => handle_auth_command(&storage, &settings, cmd)?,
        Some(Commands::Expense(cmd)) => handle_expense_command(&storage, &settings, cmd)?,
        Some(Commands::Export(args)) => handle_export_command(&storage, &settings, args)?,
        Some(Commands::Import(args)) => handle_import_command(&storage, &settings, args)?,
        Some(Commands::Audit(args)) => handle_audit_command(&storage, args)?,
        Some(Commands::Tui { demo }) => {
            let demo = demo.map(|path| load_expenses_json(&path)).transpose()?;
            expense_tracker::tui::run_tui(&storage, &settings, demo)?;
        }
        Some(Commands::Config) => {
            println!("Expense Tracker Configuration");
            println!("=============================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:     {:?}", settings.currency_symbol);
            println!("  Date format:         {}", settings.date_format);
            println!("  Min password length: {}", settings.min_password_length);
            println!(
                "  Default to current month: {}",
                settings.default_to_current_month
            );
        }
        None => {
            println!("Expense Tracker - record and review your spending");
            println!();
            println!("Run 'expenses --help' for usage information.");
            println!("Run 'expenses auth signup <email>' to create an account.");
            println!("Run 'expenses tui' to launch the interactive interface.");
        }
    }

    Ok(())
}
