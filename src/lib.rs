//! expense-tracker - Personal expense tracking from the terminal
//!
//! Signed-in users record expenses (amount, date, category), list them by
//! month with a running total, edit and delete them, and move them in and
//! out as JSON. Both a CLI and an interactive TUI sit on the same services.
//!
//! # Architecture
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (expenses, users, months, money)
//! - `storage`: JSON file storage layer and sign-in session
//! - `services`: Business logic layer (auth, expenses, import)
//! - `audit`: Audit logging system
//! - `crypto`: Password hashing
//! - `export`: JSON export
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//! - `tui`: Interactive terminal interface
//!
//! # Example
//!
//! ```rust,ignore
//! use expense_tracker::config::{paths::ExpensePaths, settings::Settings};
//! use expense_tracker::services::{AuthService, ExpenseFilter, ExpenseService};
//! use expense_tracker::storage::Storage;
//!
//! let paths = ExpensePaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(paths)?;
//! let user = AuthService::new(&storage, &settings).require_user()?;
//! let expenses = ExpenseService::new(&storage, user.id).list(ExpenseFilter::all())?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;
pub mod tui;

pub use error::{ExpenseError, ExpenseResult};
