//! Service layer for the expense tracker
//!
//! Business logic on top of the storage layer: authentication, owner-scoped
//! expense operations and bulk import.

pub mod auth;
pub mod expense;
pub mod import;

pub use auth::AuthService;
pub use expense::{ExpenseFilter, ExpenseService, ExpenseSummary};
pub use import::{ImportResult, ImportService, SkippedRecord};
