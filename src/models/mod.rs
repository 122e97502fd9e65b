//! Core data models for the expense tracker
//!
//! This module contains the data structures for the domain: expenses, the
//! users who own them, and the month used for filtering.

pub mod expense;
pub mod ids;
pub mod money;
pub mod month;
pub mod user;

pub use expense::{parse_date, Expense, ExpenseValidationError, NewExpense, DATE_FORMAT};
pub use ids::{ExpenseId, UserId};
pub use money::{Money, MoneyParseError};
pub use month::{Month, MonthParseError};
pub use user::User;
