//! Expense model
//!
//! A single recorded expense: amount, date and a free-text category, owned by
//! exactly one user.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ExpenseId, UserId};
use super::money::Money;

/// ISO calendar date format used for storage and input
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier, generated by the store
    pub id: ExpenseId,

    /// The user this expense belongs to
    #[serde(alias = "uid")]
    pub owner: UserId,

    /// Amount spent
    pub amount: Money,

    /// Calendar date of the expense
    pub date: NaiveDate,

    /// Free-text category label
    pub category: String,

    /// When the expense was created
    pub created_at: DateTime<Utc>,

    /// When the expense was last modified
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new expense for `owner` with a fresh ID
    pub fn new(owner: UserId, input: NewExpense) -> Self {
        Self::with_id(ExpenseId::new(), owner, input)
    }

    /// Create an expense with a caller-chosen ID (used by import)
    pub fn with_id(id: ExpenseId, owner: UserId, input: NewExpense) -> Self {
        let now = Utc::now();
        Self {
            id,
            owner,
            amount: input.amount,
            date: input.date,
            category: input.category,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace amount, date and category
    pub fn apply(&mut self, input: NewExpense) {
        self.amount = input.amount;
        self.date = input.date;
        self.category = input.category;
        self.updated_at = Utc::now();
    }

    /// Check whether `user` owns this expense
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner == user
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format(DATE_FORMAT),
            self.amount,
            self.category
        )
    }
}

/// Validated field values for creating or editing an expense
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    pub amount: Money,
    pub date: NaiveDate,
    pub category: String,
}

impl NewExpense {
    /// Build from already-typed values, checking the category is present
    pub fn new(
        amount: Money,
        date: NaiveDate,
        category: impl Into<String>,
    ) -> Result<Self, ExpenseValidationError> {
        let category = category.into().trim().to_string();
        if category.is_empty() {
            return Err(ExpenseValidationError::Missing("Category"));
        }
        Ok(Self {
            amount,
            date,
            category,
        })
    }

    /// Build from raw form values.
    ///
    /// Presence of all three fields is checked first, in form order, then the
    /// amount and date are parsed.
    pub fn from_raw(
        amount: &str,
        date: &str,
        category: &str,
    ) -> Result<Self, ExpenseValidationError> {
        let (amount, date, category) = (amount.trim(), date.trim(), category.trim());

        if amount.is_empty() {
            return Err(ExpenseValidationError::Missing("Amount"));
        }
        if date.is_empty() {
            return Err(ExpenseValidationError::Missing("Date"));
        }
        if category.is_empty() {
            return Err(ExpenseValidationError::Missing("Category"));
        }

        let amount = Money::parse(amount)
            .map_err(|_| ExpenseValidationError::InvalidAmount(amount.to_string()))?;
        let date = parse_date(date)?;

        Self::new(amount, date, category)
    }
}

/// Parse an ISO `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate, ExpenseValidationError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| ExpenseValidationError::InvalidDate(s.trim().to_string()))
}

/// Validation errors for expense input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    Missing(&'static str),
    InvalidAmount(String),
    InvalidDate(String),
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(field) => write!(f, "{} is required", field),
            Self::InvalidAmount(s) => {
                write!(f, "Invalid amount: '{}'. Use a number like '12.50'", s)
            }
            Self::InvalidDate(s) => write!(f, "Invalid date: '{}'. Use YYYY-MM-DD", s),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}
