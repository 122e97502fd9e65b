//! Expense repository for JSON storage
//!
//! The expense collection lives in expenses.json. Records are indexed by
//! owner so every query is scoped to a single user.
//!
//! Every mutation is staged on a copy of the collection and written to disk
//! first; memory only changes once the file replace succeeded.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::ExpenseError;
use crate::models::{Expense, ExpenseId, Month, UserId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable expense data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ExpenseData {
    expenses: Vec<Expense>,
}

/// Repository for expense persistence with an owner index
pub struct ExpenseRepository {
    path: PathBuf,
    data: RwLock<HashMap<ExpenseId, Expense>>,
    /// Index: owner -> expense ids
    by_owner: RwLock<HashMap<UserId, Vec<ExpenseId>>>,
}

fn lock_error(e: impl std::fmt::Display) -> ExpenseError {
    ExpenseError::Storage(format!("Failed to acquire lock: {}", e))
}

/// Newest first; ties broken by creation time so the order is stable
fn sort_newest_first(expenses: &mut [Expense]) {
    expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
}

fn build_owner_index(data: &HashMap<ExpenseId, Expense>) -> HashMap<UserId, Vec<ExpenseId>> {
    let mut index: HashMap<UserId, Vec<ExpenseId>> = HashMap::new();
    for expense in data.values() {
        index.entry(expense.owner).or_default().push(expense.id);
    }
    index
}

impl ExpenseRepository {
    /// Create a new expense repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_owner: RwLock::new(HashMap::new()),
        }
    }

    /// Load expenses from disk and build the owner index
    pub fn load(&self) -> Result<(), ExpenseError> {
        let file_data: ExpenseData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_owner = self.by_owner.write().map_err(lock_error)?;

        *data = file_data
            .expenses
            .into_iter()
            .map(|expense| (expense.id, expense))
            .collect();
        *by_owner = build_owner_index(&data);

        Ok(())
    }

    fn write_file(&self, data: &HashMap<ExpenseId, Expense>) -> Result<(), ExpenseError> {
        let mut expenses: Vec<_> = data.values().cloned().collect();
        sort_newest_first(&mut expenses);
        write_json_atomic(&self.path, &ExpenseData { expenses })
    }

    /// Get an expense by ID regardless of owner
    pub fn get(&self, id: ExpenseId) -> Result<Option<Expense>, ExpenseError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// Get all expenses of one owner, newest first
    pub fn get_by_owner(&self, owner: UserId) -> Result<Vec<Expense>, ExpenseError> {
        self.query(owner, None)
    }

    /// Expenses of one owner, optionally restricted to a month, newest first
    pub fn query(&self, owner: UserId, month: Option<Month>) -> Result<Vec<Expense>, ExpenseError> {
        let data = self.data.read().map_err(lock_error)?;
        let by_owner = self.by_owner.read().map_err(lock_error)?;

        let ids = by_owner.get(&owner).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut expenses: Vec<_> = ids
            .iter()
            .filter_map(|id| data.get(id))
            .filter(|e| month.map_or(true, |m| m.contains(e.date)))
            .cloned()
            .collect();
        sort_newest_first(&mut expenses);
        Ok(expenses)
    }

    /// Apply `change` to a staged copy, persist it, then swap it in.
    ///
    /// When `change` reports nothing changed the file is not rewritten.
    fn commit<R>(
        &self,
        change: impl FnOnce(&mut HashMap<ExpenseId, Expense>) -> (R, bool),
    ) -> Result<R, ExpenseError> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_owner = self.by_owner.write().map_err(lock_error)?;

        let mut staged = data.clone();
        let (result, changed) = change(&mut staged);
        if !changed {
            return Ok(result);
        }

        self.write_file(&staged)?;

        *by_owner = build_owner_index(&staged);
        *data = staged;

        Ok(result)
    }

    /// Insert or update an expense and persist the collection
    pub fn upsert(&self, expense: Expense) -> Result<(), ExpenseError> {
        self.commit(|staged| {
            staged.insert(expense.id, expense);
            ((), true)
        })
    }

    /// Delete an expense and persist, returning it if it existed
    pub fn delete(&self, id: ExpenseId) -> Result<Option<Expense>, ExpenseError> {
        self.commit(|staged| {
            let removed = staged.remove(&id);
            let changed = removed.is_some();
            (removed, changed)
        })
    }

    /// Write a set of expenses as one batch in a single file replace
    pub fn commit_batch(&self, batch: Vec<Expense>) -> Result<usize, ExpenseError> {
        self.commit(|staged| {
            let count = batch.len();
            for expense in batch {
                staged.insert(expense.id, expense);
            }
            (count, count > 0)
        })
    }

    /// Count of expenses for an owner
    pub fn count_for(&self, owner: UserId) -> Result<usize, ExpenseError> {
        let by_owner = self.by_owner.read().map_err(lock_error)?;
        Ok(by_owner.get(&owner).map_or(0, Vec::len))
    }
}
