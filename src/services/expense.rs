//! Expense service
//!
//! CRUD on expenses for one signed-in owner. Records that belong to anybody
//! else are invisible here and behave exactly like missing ones.

use crate::audit::EntityType;
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Expense, ExpenseId, Money, Month, NewExpense, UserId};
use crate::storage::Storage;

/// Which expenses to list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    /// Restrict to one calendar month; `None` lists everything
    pub month: Option<Month>,
}

impl ExpenseFilter {
    pub fn all() -> Self {
        Self { month: None }
    }

    pub fn month(month: Month) -> Self {
        Self { month: Some(month) }
    }
}

/// Count and total of a set of listed expenses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpenseSummary {
    pub count: usize,
    pub total: Money,
}

/// Service for one owner's expenses
pub struct ExpenseService<'a> {
    storage: &'a Storage,
    owner: UserId,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage, owner: UserId) -> Self {
        Self { storage, owner }
    }

    pub fn owner(&self) -> UserId {
        self.owner
    }

    /// Record a new expense
    pub fn create(&self, input: NewExpense) -> ExpenseResult<Expense> {
        let expense = Expense::new(self.owner, input);

        self.storage.expenses.upsert(expense.clone())?;

        self.storage.log_create(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.to_string()),
            &expense,
        )?;

        Ok(expense)
    }

    /// Get an expense by ID
    pub fn get(&self, id: ExpenseId) -> ExpenseResult<Option<Expense>> {
        Ok(self
            .storage
            .expenses
            .get(id)?
            .filter(|e| e.is_owned_by(self.owner)))
    }

    /// Find an expense by full ID or by the short `exp-xxxxxxxx` form
    pub fn find(&self, identifier: &str) -> ExpenseResult<Option<Expense>> {
        if let Ok(id) = identifier.parse::<ExpenseId>() {
            return self.get(id);
        }

        let needle = identifier.trim().to_lowercase();
        let needle = needle.strip_prefix("exp-").unwrap_or(&needle);
        if needle.len() < 4 {
            return Ok(None);
        }

        let mut matches = self
            .storage
            .expenses
            .get_by_owner(self.owner)?
            .into_iter()
            .filter(|e| e.id.to_string().starts_with(needle));

        match (matches.next(), matches.next()) {
            (Some(expense), None) => Ok(Some(expense)),
            (Some(_), Some(_)) => Err(ExpenseError::Validation(format!(
                "'{}' matches more than one expense; use a longer ID",
                identifier
            ))),
            _ => Ok(None),
        }
    }

    /// Like `find`, but a miss is an error
    pub fn resolve(&self, identifier: &str) -> ExpenseResult<Expense> {
        self.find(identifier)?
            .ok_or_else(|| ExpenseError::expense_not_found(identifier))
    }

    /// Owned expenses matching the filter, newest first
    pub fn list(&self, filter: ExpenseFilter) -> ExpenseResult<Vec<Expense>> {
        self.storage.expenses.query(self.owner, filter.month)
    }

    /// Replace amount, date and category of an expense
    pub fn update(&self, id: ExpenseId, input: NewExpense) -> ExpenseResult<Expense> {
        let before = self
            .get(id)?
            .ok_or_else(|| ExpenseError::expense_not_found(id.short()))?;

        let mut expense = before.clone();
        expense.apply(input);

        self.storage.expenses.upsert(expense.clone())?;

        self.storage.log_update(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.to_string()),
            &before,
            &expense,
        )?;

        Ok(expense)
    }

    /// Delete an expense, returning what was removed
    pub fn delete(&self, id: ExpenseId) -> ExpenseResult<Expense> {
        // Ownership check first so another user's id reads as not found
        if self.get(id)?.is_none() {
            return Err(ExpenseError::expense_not_found(id.short()));
        }

        let expense = self
            .storage
            .expenses
            .delete(id)?
            .ok_or_else(|| ExpenseError::expense_not_found(id.short()))?;

        self.storage.log_delete(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.to_string()),
            &expense,
        )?;

        Ok(expense)
    }

    /// Count and total of the given expenses
    pub fn summarize(expenses: &[Expense]) -> ExpenseSummary {
        ExpenseSummary {
            count: expenses.len(),
            total: expenses.iter().map(|e| e.amount).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::ExpensePaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ExpensePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn input(amount: &str, date: &str, category: &str) -> NewExpense {
        NewExpense::from_raw(amount, date, category).unwrap()
    }

    #[test]
    fn test_create_and_list() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage, UserId::new());

        service.create(input("10", "2025-01-05", "Food")).unwrap();
        service.create(input("2.5", "2025-01-20", "Coffee")).unwrap();

        let expenses = service.list(ExpenseFilter::all()).unwrap();
        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses[0].category, "Coffee");

        let summary = ExpenseService::summarize(&expenses);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total.to_string(), "12.50");
    }

    #[test]
    fn test_month_filter_december_rollover() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage, UserId::new());

        service.create(input("1", "2024-12-01", "first")).unwrap();
        service.create(input("2", "2024-12-31", "last")).unwrap();
        service.create(input("4", "2025-01-01", "next year")).unwrap();
        service.create(input("8", "2024-11-30", "previous")).unwrap();

        let december = service
            .list(ExpenseFilter::month("2024-12".parse().unwrap()))
            .unwrap();

        assert_eq!(december.len(), 2);
        assert_eq!(
            ExpenseService::summarize(&december).total,
            Money::from_cents(300)
        );
    }

    #[test]
    fn test_other_owner_is_not_found() {
        let (_temp_dir, storage) = create_test_storage();
        let alice = ExpenseService::new(&storage, UserId::new());
        let bob = ExpenseService::new(&storage, UserId::new());

        let expense = alice.create(input("10", "2025-01-05", "Food")).unwrap();

        assert!(bob.get(expense.id).unwrap().is_none());
        assert!(bob.find(&expense.id.short()).unwrap().is_none());
        assert!(bob.list(ExpenseFilter::all()).unwrap().is_empty());
        assert!(bob
            .update(expense.id, input("1", "2025-01-01", "Hijack"))
            .unwrap_err()
            .is_not_found());
        assert!(bob.delete(expense.id).unwrap_err().is_not_found());

        let untouched = alice.get(expense.id).unwrap().unwrap();
        assert_eq!(untouched.category, "Food");
    }

    #[test]
    fn test_update_and_delete() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage, UserId::new());
        let expense = service.create(input("10", "2025-01-05", "Food")).unwrap();

        let updated = service
            .update(expense.id, input("11", "2025-01-06", "Groceries"))
            .unwrap();
        assert_eq!(updated.id, expense.id);
        assert_eq!(updated.category, "Groceries");

        let deleted = service.delete(expense.id).unwrap();
        assert_eq!(deleted.category, "Groceries");
        assert!(service.get(expense.id).unwrap().is_none());
    }

    #[test]
    fn test_find_by_short_id() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage, UserId::new());
        let expense = service.create(input("10", "2025-01-05", "Food")).unwrap();

        let found = service.find(&expense.id.short()).unwrap().unwrap();
        assert_eq!(found.id, expense.id);
        assert!(service.find(&expense.id.to_string()).unwrap().is_some());
        assert!(service.resolve("exp-zzzzzzzz").unwrap_err().is_not_found());
    }

    #[test]
    fn test_failed_create_is_not_listed() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage, UserId::new());
        // A directory in place of the data file makes the write fail
        let path = storage.paths().expenses_file();
        std::fs::create_dir_all(&path).unwrap();
        std::fs::write(path.join("occupied"), "x").unwrap();

        assert!(service.create(input("10", "2025-01-05", "Food")).is_err());
        assert!(service.list(ExpenseFilter::all()).unwrap().is_empty());
    }

    #[test]
    fn test_mutations_are_audited() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage, UserId::new());
        let expense = service.create(input("10", "2025-01-05", "Food")).unwrap();
        service
            .update(expense.id, input("12", "2025-01-05", "Food"))
            .unwrap();
        service.delete(expense.id).unwrap();

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries[1]
            .diff_summary
            .as_deref()
            .unwrap()
            .contains("amount"));
    }
}
