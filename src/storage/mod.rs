//! Storage layer for the expense tracker
//!
//! JSON file storage with atomic writes and automatic directory creation.
//! `Storage` ties the repositories to the audit log.

pub mod expenses;
pub mod file_io;
pub mod session;
pub mod users;

pub use expenses::ExpenseRepository;
pub use file_io::{read_json, write_json_atomic};
pub use session::{Session, SessionStore};
pub use users::UserRepository;

use serde::Serialize;

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType, Operation};
use crate::config::paths::ExpensePaths;
use crate::error::ExpenseError;
use crate::models::UserId;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: ExpensePaths,
    pub expenses: ExpenseRepository,
    pub users: UserRepository,
    pub session: SessionStore,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance, creating directories as needed
    pub fn new(paths: ExpensePaths) -> Result<Self, ExpenseError> {
        paths.ensure_directories()?;

        Ok(Self {
            expenses: ExpenseRepository::new(paths.expenses_file()),
            users: UserRepository::new(paths.users_file()),
            session: SessionStore::new(paths.session_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Open storage and load everything from disk
    pub fn open(paths: ExpensePaths) -> Result<Self, ExpenseError> {
        let storage = Self::new(paths)?;
        storage.load_all()?;
        Ok(storage)
    }

    pub fn paths(&self) -> &ExpensePaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), ExpenseError> {
        self.users.load()?;
        self.expenses.load()?;
        Ok(())
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), ExpenseError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Log an update; the diff summary is computed from the two snapshots
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Result<(), ExpenseError> {
        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), ExpenseError> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }

    /// Log a sign-in, sign-out or password change. Only the user's id and
    /// email are recorded.
    pub fn log_auth(
        &self,
        operation: Operation,
        user_id: UserId,
        email: &str,
    ) -> Result<(), ExpenseError> {
        self.audit.log(&AuditEntry::event(
            operation,
            EntityType::User,
            user_id.short(),
            Some(email.to_string()),
            None,
        ))
    }

    /// Log the outcome of an import batch
    pub fn log_import(
        &self,
        owner: UserId,
        imported: usize,
        skipped: usize,
    ) -> Result<(), ExpenseError> {
        self.audit.log(&AuditEntry::event(
            Operation::Import,
            EntityType::Expense,
            owner.short(),
            None,
            Some(format!("imported {}, skipped {}", imported, skipped)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Expense, NewExpense};
    use tempfile::TempDir;

    fn create_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ExpensePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_storage_creation() {
        let (temp_dir, storage) = create_storage();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.audit().exists());
    }

    #[test]
    fn test_log_update_records_diff() {
        let (_temp_dir, storage) = create_storage();
        let owner = UserId::new();
        let before = Expense::new(owner, NewExpense::from_raw("10", "2025-01-01", "Food").unwrap());
        let mut after = before.clone();
        after.apply(NewExpense::from_raw("12.5", "2025-01-01", "Food").unwrap());

        storage
            .log_update(EntityType::Expense, after.id.to_string(), None, &before, &after)
            .unwrap();

        let entries = storage.audit().read_all().unwrap();
        let diff = entries[0].diff_summary.as_deref().unwrap();
        assert!(diff.contains("amount"));
        assert!(!diff.contains("updated_at"));
    }

    #[test]
    fn test_log_auth_has_no_secrets() {
        let (_temp_dir, storage) = create_storage();
        storage
            .log_auth(Operation::SignIn, UserId::new(), "a@b.co")
            .unwrap();

        let raw = std::fs::read_to_string(storage.paths().audit_log()).unwrap();
        assert!(raw.contains("a@b.co"));
        assert!(!raw.contains("password"));
    }

    #[test]
    fn test_writes_survive_reopen() {
        let (temp_dir, storage) = create_storage();
        let owner = UserId::new();
        storage
            .expenses
            .upsert(Expense::new(owner, NewExpense::from_raw("1", "2025-01-01", "A").unwrap()))
            .unwrap();

        let reopened = Storage::open(ExpensePaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        assert_eq!(reopened.expenses.count_for(owner).unwrap(), 1);
    }
}
