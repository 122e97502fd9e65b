//! User repository for JSON storage
//!
//! Manages loading and saving registered users to users.json, with a
//! case-insensitive email index.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::ExpenseError;
use crate::models::user::normalize_email;
use crate::models::{User, UserId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable user data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct UserData {
    users: Vec<User>,
}

/// Repository for user persistence
pub struct UserRepository {
    path: PathBuf,
    data: RwLock<HashMap<UserId, User>>,
    /// Index: normalized email -> user id
    by_email: RwLock<HashMap<String, UserId>>,
}

fn lock_error(e: impl std::fmt::Display) -> ExpenseError {
    ExpenseError::Storage(format!("Failed to acquire lock: {}", e))
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_email: RwLock::new(HashMap::new()),
        }
    }

    /// Load users from disk
    pub fn load(&self) -> Result<(), ExpenseError> {
        let file_data: UserData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_email = self.by_email.write().map_err(lock_error)?;

        data.clear();
        by_email.clear();

        for user in file_data.users {
            by_email.insert(user.email_key(), user.id);
            data.insert(user.id, user);
        }

        Ok(())
    }

    /// Save users to disk
    pub fn save(&self) -> Result<(), ExpenseError> {
        let data = self.data.read().map_err(lock_error)?;

        let mut users: Vec<_> = data.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        write_json_atomic(&self.path, &UserData { users })
    }

    /// Get a user by ID
    pub fn get(&self, id: UserId) -> Result<Option<User>, ExpenseError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// Find a user by email (case-insensitive)
    pub fn find_by_email(&self, email: &str) -> Result<Option<User>, ExpenseError> {
        let data = self.data.read().map_err(lock_error)?;
        let by_email = self.by_email.read().map_err(lock_error)?;

        Ok(by_email
            .get(&normalize_email(email))
            .and_then(|id| data.get(id))
            .cloned())
    }

    /// Insert a new user; the email must not be registered yet
    pub fn insert(&self, user: User) -> Result<(), ExpenseError> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_email = self.by_email.write().map_err(lock_error)?;

        let key = user.email_key();
        if by_email.contains_key(&key) {
            return Err(ExpenseError::Duplicate {
                entity_type: "User",
                identifier: user.email,
            });
        }

        by_email.insert(key, user.id);
        data.insert(user.id, user);
        Ok(())
    }

    /// Replace an existing user record
    pub fn update(&self, user: User) -> Result<(), ExpenseError> {
        let mut data = self.data.write().map_err(lock_error)?;

        if !data.contains_key(&user.id) {
            return Err(ExpenseError::user_not_found(user.id.to_string()));
        }

        data.insert(user.id, user);
        Ok(())
    }

    /// Number of registered users
    pub fn count(&self) -> Result<usize, ExpenseError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.len())
    }
}
