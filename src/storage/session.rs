//! Sign-in session persistence
//!
//! The signed-in user is remembered in session.json between invocations.
//! No file means nobody is signed in.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ExpenseError;
use crate::models::{User, UserId};

use super::file_io::{read_json, remove_if_exists, write_json_atomic};

/// The persisted sign-in state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub email: String,
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    /// Start a session for `user`
    pub fn for_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            signed_in_at: Utc::now(),
        }
    }
}

/// Reads and writes the session file
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Current session, if any
    pub fn load(&self) -> Result<Option<Session>, ExpenseError> {
        read_json(&self.path)
    }

    pub fn save(&self, session: &Session) -> Result<(), ExpenseError> {
        write_json_atomic(&self.path, session)
    }

    /// Forget the session; clearing twice is fine
    pub fn clear(&self) -> Result<(), ExpenseError> {
        remove_if_exists(&self.path)
    }
}
