//! User account model
//!
//! A registered user: email plus an Argon2id password hash in PHC string
//! form. The plaintext password is never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::UserId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,

    /// Email as entered at sign-up (trimmed)
    pub email: String,

    /// PHC-encoded password hash
    pub password_hash: String,

    pub created_at: DateTime<Utc>,

    /// When the password was last set
    pub password_changed_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: impl Into<String>, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            email: email.into().trim().to_string(),
            password_hash,
            created_at: now,
            password_changed_at: now,
        }
    }

    /// Key used for case-insensitive email lookup
    pub fn email_key(&self) -> String {
        normalize_email(&self.email)
    }

    /// Replace the stored password hash
    pub fn set_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.password_changed_at = Utc::now();
    }
}

/// Normalize an email for comparison
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Minimal shape check: something before and after a single '@', and a dot
/// in the domain part
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}
