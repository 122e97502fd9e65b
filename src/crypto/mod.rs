//! Password handling for the expense tracker
//!
//! Provides Argon2id password hashing and a zeroizing string wrapper for
//! passwords held in memory.

pub mod password;
pub mod secure_memory;

pub use password::{hash_password, verify_password};
pub use secure_memory::SecureString;
