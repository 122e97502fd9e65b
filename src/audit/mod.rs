//! Audit logging for the expense tracker
//!
//! Every expense create, update and delete is recorded with before/after
//! snapshots in an append-only JSONL file, alongside sign-in, sign-out,
//! password change and import events.
//!
//! - `AuditEntry`: one log line (timestamp, operation, entity, snapshots).
//! - `AuditLogger`: appends entries and reads them back.
//! - `generate_diff`: summarizes field changes for update entries.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
