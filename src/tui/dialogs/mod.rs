//! Modal dialogs: expense form, delete confirmation, password change and
//! import.

pub mod confirm;
pub mod expense;
pub mod import;
pub mod password;
