//! Terminal User Interface module
//!
//! A ratatui front end over the same services as the CLI: a login screen,
//! the monthly expense list and dialogs for editing, importing and changing
//! the password.

pub mod app;
pub mod event;
pub mod handler;
pub mod terminal;

// Views
pub mod views;

// Widgets
pub mod widgets;

// Dialogs
pub mod dialogs;

// Layout
pub mod layout;

pub use app::App;
pub use terminal::run_tui;
